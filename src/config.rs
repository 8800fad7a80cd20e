// src/config.rs

use crate::constants::{CONFIG_DIR_NAME, MANIFEST_FILENAME};
use crate::models::Manifest;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Error de Ficheros: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error al parsear TOML en '{path}': {source}")]
    TomlParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("No se pudo encontrar el directorio de configuración del sistema.")]
    ConfigDirNotFound,
    #[error("No se encontró el manifiesto de comandos en '{0}'.")]
    ManifestNotFound(String),
    #[error("El enum '{name}' no declara ninguna constante.")]
    EmptyEnum { name: String },
    #[error("El comando '{name}' está declarado más de una vez.")]
    DuplicateCommand { name: String },
}

type ConfigResult<T> = Result<T, ConfigError>;

/// Devuelve la ruta al directorio de configuración de cmdargs. No lo crea.
pub fn get_config_dir() -> ConfigResult<PathBuf> {
    let config_path = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join(CONFIG_DIR_NAME);
    log::debug!("Directorio de config: {:?}", config_path);
    Ok(config_path)
}

/// Busca el manifiesto: primero en el directorio actual y luego en el de configuración.
pub fn find_manifest_path() -> ConfigResult<PathBuf> {
    let local = env::current_dir()?.join(MANIFEST_FILENAME);
    if local.is_file() {
        return Ok(local);
    }
    Ok(get_config_dir()?.join(MANIFEST_FILENAME))
}

pub fn load_manifest(path: &Path) -> ConfigResult<Manifest> {
    if !path.is_file() {
        return Err(ConfigError::ManifestNotFound(path.display().to_string()));
    }
    log::info!("Cargando manifiesto desde: {:?}", path);
    let content = fs::read_to_string(path)?;
    parse_manifest(&content, &path.display().to_string())
}

/// Parsea y valida el contenido de un manifiesto. `origin` solo se usa en los errores.
pub fn parse_manifest(content: &str, origin: &str) -> ConfigResult<Manifest> {
    let manifest: Manifest = toml::from_str(content).map_err(|e| ConfigError::TomlParse {
        path: origin.to_string(),
        source: e,
    })?;

    if let Some((name, _)) = manifest.enums.iter().find(|(_, values)| values.is_empty()) {
        return Err(ConfigError::EmptyEnum { name: name.clone() });
    }

    for (i, command) in manifest.commands.iter().enumerate() {
        if manifest.commands[..i].iter().any(|c| c.name == command.name) {
            return Err(ConfigError::DuplicateCommand {
                name: command.name.clone(),
            });
        }
    }

    log::debug!(
        "Manifiesto '{}': {} comando(s), {} enum(s)",
        origin,
        manifest.commands.len(),
        manifest.enums.len()
    );
    Ok(manifest)
}
