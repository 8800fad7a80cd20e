// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "cmdargs: resuelve y prueba los parsers de parámetros de un manifiesto de comandos.", long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Ruta al manifiesto (por defecto ./commands.toml o el del directorio de configuración).
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Un comando del manifiesto o una acción global ('list', 'help').
    pub command_or_action: Option<String>,

    /// Tokens restantes para el comando.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
