// src/constants.rs

/// El nombre del directorio de configuración de cmdargs (dentro del directorio de config del sistema).
pub const CONFIG_DIR_NAME: &str = "cmdargs";

/// El nombre del archivo de manifiesto que declara los comandos y sus parámetros.
pub const MANIFEST_FILENAME: &str = "commands.toml";

/// Texto mostrado en la ayuda cuando un parser no tiene valor por defecto.
pub const NO_DEFAULT_DISPLAY: &str = "none";

// --- IDENTIFICADORES DE ANOTACIONES INTEGRADAS ---

pub const BOOL_PARAM: &str = "BoolParam";
pub const MSG_PARAM: &str = "MsgParam";
pub const ENUM_PARAM: &str = "EnumParam";
pub const INTEGER_PARAM: &str = "IntegerParam";
pub const DOUBLE_PARAM: &str = "DoubleParam";
pub const STRING_PARAM: &str = "StringParam";
