// src/parsers/mod.rs

//! Contrato común de los parsers de parámetros y los tipos concretos integrados.
//!
//! Un parser convierte una ventana de tokens (a partir de un `offset`) en un
//! [`Value`] tipado. Cada instancia lleva una etiqueta para mostrar, un valor
//! por defecto en forma de literal y un [`ParserDescriptor`] usado solo para
//! generar la ayuda.

pub mod boolean;
pub mod enumeration;
pub mod message;
pub mod number;
pub mod string;

use crate::constants::NO_DEFAULT_DISPLAY;
use std::fmt;
use thiserror::Error;

pub use boolean::BoolParser;
pub use enumeration::EnumParser;
pub use message::MsgParser;
pub use number::{DoubleParser, IntegerParser};
pub use string::StringParser;

/// El valor producido al parsear uno o más tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Double(f64),
    Text(String),
    /// Nombre canónico de la constante del enum.
    Enum(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Double(d) => write!(f, "{}", d),
            Value::Text(s) | Value::Enum(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("No hay ningún token en la posición {offset}.")]
    MissingToken { offset: usize },
    #[error("'{0}' no es un valor booleano válido (se esperaba 'true' o 'false').")]
    InvalidBool(String),
    #[error("'{literal}' no es una constante válida de '{enum_name}'.")]
    InvalidEnum { literal: String, enum_name: String },
    #[error("'{literal}' no es un número {expected} válido.")]
    InvalidNumber {
        literal: String,
        expected: &'static str,
    },
    #[error("El valor {literal} está fuera del rango [{min}, {max}].")]
    OutOfRange {
        literal: String,
        min: String,
        max: String,
    },
}

/// Metadatos de ayuda de un parser. No intervienen en el parseo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserDescriptor {
    pub type_name: String,
    pub help: String,
    /// Líneas extra, agrupadas en pares (`"Default value: "`, `"none"`).
    pub extra: Vec<String>,
}

impl ParserDescriptor {
    pub fn new(type_name: impl Into<String>, help: impl Into<String>, extra: Vec<String>) -> Self {
        Self {
            type_name: type_name.into(),
            help: help.into(),
            extra,
        }
    }
}

/// Identidad de un parser dentro de la caché: dos parsers con la misma clave
/// son intercambiables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParserKey {
    pub kind: &'static str,
    pub label: Option<String>,
    pub default_value: String,
    pub settings: Vec<String>,
}

/// Estado compartido por todos los parsers: etiqueta y valor por defecto.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParserBase {
    label: Option<String>,
    default_value: String,
}

impl ParserBase {
    /// Una etiqueta vacía se considera "sin asignar".
    pub fn new(label: impl Into<String>, default_value: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            label: (!label.is_empty()).then_some(label),
            default_value: default_value.into(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: &str) {
        self.label = (!label.is_empty()).then(|| label.to_string());
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    /// El valor por defecto tal y como se muestra en la ayuda.
    pub fn default_display(&self) -> &str {
        if self.default_value.is_empty() {
            NO_DEFAULT_DISPLAY
        } else {
            &self.default_value
        }
    }

    pub(crate) fn default_value_lines(&self) -> Vec<String> {
        vec!["Default value: ".to_string(), self.default_display().to_string()]
    }
}

pub trait ParameterParser: fmt::Debug {
    /// Nombre estable del tipo concreto de parser.
    fn kind(&self) -> &'static str;

    fn base(&self) -> &ParserBase;

    fn base_mut(&mut self) -> &mut ParserBase;

    fn descriptor(&self) -> &ParserDescriptor;

    /// Consume uno o más tokens a partir de `offset` y produce un valor.
    fn parse(&self, offset: usize, args: &[String]) -> Result<Value, ParseError>;

    fn boxed_clone(&self) -> Box<dyn ParameterParser>;

    /// Configuración propia del tipo concreto que forma parte de su identidad.
    fn settings(&self) -> Vec<String> {
        Vec::new()
    }

    /// Un parser voraz consume todos los tokens restantes.
    fn is_greedy(&self) -> bool {
        false
    }

    fn label(&self) -> Option<&str> {
        self.base().label()
    }

    fn set_label(&mut self, label: &str) {
        self.base_mut().set_label(label);
    }

    fn default_value(&self) -> &str {
        self.base().default_value()
    }

    fn key(&self) -> ParserKey {
        ParserKey {
            kind: self.kind(),
            label: self.label().map(str::to_string),
            default_value: self.default_value().to_string(),
            settings: self.settings(),
        }
    }
}

/// Devuelve el token en `offset` o un error si la secuencia es demasiado corta.
pub(crate) fn token_at(args: &[String], offset: usize) -> Result<&str, ParseError> {
    args.get(offset)
        .map(String::as_str)
        .ok_or(ParseError::MissingToken { offset })
}

#[cfg(test)]
pub(crate) fn tokens(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
