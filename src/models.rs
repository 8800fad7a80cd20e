// src/models.rs

use crate::core::annotations::{AnnotationDef, ParserSpec};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

// --- MODELOS DE TIPOS DE PARÁMETRO (Nuestra representación de trabajo interna) ---

/// Un tipo enumerado: su nombre y sus constantes en orden de declaración.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumType {
    pub name: String,
    pub constants: Vec<String>,
}

impl EnumType {
    pub fn new<I, S>(name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    /// Busca la constante que coincide con `literal` sin distinguir mayúsculas.
    pub fn find_ignore_case(&self, literal: &str) -> Option<&str> {
        self.constants
            .iter()
            .find(|c| c.eq_ignore_ascii_case(literal))
            .map(String::as_str)
    }
}

/// El tipo "crudo" declarado de un parámetro.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    Bool,
    Integer,
    Double,
    Text,
    Enum(EnumType),
    /// Un tipo que el gestor no conoce; solo una anotación puede resolverlo.
    Other(String),
}

impl ParamType {
    /// Resuelve un nombre de tipo del manifiesto. Los enums declarados tienen prioridad
    /// sobre los nombres integrados.
    pub fn from_name(type_name: &str, enums: &HashMap<String, EnumType>) -> Self {
        if let Some(enum_type) = enums.get(type_name) {
            return ParamType::Enum(enum_type.clone());
        }
        match type_name {
            "bool" | "boolean" => ParamType::Bool,
            "int" | "integer" => ParamType::Integer,
            "double" | "float" => ParamType::Double,
            "string" | "text" => ParamType::Text,
            other => ParamType::Other(other.to_string()),
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            ParamType::Enum(enum_type) => Some(enum_type),
            _ => None,
        }
    }

    pub fn is_enum(&self) -> bool {
        self.as_enum().is_some()
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Bool => write!(f, "bool"),
            ParamType::Integer => write!(f, "integer"),
            ParamType::Double => write!(f, "double"),
            ParamType::Text => write!(f, "string"),
            ParamType::Enum(e) => write!(f, "{}", e.name),
            ParamType::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Un parámetro declarado de un comando: nombre (si se conserva), tipo y anotaciones
/// en orden de declaración.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: Option<String>,
    pub ty: ParamType,
    pub annotations: Vec<Rc<dyn ParserSpec>>,
}

impl Parameter {
    pub fn new(name: Option<&str>, ty: ParamType) -> Self {
        Self {
            name: name.map(str::to_string),
            ty,
            annotations: Vec::new(),
        }
    }

    pub fn annotated(mut self, annotation: impl ParserSpec + 'static) -> Self {
        self.annotations.push(Rc::new(annotation));
        self
    }

    /// El nombre a mostrar cuando no hay etiqueta.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| format!("<{}>", self.ty))
    }
}

// --- MODELOS DEL MANIFIESTO (Lo que se lee de `commands.toml`) ---

/// Representa la estructura deserializada de un archivo `commands.toml`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Manifest {
    #[serde(default)]
    pub enums: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub commands: Vec<CommandDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CommandDef {
    pub name: String,
    pub desc: Option<String>,
    #[serde(default)]
    pub params: Vec<ParamDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ParamDef {
    // Sin nombre emula un host que no conserva los nombres de los parámetros.
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub annotations: Vec<AnnotationDef>,
}

impl Manifest {
    pub fn enum_types(&self) -> HashMap<String, EnumType> {
        self.enums
            .iter()
            .map(|(name, constants)| (name.clone(), EnumType::new(name.clone(), constants.clone())))
            .collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandDef> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Convierte las declaraciones de un comando en `Parameter`s listos para el gestor.
    pub fn parameters(&self, command: &CommandDef) -> Vec<Parameter> {
        let enums = self.enum_types();
        command
            .params
            .iter()
            .map(|param| Parameter {
                name: param.name.clone(),
                ty: ParamType::from_name(&param.type_name, &enums),
                annotations: param
                    .annotations
                    .iter()
                    .cloned()
                    .map(AnnotationDef::into_spec)
                    .collect(),
            })
            .collect()
    }
}
