// src/core/annotations.rs

//! Anotaciones de parámetros: cada una identifica un tipo de parser y expone sus
//! propiedades de configuración con un índice explícito de posición.

use crate::constants::{
    BOOL_PARAM, DOUBLE_PARAM, ENUM_PARAM, INTEGER_PARAM, MSG_PARAM, STRING_PARAM,
};
use crate::models::ParamType;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::rc::Rc;

/// Identificador de un tipo de anotación.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationKind(String);

impl AnnotationKind {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_enum_marker(&self) -> bool {
        self.0 == ENUM_PARAM
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Valor de una propiedad de anotación.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Integer(i64),
    Double(f64),
    Bool(bool),
    Type(ParamType),
}

impl PropertyValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Text(_) => "text",
            PropertyValue::Integer(_) => "integer",
            PropertyValue::Double(_) => "double",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Type(_) => "type",
        }
    }
}

/// Una propiedad marcada con su posición en los argumentos del constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub index: usize,
    pub name: &'static str,
    pub value: PropertyValue,
}

impl Property {
    pub fn new(index: usize, name: &'static str, value: PropertyValue) -> Self {
        Self { index, name, value }
    }

    pub fn text(index: usize, name: &'static str, value: &str) -> Self {
        Self::new(index, name, PropertyValue::Text(value.to_string()))
    }
}

/// La capacidad que debe ofrecer una anotación para configurar un parser.
/// El orden de `properties` no importa: manda el índice de cada propiedad.
pub trait ParserSpec: fmt::Debug {
    fn kind(&self) -> AnnotationKind;

    fn properties(&self) -> Vec<Property>;
}

// --- ANOTACIONES INTEGRADAS ---

// `(label, default)` es la forma más común; estas anotaciones solo difieren en el tipo.
macro_rules! labeled_spec {
    ($name:ident, $kind:expr) => {
        #[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
        pub struct $name {
            #[serde(default)]
            pub label: String,
            #[serde(default, rename = "default")]
            pub default_value: String,
        }

        impl $name {
            pub fn new(label: &str, default_value: &str) -> Self {
                Self {
                    label: label.to_string(),
                    default_value: default_value.to_string(),
                }
            }
        }

        impl ParserSpec for $name {
            fn kind(&self) -> AnnotationKind {
                AnnotationKind::new($kind)
            }

            fn properties(&self) -> Vec<Property> {
                vec![
                    Property::text(0, "label", &self.label),
                    Property::text(1, "default", &self.default_value),
                ]
            }
        }
    };
}

labeled_spec!(BoolParam, BOOL_PARAM);
labeled_spec!(MsgParam, MSG_PARAM);
labeled_spec!(StringParam, STRING_PARAM);
labeled_spec!(EnumParam, ENUM_PARAM);

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct IntegerParam {
    pub min: Option<i64>,
    pub max: Option<i64>,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "default")]
    pub default_value: String,
}

impl ParserSpec for IntegerParam {
    fn kind(&self) -> AnnotationKind {
        AnnotationKind::new(INTEGER_PARAM)
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new(2, "min", PropertyValue::Integer(self.min.unwrap_or(i64::MIN))),
            Property::new(3, "max", PropertyValue::Integer(self.max.unwrap_or(i64::MAX))),
            Property::text(0, "label", &self.label),
            Property::text(1, "default", &self.default_value),
        ]
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct DoubleParam {
    pub min: Option<f64>,
    pub max: Option<f64>,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "default")]
    pub default_value: String,
}

impl ParserSpec for DoubleParam {
    fn kind(&self) -> AnnotationKind {
        AnnotationKind::new(DOUBLE_PARAM)
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new(2, "min", PropertyValue::Double(self.min.unwrap_or(f64::MIN))),
            Property::new(3, "max", PropertyValue::Double(self.max.unwrap_or(f64::MAX))),
            Property::text(0, "label", &self.label),
            Property::text(1, "default", &self.default_value),
        ]
    }
}

/// Una anotación que el manifiesto no conoce. Sus argumentos posicionales van en
/// `args`; el resto de claves no llevan índice y se ignoran.
#[derive(Debug, Clone, PartialEq)]
pub struct OtherAnnotation {
    pub kind: AnnotationKind,
    pub args: Vec<PropertyValue>,
}

impl ParserSpec for OtherAnnotation {
    fn kind(&self) -> AnnotationKind {
        self.kind.clone()
    }

    fn properties(&self) -> Vec<Property> {
        self.args
            .iter()
            .enumerate()
            .map(|(index, value)| Property::new(index, "args", value.clone()))
            .collect()
    }
}

/// Anotación tal y como aparece en el manifiesto, identificada por `kind`.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationDef {
    BoolParam(BoolParam),
    MsgParam(MsgParam),
    StringParam(StringParam),
    EnumParam(EnumParam),
    IntegerParam(IntegerParam),
    DoubleParam(DoubleParam),
    /// Cualquier otro `kind`: el gestor decide si tiene parser registrado.
    Other(OtherAnnotation),
}

impl<'de> Deserialize<'de> for AnnotationDef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut table = toml::Table::deserialize(deserializer)?;
        let kind = match table.remove("kind") {
            Some(toml::Value::String(kind)) => kind,
            Some(other) => {
                return Err(D::Error::custom(format!(
                    "'kind' debe ser un texto, se encontró {}",
                    other.type_str()
                )));
            }
            None => return Err(D::Error::missing_field("kind")),
        };

        let value = toml::Value::Table(table);
        let def = match kind.as_str() {
            BOOL_PARAM => value.try_into().map(AnnotationDef::BoolParam),
            MSG_PARAM => value.try_into().map(AnnotationDef::MsgParam),
            STRING_PARAM => value.try_into().map(AnnotationDef::StringParam),
            ENUM_PARAM => value.try_into().map(AnnotationDef::EnumParam),
            INTEGER_PARAM => value.try_into().map(AnnotationDef::IntegerParam),
            DOUBLE_PARAM => value.try_into().map(AnnotationDef::DoubleParam),
            _ => {
                let args = match value {
                    toml::Value::Table(mut table) => match table.remove("args") {
                        Some(toml::Value::Array(values)) => values
                            .into_iter()
                            .map(property_value)
                            .collect::<Result<Vec<_>, _>>()
                            .map_err(D::Error::custom)?,
                        Some(_) => return Err(D::Error::custom("'args' debe ser una lista")),
                        None => Vec::new(),
                    },
                    _ => Vec::new(),
                };
                log::debug!("Anotación desconocida '{}' con {} argumento(s)", kind, args.len());
                return Ok(AnnotationDef::Other(OtherAnnotation {
                    kind: AnnotationKind::new(kind),
                    args,
                }));
            }
        };
        def.map_err(D::Error::custom)
    }
}

fn property_value(value: toml::Value) -> Result<PropertyValue, String> {
    match value {
        toml::Value::String(s) => Ok(PropertyValue::Text(s)),
        toml::Value::Integer(i) => Ok(PropertyValue::Integer(i)),
        toml::Value::Float(d) => Ok(PropertyValue::Double(d)),
        toml::Value::Boolean(b) => Ok(PropertyValue::Bool(b)),
        other => Err(format!(
            "argumento de anotación no soportado: {}",
            other.type_str()
        )),
    }
}

impl AnnotationDef {
    pub fn into_spec(self) -> Rc<dyn ParserSpec> {
        match self {
            AnnotationDef::BoolParam(a) => Rc::new(a),
            AnnotationDef::MsgParam(a) => Rc::new(a),
            AnnotationDef::StringParam(a) => Rc::new(a),
            AnnotationDef::EnumParam(a) => Rc::new(a),
            AnnotationDef::IntegerParam(a) => Rc::new(a),
            AnnotationDef::DoubleParam(a) => Rc::new(a),
            AnnotationDef::Other(a) => Rc::new(a),
        }
    }
}
