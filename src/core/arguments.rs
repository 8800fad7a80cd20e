// src/core/arguments.rs

//! Extracción de los argumentos de construcción de un parser a partir de las
//! propiedades indexadas de una anotación.

use super::annotations::{ParserSpec, PropertyValue};
use crate::models::EnumType;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArgumentError {
    #[error("Falta el argumento en la posición {index} (se esperaba {expected}).")]
    Missing { index: usize, expected: &'static str },
    #[error("El argumento en la posición {index} es de tipo {found}, se esperaba {expected}.")]
    TypeMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Sobran {count} argumento(s) a partir de la posición {index}.")]
    Unexpected { index: usize, count: usize },
}

/// Coloca cada propiedad en su índice, rellenando los huecos con `None`.
pub fn extract_arguments(spec: &dyn ParserSpec) -> Vec<Option<PropertyValue>> {
    let mut params: Vec<Option<PropertyValue>> = Vec::new();
    for property in spec.properties() {
        if property.index >= params.len() {
            params.resize(property.index + 1, None);
        }
        params[property.index] = Some(property.value);
    }
    params
}

/// Lista posicional de argumentos que las factorías consumen en orden.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParserArgs {
    values: Vec<Option<PropertyValue>>,
    cursor: usize,
}

impl ParserArgs {
    pub fn new(values: Vec<Option<PropertyValue>>) -> Self {
        Self { values, cursor: 0 }
    }

    pub fn from_spec(spec: &dyn ParserSpec) -> Self {
        Self::new(extract_arguments(spec))
    }

    /// Añade un argumento al final.
    pub fn push(&mut self, value: PropertyValue) {
        self.values.push(Some(value));
    }

    fn take_next(&mut self, expected: &'static str) -> Result<(usize, PropertyValue), ArgumentError> {
        let index = self.cursor;
        let value = self
            .values
            .get(index)
            .cloned()
            .flatten()
            .ok_or(ArgumentError::Missing { index, expected })?;
        self.cursor += 1;
        Ok((index, value))
    }

    pub fn next_text(&mut self) -> Result<String, ArgumentError> {
        match self.take_next("text")? {
            (_, PropertyValue::Text(s)) => Ok(s),
            (index, other) => Err(mismatch(index, "text", &other)),
        }
    }

    pub fn next_integer(&mut self) -> Result<i64, ArgumentError> {
        match self.take_next("integer")? {
            (_, PropertyValue::Integer(i)) => Ok(i),
            (index, other) => Err(mismatch(index, "integer", &other)),
        }
    }

    pub fn next_double(&mut self) -> Result<f64, ArgumentError> {
        match self.take_next("double")? {
            (_, PropertyValue::Double(d)) => Ok(d),
            (index, other) => Err(mismatch(index, "double", &other)),
        }
    }

    pub fn next_bool(&mut self) -> Result<bool, ArgumentError> {
        match self.take_next("bool")? {
            (_, PropertyValue::Bool(b)) => Ok(b),
            (index, other) => Err(mismatch(index, "bool", &other)),
        }
    }

    pub fn next_enum_type(&mut self) -> Result<EnumType, ArgumentError> {
        match self.take_next("enum type")? {
            (index, PropertyValue::Type(ty)) => {
                ty.as_enum().cloned().ok_or(ArgumentError::TypeMismatch {
                    index,
                    expected: "enum type",
                    found: "type",
                })
            }
            (index, other) => Err(mismatch(index, "enum type", &other)),
        }
    }

    /// Falla si quedan argumentos sin consumir.
    pub fn finish(&self) -> Result<(), ArgumentError> {
        if self.cursor < self.values.len() {
            return Err(ArgumentError::Unexpected {
                index: self.cursor,
                count: self.values.len() - self.cursor,
            });
        }
        Ok(())
    }
}

fn mismatch(index: usize, expected: &'static str, found: &PropertyValue) -> ArgumentError {
    ArgumentError::TypeMismatch {
        index,
        expected,
        found: found.type_name(),
    }
}
