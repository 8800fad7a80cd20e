// src/core/dispatch.rs

//! Enlace de los parámetros de un comando con sus parsers y parseo de una línea de tokens.

use super::parser_manager::{ManagerError, ParserManager};
use crate::models::Parameter;
use crate::parsers::{ParameterParser, ParseError, Value};
use std::rc::Rc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Manager(#[from] ManagerError),
    #[error("No hay ningún parser para el parámetro '{parameter}' de tipo '{type_name}'.")]
    Unresolvable {
        parameter: String,
        type_name: String,
    },
    #[error("El parámetro voraz '{label}' debe ser el último del comando.")]
    GreedyNotLast { label: String },
    #[error("Falta el argumento obligatorio '{label}'.")]
    MissingArgument { label: String },
    #[error("Argumento '{label}' inválido: {source}")]
    Parse {
        label: String,
        #[source]
        source: ParseError,
    },
    #[error("Se esperaban como máximo {expected} argumento(s), se recibieron {found}.")]
    TooManyArguments { expected: usize, found: usize },
}

type DispatchResult<T> = Result<T, DispatchError>;

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArgument {
    pub label: String,
    pub value: Value,
}

/// La etiqueta del parser o, si no tiene, el nombre de su tipo.
pub fn display_label(parser: &dyn ParameterParser) -> String {
    parser
        .label()
        .map(str::to_string)
        .unwrap_or_else(|| parser.descriptor().type_name.clone())
}

/// Resuelve los parsers de una lista ordenada de parámetros.
/// Un parámetro sin parser o un parser voraz que no es el último son errores de arranque.
pub fn bind_parameters(
    manager: &mut ParserManager,
    parameters: &[Parameter],
) -> DispatchResult<Vec<Rc<dyn ParameterParser>>> {
    let mut parsers = Vec::with_capacity(parameters.len());
    for parameter in parameters {
        let parser = manager
            .parameter_parser(parameter)?
            .ok_or_else(|| DispatchError::Unresolvable {
                parameter: parameter.display_name(),
                type_name: parameter.ty.to_string(),
            })?;
        parsers.push(parser);
    }

    if let Some(greedy) = parsers
        .iter()
        .rev()
        .skip(1)
        .find(|p| p.is_greedy())
    {
        return Err(DispatchError::GreedyNotLast {
            label: display_label(greedy.as_ref()),
        });
    }

    Ok(parsers)
}

/// Alimenta los tokens a través de los parsers en orden.
///
/// Si se acaban los tokens, se parsea el valor por defecto del parser; un valor por
/// defecto vacío hace el argumento obligatorio.
pub fn parse_arguments(
    parsers: &[Rc<dyn ParameterParser>],
    tokens: &[String],
) -> DispatchResult<Vec<ParsedArgument>> {
    let mut parsed = Vec::with_capacity(parsers.len());
    let mut offset = 0;

    for parser in parsers {
        let label = display_label(parser.as_ref());
        let result = if offset < tokens.len() {
            let value = parser.parse(offset, tokens);
            offset = if parser.is_greedy() { tokens.len() } else { offset + 1 };
            value
        } else if !parser.default_value().is_empty() {
            log::debug!("Usando el valor por defecto de '{}'", label);
            parser.parse(0, &[parser.default_value().to_string()])
        } else {
            return Err(DispatchError::MissingArgument { label });
        };

        let value = result.map_err(|source| DispatchError::Parse {
            label: label.clone(),
            source,
        })?;
        parsed.push(ParsedArgument { label, value });
    }

    if offset < tokens.len() {
        return Err(DispatchError::TooManyArguments {
            expected: parsers.len(),
            found: tokens.len(),
        });
    }

    Ok(parsed)
}
