// src/parsers/boolean.rs

use super::{ParameterParser, ParseError, ParserBase, ParserDescriptor, Value, token_at};
use crate::core::arguments::{ArgumentError, ParserArgs};

#[derive(Debug, Clone)]
pub struct BoolParser {
    base: ParserBase,
    descriptor: ParserDescriptor,
}

impl BoolParser {
    pub const KIND: &'static str = "bool";

    pub fn new(label: impl Into<String>, default_value: impl Into<String>) -> Self {
        let base = ParserBase::new(label, default_value);
        let descriptor = ParserDescriptor::new(
            Self::KIND,
            "This parameter can only contain a true or false value",
            base.default_value_lines(),
        );
        Self { base, descriptor }
    }

    /// Constructor `(label, default)` usado por el registro de anotaciones.
    pub fn from_args(args: &mut ParserArgs) -> Result<Box<dyn ParameterParser>, ArgumentError> {
        let label = args.next_text()?;
        let default_value = args.next_text()?;
        Ok(Box::new(Self::new(label, default_value)))
    }
}

impl ParameterParser for BoolParser {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn base(&self) -> &ParserBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ParserBase {
        &mut self.base
    }

    fn descriptor(&self) -> &ParserDescriptor {
        &self.descriptor
    }

    fn parse(&self, offset: usize, args: &[String]) -> Result<Value, ParseError> {
        let token = token_at(args, offset)?;
        if token.eq_ignore_ascii_case("true") {
            Ok(Value::Bool(true))
        } else if token.eq_ignore_ascii_case("false") {
            Ok(Value::Bool(false))
        } else {
            Err(ParseError::InvalidBool(token.to_string()))
        }
    }

    fn boxed_clone(&self) -> Box<dyn ParameterParser> {
        Box::new(self.clone())
    }
}
