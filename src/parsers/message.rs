// src/parsers/message.rs

use super::{ParameterParser, ParseError, ParserBase, ParserDescriptor, Value, token_at};
use crate::core::arguments::{ArgumentError, ParserArgs};

/// Parser voraz: une todos los tokens restantes con un espacio.
/// Debe ser el último parámetro de un comando.
#[derive(Debug, Clone)]
pub struct MsgParser {
    base: ParserBase,
    descriptor: ParserDescriptor,
}

impl MsgParser {
    pub const KIND: &'static str = "message";

    pub fn new(label: impl Into<String>, default_value: impl Into<String>) -> Self {
        let base = ParserBase::new(label, default_value);
        let descriptor = ParserDescriptor::new(
            Self::KIND,
            "This parameter can only contain a string value with spaces",
            base.default_value_lines(),
        );
        Self { base, descriptor }
    }

    pub fn from_args(args: &mut ParserArgs) -> Result<Box<dyn ParameterParser>, ArgumentError> {
        let label = args.next_text()?;
        let default_value = args.next_text()?;
        Ok(Box::new(Self::new(label, default_value)))
    }
}

impl ParameterParser for MsgParser {
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
        token_at(args, offset)?;
        Ok(Value::Text(args[offset..].join(" ")))
    }

    fn boxed_clone(&self) -> Box<dyn ParameterParser> {
        Box::new(self.clone())
    }

    fn is_greedy(&self) -> bool {
        true
    }
}
