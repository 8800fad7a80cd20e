// src/parsers/enumeration.rs

use super::{ParameterParser, ParseError, ParserBase, ParserDescriptor, Value, token_at};
use crate::core::arguments::{ArgumentError, ParserArgs};
use crate::models::EnumType;

/// Resuelve un token contra las constantes de un enum, sin distinguir mayúsculas.
#[derive(Debug, Clone)]
pub struct EnumParser {
    base: ParserBase,
    enum_type: EnumType,
    descriptor: ParserDescriptor,
}

impl EnumParser {
    pub const KIND: &'static str = "enum";

    pub fn new(
        label: impl Into<String>,
        default_value: impl Into<String>,
        enum_type: EnumType,
    ) -> Self {
        let base = ParserBase::new(label, default_value);
        let mut extra = base.default_value_lines();
        extra.push("Values: ".to_string());
        extra.push(enum_type.constants.join(", "));

        let descriptor = ParserDescriptor::new(
            enum_type.name.to_lowercase(),
            "This parameter can only contain one of the listed values",
            extra,
        );
        Self {
            base,
            enum_type,
            descriptor,
        }
    }

    /// Constructor `(label, default, tipo)`. El tipo lo añade el gestor al final,
    /// nunca lo aporta la anotación.
    pub fn from_args(args: &mut ParserArgs) -> Result<Box<dyn ParameterParser>, ArgumentError> {
        let label = args.next_text()?;
        let default_value = args.next_text()?;
        let enum_type = args.next_enum_type()?;
        Ok(Box::new(Self::new(label, default_value, enum_type)))
    }

    pub fn enum_type(&self) -> &EnumType {
        &self.enum_type
    }
}

impl ParameterParser for EnumParser {
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
        self.enum_type
            .find_ignore_case(token)
            .map(|constant| Value::Enum(constant.to_string()))
            .ok_or_else(|| ParseError::InvalidEnum {
                literal: token.to_string(),
                enum_name: self.enum_type.name.clone(),
            })
    }

    fn boxed_clone(&self) -> Box<dyn ParameterParser> {
        Box::new(self.clone())
    }

    fn settings(&self) -> Vec<String> {
        let mut settings = vec![self.enum_type.name.clone()];
        settings.extend(self.enum_type.constants.iter().cloned());
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::tokens;
    use pretty_assertions::assert_eq;

    fn gamemode() -> EnumType {
        EnumType::new("GameMode", ["SURVIVAL", "CREATIVE", "ADVENTURE"])
    }

    #[test]
    fn matches_constants_ignoring_case() {
        let parser = EnumParser::new("mode", "", gamemode());
        assert_eq!(parser.enum_type(), &gamemode());
        assert_eq!(
            parser.parse(0, &tokens(&["creative"])),
            Ok(Value::Enum("CREATIVE".to_string()))
        );
        assert_eq!(
            parser.parse(0, &tokens(&["Survival"])),
            Ok(Value::Enum("SURVIVAL".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_literal() {
        let parser = EnumParser::new("mode", "", gamemode());
        assert_eq!(
            parser.parse(0, &tokens(&["spectator"])),
            Err(ParseError::InvalidEnum {
                literal: "spectator".to_string(),
                enum_name: "GameMode".to_string(),
            })
        );
    }

    #[test]
    fn enum_type_is_part_of_identity() {
        let a = EnumParser::new("mode", "", gamemode());
        let b = EnumParser::new("mode", "", EnumType::new("Difficulty", ["EASY", "HARD"]));
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn descriptor_lists_values() {
        let parser = EnumParser::new("mode", "", gamemode());
        assert_eq!(parser.descriptor().type_name, "gamemode");
        assert_eq!(
            parser.descriptor().extra,
            vec![
                "Default value: ",
                "none",
                "Values: ",
                "SURVIVAL, CREATIVE, ADVENTURE"
            ]
        );
    }
}
