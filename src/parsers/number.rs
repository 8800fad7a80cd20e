// src/parsers/number.rs

use super::{ParameterParser, ParseError, ParserBase, ParserDescriptor, Value, token_at};
use crate::core::arguments::{ArgumentError, ParserArgs};

#[derive(Debug, Clone)]
pub struct IntegerParser {
    base: ParserBase,
    min: i64,
    max: i64,
    descriptor: ParserDescriptor,
}

impl IntegerParser {
    pub const KIND: &'static str = "integer";

    pub fn new(
        label: impl Into<String>,
        default_value: impl Into<String>,
        min: i64,
        max: i64,
    ) -> Self {
        let base = ParserBase::new(label, default_value);
        let mut extra = base.default_value_lines();
        if min != i64::MIN {
            extra.extend(["Min value: ".to_string(), min.to_string()]);
        }
        if max != i64::MAX {
            extra.extend(["Max value: ".to_string(), max.to_string()]);
        }

        let descriptor = ParserDescriptor::new(
            Self::KIND,
            "This parameter can only contain an integer value",
            extra,
        );
        Self {
            base,
            min,
            max,
            descriptor,
        }
    }

    /// Sin límites.
    pub fn unbounded(label: impl Into<String>, default_value: impl Into<String>) -> Self {
        Self::new(label, default_value, i64::MIN, i64::MAX)
    }

    /// Constructor `(label, default, min, max)`.
    pub fn from_args(args: &mut ParserArgs) -> Result<Box<dyn ParameterParser>, ArgumentError> {
        let label = args.next_text()?;
        let default_value = args.next_text()?;
        let min = args.next_integer()?;
        let max = args.next_integer()?;
        Ok(Box::new(Self::new(label, default_value, min, max)))
    }
}

impl ParameterParser for IntegerParser {
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
        let value: i64 = token.parse().map_err(|_| ParseError::InvalidNumber {
            literal: token.to_string(),
            expected: "entero",
        })?;

        if value < self.min || value > self.max {
            return Err(ParseError::OutOfRange {
                literal: token.to_string(),
                min: self.min.to_string(),
                max: self.max.to_string(),
            });
        }
        Ok(Value::Integer(value))
    }

    fn boxed_clone(&self) -> Box<dyn ParameterParser> {
        Box::new(self.clone())
    }

    fn settings(&self) -> Vec<String> {
        vec![self.min.to_string(), self.max.to_string()]
    }
}

#[derive(Debug, Clone)]
pub struct DoubleParser {
    base: ParserBase,
    min: f64,
    max: f64,
    descriptor: ParserDescriptor,
}

impl DoubleParser {
    pub const KIND: &'static str = "double";

    pub fn new(
        label: impl Into<String>,
        default_value: impl Into<String>,
        min: f64,
        max: f64,
    ) -> Self {
        let base = ParserBase::new(label, default_value);
        let mut extra = base.default_value_lines();
        if min > f64::MIN {
            extra.extend(["Min value: ".to_string(), min.to_string()]);
        }
        if max < f64::MAX {
            extra.extend(["Max value: ".to_string(), max.to_string()]);
        }

        let descriptor = ParserDescriptor::new(
            Self::KIND,
            "This parameter can only contain a decimal value",
            extra,
        );
        Self {
            base,
            min,
            max,
            descriptor,
        }
    }

    pub fn unbounded(label: impl Into<String>, default_value: impl Into<String>) -> Self {
        Self::new(label, default_value, f64::MIN, f64::MAX)
    }

    /// Constructor `(label, default, min, max)`.
    pub fn from_args(args: &mut ParserArgs) -> Result<Box<dyn ParameterParser>, ArgumentError> {
        let label = args.next_text()?;
        let default_value = args.next_text()?;
        let min = args.next_double()?;
        let max = args.next_double()?;
        Ok(Box::new(Self::new(label, default_value, min, max)))
    }
}

impl ParameterParser for DoubleParser {
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
        let value = token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ParseError::InvalidNumber {
                literal: token.to_string(),
                expected: "decimal",
            })?;

        if value < self.min || value > self.max {
            return Err(ParseError::OutOfRange {
                literal: token.to_string(),
                min: self.min.to_string(),
                max: self.max.to_string(),
            });
        }
        Ok(Value::Double(value))
    }

    fn boxed_clone(&self) -> Box<dyn ParameterParser> {
        Box::new(self.clone())
    }

    fn settings(&self) -> Vec<String> {
        vec![self.min.to_string(), self.max.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::tokens;
    use pretty_assertions::assert_eq;

    #[test]
    fn integer_within_bounds() {
        let parser = IntegerParser::new("amount", "", 1, 64);
        assert_eq!(parser.parse(0, &tokens(&["32"])), Ok(Value::Integer(32)));
        assert_eq!(
            parser.parse(0, &tokens(&["65"])),
            Err(ParseError::OutOfRange {
                literal: "65".to_string(),
                min: "1".to_string(),
                max: "64".to_string(),
            })
        );
    }

    #[test]
    fn integer_rejects_garbage() {
        let parser = IntegerParser::unbounded("amount", "");
        assert_eq!(
            parser.parse(0, &tokens(&["1.5"])),
            Err(ParseError::InvalidNumber {
                literal: "1.5".to_string(),
                expected: "entero",
            })
        );
    }

    #[test]
    fn unbounded_descriptor_has_only_default() {
        let parser = IntegerParser::unbounded("amount", "1");
        assert_eq!(parser.descriptor().extra, vec!["Default value: ", "1"]);

        let parser = IntegerParser::new("amount", "", 0, 10);
        assert_eq!(
            parser.descriptor().extra,
            vec!["Default value: ", "none", "Min value: ", "0", "Max value: ", "10"]
        );
    }

    #[test]
    fn double_parses_and_checks_bounds() {
        let parser = DoubleParser::new("speed", "", 0.0, 1.0);
        assert_eq!(parser.parse(0, &tokens(&["0.25"])), Ok(Value::Double(0.25)));
        assert!(matches!(
            parser.parse(0, &tokens(&["2"])),
            Err(ParseError::OutOfRange { .. })
        ));
        assert!(matches!(
            parser.parse(0, &tokens(&["NaN"])),
            Err(ParseError::InvalidNumber { .. })
        ));
    }
}
