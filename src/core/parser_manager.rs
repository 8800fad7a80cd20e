// src/core/parser_manager.rs

use super::annotations::{AnnotationKind, ParserSpec, PropertyValue};
use super::arguments::{ArgumentError, ParserArgs};
use crate::constants::{
    BOOL_PARAM, DOUBLE_PARAM, ENUM_PARAM, INTEGER_PARAM, MSG_PARAM, STRING_PARAM,
};
use crate::models::{ParamType, Parameter};
use crate::parsers::{
    BoolParser, DoubleParser, EnumParser, IntegerParser, MsgParser, ParameterParser, ParserKey,
    StringParser,
};
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

/// Construye un parser consumiendo los argumentos posicionales de su anotación.
pub type ParserFactory = fn(&mut ParserArgs) -> Result<Box<dyn ParameterParser>, ArgumentError>;

#[derive(Error, Debug)]
pub enum ManagerError {
    #[error(
        "El parser de '{annotation}' no tiene un constructor que coincida con las propiedades de su anotación: {source}"
    )]
    MissingConstructor {
        annotation: AnnotationKind,
        #[source]
        source: ArgumentError,
    },
    #[error("El parser vinculado a '{0}' no está registrado.")]
    ParserNotRegistered(AnnotationKind),
}

type ManagerResult<T> = Result<T, ManagerError>;

/// Un parser recién construido (propio) o uno compartido de los registros.
enum Candidate {
    Built(Box<dyn ParameterParser>),
    Shared(Rc<dyn ParameterParser>),
}

impl Candidate {
    fn label_is_unset(&self) -> bool {
        match self {
            Candidate::Built(p) => p.label().is_none(),
            Candidate::Shared(p) => p.label().is_none(),
        }
    }

    /// Segunda fase de construcción: asigna el nombre declarado si no hay etiqueta.
    /// Un parser compartido nunca se modifica; se etiqueta una copia.
    fn apply_declared_name(self, declared_name: Option<&str>) -> Self {
        let Some(name) = declared_name.filter(|n| !n.is_empty()) else {
            return self;
        };
        if !self.label_is_unset() {
            return self;
        }

        let mut parser = match self {
            Candidate::Built(p) => p,
            Candidate::Shared(p) => p.boxed_clone(),
        };
        parser.set_label(name);
        Candidate::Built(parser)
    }
}

/// Registro de parsers por anotación, parsers por defecto por tipo y caché de instancias.
///
/// Todo ocurre en un único hilo durante el arranque: no hay sincronización interna.
#[derive(Debug, Default)]
pub struct ParserManager {
    default_parsers: HashMap<ParamType, Rc<dyn ParameterParser>>,
    registered_parsers: HashMap<AnnotationKind, ParserFactory>,
    cached_parsers: HashMap<ParserKey, Rc<dyn ParameterParser>>,
}

impl ParserManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Un gestor con las anotaciones y los tipos por defecto integrados.
    pub fn with_builtins() -> Self {
        let mut manager = Self::new();

        manager.register_parser(AnnotationKind::new(BOOL_PARAM), BoolParser::from_args);
        manager.register_parser(AnnotationKind::new(MSG_PARAM), MsgParser::from_args);
        manager.register_parser(AnnotationKind::new(ENUM_PARAM), EnumParser::from_args);
        manager.register_parser(AnnotationKind::new(INTEGER_PARAM), IntegerParser::from_args);
        manager.register_parser(AnnotationKind::new(DOUBLE_PARAM), DoubleParser::from_args);
        manager.register_parser(AnnotationKind::new(STRING_PARAM), StringParser::from_args);

        manager.set_default_parser_for_type(ParamType::Bool, Box::new(BoolParser::new("", "")));
        manager.set_default_parser_for_type(
            ParamType::Integer,
            Box::new(IntegerParser::unbounded("", "")),
        );
        manager.set_default_parser_for_type(
            ParamType::Double,
            Box::new(DoubleParser::unbounded("", "")),
        );
        manager.set_default_parser_for_type(ParamType::Text, Box::new(StringParser::new("", "")));

        manager
    }

    /// Registra la factoría de una anotación. Un registro repetido sobrescribe el anterior.
    pub fn register_parser(&mut self, identifier: AnnotationKind, factory: ParserFactory) {
        log::debug!("Registrando parser para la anotación '{}'", identifier);
        self.registered_parsers.insert(identifier, factory);
    }

    pub fn set_default_parser_for_type(
        &mut self,
        target_type: ParamType,
        parser: Box<dyn ParameterParser>,
    ) {
        log::debug!(
            "Parser por defecto para el tipo '{}': {}",
            target_type,
            parser.kind()
        );
        let parser = self.cache(Candidate::Built(parser));
        self.default_parsers.insert(target_type, parser);
    }

    pub fn is_parser_registered(&self, identifier: &AnnotationKind) -> bool {
        self.registered_parsers.contains_key(identifier)
    }

    pub fn parser_factory(&self, identifier: &AnnotationKind) -> ManagerResult<ParserFactory> {
        self.registered_parsers
            .get(identifier)
            .copied()
            .ok_or_else(|| ManagerError::ParserNotRegistered(identifier.clone()))
    }

    /// Resuelve el parser de un parámetro.
    ///
    /// Prioridad: la primera anotación registrada, luego el parser por defecto del tipo
    /// exacto y, si el tipo es un enum, un `EnumParser` sin etiqueta ni valor por defecto.
    /// Devuelve `Ok(None)` cuando nada aplica; el llamador decide si eso es fatal.
    pub fn parameter_parser(
        &mut self,
        parameter: &Parameter,
    ) -> ManagerResult<Option<Rc<dyn ParameterParser>>> {
        let mut candidate = None;
        for annotation in &parameter.annotations {
            if let Some(parser) = self.build_parameter_parser(parameter, annotation.as_ref())? {
                candidate = Some(Candidate::Built(parser));
                break;
            }
        }

        if candidate.is_none() {
            candidate = self
                .default_parsers
                .get(&parameter.ty)
                .cloned()
                .map(Candidate::Shared);
        }

        if candidate.is_none() {
            if let Some(enum_type) = parameter.ty.as_enum() {
                log::debug!("Usando EnumParser implícito para '{}'", enum_type.name);
                candidate = Some(Candidate::Built(Box::new(EnumParser::new(
                    "",
                    "",
                    enum_type.clone(),
                ))));
            }
        }

        let Some(candidate) = candidate else {
            log::warn!(
                "No se encontró ningún parser para el parámetro '{}' de tipo '{}'",
                parameter.display_name(),
                parameter.ty
            );
            return Ok(None);
        };

        let candidate = candidate.apply_declared_name(parameter.name.as_deref());
        Ok(Some(self.cache(candidate)))
    }

    /// Devuelve la instancia equivalente ya cacheada o guarda la nueva.
    pub fn cache_parser(
        &mut self,
        parser: Option<Box<dyn ParameterParser>>,
    ) -> Option<Rc<dyn ParameterParser>> {
        parser.map(|p| self.cache(Candidate::Built(p)))
    }

    pub fn cached_count(&self) -> usize {
        self.cached_parsers.len()
    }

    fn cache(&mut self, candidate: Candidate) -> Rc<dyn ParameterParser> {
        let (key, parser) = match candidate {
            Candidate::Built(p) => (p.key(), Rc::from(p)),
            Candidate::Shared(p) => (p.key(), p),
        };

        Rc::clone(self.cached_parsers.entry(key).or_insert(parser))
    }

    fn build_parameter_parser(
        &self,
        parameter: &Parameter,
        annotation: &dyn ParserSpec,
    ) -> ManagerResult<Option<Box<dyn ParameterParser>>> {
        let identifier = annotation.kind();
        if !self.is_parser_registered(&identifier) {
            log::debug!("La anotación '{}' no tiene parser registrado", identifier);
            return Ok(None);
        }

        let mut args = ParserArgs::from_spec(annotation);
        if identifier.is_enum_marker() {
            args.push(PropertyValue::Type(parameter.ty.clone()));
        }

        let factory = self.parser_factory(&identifier)?;
        let parser = construct(factory, &mut args).map_err(|source| {
            ManagerError::MissingConstructor {
                annotation: identifier.clone(),
                source,
            }
        })?;

        log::debug!(
            "Parser '{}' construido desde la anotación '{}'",
            parser.kind(),
            identifier
        );
        Ok(Some(parser))
    }
}

fn construct(
    factory: ParserFactory,
    args: &mut ParserArgs,
) -> Result<Box<dyn ParameterParser>, ArgumentError> {
    let parser = factory(args)?;
    args.finish()?;
    Ok(parser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::annotations::{
        BoolParam, EnumParam, IntegerParam, MsgParam, OtherAnnotation, Property,
    };
    use crate::models::EnumType;
    use crate::parsers::{Value, tokens};
    use pretty_assertions::assert_eq;

    fn gamemode() -> ParamType {
        ParamType::Enum(EnumType::new("GameMode", ["SURVIVAL", "CREATIVE"]))
    }

    #[test]
    fn equal_configurations_share_one_instance() {
        let mut manager = ParserManager::with_builtins();
        let first = Parameter::new(Some("a"), ParamType::Text).annotated(BoolParam::new("flag", ""));
        let second = Parameter::new(Some("b"), ParamType::Text).annotated(BoolParam::new("flag", ""));

        let a = manager.parameter_parser(&first).unwrap().unwrap();
        let b = manager.parameter_parser(&second).unwrap().unwrap();
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_defaults_are_different_instances() {
        let mut manager = ParserManager::with_builtins();
        let a = manager
            .cache_parser(Some(Box::new(BoolParser::new("flag", "true"))))
            .unwrap();
        let b = manager
            .cache_parser(Some(Box::new(BoolParser::new("flag", "false"))))
            .unwrap();
        assert!(!Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn cache_passes_none_through() {
        let mut manager = ParserManager::new();
        assert!(manager.cache_parser(None).is_none());
        assert_eq!(manager.cached_count(), 0);
    }

    #[test]
    fn annotation_beats_default_regardless_of_registration_order() {
        let mut manager = ParserManager::new();
        manager.register_parser(AnnotationKind::new(MSG_PARAM), MsgParser::from_args);
        manager.set_default_parser_for_type(ParamType::Text, Box::new(StringParser::new("", "")));

        let parameter = Parameter::new(Some("reason"), ParamType::Text).annotated(MsgParam::default());
        let parser = manager.parameter_parser(&parameter).unwrap().unwrap();
        assert_eq!(parser.kind(), MsgParser::KIND);

        let mut manager = ParserManager::new();
        manager.set_default_parser_for_type(ParamType::Text, Box::new(StringParser::new("", "")));
        manager.register_parser(AnnotationKind::new(MSG_PARAM), MsgParser::from_args);
        let parser = manager.parameter_parser(&parameter).unwrap().unwrap();
        assert_eq!(parser.kind(), MsgParser::KIND);
    }

    #[test]
    fn first_registered_annotation_wins() {
        let mut manager = ParserManager::new();
        manager.register_parser(AnnotationKind::new(MSG_PARAM), MsgParser::from_args);

        let parameter = Parameter::new(Some("x"), ParamType::Text)
            .annotated(BoolParam::new("flag", ""))
            .annotated(MsgParam::new("text", ""));
        let parser = manager.parameter_parser(&parameter).unwrap().unwrap();
        assert_eq!(parser.kind(), MsgParser::KIND);
        assert_eq!(parser.label(), Some("text"));
    }

    #[test]
    fn unannotated_enum_gets_labeled_enum_parser() {
        let mut manager = ParserManager::with_builtins();
        let parameter = Parameter::new(Some("mode"), gamemode());

        let parser = manager.parameter_parser(&parameter).unwrap().unwrap();
        assert_eq!(parser.kind(), EnumParser::KIND);
        assert_eq!(parser.label(), Some("mode"));
        assert_eq!(parser.default_value(), "");
        assert_eq!(
            parser.settings(),
            vec!["GameMode".to_string(), "SURVIVAL".to_string(), "CREATIVE".to_string()]
        );
        assert_eq!(
            parser.parse(0, &tokens(&["creative"])),
            Ok(Value::Enum("CREATIVE".to_string()))
        );
    }

    #[test]
    fn enum_marker_appends_the_parameter_type() {
        let mut manager = ParserManager::with_builtins();
        let parameter = Parameter::new(None, gamemode()).annotated(EnumParam::new("mode", "SURVIVAL"));

        assert_eq!(EnumParam::new("mode", "SURVIVAL").properties().len(), 2);

        let parser = manager.parameter_parser(&parameter).unwrap().unwrap();
        assert_eq!(parser.kind(), EnumParser::KIND);
        assert_eq!(parser.settings()[0], "GameMode");
        assert_eq!(parser.default_value(), "SURVIVAL");
    }

    #[test]
    fn enum_marker_on_a_non_enum_is_fatal() {
        let mut manager = ParserManager::with_builtins();
        let parameter = Parameter::new(Some("x"), ParamType::Bool).annotated(EnumParam::default());

        let err = manager.parameter_parser(&parameter).unwrap_err();
        assert!(matches!(
            err,
            ManagerError::MissingConstructor { ref annotation, .. } if annotation.as_str() == ENUM_PARAM
        ));
    }

    #[derive(Debug)]
    struct Broken;

    impl ParserSpec for Broken {
        fn kind(&self) -> AnnotationKind {
            AnnotationKind::new(BOOL_PARAM)
        }

        fn properties(&self) -> Vec<Property> {
            vec![Property::new(0, "label", PropertyValue::Integer(1))]
        }
    }

    #[test]
    fn mismatched_properties_are_fatal() {
        let mut manager = ParserManager::with_builtins();
        let parameter = Parameter::new(Some("x"), ParamType::Bool).annotated(Broken);

        let err = manager.parameter_parser(&parameter).unwrap_err();
        match err {
            ManagerError::MissingConstructor { annotation, source } => {
                assert_eq!(annotation, AnnotationKind::new(BOOL_PARAM));
                assert_eq!(
                    source,
                    ArgumentError::TypeMismatch {
                        index: 0,
                        expected: "text",
                        found: "integer"
                    }
                );
            }
            other => panic!("error inesperado: {other:?}"),
        }
    }

    #[test]
    fn unregistered_annotation_falls_through_to_default() {
        let mut manager = ParserManager::new();
        manager.set_default_parser_for_type(ParamType::Integer, Box::new(IntegerParser::unbounded("", "")));

        let parameter = Parameter::new(Some("amount"), ParamType::Integer).annotated(IntegerParam::default());
        let parser = manager.parameter_parser(&parameter).unwrap().unwrap();
        assert_eq!(parser.kind(), IntegerParser::KIND);
        assert_eq!(parser.label(), Some("amount"));
    }

    #[test]
    fn shared_default_is_not_relabeled() {
        let mut manager = ParserManager::with_builtins();
        let first = manager
            .parameter_parser(&Parameter::new(Some("first"), ParamType::Bool))
            .unwrap()
            .unwrap();
        let second = manager
            .parameter_parser(&Parameter::new(Some("second"), ParamType::Bool))
            .unwrap()
            .unwrap();
        let anonymous = manager
            .parameter_parser(&Parameter::new(None, ParamType::Bool))
            .unwrap()
            .unwrap();

        assert_eq!(first.label(), Some("first"));
        assert_eq!(second.label(), Some("second"));
        assert_eq!(anonymous.label(), None);
    }

    #[test]
    fn explicit_label_is_kept() {
        let mut manager = ParserManager::with_builtins();
        let parameter = Parameter::new(Some("declared"), ParamType::Bool).annotated(BoolParam::new("shown", ""));
        let parser = manager.parameter_parser(&parameter).unwrap().unwrap();
        assert_eq!(parser.label(), Some("shown"));
    }

    #[test]
    fn unknown_type_is_unresolvable() {
        let mut manager = ParserManager::with_builtins();
        let parameter = Parameter::new(Some("target"), ParamType::Other("Player".to_string()));
        assert!(manager.parameter_parser(&parameter).unwrap().is_none());
    }

    #[test]
    fn factory_lookup_of_unknown_identifier_fails() {
        let manager = ParserManager::with_builtins();
        let unknown = AnnotationKind::new("PlayerParam");

        assert!(!manager.is_parser_registered(&unknown));
        assert!(matches!(
            manager.parser_factory(&unknown),
            Err(ManagerError::ParserNotRegistered(_))
        ));
        assert!(manager.is_parser_registered(&AnnotationKind::new(BOOL_PARAM)));
    }

    #[test]
    fn bounded_integer_from_annotation() {
        let mut manager = ParserManager::with_builtins();
        let parameter = Parameter::new(Some("amount"), ParamType::Integer).annotated(IntegerParam {
            min: Some(1),
            max: Some(64),
            ..Default::default()
        });

        let parser = manager.parameter_parser(&parameter).unwrap().unwrap();
        assert_eq!(parser.settings(), vec!["1".to_string(), "64".to_string()]);
        assert_eq!(parser.parse(0, &tokens(&["12"])), Ok(Value::Integer(12)));
    }

    #[test]
    fn re_registering_an_annotation_replaces_its_factory() {
        let mut manager = ParserManager::new();
        let identifier = AnnotationKind::new(MSG_PARAM);
        manager.register_parser(identifier.clone(), MsgParser::from_args);
        manager.register_parser(identifier.clone(), StringParser::from_args);

        assert!(manager.is_parser_registered(&identifier));
        let parameter = Parameter::new(Some("reason"), ParamType::Text).annotated(MsgParam::default());
        let parser = manager.parameter_parser(&parameter).unwrap().unwrap();
        assert_eq!(parser.kind(), StringParser::KIND);
        assert!(!parser.is_greedy());
    }

    #[test]
    fn replacing_a_default_parser_wins_for_later_lookups() {
        let mut manager = ParserManager::new();
        manager.set_default_parser_for_type(ParamType::Text, Box::new(StringParser::new("", "")));
        manager.set_default_parser_for_type(ParamType::Text, Box::new(MsgParser::new("", "")));

        let parser = manager
            .parameter_parser(&Parameter::new(None, ParamType::Text))
            .unwrap()
            .unwrap();
        assert_eq!(parser.kind(), MsgParser::KIND);
        assert_eq!(
            parser.parse(0, &tokens(&["hola", "mundo"])),
            Ok(Value::Text("hola mundo".to_string()))
        );
    }

    // Una factoría externa: etiqueta de texto y valor por defecto booleano.
    fn toggle_from_args(args: &mut ParserArgs) -> Result<Box<dyn ParameterParser>, ArgumentError> {
        let label = args.next_text()?;
        let default_value = if args.next_bool()? { "true" } else { "false" };
        Ok(Box::new(BoolParser::new(label, default_value)))
    }

    #[test]
    fn custom_factory_reads_typed_arguments() {
        let mut manager = ParserManager::new();
        manager.register_parser(AnnotationKind::new("ToggleParam"), toggle_from_args);

        let parameter = Parameter::new(Some("x"), ParamType::Bool).annotated(OtherAnnotation {
            kind: AnnotationKind::new("ToggleParam"),
            args: vec![PropertyValue::Text("silent".to_string()), PropertyValue::Bool(true)],
        });
        let parser = manager.parameter_parser(&parameter).unwrap().unwrap();
        assert_eq!(parser.kind(), BoolParser::KIND);
        assert_eq!(parser.label(), Some("silent"));
        assert_eq!(parser.default_value(), "true");

        let swapped = Parameter::new(Some("x"), ParamType::Bool).annotated(OtherAnnotation {
            kind: AnnotationKind::new("ToggleParam"),
            args: vec![PropertyValue::Text("silent".to_string()), PropertyValue::Text("yes".to_string())],
        });
        assert!(matches!(
            manager.parameter_parser(&swapped),
            Err(ManagerError::MissingConstructor {
                source: ArgumentError::TypeMismatch { index: 1, expected: "bool", .. },
                ..
            })
        ));
    }
}
