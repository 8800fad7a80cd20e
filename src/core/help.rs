// src/core/help.rs

use super::dispatch::display_label;
use crate::parsers::ParameterParser;
use std::fmt::Write;
use std::rc::Rc;

/// Línea de uso: `<obligatorio>` y `[opcional]` según tenga valor por defecto.
pub fn render_usage(command: &str, parsers: &[Rc<dyn ParameterParser>]) -> String {
    let mut usage = command.to_string();
    for parser in parsers {
        let label = display_label(parser.as_ref());
        let ellipsis = if parser.is_greedy() { "..." } else { "" };
        if parser.default_value().is_empty() {
            let _ = write!(usage, " <{}{}>", label, ellipsis);
        } else {
            let _ = write!(usage, " [{}{}]", label, ellipsis);
        }
    }
    usage
}

/// Ayuda detallada de cada parámetro a partir de su descriptor.
pub fn render_parameters(parsers: &[Rc<dyn ParameterParser>]) -> String {
    let mut out = String::new();
    for parser in parsers {
        let descriptor = parser.descriptor();
        let _ = writeln!(
            out,
            "  {} ({}): {}",
            display_label(parser.as_ref()),
            descriptor.type_name,
            descriptor.help
        );
        // Las líneas extra van en pares: título y valor.
        for pair in descriptor.extra.chunks(2) {
            let _ = writeln!(out, "    {}", pair.concat());
        }
    }
    out
}
