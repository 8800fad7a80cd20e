// src/core/mod.rs

pub mod annotations;
pub mod arguments;
pub mod dispatch;
pub mod help;
pub mod parser_manager;
