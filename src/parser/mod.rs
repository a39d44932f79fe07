//! Textual IR reading

mod lexer;
mod resolver;
mod text;

pub use resolver::ConditionResolver;
pub use text::{IrParser, ParserError};
