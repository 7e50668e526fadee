/*!
# BASIC Language Module

Lexical analysis and parsing of the BASIC dialect. A [`Line`] holds the
tokens of one physical line and produces the [`ast`] for it.

*/

use std::ops::Range;

/// Character range of a token within its line.
pub type Column = Range<usize>;
/// 1-based physical line of the program text.
pub type LineNumber = Option<usize>;

#[macro_use]
mod error;
mod ident;
mod lex;
mod line;
mod parse;
mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use ident::Ident;
pub use lex::lex;
pub use line::Line;
pub use parse::parse;
pub use token::{Literal, Operator, Token, Word};

pub mod ast;

#[cfg(test)]
mod tests;
