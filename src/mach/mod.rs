/*!
## Rust Machine Module

This Rust module translates BASIC into JavaScript and runs the result.

Translation visits each line's syntax tree once, recording labels, DATA
and variables in a per-compile context. Subroutines are carved out of the
line list afterwards, once every GOSUB target and RETURN is known. The
[`Sandbox`] executes the translated program directly against a
[`Runtime`].

*/

mod codegen;
mod compile;
mod data;
mod function;
mod ir;
mod link;
mod operation;
mod program;
mod runtime;
mod sandbox;
mod stack;
mod val;
mod var;

pub use data::DataValue;
pub use function::{Builtin, Function};
pub use ir::{BinOp, CmpOp, Direction, Expr, Line, Stmt, Target};
pub use link::{LabelEntry, Link, Region};
pub use operation::Operation;
pub use program::{Item, Program};
pub use runtime::Runtime;
pub use sandbox::Sandbox;
pub use stack::Stack;
pub use val::Val;
pub use var::Var;

use crate::lang::Error;

/// Parses and translates a whole program.
pub fn translate(source: &str) -> Result<Program, Error> {
    compile::translate(&compile::parse(source)?)
}

/// Script text for the program, or a line starting with `ERROR`.
pub fn compile(source: &str) -> String {
    let parsed = match compile::parse(source) {
        Ok(parsed) => parsed,
        Err(error) => return format!("ERROR: Parsing failed: {}", error),
    };
    match compile::translate(&parsed) {
        Ok(program) => program.to_string(),
        Err(error) => format!("ERROR: Parsing evaluator failed: {}", error),
    }
}

/// Runs a translated program in a fresh sandbox.
pub fn execute(program: &Program) -> String {
    Sandbox::new().execute(program)
}

/// Translates and runs. Translation errors are reported like runtime ones.
pub fn run(source: &str) -> String {
    match translate(source) {
        Ok(program) => execute(&program),
        Err(error) => format!("ERROR: {}", error),
    }
}

#[cfg(test)]
mod tests;
