use super::codegen::codegen;
use super::data::Data;
use super::ir;
use super::link::Link;
use super::program::Program;
use super::var::Var;
use crate::lang::ast::Statement;
use crate::lang::{Error, Line};
use log::info;

type Result<T> = std::result::Result<T, Error>;

/// Everything one translation learns about a program. A fresh context is
/// made for every compile.
#[derive(Debug, Default)]
pub struct Context {
    pub vars: Var,
    pub link: Link,
    pub data: Data,
}

/// Source lines with their syntax trees.
#[derive(Debug)]
pub struct Parsed {
    lines: Vec<(Line, Vec<Statement>)>,
}

pub fn parse(source: &str) -> Result<Parsed> {
    let mut lines: Vec<(Line, Vec<Statement>)> = vec![];
    for (index, s) in source.lines().enumerate() {
        let line = Line::new(Some(index + 1), s);
        let ast = line.ast()?;
        lines.push((line, ast));
    }
    Ok(Parsed { lines })
}

pub fn translate(parsed: &Parsed) -> Result<Program> {
    let mut context = Context::default();
    let mut lines: Vec<ir::Line> = vec![];
    for (index, (line, ast)) in parsed.lines.iter().enumerate() {
        if let Some(label) = line.label() {
            context.link.label_seen(label, index);
        }
        let stmts = codegen(&mut context, ast).map_err(|e| e.in_line_number(line.number()))?;
        if let Some(Statement::Return(_)) = ast.last() {
            context.link.return_seen(index);
        }
        lines.push(ir::Line {
            index,
            stmts,
            comment: line.comment(),
        });
    }
    let program = Program::assemble(context, lines);
    info!(
        "translated {} lines, {} subroutines, {} variables, {} data values",
        parsed.lines.len(),
        program.subroutine_count(),
        program.declarations().len(),
        program.data().len()
    );
    Ok(program)
}
