use super::ast::*;
use super::*;

mod line_test;
mod parse_test;

fn parse_str(s: &str) -> Vec<Statement> {
    match Line::new(Some(1), s).ast() {
        Ok(v) => v,
        Err(e) => panic!("{} : {:?}", s, e),
    }
}

fn parse_err(s: &str) -> String {
    match Line::new(Some(1), s).ast() {
        Ok(v) => panic!("{} parsed as {:?}", s, v),
        Err(e) => e.to_string(),
    }
}
