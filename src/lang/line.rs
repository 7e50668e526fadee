use super::{ast::*, lex::*, parse::*, token::*, Error, LineNumber};
use std::rc::Rc;

/// One physical line of source. The number is the 1-based position in the
/// program text and is only used to locate errors.
#[derive(Debug, PartialEq)]
pub struct Line {
    number: LineNumber,
    label: Option<Rc<str>>,
    tokens: Vec<Token>,
}

impl Line {
    pub fn new(number: LineNumber, s: &str) -> Line {
        let (label, tokens) = lex(s);
        Line {
            number,
            label,
            tokens,
        }
    }

    pub fn number(&self) -> LineNumber {
        self.number
    }

    pub fn label(&self) -> Option<&Rc<str>> {
        self.label.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.tokens.is_empty()
    }

    pub fn ast(&self) -> Result<Vec<Statement>, Error> {
        parse(self.number, &self.tokens)
    }

    /// Text following a `'` up to the end of the line.
    pub fn comment(&self) -> Option<Rc<str>> {
        let pos = self
            .tokens
            .iter()
            .position(|t| *t == Token::Word(Word::Rem2))?;
        match self.tokens.get(pos + 1) {
            Some(Token::Unknown(s)) => Some(s.as_str().into()),
            _ => Some("".into()),
        }
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s: String = self.tokens.iter().map(|s| s.to_string()).collect();
        match &self.label {
            Some(label) if s.is_empty() => write!(f, "{}", label),
            Some(label) => write!(f, "{} {}", label, s),
            None => write!(f, "{}", s),
        }
    }
}
