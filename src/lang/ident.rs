// Used in both Token and Ast

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Ident {
    Plain(String),
    String(String),
}

impl Ident {
    /// Source text including any `$` suffix.
    pub fn as_str(&self) -> &str {
        match self {
            Ident::Plain(s) | Ident::String(s) => s,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Ident::String(_))
    }

    /// CPC keywords this dialect does not implement are still off limits
    /// as variable names.
    pub fn is_reserved(&self) -> bool {
        let lower = self.as_str().to_ascii_lowercase();
        RESERVED.binary_search(&lower.as_str()).is_ok()
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const RESERVED: &[&str] = &[
    "after", "auto", "border", "break", "call", "cat", "chain", "clear", "clg", "closein",
    "closeout", "cont", "copychr$", "creal", "cursor", "dec$", "def", "defint", "defreal",
    "defstr", "deg", "delete", "derr", "di", "draw", "drawr", "edit", "ei", "ent", "env", "eof",
    "erase", "erl", "err", "error", "every", "fill", "fn", "frame", "fre", "goto", "graphics",
    "himem", "ink", "inkey", "inkey$", "inp", "input", "instr", "joy", "key", "line", "list",
    "load", "locate", "mask", "memory", "merge", "mode", "move", "mover", "new", "openin",
    "openout", "origin", "out", "paper", "peek", "pen", "plot", "plotr", "poke", "pos", "rad",
    "randomize", "release", "remain", "renum", "resume", "run", "save", "sound", "spc", "speed",
    "sq", "swap", "symbol", "tab", "tag", "tagoff", "test", "testr", "troff", "tron", "unt",
    "using", "vpos", "wait", "width", "window", "write", "xpos", "ypos", "zone",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_table_sorted() {
        let mut sorted = RESERVED.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, RESERVED);
    }

    #[test]
    fn test_reserved() {
        assert!(Ident::Plain("Mode".into()).is_reserved());
        assert!(Ident::String("INKEY$".into()).is_reserved());
        assert!(!Ident::Plain("count".into()).is_reserved());
    }
}
