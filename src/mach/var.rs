use indexmap::IndexMap;
use log::debug;
use std::rc::Rc;

/// ## Variable registry
///
/// Every identifier the program touches, in order of first use. Names are
/// folded to lower case and kept clear of the script's reserved words.

#[derive(Debug, Default)]
pub struct Var {
    vars: IndexMap<Rc<str>, usize>,
}

impl Var {
    pub fn new() -> Var {
        Var::default()
    }

    /// The canonical name for a source identifier, registering it.
    pub fn resolve(&mut self, name: &str) -> Rc<str> {
        let canonical = canonical(name);
        let count = self.vars.entry(canonical.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            debug!("variable {} as {}", name, canonical);
        }
        canonical
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Names in order of first use.
    pub fn names(&self) -> impl Iterator<Item = &Rc<str>> {
        self.vars.keys()
    }

    pub fn usage(&self, name: &str) -> usize {
        self.vars.get(name).copied().unwrap_or(0)
    }
}

pub fn canonical(name: &str) -> Rc<str> {
    let lower = name.to_lowercase();
    if JS_RESERVED.binary_search(&lower.as_str()).is_ok() {
        format!("_{}", lower).into()
    } else {
        lower.into()
    }
}

pub fn is_string_name(name: &str) -> bool {
    name.ends_with('$')
}

const JS_RESERVED: &[&str] = &[
    "arguments",
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "eval",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "let",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_table_sorted() {
        let mut sorted = JS_RESERVED.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, JS_RESERVED);
    }

    #[test]
    fn test_case_folds_to_one_name() {
        let mut var = Var::new();
        assert_eq!(&*var.resolve("Count"), "count");
        assert_eq!(&*var.resolve("COUNT"), "count");
        assert_eq!(var.len(), 1);
        assert_eq!(var.usage("count"), 2);
    }

    #[test]
    fn test_reserved_words_prefixed() {
        let mut var = Var::new();
        assert_eq!(&*var.resolve("Case"), "_case");
        assert_eq!(&*var.resolve("CASE"), "_case");
        assert_eq!(&*var.resolve("new$"), "new$");
        let names: Vec<&str> = var.names().map(|n| &**n).collect();
        assert_eq!(names, vec!["_case", "new$"]);
    }
}
