use super::compile::Context;
use super::data::DataValue;
use super::ir::Line;
use super::var::is_string_name;
use log::debug;
use std::rc::Rc;

/// ## Translated program
///
/// Lines in source order, with GOSUB targets gathered into subroutines.
/// Displaying a `Program` gives the script text.

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Line(Line),
    Subroutine(Rc<str>, Vec<Line>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    declarations: Vec<(Rc<str>, bool)>,
    items: Vec<Item>,
    data: Vec<DataValue>,
    restore: Vec<(Rc<str>, usize)>,
    tables: bool,
}

impl Program {
    pub fn assemble(context: Context, lines: Vec<Line>) -> Program {
        let Context { vars, link, data } = context;
        let regions = link.regions();
        let tables = data.has_values() || data.has_restore();
        let (data, restore) = data.finish(&link);
        let declarations = vars
            .names()
            .map(|name| (name.clone(), is_string_name(name)))
            .collect();

        let mut items: Vec<Item> = vec![];
        let mut regions = regions.into_iter().peekable();
        let mut open: Option<(Rc<str>, usize, Vec<Line>)> = None;
        for line in lines {
            let index = line.index;
            if open.is_none() {
                if let Some(region) = regions.next_if(|r| r.first == index) {
                    debug!("wrapping lines {}..={} as _{}", region.first, region.last, region.label);
                    open = Some((region.label, region.last, vec![]));
                }
            }
            match open.take() {
                Some((label, last, mut body)) => {
                    body.push(line);
                    if index >= last {
                        items.push(Item::Subroutine(label, body));
                    } else {
                        open = Some((label, last, body));
                    }
                }
                None => items.push(Item::Line(line)),
            }
        }
        if let Some((label, _, body)) = open {
            items.push(Item::Subroutine(label, body));
        }

        Program {
            declarations,
            items,
            data,
            restore,
            tables,
        }
    }

    /// Variable names and whether each holds a string.
    pub fn declarations(&self) -> &[(Rc<str>, bool)] {
        &self.declarations
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn data(&self) -> &[DataValue] {
        &self.data
    }

    /// RESTORE targets and the data position each one resumes at.
    pub fn restore_map(&self) -> &[(Rc<str>, usize)] {
        &self.restore
    }

    pub fn subroutine_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, Item::Subroutine(..)))
            .count()
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if !self.declarations.is_empty() {
            let decls: Vec<String> = self
                .declarations
                .iter()
                .map(|(name, is_string)| {
                    if *is_string {
                        format!("{} = \"\"", name)
                    } else {
                        format!("{} = 0", name)
                    }
                })
                .collect();
            writeln!(f, "let {};", decls.join(", "))?;
        }
        let mut parts: Vec<String> = vec![];
        if self.tables {
            parts.push(
                "const _data = _getData();\nconst _restoreMap = _getRestore();\nlet _dataPtr = 0;"
                    .into(),
            );
        }
        for item in &self.items {
            match item {
                Item::Line(line) => parts.push(line.to_string()),
                Item::Subroutine(label, lines) => {
                    let last = lines.len().saturating_sub(1);
                    for (i, line) in lines.iter().enumerate() {
                        let mut s = format!("  {}", line);
                        if i == 0 {
                            s = format!("function _{}() {{\n{}", label, s);
                        }
                        if i == last {
                            s.push_str("\n}");
                        }
                        parts.push(s);
                    }
                }
            }
        }
        if self.tables {
            let values: Vec<String> = self.data.iter().map(|v| v.to_string()).collect();
            let mut list = values.join(",\n");
            if !list.is_empty() {
                list.push('\n');
            }
            parts.push(format!("function _getData() {{\nreturn [\n{}];\n}}", list));
            let map: Vec<String> = self
                .restore
                .iter()
                .map(|(label, index)| format!("\"{}\":{}", label, index))
                .collect();
            parts.push(format!(
                "function _getRestore() {{\nreturn {{{}}};\n}}",
                map.join(",")
            ));
        }
        write!(f, "{}", parts.join("\n"))
    }
}
