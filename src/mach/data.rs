use super::link::Link;
use log::debug;
use std::rc::Rc;

/// ## DATA and RESTORE tracking
///
/// All DATA literals of a program form one list. RESTORE targets are
/// collected while translating and resolved to list positions once every
/// label is known.

#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    Number(Rc<str>, f64),
    String(Rc<str>),
}

impl std::fmt::Display for DataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DataValue::Number(text, _) => write!(f, "{}", text),
            DataValue::String(s) => write!(f, "{}", super::ir::quote(s)),
        }
    }
}

#[derive(Debug, Default)]
pub struct Data {
    values: Vec<DataValue>,
    pending: Vec<Rc<str>>,
}

impl Data {
    pub fn new() -> Data {
        Data::default()
    }

    pub fn data(&mut self, link: &mut Link, values: Vec<DataValue>) {
        let index = self.values.len();
        if let Some(entry) = link.last_label_mut() {
            if entry.data_index.is_none() {
                debug!("label {} reads from data {}", entry.label, index);
                entry.data_index = Some(index);
            }
        }
        self.values.extend(values);
    }

    /// No label restores to the start of the list.
    pub fn restore(&mut self, label: Option<&Rc<str>>) {
        let label = match label {
            Some(label) => label.clone(),
            None => "0".into(),
        };
        if !self.pending.contains(&label) {
            self.pending.push(label);
        }
    }

    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn has_restore(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Resolves every RESTORE target. Targets that name no label are left
    /// out and fail when executed.
    pub fn finish(self, link: &Link) -> (Vec<DataValue>, Vec<(Rc<str>, usize)>) {
        let labels = link.labels();
        let end = self.values.len();
        let mut map: Vec<(Rc<str>, usize)> = vec![];
        for target in self.pending {
            let position = labels.iter().position(|e| e.label == target);
            let index = match position {
                Some(pos) => labels[pos]
                    .data_index
                    .or_else(|| labels[pos + 1..].iter().find_map(|e| e.data_index))
                    .unwrap_or(end),
                None if &*target == "0" => 0,
                None => continue,
            };
            debug!("restore {} to data {}", target, index);
            map.push((target, index));
        }
        map.sort_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        (self.values, map)
    }
}
