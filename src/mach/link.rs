use log::debug;
use std::collections::HashMap;
use std::rc::Rc;

/// ## Label and subroutine tracking
///
/// Labels are recorded in source order as lines are translated. A label
/// that is a GOSUB target opens a region which the next RETURN closes.

#[derive(Debug, Clone, PartialEq)]
pub struct LabelEntry {
    pub label: Rc<str>,
    pub first: usize,
    pub last: Option<usize>,
    pub data_index: Option<usize>,
}

/// Lines `first..=last` form the body of subroutine `label`.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub label: Rc<str>,
    pub first: usize,
    pub last: usize,
}

#[derive(Debug, Default)]
pub struct Link {
    labels: Vec<LabelEntry>,
    gosubs: HashMap<Rc<str>, usize>,
}

impl Link {
    pub fn new() -> Link {
        Link::default()
    }

    pub fn label_seen(&mut self, label: &Rc<str>, index: usize) {
        debug!("label {} at line {}", label, index);
        self.labels.push(LabelEntry {
            label: label.clone(),
            first: index,
            last: None,
            data_index: None,
        });
    }

    pub fn gosub_reference(&mut self, label: &Rc<str>) {
        *self.gosubs.entry(label.clone()).or_insert(0) += 1;
    }

    /// Closes whichever label was opened most recently.
    pub fn return_seen(&mut self, index: usize) {
        if let Some(entry) = self.labels.last_mut() {
            debug!("return at line {} closes {}", index, entry.label);
            entry.last = Some(index);
        }
    }

    pub fn is_gosub_target(&self, label: &str) -> bool {
        self.gosubs.contains_key(label)
    }

    pub fn last_label_mut(&mut self) -> Option<&mut LabelEntry> {
        self.labels.last_mut()
    }

    pub fn labels(&self) -> &[LabelEntry] {
        &self.labels
    }

    pub fn regions(&self) -> Vec<Region> {
        let mut regions: Vec<Region> = vec![];
        let mut open: Option<&LabelEntry> = None;
        for entry in &self.labels {
            if self.is_gosub_target(&entry.label) {
                open = Some(entry);
            }
            if let (Some(start), Some(last)) = (open, entry.last) {
                debug!("subroutine {} spans lines {}..={}", start.label, start.first, last);
                regions.push(Region {
                    label: start.label.clone(),
                    first: start.first,
                    last,
                });
                open = None;
            }
        }
        regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rc(s: &str) -> Rc<str> {
        s.into()
    }

    #[test]
    fn test_region_from_gosub_and_return() {
        let mut link = Link::new();
        link.label_seen(&rc("10"), 0);
        link.gosub_reference(&rc("100"));
        link.label_seen(&rc("100"), 3);
        link.label_seen(&rc("110"), 4);
        link.return_seen(5);
        assert_eq!(
            link.regions(),
            vec![Region {
                label: rc("100"),
                first: 3,
                last: 5
            }]
        );
    }

    #[test]
    fn test_return_without_gosub_target() {
        let mut link = Link::new();
        link.label_seen(&rc("100"), 0);
        link.return_seen(1);
        assert!(link.regions().is_empty());
    }

    #[test]
    fn test_later_target_replaces_candidate() {
        let mut link = Link::new();
        link.gosub_reference(&rc("100"));
        link.gosub_reference(&rc("200"));
        link.label_seen(&rc("100"), 0);
        link.label_seen(&rc("200"), 2);
        link.return_seen(3);
        let regions = link.regions();
        assert_eq!(regions.len(), 1);
        assert_eq!(&*regions[0].label, "200");
    }

    #[test]
    fn test_return_before_any_label() {
        let mut link = Link::new();
        link.return_seen(0);
        assert!(link.labels().is_empty());
    }
}
