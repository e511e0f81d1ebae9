// src/domain/tally.rs

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Frequency count of labels, most frequent first.
///
/// Equal counts keep the order in which labels were first seen, so the
/// same input always yields the same ordering. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    entries: Vec<(String, usize)>,
}

impl Tally {
    pub fn count<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut entries: Vec<(String, usize)> = Vec::new();
        for label in labels {
            match entries.iter_mut().find(|(l, _)| l == label) {
                Some((_, n)) => *n += 1,
                None => entries.push((label.to_string(), 1)),
            }
        }
        // stable: ties stay in first-seen order
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Self { entries }
    }

    pub fn top(mut self, n: usize) -> Self {
        self.entries.truncate(n);
        self
    }

    pub fn get(&self, label: &str) -> usize {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(l, n)| (l.as_str(), *n))
    }
}

impl Serialize for Tally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, n) in &self.entries {
            map.serialize_entry(label, n)?;
        }
        map.end()
    }
}
