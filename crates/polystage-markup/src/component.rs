//! Multi-property component attribute values: `"key: value; key: value"`.

use std::fmt;

/// Ordered `key: value` pairs of one component attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Component {
    entries: Vec<(String, String)>,
}

impl Component {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `"a: 1; b: two"`. Empty segments are skipped; a segment
    /// without a colon becomes a key with an empty value.
    pub fn parse(src: &str) -> Self {
        let entries = src
            .split(';')
            .map(str::trim)
            .filter(|seg| !seg.is_empty())
            .map(|seg| match seg.split_once(':') {
                Some((k, v)) => (k.trim().to_string(), v.trim().to_string()),
                None => (seg.to_string(), String::new()),
            })
            .collect();
        Self { entries }
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key`, replacing an existing value in place.
    pub fn set(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        Ok(())
    }
}
