use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form property bag attached to objects and assets.
///
/// Keys follow the authoring tool's camelCase vocabulary (`width`, `radius`,
/// `color`, `text`, `fontSize`, `texture`, …). Accessors are lenient: a value
/// of the wrong JSON type reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(Map<String, Value>);

impl Properties {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Numeric property as `f32`.
    pub fn number(&self, key: &str) -> Option<f32> {
        self.0.get(key).and_then(Value::as_f64).map(|n| n as f32)
    }

    /// String property.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    /// Shallow merge: every key of `other` overwrites the same key here.
    pub fn merge(&mut self, other: &Properties) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for Properties {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn typed_accessors_are_lenient() {
        let p = Properties::new()
            .with("width", 2)
            .with("color", "#ff0000")
            .with("visible", true);

        assert_eq!(p.number("width"), Some(2.0));
        assert_eq!(p.str("color"), Some("#ff0000"));
        assert_eq!(p.bool("visible"), Some(true));
        assert_eq!(p.number("color"), None);
        assert_eq!(p.str("missing"), None);
    }

    #[test]
    fn merge_overwrites_only_supplied_keys() {
        let mut p = Properties::new().with("width", 2).with("height", 3);
        p.merge(&Properties::new().with("height", 9).with("depth", 4));

        assert_eq!(p.number("width"), Some(2.0));
        assert_eq!(p.number("height"), Some(9.0));
        assert_eq!(p.number("depth"), Some(4.0));
    }

    #[test]
    fn serializes_as_plain_object() {
        let p = Properties::new().with("radius", 40);
        assert_eq!(serde_json::to_value(&p).unwrap(), json!({ "radius": 40 }));
    }
}
