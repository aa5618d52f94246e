//! `{{key}}` placeholder substitution.
//!
//! Substitution is literal string replacement: for every entry, in insertion
//! order, the first occurrence of `{{key}}` in the running text is replaced
//! by the value. There is no escaping and no recursive expansion, and markers
//! without a matching entry are left in place.

use crate::{Error, Result};
use serde_json::Value;

/// Insertion-ordered mapping of placeholder keys to replacement values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    entries: Vec<(String, String)>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update an entry. Updating an existing key keeps its
    /// original position in the iteration order.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style variant of [`Substitutions::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge `other` into `self`; keys already present are overwritten in place.
    pub fn extend_from(&mut self, other: Substitutions) {
        for (k, v) in other.entries {
            self.insert(k, v);
        }
    }

    /// Parse a JSON object into substitutions, preserving document order.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| Error::ConfigError(format!("invalid substitution JSON: {}", e)))?;
        Self::from_json_value(&value)
    }

    /// Build substitutions from a JSON object. Values are coerced to text the
    /// way a scripting runtime stringifies them in a template literal.
    pub fn from_json_value(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            Error::ConfigError("substitution data must be a JSON object".into())
        })?;
        Ok(map
            .iter()
            .map(|(k, v)| (k.clone(), coerce_to_string(v)))
            .collect())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Substitutions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut subs = Substitutions::new();
        for (k, v) in iter {
            subs.insert(k, v);
        }
        subs
    }
}

fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                // null elements vanish when an array is joined
                Value::Null => String::new(),
                other => coerce_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Placeholder marker for `key`, e.g. `{{name}}`
pub fn marker(key: &str) -> String {
    format!("{{{{{}}}}}", key)
}

/// Apply `subs` to `text` in a single pass.
pub fn substitute(text: &str, subs: &Substitutions) -> String {
    let mut out = text.to_string();
    for (key, value) in subs.iter() {
        out = out.replacen(&marker(key), value, 1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_wraps_key_in_double_braces() {
        assert_eq!(marker("name"), "{{name}}");
    }

    #[test]
    fn replaces_first_occurrence_only() {
        let subs = Substitutions::new().with("x", "1");
        assert_eq!(substitute("{{x}} {{x}}", &subs), "1 {{x}}");
    }

    #[test]
    fn missing_entries_leave_markers() {
        let subs = Substitutions::new().with("a", "X");
        assert_eq!(substitute("<p>{{a}} and {{b}}</p>", &subs), "<p>X and {{b}}</p>");
    }

    #[test]
    fn unused_entries_are_ignored() {
        let subs = Substitutions::new().with("ghost", "boo");
        assert_eq!(substitute("<p>static</p>", &subs), "<p>static</p>");
    }

    #[test]
    fn values_are_not_reexpanded_by_earlier_keys() {
        // `a` is processed before `b` introduces a new `{{a}}` marker
        let subs = Substitutions::new().with("a", "A").with("b", "{{a}}");
        assert_eq!(substitute("{{a}}-{{b}}", &subs), "A-{{a}}");
    }

    #[test]
    fn later_keys_see_earlier_output() {
        let subs = Substitutions::new().with("a", "{{b}}").with("b", "B");
        assert_eq!(substitute("{{a}}|{{b}}", &subs), "B|{{b}}");
    }

    #[test]
    fn insert_updates_in_place() {
        let mut subs = Substitutions::new().with("first", "1").with("second", "2");
        subs.insert("first", "one");
        let keys: Vec<_> = subs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["first", "second"]);
        assert_eq!(subs.get("first"), Some("one"));
        assert_eq!(subs.len(), 2);
    }

    #[test]
    fn json_values_are_coerced() {
        let subs = Substitutions::from_json_str(
            r#"{"z": "text", "n": 42, "f": 1.5, "b": true, "nil": null, "list": [1, null, "x"], "obj": {"k": 1}}"#,
        )
        .unwrap();
        let pairs: Vec<_> = subs.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("z", "text"),
                ("n", "42"),
                ("f", "1.5"),
                ("b", "true"),
                ("nil", "null"),
                ("list", "1,,x"),
                ("obj", "[object Object]"),
            ]
        );
    }

    #[test]
    fn json_must_be_an_object() {
        assert!(matches!(Substitutions::from_json_str("[1, 2]"), Err(Error::ConfigError(_))));
        assert!(matches!(Substitutions::from_json_str("{"), Err(Error::ConfigError(_))));
    }
}
