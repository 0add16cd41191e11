//! Substitution values and single-pass token replacement.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::scan::{Segment, Segments};

/// A value bound to a token name: either text or a number.
///
/// Deserializes from a JSON string or number. Numbers render with default
/// formatting: integral values have no fractional part (`42`, not `42.0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Number(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => f.write_str(&format_number(*n)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

/// Format a number the way a certificate reader expects to see it.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".into() } else { "-Infinity".into() }
    } else if n == 0.0 {
        // Also catches -0.0
        "0".into()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// Token name → value bindings for one substitution pass.
///
/// Keys are case-sensitive. Iteration order is sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubstitutionMap {
    values: BTreeMap<String, Value>,
}

impl SubstitutionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `value`, replacing any previous binding.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for SubstitutionMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Replace every bound token in `text` with its value.
///
/// Single pass: replacement text is emitted verbatim and never re-scanned,
/// so a value that itself looks like `{{token}}` stays literal. Unbound
/// tokens are left as written.
///
/// ```
/// use certcanvas::template::{SubstitutionMap, substitute_text};
///
/// let map = SubstitutionMap::new().with("name", "Ada").with("age", 36);
/// assert_eq!(substitute_text("{{name}} is {{age}} ({{unit}})", &map), "Ada is 36 ({{unit}})");
/// ```
pub fn substitute_text(text: &str, map: &SubstitutionMap) -> String {
    let mut out = String::with_capacity(text.len());
    for seg in Segments::new(text) {
        match seg {
            Segment::Literal(s) => out.push_str(s),
            Segment::Token { name, raw } => match map.get(name) {
                Some(Value::Text(s)) => out.push_str(s),
                Some(value) => out.push_str(&value.to_string()),
                None => out.push_str(raw),
            },
        }
    }
    out
}
