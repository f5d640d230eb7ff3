use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Flat option map shared by plants and controllers
// ---------------------------------------------------------------------------

/// Named options consumed selectively by a plant and its controller.
///
/// Keys are stored with `-` folded to `_`, so `rate-limit` and `rate_limit`
/// name the same option. Keys nobody reads are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<String, Value>")]
pub struct Params {
    values: BTreeMap<String, Value>,
}

fn normalize(key: &str) -> String {
    key.replace('-', "_")
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(normalize(key), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(&normalize(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn merge(&mut self, other: &Params) {
        for (k, v) in &other.values {
            self.values.insert(k.clone(), v.clone());
        }
    }

    /// Parse a JSON object into an option set.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Numeric option `key`, or `previous` if absent or malformed.
    pub fn f64_or(&self, key: &str, previous: f64) -> f64 {
        let coerced = coerce_or_keep(self.get(key), previous);
        if let Some(raw) = self.get(key) {
            if as_f64(raw).is_none() && !raw.is_null() {
                log::warn!("option `{key}`: {raw} is not numeric, keeping {previous}");
            }
        }
        coerced
    }

    /// Boolean option `key`, or `previous` if absent or malformed.
    pub fn bool_or(&self, key: &str, previous: bool) -> bool {
        if let Some(raw) = self.get(key) {
            if as_bool(raw).is_none() && !raw.is_null() {
                log::warn!("option `{key}`: {raw} is not a flag, keeping {previous}");
            }
        }
        coerce_bool_or_keep(self.get(key), previous)
    }
}

impl From<BTreeMap<String, Value>> for Params {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        let values = raw.into_iter().map(|(k, v)| (normalize(&k), v)).collect();
        Self { values }
    }
}

impl From<Params> for BTreeMap<String, Value> {
    fn from(p: Params) -> Self {
        p.values
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut p = Params::new();
        for (k, v) in iter {
            p.insert(k.as_ref(), v);
        }
        p
    }
}

// ---------------------------------------------------------------------------
// Permissive coercion
// ---------------------------------------------------------------------------

fn as_f64(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn as_bool(raw: &Value) -> Option<bool> {
    let text = match raw {
        Value::Bool(b) => return Some(*b),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_lowercase(),
        _ => return None,
    };
    match text.chars().next() {
        Some('t' | 'y' | '1') => Some(true),
        Some('f' | 'n' | '0') => Some(false),
        _ => None,
    }
}

/// Interpret `raw` as a number, falling back to `previous`.
///
/// Numbers pass through, numeric strings are parsed and booleans map to 1/0.
/// Absent, null, non-numeric or non-finite strings, arrays and objects keep
/// `previous`.
pub fn coerce_or_keep(raw: Option<&Value>, previous: f64) -> f64 {
    raw.and_then(as_f64).unwrap_or(previous)
}

/// Interpret `raw` as a flag, falling back to `previous`.
///
/// Strings and numbers are read by their first character: `t`, `y`, `1` are
/// true and `f`, `n`, `0` are false.
pub fn coerce_bool_or_keep(raw: Option<&Value>, previous: bool) -> bool {
    raw.and_then(as_bool).unwrap_or(previous)
}
