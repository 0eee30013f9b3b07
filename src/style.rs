use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::Serialize;
use serde_json::Value;

use crate::error::{EmailError, EmailResult};

/// Keys whose numeric values are written without a `px` suffix
/// (matched case-insensitively as substrings of the camelCase key).
const UNITLESS_KEYS: &[&str] = &["opacity", "zindex", "fontweight", "lineheight", "msotextraise"];

/// Same exemption for the compact serializer, matched against the kebab-case key.
const UNITLESS_CSS_KEYS: &[&str] = &["opacity", "z-index", "font-weight", "line-height"];

/// A single CSS value: either a literal string or a number (pixels unless unitless).
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Number(n) => write!(f, "{}", n),
            StyleValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}

/// Insertion-ordered mapping of camelCase CSS property names to values.
///
/// Inserting an existing key replaces its value in place, so layering maps
/// with [`StyleMap::extend`] behaves like an object spread: later values win
/// but the key keeps its first position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleMap {
    entries: Vec<(String, StyleValue)>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`StyleMap::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<StyleValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn extend(&mut self, other: &StyleMap) {
        for (key, value) in &other.entries {
            self.insert(key.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Inline declaration string, `"k: v; k: v"`.
    pub fn to_css(&self) -> String {
        style_to_string(self)
    }

    /// Compact declaration string, `"k:v;k:v"`, as used inside markdown output.
    pub fn to_compact_css(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| {
                let css_key = camel_to_kebab(key);
                match value {
                    StyleValue::Number(n) if !UNITLESS_CSS_KEYS.contains(&css_key.as_str()) => {
                        format!("{}:{}px", css_key, n)
                    }
                    _ => format!("{}:{}", css_key, value),
                }
            })
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Strict conversion from raw JSON: every value must be a string, a number
    /// or null (null entries are dropped).
    pub fn from_value(property: &str, value: &Value) -> EmailResult<StyleMap> {
        let object = value.as_object().ok_or_else(|| EmailError::UnsupportedStyleValue {
            property: property.to_string(),
            kind: value_kind(value).to_string(),
        })?;
        let mut map = StyleMap::new();
        for (key, raw) in object {
            match raw {
                Value::Null => {}
                Value::String(s) => map.insert(key.clone(), s.as_str()),
                Value::Number(n) => map.insert(key.clone(), n.as_f64().unwrap_or_default()),
                other => {
                    return Err(EmailError::UnsupportedStyleValue {
                        property: key.clone(),
                        kind: value_kind(other).to_string(),
                    })
                }
            }
        }
        Ok(map)
    }
}

impl<K: Into<String>, V: Into<StyleValue>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = StyleMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<'de> Deserialize<'de> for StyleMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StyleMapVisitor;

        impl<'de> Visitor<'de> for StyleMapVisitor {
            type Value = StyleMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of CSS property names to strings or numbers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<StyleMap, A::Error> {
                let mut map = StyleMap::new();
                while let Some((key, value)) = access.next_entry::<String, Option<StyleValue>>()? {
                    if let Some(value) = value {
                        map.insert(key, value);
                    }
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(StyleMapVisitor)
    }
}

/// Check that a JSON value can be rendered as a single CSS value.
pub(crate) fn check_scalar(property: &str, value: &Value) -> EmailResult<()> {
    match value {
        Value::Null | Value::String(_) | Value::Number(_) => Ok(()),
        other => Err(EmailError::UnsupportedStyleValue {
            property: property.to_string(),
            kind: value_kind(other).to_string(),
        }),
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `backgroundColor` -> `background-color`. Every uppercase letter gets a
/// leading dash and the result is lowercased.
pub fn camel_to_kebab(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
        }
        out.push(ch.to_ascii_lowercase());
    }
    out
}

fn is_unitless(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    UNITLESS_KEYS.iter().any(|k| lower.contains(k))
}

/// Canonical inline CSS for a style map: insertion order, kebab-case keys,
/// `px` appended to numbers except for unitless properties, `"; "` separated.
pub fn style_to_string(style: &StyleMap) -> String {
    style
        .iter()
        .map(|(key, value)| match value {
            StyleValue::Number(n) if !is_unitless(key) => {
                format!("{}: {}px", camel_to_kebab(key), n)
            }
            _ => format!("{}: {}", camel_to_kebab(key), value),
        })
        .collect::<Vec<_>>()
        .join("; ")
}
