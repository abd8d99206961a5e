//! Theme override values embedded into the generated Tailwind config.

use std::ops::{Deref, DerefMut};

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;

/// A theme override value.
///
/// Closed set of shapes that can appear in a theme extension, so the
/// source-text serializer is total.
#[derive(Debug, Clone, PartialEq)]
pub enum ThemeValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<ThemeValue>),
    Map(ThemeMap),
}

/// Ordered string-keyed map of theme values.
///
/// Insertion order is preserved so the generated config reads in the same
/// order the user wrote it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeMap(IndexMap<String, ThemeValue>);

impl ThemeMap {
    pub fn new() -> Self {
        ThemeMap(IndexMap::new())
    }

    /// Parse a JSON object (as passed on the command line).
    pub fn from_json_str(s: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(s).context("invalid JSON for theme config")?;
        match ThemeValue::from(value) {
            ThemeValue::Map(map) => Ok(map),
            _ => bail!("theme config must be a JSON object"),
        }
    }

    /// Convert a TOML table (from `tailwindctl.toml`).
    pub fn from_toml(table: &toml::Table) -> Self {
        table
            .iter()
            .map(|(k, v)| (k.clone(), ThemeValue::from(v.clone())))
            .collect()
    }
}

impl Deref for ThemeMap {
    type Target = IndexMap<String, ThemeValue>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ThemeMap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromIterator<(String, ThemeValue)> for ThemeMap {
    fn from_iter<I: IntoIterator<Item = (String, ThemeValue)>>(iter: I) -> Self {
        ThemeMap(iter.into_iter().collect())
    }
}

impl From<serde_json::Value> for ThemeValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => ThemeValue::Null,
            Value::Bool(b) => ThemeValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ThemeValue::Integer(i),
                None => ThemeValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => ThemeValue::Text(s),
            Value::Array(items) => ThemeValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(obj) => {
                ThemeValue::Map(obj.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<toml::Value> for ThemeValue {
    fn from(value: toml::Value) -> Self {
        use toml::Value;

        match value {
            Value::String(s) => ThemeValue::Text(s),
            Value::Integer(i) => ThemeValue::Integer(i),
            Value::Float(f) => ThemeValue::Float(f),
            Value::Boolean(b) => ThemeValue::Bool(b),
            Value::Datetime(dt) => ThemeValue::Text(dt.to_string()),
            Value::Array(items) => ThemeValue::List(items.into_iter().map(Into::into).collect()),
            Value::Table(table) => ThemeValue::Map(ThemeMap::from_toml(&table)),
        }
    }
}

impl From<&str> for ThemeValue {
    fn from(s: &str) -> Self {
        ThemeValue::Text(s.to_string())
    }
}

impl From<bool> for ThemeValue {
    fn from(b: bool) -> Self {
        ThemeValue::Bool(b)
    }
}

impl From<i64> for ThemeValue {
    fn from(i: i64) -> Self {
        ThemeValue::Integer(i)
    }
}

impl From<f64> for ThemeValue {
    fn from(f: f64) -> Self {
        ThemeValue::Float(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_preserves_order() {
        let map = ThemeMap::from_json_str(r#"{"z": 1, "a": {"y": "x", "b": [true, null]}}"#)
            .unwrap();
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a"]);

        let Some(ThemeValue::Map(inner)) = map.get("a") else {
            panic!("expected nested map");
        };
        let inner_keys: Vec<_> = inner.keys().map(String::as_str).collect();
        assert_eq!(inner_keys, vec!["y", "b"]);
        assert_eq!(
            inner.get("b"),
            Some(&ThemeValue::List(vec![ThemeValue::Bool(true), ThemeValue::Null]))
        );
    }

    #[test]
    fn test_from_json_numbers() {
        let map = ThemeMap::from_json_str(r#"{"i": 42, "f": 2.5}"#).unwrap();
        assert_eq!(map.get("i"), Some(&ThemeValue::Integer(42)));
        assert_eq!(map.get("f"), Some(&ThemeValue::Float(2.5)));
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert!(ThemeMap::from_json_str("[1, 2]").is_err());
        assert!(ThemeMap::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_from_toml() {
        let table: toml::Table = toml::from_str(
            r##"
            [colors]
            primary = "#ff0000"
            [spacing]
            "128" = "32rem"
            "##,
        )
        .unwrap();

        let map = ThemeMap::from_toml(&table);
        let Some(ThemeValue::Map(colors)) = map.get("colors") else {
            panic!("expected colors table");
        };
        assert_eq!(colors.get("primary"), Some(&ThemeValue::from("#ff0000")));
        assert!(map.get("spacing").is_some());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = ThemeMap::new();
        map.insert("a".to_string(), 1i64.into());
        map.insert("b".to_string(), 2i64.into());
        map.insert("a".to_string(), 3i64.into());

        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get_index(0),
            Some((&"a".to_string(), &ThemeValue::Integer(3)))
        );
    }
}
