//! Default input stylesheet and `tailwind.config.js` generation.
//!
//! Files are only ever created, never overwritten.

use std::path::Path;

use anyhow::Result;

use crate::core::theme::{ThemeMap, ThemeValue};
use crate::core::version::ToolchainVersion;
use crate::util::fs::write_new_atomic;

/// Indent width of one nesting level in generated source.
const INDENT: &str = "  ";

/// Nesting level of the `extend` object inside the generated config.
const EXTEND_LEVEL: usize = 4;

/// Default input stylesheet for a Tailwind version.
pub fn default_stylesheet(version: &ToolchainVersion) -> &'static str {
    version.descriptor().stylesheet
}

/// Create the default input stylesheet if `path` does not exist.
///
/// Returns whether a file was written.
pub fn write_default_stylesheet(path: &Path, version: &ToolchainVersion) -> Result<bool> {
    write_new_atomic(path, default_stylesheet(version))
}

/// Render the default `tailwind.config.js`.
pub fn default_config(content: &[String], theme: &ThemeMap) -> String {
    let content = content
        .iter()
        .map(|glob| quote(glob))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "module.exports = {{\n    content: [{}],\n    theme: {{\n        extend: {},\n    }},\n    plugins: [],\n}}\n",
        content,
        to_source_text(theme, EXTEND_LEVEL)
    )
}

/// Create the default config if `path` does not exist.
///
/// Returns whether a file was written.
pub fn write_default_config(path: &Path, content: &[String], theme: &ThemeMap) -> Result<bool> {
    write_new_atomic(path, &default_config(content, theme))
}

/// Render a theme map as a JavaScript object literal.
///
/// `indent` is the nesting level of the literal itself: entries are
/// indented one level deeper and the closing brace sits at `indent`. An
/// empty map renders as `{}`.
pub fn to_source_text(map: &ThemeMap, indent: usize) -> String {
    if map.is_empty() {
        return "{}".to_string();
    }

    let entry_indent = INDENT.repeat(indent + 1);
    let entries: Vec<String> = map
        .iter()
        .map(|(key, value)| {
            format!(
                "{}{}: {}",
                entry_indent,
                render_key(key),
                render_value(value, indent + 1)
            )
        })
        .collect();

    format!("{{\n{}\n{}}}", entries.join(",\n"), INDENT.repeat(indent))
}

fn render_value(value: &ThemeValue, indent: usize) -> String {
    match value {
        ThemeValue::Map(map) => to_source_text(map, indent),
        ThemeValue::List(items) => render_list(items, indent),
        scalar => render_scalar(scalar),
    }
}

// Maps inside a list sit one level deeper than the list's own entry
fn render_list(items: &[ThemeValue], indent: usize) -> String {
    let items: Vec<String> = items
        .iter()
        .map(|item| match item {
            ThemeValue::Map(map) => to_source_text(map, indent + 1),
            ThemeValue::List(nested) => render_list(nested, indent),
            scalar => render_scalar(scalar),
        })
        .collect();

    format!("[{}]", items.join(", "))
}

fn render_scalar(value: &ThemeValue) -> String {
    match value {
        ThemeValue::Null => "null".to_string(),
        ThemeValue::Bool(b) => b.to_string(),
        ThemeValue::Integer(i) => i.to_string(),
        ThemeValue::Float(f) => render_float(*f),
        ThemeValue::Text(s) => quote(s),
        ThemeValue::List(_) | ThemeValue::Map(_) => render_value(value, 0),
    }
}

fn render_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "Infinity".to_string()
    } else if f == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        f.to_string()
    }
}

/// Double-quoted string literal with JSON escaping.
fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Object keys are written bare when they are identifiers or array indices.
fn render_key(key: &str) -> String {
    if is_identifier(key) || is_index(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn is_index(key: &str) -> bool {
    !key.is_empty()
        && key.chars().all(|c| c.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn map(entries: Vec<(&str, ThemeValue)>) -> ThemeMap {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_empty_map() {
        assert_eq!(to_source_text(&ThemeMap::new(), 0), "{}");
        assert_eq!(to_source_text(&ThemeMap::new(), 3), "{}");
    }

    #[test]
    fn test_single_entry() {
        let theme = map(vec![("k", "v".into())]);
        assert_eq!(to_source_text(&theme, 0), "{\n  k: \"v\"\n}");
    }

    #[test]
    fn test_list_preserves_order() {
        let theme = map(vec![(
            "k",
            ThemeValue::List(vec![
                "a".into(),
                true.into(),
                ThemeValue::Integer(1),
                ThemeValue::Float(2.5),
            ]),
        )]);
        assert_eq!(to_source_text(&theme, 0), "{\n  k: [\"a\", true, 1, 2.5]\n}");
    }

    #[test]
    fn test_nested_maps() {
        let colors = map(vec![("primary", "#3b82f6".into()), ("muted", ThemeValue::Null)]);
        let theme = map(vec![
            ("colors", ThemeValue::Map(colors)),
            ("spacing", ThemeValue::Map(map(vec![("128", "32rem".into())]))),
        ]);

        let expected = "{\n  colors: {\n    primary: \"#3b82f6\",\n    muted: null\n  },\n  spacing: {\n    128: \"32rem\"\n  }\n}";
        assert_eq!(to_source_text(&theme, 0), expected);
    }

    #[test]
    fn test_map_inside_list() {
        let theme = map(vec![(
            "fontSize",
            ThemeValue::List(vec![
                "1rem".into(),
                ThemeValue::Map(map(vec![("lineHeight", "1.5".into())])),
            ]),
        )]);

        let expected = "{\n  fontSize: [\"1rem\", {\n      lineHeight: \"1.5\"\n    }]\n}";
        assert_eq!(to_source_text(&theme, 0), expected);
    }

    #[test]
    fn test_keys_and_strings_are_escaped() {
        let theme = map(vec![
            ("primary-color", "say \"hi\"".into()),
            ("_private", ThemeValue::Bool(false)),
            ("007", ThemeValue::Integer(7)),
        ]);

        let expected =
            "{\n  \"primary-color\": \"say \\\"hi\\\"\",\n  _private: false,\n  \"007\": 7\n}";
        assert_eq!(to_source_text(&theme, 0), expected);
    }

    #[test]
    fn test_float_rendering() {
        assert_eq!(render_float(0.25), "0.25");
        assert_eq!(render_float(f64::NAN), "NaN");
        assert_eq!(render_float(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_default_config_without_theme() {
        let content = vec!["**/*.py".to_string(), "templates/*.html".to_string()];
        let config = default_config(&content, &ThemeMap::new());

        assert_eq!(
            config,
            "module.exports = {\n    content: [\"**/*.py\", \"templates/*.html\"],\n    theme: {\n        extend: {},\n    },\n    plugins: [],\n}\n"
        );
    }

    #[test]
    fn test_default_config_theme_is_aligned() {
        let theme = map(vec![(
            "colors",
            ThemeValue::Map(map(vec![("brand", "#ff0000".into())])),
        )]);
        let config = default_config(&["**/*.py".to_string()], &theme);

        assert!(config.contains(
            "        extend: {\n          colors: {\n            brand: \"#ff0000\"\n          }\n        },\n"
        ));
    }

    #[test]
    fn test_write_default_config_never_overwrites() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".tailwind/tailwind.config.js");
        let content = vec!["**/*.py".to_string()];

        assert!(write_default_config(&path, &content, &ThemeMap::new()).unwrap());
        fs::write(&path, "module.exports = { custom: true }\n").unwrap();

        assert!(!write_default_config(&path, &content, &ThemeMap::new()).unwrap());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "module.exports = { custom: true }\n"
        );
    }

    #[test]
    fn test_stylesheet_templates() {
        let tmp = TempDir::new().unwrap();
        let v3 = tmp.path().join("v3/input.css");
        let v4 = tmp.path().join("v4/input.css");

        assert!(write_default_stylesheet(&v3, &"3".parse().unwrap()).unwrap());
        assert!(write_default_stylesheet(&v4, &"4.1.3".parse().unwrap()).unwrap());

        let v3 = fs::read_to_string(v3).unwrap();
        assert!(v3.contains("@tailwind base;"));
        assert!(v3.contains("@tailwind components;"));
        assert!(v3.contains("@tailwind utilities;"));

        let v4 = fs::read_to_string(v4).unwrap();
        assert!(v4.contains("@import \"tailwindcss\""));
        assert!(!v4.contains("@tailwind"));
    }
}
