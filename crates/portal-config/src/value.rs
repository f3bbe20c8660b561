//! Path-aware access to raw configuration values.
//!
//! All raw inputs (TOML, YAML, JSON) are converted to [`serde_json::Value`]
//! before validation so that every error can name the dotted field path of
//! the offending entry.

use serde_json::{Map, Value};

use crate::ConfigError;

/// Closed set of string values accepted for an option.
pub(crate) trait Choice: Sized {
    /// Human-readable list of accepted values, used in `TypeMismatch` errors.
    const EXPECTED: &'static str;

    fn from_name(name: &str) -> Option<Self>;
}

/// Append a key to a field path.
pub(crate) fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_owned()
    } else {
        format!("{parent}.{key}")
    }
}

/// Append an array index to a field path.
pub(crate) fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

/// Short description of a value's type for error messages.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(_) => "bool".to_owned(),
        Value::Number(_) => "number".to_owned(),
        Value::String(s) => format!("string \"{s}\""),
        Value::Array(_) => "array".to_owned(),
        Value::Object(_) => "table".to_owned(),
    }
}

pub(crate) fn type_mismatch(path: String, expected: &'static str, found: &Value) -> ConfigError {
    ConfigError::TypeMismatch {
        path,
        expected,
        found: describe(found),
    }
}

/// Require a string value, rejecting empty strings as missing.
pub(crate) fn expect_str(value: &Value, path: String) -> Result<String, ConfigError> {
    match value {
        Value::String(s) if s.trim().is_empty() => Err(ConfigError::MissingField { path }),
        Value::String(s) => Ok(s.clone()),
        other => Err(type_mismatch(path, "string", other)),
    }
}

/// Parse a [`Choice`] from a string value.
pub(crate) fn expect_choice<T: Choice>(value: &Value, path: String) -> Result<T, ConfigError> {
    match value {
        Value::String(s) => T::from_name(s).ok_or_else(|| type_mismatch(path, T::EXPECTED, value)),
        other => Err(type_mismatch(path, T::EXPECTED, other)),
    }
}

/// A raw table together with its field path.
pub(crate) struct Table<'a> {
    path: String,
    map: &'a Map<String, Value>,
}

impl<'a> Table<'a> {
    /// Wrap a value that must be a table.
    pub(crate) fn new(value: &'a Value, path: impl Into<String>) -> Result<Self, ConfigError> {
        let path = path.into();
        match value {
            Value::Object(map) => Ok(Self { path, map }),
            other => Err(type_mismatch(path, "table", other)),
        }
    }

    pub(crate) fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn field_path(&self, key: &str) -> String {
        child_path(&self.path, key)
    }

    /// Get a field, treating explicit nulls as absent.
    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub(crate) fn required_str(&self, key: &str) -> Result<String, ConfigError> {
        let value = self.get(key).ok_or_else(|| ConfigError::MissingField {
            path: self.field_path(key),
        })?;
        expect_str(value, self.field_path(key))
    }

    pub(crate) fn optional_str(&self, key: &str) -> Result<Option<String>, ConfigError> {
        self.get(key)
            .map(|v| expect_str(v, self.field_path(key)))
            .transpose()
    }

    pub(crate) fn optional_bool(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(type_mismatch(self.field_path(key), "bool", other)),
        }
    }

    pub(crate) fn optional_choice<T: Choice>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        self.get(key)
            .map(|v| expect_choice(v, self.field_path(key)))
            .transpose()
    }

    pub(crate) fn optional_array(&self, key: &str) -> Result<Option<&'a [Value]>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items.as_slice())),
            Some(other) => Err(type_mismatch(self.field_path(key), "array", other)),
        }
    }

    pub(crate) fn optional_table(&self, key: &str) -> Result<Option<Table<'a>>, ConfigError> {
        self.get(key)
            .map(|v| Table::new(v, self.field_path(key)))
            .transpose()
    }

    /// Read a list of non-empty strings.
    pub(crate) fn optional_string_list(&self, key: &str) -> Result<Option<Vec<String>>, ConfigError> {
        let Some(items) = self.optional_array(key)? else {
            return Ok(None);
        };
        let path = self.field_path(key);
        items
            .iter()
            .enumerate()
            .map(|(i, item)| expect_str(item, index_path(&path, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Iterate over non-null entries in declaration order.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&'a String, &'a Value)> + use<'a> {
        self.map.iter().filter(|(_, v)| !v.is_null())
    }

    /// Full paths of keys not listed in `known`, in declaration order.
    pub(crate) fn unknown_keys(&self, known: &[&str]) -> Vec<String> {
        self.map
            .keys()
            .filter(|k| !known.contains(&k.as_str()))
            .map(|k| self.field_path(k))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_child_path_root() {
        assert_eq!(child_path("", "title"), "title");
    }

    #[test]
    fn test_child_path_nested() {
        assert_eq!(
            child_path("theme.navbar_items[0]", "label"),
            "theme.navbar_items[0].label"
        );
    }

    #[test]
    fn test_required_str_missing() {
        let value = json!({});
        let table = Table::new(&value, "").unwrap();
        let err = table.required_str("title").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { ref path } if path == "title"));
    }

    #[test]
    fn test_required_str_empty_is_missing() {
        let value = json!({"title": "  "});
        let table = Table::new(&value, "").unwrap();
        assert!(matches!(
            table.required_str("title"),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_required_str_wrong_type() {
        let value = json!({"title": 42});
        let table = Table::new(&value, "site").unwrap();
        let err = table.required_str("title").unwrap_err();
        assert!(
            matches!(err, ConfigError::TypeMismatch { ref path, expected: "string", .. } if path == "site.title"),
            "got {err:?}"
        );
    }

    #[test]
    fn test_null_treated_as_absent() {
        let value = json!({"tagline": null});
        let table = Table::new(&value, "").unwrap();
        assert_eq!(table.optional_str("tagline").unwrap(), None);
    }

    #[test]
    fn test_string_list_reports_element_path() {
        let value = json!({"locales": ["en", 3]});
        let table = Table::new(&value, "i18n").unwrap();
        let err = table.optional_string_list("locales").unwrap_err();
        assert!(err.to_string().contains("i18n.locales[1]"));
    }

    #[test]
    fn test_unknown_keys_preserve_order() {
        let value = json!({"title": "x", "zeta": 1, "alpha": 2});
        let table = Table::new(&value, "").unwrap();
        assert_eq!(table.unknown_keys(&["title"]), vec!["zeta", "alpha"]);
    }
}
