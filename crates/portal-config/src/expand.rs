//! Environment variable expansion for raw configuration values.

use serde_json::Value;

use crate::ConfigError;
use crate::value::{child_path, index_path};

/// Expand `${VAR}` and `${VAR:-default}` references in a string.
pub(crate) fn expand_env(input: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(input)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

/// Expand every string nested anywhere inside `value`, in place.
pub(crate) fn expand_value(value: &mut Value, field: &str) -> Result<(), ConfigError> {
    match value {
        Value::String(s) => {
            *s = expand_env(s, field)?;
        }
        Value::Array(items) => {
            for (i, item) in items.iter_mut().enumerate() {
                expand_value(item, &index_path(field, i))?;
            }
        }
        Value::Object(map) => {
            for (key, item) in map.iter_mut() {
                expand_value(item, &child_path(field, key))?;
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
    Ok(())
}

/// Expand the fields of a raw site table that accept environment references:
/// `edit_url` and everything under `theme.search`.
pub(crate) fn expand_site(site: &mut Value) -> Result<(), ConfigError> {
    if let Some(edit_url) = site.get_mut("edit_url") {
        expand_value(edit_url, "edit_url")?;
    }
    if let Some(search) = site.get_mut("theme").and_then(|t| t.get_mut("search")) {
        expand_value(search, "theme.search")?;
    }
    Ok(())
}
