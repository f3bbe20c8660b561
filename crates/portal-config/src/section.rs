//! Custom pages assembled from declarative content sections.

use serde_json::{Map, Value};

use crate::ConfigError;
use crate::value::{Table, index_path, type_mismatch};

/// One self-contained unit of page content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageSection {
    /// Component identifier, e.g. `hero` or `code-comparison`.
    pub kind: String,
    /// Identifier unique within the page.
    pub section_id: String,
    /// Component properties. Link objects (`{to}` / `{href}`) anywhere
    /// inside are resolved during composition.
    pub props: Map<String, Value>,
    /// Shared state keys this section makes available to later sections.
    pub provides: Vec<String>,
    /// Shared state keys this section reads.
    pub requires: Vec<String>,
}

impl PageSection {
    #[must_use]
    pub fn new(kind: impl Into<String>, section_id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            section_id: section_id.into(),
            props: Map::new(),
            provides: Vec::new(),
            requires: Vec::new(),
        }
    }

    /// Set a single property.
    #[must_use]
    pub fn with_prop(mut self, key: impl Into<String>, value: Value) -> Self {
        self.props.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn providing(mut self, key: impl Into<String>) -> Self {
        self.provides.push(key.into());
        self
    }

    #[must_use]
    pub fn requiring(mut self, key: impl Into<String>) -> Self {
        self.requires.push(key.into());
        self
    }
}

/// A custom (non-doc) page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageConfig {
    /// Route the page is served at.
    pub path: String,
    /// Page title; the site title when unset.
    pub title: Option<String>,
    /// Sections in render order.
    pub sections: Vec<PageSection>,
}

/// Validate the `pages` array.
pub(crate) fn parse_pages(items: &[Value], path: &str) -> Result<Vec<PageConfig>, ConfigError> {
    let mut pages: Vec<PageConfig> = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let table = Table::new(item, index_path(path, i))?;
        let page = parse_page(&table)?;
        if pages.iter().any(|p| p.path == page.path) {
            return Err(ConfigError::DuplicateKey {
                path: table.field_path("path"),
                key: page.path,
            });
        }
        pages.push(page);
    }
    Ok(pages)
}

fn parse_page(table: &Table<'_>) -> Result<PageConfig, ConfigError> {
    let path = table.required_str("path")?;
    if !path.starts_with('/') {
        return Err(ConfigError::Validation {
            path: table.field_path("path"),
            message: "must start with /".to_owned(),
        });
    }

    let sections_path = table.field_path("sections");
    let sections = table
        .optional_array("sections")?
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, section)| parse_section(&Table::new(section, index_path(&sections_path, i))?))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PageConfig {
        path,
        title: table.optional_str("title")?,
        sections,
    })
}

fn parse_section(table: &Table<'_>) -> Result<PageSection, ConfigError> {
    let props = match table.get("props") {
        None => Map::new(),
        Some(Value::Object(props)) => props.clone(),
        Some(other) => return Err(type_mismatch(table.field_path("props"), "table", other)),
    };

    Ok(PageSection {
        kind: table.required_str("kind")?,
        section_id: table.required_str("id")?,
        props,
        provides: table.optional_string_list("provides")?.unwrap_or_default(),
        requires: table.optional_string_list("requires")?.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(value: &Value) -> Result<Vec<PageConfig>, ConfigError> {
        parse_pages(value.as_array().unwrap(), "pages")
    }

    #[test]
    fn test_parse_landing_page() {
        let pages = parse(&json!([{
            "path": "/",
            "sections": [
                {"kind": "hero", "id": "hero", "props": {"cta": {"label": "Get Started", "to": "/getting-started/quickstart"}}, "provides": ["cta"]},
                {"kind": "final-cta", "id": "cta", "requires": ["cta"]},
            ],
        }]))
        .unwrap();

        let expected = PageConfig {
            path: "/".to_owned(),
            title: None,
            sections: vec![
                PageSection::new("hero", "hero")
                    .with_prop(
                        "cta",
                        json!({"label": "Get Started", "to": "/getting-started/quickstart"}),
                    )
                    .providing("cta"),
                PageSection::new("final-cta", "cta").requiring("cta"),
            ],
        };
        assert_eq!(pages, vec![expected]);
    }

    #[test]
    fn test_section_requires_kind() {
        let err = parse(&json!([{"path": "/", "sections": [{"id": "hero"}]}])).unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingField { ref path } if path == "pages[0].sections[0].kind"),
            "got {err:?}"
        );
    }

    #[test]
    fn test_props_must_be_table() {
        let err = parse(&json!([{"path": "/", "sections": [{"kind": "hero", "id": "h", "props": [1]}]}]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { ref path, .. } if path == "pages[0].sections[0].props"));
    }

    #[test]
    fn test_duplicate_page_path() {
        let err = parse(&json!([{"path": "/about"}, {"path": "/about"}])).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateKey { ref path, ref key } if path == "pages[1].path" && key == "/about"));
    }

    #[test]
    fn test_page_path_must_be_absolute() {
        let err = parse(&json!([{"path": "about"}])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }
}
