//! Sidebar description: named, ordered, possibly nested item lists.

use serde_json::Value;

use crate::ConfigError;
use crate::value::{Table, expect_str, index_path, type_mismatch};

/// One entry of a sidebar description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SidebarItem {
    /// A labelled group of further items.
    Category(CategoryItem),
    /// A reference to a document.
    Doc(DocItem),
}

impl SidebarItem {
    /// Doc reference with default label and route.
    #[must_use]
    pub fn doc(id: impl Into<String>) -> Self {
        Self::Doc(DocItem {
            id: id.into(),
            label: None,
            route: None,
        })
    }

    /// Expanded category with the given items.
    #[must_use]
    pub fn category(label: impl Into<String>, items: Vec<SidebarItem>) -> Self {
        Self::Category(CategoryItem {
            label: label.into(),
            collapsed: None,
            slug: None,
            items,
        })
    }
}

/// Category entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryItem {
    /// Display label.
    pub label: String,
    /// Whether the category starts collapsed (`false` when unset).
    pub collapsed: Option<bool>,
    /// Path segment override; derived from the label when unset.
    pub slug: Option<String>,
    /// Child items in display order.
    pub items: Vec<SidebarItem>,
}

/// Document entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocItem {
    /// Doc id, e.g. `getting-started/intro`.
    pub id: String,
    /// Display label; derived from the id when unset.
    pub label: Option<String>,
    /// Declared route; `route_base_path` joined with the id when unset.
    pub route: Option<String>,
}

/// A named sidebar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sidebar {
    /// Sidebar name, e.g. `tutorialSidebar`.
    pub name: String,
    /// Top-level items in display order.
    pub items: Vec<SidebarItem>,
}

/// Validate a sidebar description (mapping of sidebar name to item list).
pub(crate) fn parse_sidebars(value: &Value) -> Result<Vec<Sidebar>, ConfigError> {
    let table = Table::new(value, "")?;
    table
        .entries()
        .map(|(name, items)| {
            let path = table.field_path(name);
            let Value::Array(items) = items else {
                return Err(type_mismatch(path, "array of sidebar items", items));
            };
            Ok(Sidebar {
                name: name.clone(),
                items: parse_items(items, &path)?,
            })
        })
        .collect()
}

fn parse_items(items: &[Value], path: &str) -> Result<Vec<SidebarItem>, ConfigError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_item(item, index_path(path, i)))
        .collect()
}

fn parse_item(value: &Value, path: String) -> Result<SidebarItem, ConfigError> {
    match value {
        Value::String(_) => Ok(SidebarItem::Doc(DocItem {
            id: expect_str(value, path)?,
            label: None,
            route: None,
        })),
        Value::Object(_) => {
            let table = Table::new(value, path)?;
            if let Some(kind) = table.get("type") {
                let type_path = table.field_path("type");
                match expect_str(kind, type_path.clone())?.as_str() {
                    "doc" => parse_doc(&table),
                    "category" => parse_category(&table),
                    _ => Err(type_mismatch(type_path, "one of \"doc\", \"category\"", kind)),
                }
            } else if let Some(doc) = table.optional_table("doc")? {
                parse_doc(&doc)
            } else if let Some(category) = table.optional_table("category")? {
                parse_category(&category)
            } else {
                Err(ConfigError::MissingField {
                    path: table.field_path("type"),
                })
            }
        }
        other => Err(type_mismatch(path, "doc id or sidebar item table", other)),
    }
}

fn parse_doc(table: &Table<'_>) -> Result<SidebarItem, ConfigError> {
    Ok(SidebarItem::Doc(DocItem {
        id: table.required_str("id")?,
        label: table.optional_str("label")?,
        route: table.optional_str("route")?,
    }))
}

fn parse_category(table: &Table<'_>) -> Result<SidebarItem, ConfigError> {
    let label = table.required_str("label")?;
    let items_path = table.field_path("items");
    let items = match table.optional_array("items")? {
        Some(items) if !items.is_empty() => parse_items(items, &items_path)?,
        _ => return Err(ConfigError::MissingField { path: items_path }),
    };

    Ok(SidebarItem::Category(CategoryItem {
        label,
        collapsed: table.optional_bool("collapsed")?,
        slug: table.optional_str("slug")?,
        items,
    }))
}
