//! Theme configuration: navbar, footer, code highlighting, color mode, search.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

use crate::ConfigError;
use crate::value::{Choice, Table, index_path, type_mismatch};

/// Keys recognized in a theme table (base or override).
pub(crate) const THEME_KEYS: &[&str] = &[
    "navbar_items",
    "footer_groups",
    "prism_languages",
    "color_mode",
    "respect_prefers_color_scheme",
    "navbar_title",
    "navbar_logo",
    "footer_style",
    "copyright",
    "prism_theme",
    "prism_dark_theme",
    "search",
];

const NAV_LINK_KEYS: &[&str] = &["label", "to", "href", "position"];
const FOOTER_GROUP_KEYS: &[&str] = &["title", "links"];
const NAVBAR_LOGO_KEYS: &[&str] = &["alt", "src", "src_dark"];

/// Where a link points.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkTarget {
    /// Doc id, site path or markdown file reference.
    Internal(String),
    /// Absolute URL.
    External(String),
}

impl LinkTarget {
    /// The raw target string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Internal(s) | Self::External(s) => s,
        }
    }
}

/// Navbar placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Left,
    Right,
}

impl Choice for Position {
    const EXPECTED: &'static str = "one of \"left\", \"right\"";

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Initial color mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
    Auto,
}

impl Choice for ColorMode {
    const EXPECTED: &'static str = "one of \"light\", \"dark\", \"auto\"";

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}

/// Footer color scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FooterStyle {
    #[default]
    Light,
    Dark,
}

impl Choice for FooterStyle {
    const EXPECTED: &'static str = "one of \"light\", \"dark\"";

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

/// A labelled link in the navbar or footer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: String,
    pub target: LinkTarget,
    pub position: Position,
}

impl NavLink {
    /// Left-aligned internal link.
    #[must_use]
    pub fn internal(label: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: LinkTarget::Internal(to.into()),
            position: Position::Left,
        }
    }

    /// Right-aligned external link.
    #[must_use]
    pub fn external(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: LinkTarget::External(href.into()),
            position: Position::Right,
        }
    }
}

/// Navbar logo, with an optional variant for dark mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavbarLogo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_dark: Option<String>,
}

/// Titled column of footer links.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FooterGroup {
    pub title: String,
    pub links: Vec<NavLink>,
}

/// Fully resolved theme configuration.
///
/// Constructed once per build by [`merge`](crate::merge) and read-only
/// afterwards.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub navbar_items: Vec<NavLink>,
    pub footer_groups: Vec<FooterGroup>,
    pub prism_languages: BTreeSet<String>,
    pub color_mode: ColorMode,
    pub respect_prefers_color_scheme: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navbar_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navbar_logo: Option<NavbarLogo>,
    pub footer_style: FooterStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prism_theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prism_dark_theme: Option<String>,
    /// Opaque search provider settings, passed through uninterpreted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<Value>,
}

/// Theme fields supplied by one configuration layer.
///
/// `None` means the layer does not mention the field. `Some(vec![])` is an
/// explicit empty list and replaces the base list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartialThemeConfig {
    pub navbar_items: Option<Vec<NavLink>>,
    pub footer_groups: Option<Vec<FooterGroup>>,
    pub prism_languages: Option<BTreeSet<String>>,
    pub color_mode: Option<ColorMode>,
    pub respect_prefers_color_scheme: Option<bool>,
    pub navbar_title: Option<String>,
    pub navbar_logo: Option<NavbarLogo>,
    pub footer_style: Option<FooterStyle>,
    pub copyright: Option<String>,
    pub prism_theme: Option<String>,
    pub prism_dark_theme: Option<String>,
    pub search: Option<Value>,
    /// Full paths of keys this layer supplied but no field recognizes.
    pub unknown_keys: Vec<String>,
}

impl PartialThemeConfig {
    /// Validate a theme table. Unknown keys are collected, not rejected;
    /// the merge decides what to do with them.
    pub(crate) fn from_table(table: &Table<'_>) -> Result<Self, ConfigError> {
        let mut unknown_keys = table.unknown_keys(THEME_KEYS);

        let navbar_items = match table.optional_array("navbar_items")? {
            Some(items) => Some(parse_links(
                items,
                &table.field_path("navbar_items"),
                &mut unknown_keys,
            )?),
            None => None,
        };

        let footer_groups = match table.optional_array("footer_groups")? {
            Some(groups) => Some(parse_footer_groups(
                groups,
                &table.field_path("footer_groups"),
                &mut unknown_keys,
            )?),
            None => None,
        };

        let prism_languages = table
            .optional_string_list("prism_languages")?
            .map(|languages| into_unique_set(languages, &table.field_path("prism_languages")))
            .transpose()?;

        let navbar_logo = match table.optional_table("navbar_logo")? {
            Some(logo) => {
                unknown_keys.extend(logo.unknown_keys(NAVBAR_LOGO_KEYS));
                Some(NavbarLogo {
                    alt: logo.optional_str("alt")?,
                    src: logo.required_str("src")?,
                    src_dark: logo.optional_str("src_dark")?,
                })
            }
            None => None,
        };

        let search = match table.get("search") {
            Some(search @ Value::Object(_)) => Some(search.clone()),
            Some(other) => return Err(type_mismatch(table.field_path("search"), "table", other)),
            None => None,
        };

        Ok(Self {
            navbar_items,
            footer_groups,
            prism_languages,
            color_mode: table.optional_choice("color_mode")?,
            respect_prefers_color_scheme: table.optional_bool("respect_prefers_color_scheme")?,
            navbar_title: table.optional_str("navbar_title")?,
            navbar_logo,
            footer_style: table.optional_choice("footer_style")?,
            copyright: table.optional_str("copyright")?,
            prism_theme: table.optional_str("prism_theme")?,
            prism_dark_theme: table.optional_str("prism_dark_theme")?,
            search,
            unknown_keys,
        })
    }

    /// True if the layer supplies nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn parse_links(
    items: &[Value],
    path: &str,
    unknown_keys: &mut Vec<String>,
) -> Result<Vec<NavLink>, ConfigError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let table = Table::new(item, index_path(path, i))?;
            unknown_keys.extend(table.unknown_keys(NAV_LINK_KEYS));
            parse_nav_link(&table)
        })
        .collect()
}

fn parse_nav_link(table: &Table<'_>) -> Result<NavLink, ConfigError> {
    let label = table.required_str("label")?;
    let target = match (table.contains("to"), table.contains("href")) {
        (true, false) => LinkTarget::Internal(table.required_str("to")?),
        (false, true) => LinkTarget::External(table.required_str("href")?),
        (true, true) => {
            return Err(ConfigError::TypeMismatch {
                path: table.path().to_owned(),
                expected: "exactly one of `to` or `href`",
                found: "both".to_owned(),
            });
        }
        (false, false) => {
            return Err(ConfigError::MissingField {
                path: table.field_path("to"),
            });
        }
    };

    Ok(NavLink {
        label,
        target,
        position: table.optional_choice("position")?.unwrap_or_default(),
    })
}

fn parse_footer_groups(
    groups: &[Value],
    path: &str,
    unknown_keys: &mut Vec<String>,
) -> Result<Vec<FooterGroup>, ConfigError> {
    let mut parsed: Vec<FooterGroup> = Vec::with_capacity(groups.len());
    for (i, group) in groups.iter().enumerate() {
        let table = Table::new(group, index_path(path, i))?;
        unknown_keys.extend(table.unknown_keys(FOOTER_GROUP_KEYS));

        let title = table.required_str("title")?;
        if parsed.iter().any(|g| g.title == title) {
            return Err(ConfigError::DuplicateKey {
                path: table.field_path("title"),
                key: title,
            });
        }

        let links = match table.optional_array("links")? {
            Some(links) => parse_links(links, &table.field_path("links"), unknown_keys)?,
            None => Vec::new(),
        };

        parsed.push(FooterGroup { title, links });
    }
    Ok(parsed)
}

fn into_unique_set(values: Vec<String>, path: &str) -> Result<BTreeSet<String>, ConfigError> {
    let mut set = BTreeSet::new();
    for (i, value) in values.into_iter().enumerate() {
        if set.contains(&value) {
            return Err(ConfigError::DuplicateKey {
                path: index_path(path, i),
                key: value,
            });
        }
        set.insert(value);
    }
    Ok(set)
}
