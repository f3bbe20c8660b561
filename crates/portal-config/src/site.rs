//! Site-level settings.

use serde::Serialize;

use crate::ConfigError;
use crate::diagnostics::Diagnostics;
use crate::value::{Choice, Table, index_path};

/// Keys recognized at the top level of the site configuration.
pub(crate) const SITE_KEYS: &[&str] = &[
    "title",
    "tagline",
    "url",
    "base_url",
    "route_base_path",
    "sidebar_path",
    "edit_url",
    "favicon",
    "show_last_update_time",
    "show_last_update_author",
    "on_broken_links",
    "on_broken_markdown_links",
    "strict",
    "i18n",
    "theme",
    "pages",
];

/// What to do when a link target does not resolve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPolicy {
    /// Fail the build.
    #[default]
    Throw,
    /// Emit a broken-link marker and record a warning.
    Warn,
}

impl Choice for LinkPolicy {
    const EXPECTED: &'static str = "one of \"throw\", \"warn\"";

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "throw" => Some(Self::Throw),
            "warn" => Some(Self::Warn),
            _ => None,
        }
    }
}

impl std::str::FromStr for LinkPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("expected {}", Self::EXPECTED))
    }
}

/// The two independently configurable link-breakage policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokenLinkPolicies {
    /// Doc-to-doc links (doc ids, absolute paths, theme and section links).
    pub doc_links: LinkPolicy,
    /// Markdown file references (`intro.md`, `../api/overview.mdx`).
    pub markdown_links: LinkPolicy,
}

impl Default for BrokenLinkPolicies {
    fn default() -> Self {
        Self {
            doc_links: LinkPolicy::Throw,
            markdown_links: LinkPolicy::Warn,
        }
    }
}

/// Whether recoverable problems abort the build or become diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Abort on the first fatal problem.
    #[default]
    Strict,
    /// Record recoverable problems and complete the build.
    Lenient,
}

impl Strictness {
    #[must_use]
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Lenient }
    }

    #[must_use]
    pub fn is_lenient(self) -> bool {
        self == Self::Lenient
    }
}

/// Localization settings, passed through to the rendering engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct I18nConfig {
    /// Locale the site is authored in.
    pub default_locale: String,
    /// All locales the site is built for.
    pub locales: Vec<String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_owned(),
            locales: vec!["en".to_owned()],
        }
    }
}

/// Validated site settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteConfig {
    /// Site title (required).
    pub title: String,
    /// Short description shown on the landing page.
    pub tagline: Option<String>,
    /// Production URL of the site.
    pub url: Option<String>,
    /// URL prefix the site is served under.
    pub base_url: String,
    /// Route prefix for doc pages.
    pub route_base_path: String,
    /// Sidebar description file, relative to the config file.
    pub sidebar_path: String,
    /// Prefix for "edit this page" links.
    pub edit_url: Option<String>,
    /// Favicon path relative to the static assets.
    pub favicon: Option<String>,
    /// Show the last update date on doc pages.
    pub show_last_update_time: bool,
    /// Show the last update author on doc pages.
    pub show_last_update_author: bool,
    /// Link breakage policies.
    pub links: BrokenLinkPolicies,
    /// Strict or lenient build.
    pub strictness: Strictness,
    /// Localization settings.
    pub i18n: I18nConfig,
}

impl SiteConfig {
    /// Validate the top-level site settings.
    ///
    /// Unknown top-level keys are dropped with a warning.
    pub(crate) fn from_table(
        table: &Table<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self, ConfigError> {
        let title = table.required_str("title")?;

        let base_url = table
            .optional_str("base_url")?
            .unwrap_or_else(|| "/".to_owned());
        require_absolute(&base_url, &table.field_path("base_url"))?;

        let route_base_path = table
            .optional_str("route_base_path")?
            .unwrap_or_else(|| "/".to_owned());
        require_absolute(&route_base_path, &table.field_path("route_base_path"))?;

        let defaults = BrokenLinkPolicies::default();
        let links = BrokenLinkPolicies {
            doc_links: table
                .optional_choice("on_broken_links")?
                .unwrap_or(defaults.doc_links),
            markdown_links: table
                .optional_choice("on_broken_markdown_links")?
                .unwrap_or(defaults.markdown_links),
        };

        let strictness = Strictness::from_strict_flag(table.optional_bool("strict")?.unwrap_or(true));

        let i18n = match table.optional_table("i18n")? {
            Some(i18n) => parse_i18n(&i18n, diagnostics)?,
            None => I18nConfig::default(),
        };

        for key in table.unknown_keys(SITE_KEYS) {
            diagnostics.warn(key, "unknown site option ignored");
        }

        Ok(Self {
            title,
            tagline: table.optional_str("tagline")?,
            url: table.optional_str("url")?,
            base_url,
            route_base_path,
            sidebar_path: table
                .optional_str("sidebar_path")?
                .unwrap_or_else(|| "sidebars.yaml".to_owned()),
            edit_url: table.optional_str("edit_url")?,
            favicon: table.optional_str("favicon")?,
            show_last_update_time: table.optional_bool("show_last_update_time")?.unwrap_or(false),
            show_last_update_author: table
                .optional_bool("show_last_update_author")?
                .unwrap_or(false),
            links,
            strictness,
            i18n,
        })
    }
}

fn parse_i18n(table: &Table<'_>, diagnostics: &mut Diagnostics) -> Result<I18nConfig, ConfigError> {
    let default_locale = table
        .optional_str("default_locale")?
        .unwrap_or_else(|| "en".to_owned());

    let locales = match table.optional_string_list("locales")? {
        Some(locales) => {
            let path = table.field_path("locales");
            for (i, locale) in locales.iter().enumerate() {
                if locales[..i].contains(locale) {
                    return Err(ConfigError::DuplicateKey {
                        path: index_path(&path, i),
                        key: locale.clone(),
                    });
                }
            }
            if !locales.contains(&default_locale) {
                return Err(ConfigError::Validation {
                    path,
                    message: format!("must contain the default locale \"{default_locale}\""),
                });
            }
            locales
        }
        None => vec![default_locale.clone()],
    };

    for key in table.unknown_keys(&["default_locale", "locales"]) {
        diagnostics.warn(key, "unknown i18n option ignored");
    }

    Ok(I18nConfig {
        default_locale,
        locales,
    })
}

/// Require a route prefix to start with `/`.
fn require_absolute(value: &str, field: &str) -> Result<(), ConfigError> {
    if !value.starts_with('/') {
        return Err(ConfigError::Validation {
            path: field.to_owned(),
            message: "must start with /".to_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: &serde_json::Value) -> Result<(SiteConfig, Diagnostics), ConfigError> {
        let mut diagnostics = Diagnostics::new();
        let table = Table::new(value, "")?;
        let site = SiteConfig::from_table(&table, &mut diagnostics)?;
        Ok((site, diagnostics))
    }

    #[test]
    fn test_minimal_site_defaults() {
        let (site, diagnostics) = parse(&json!({"title": "Argus"})).unwrap();

        assert_eq!(site.title, "Argus");
        assert_eq!(site.base_url, "/");
        assert_eq!(site.route_base_path, "/");
        assert_eq!(site.sidebar_path, "sidebars.yaml");
        assert_eq!(site.links.doc_links, LinkPolicy::Throw);
        assert_eq!(site.links.markdown_links, LinkPolicy::Warn);
        assert_eq!(site.strictness, Strictness::Strict);
        assert_eq!(site.i18n, I18nConfig::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_missing_title() {
        let err = parse(&json!({"tagline": "x"})).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { ref path } if path == "title"));
    }

    #[test]
    fn test_policies_parsed() {
        let (site, _) = parse(&json!({
            "title": "Argus",
            "on_broken_links": "warn",
            "on_broken_markdown_links": "throw",
            "strict": false,
        }))
        .unwrap();

        assert_eq!(site.links.doc_links, LinkPolicy::Warn);
        assert_eq!(site.links.markdown_links, LinkPolicy::Throw);
        assert!(site.strictness.is_lenient());
    }

    #[test]
    fn test_invalid_policy_is_type_mismatch() {
        let err = parse(&json!({"title": "Argus", "on_broken_links": "ignore"})).unwrap_err();
        assert!(
            matches!(err, ConfigError::TypeMismatch { ref path, .. } if path == "on_broken_links"),
            "got {err:?}"
        );
    }

    #[test]
    fn test_route_base_path_must_be_absolute() {
        let err = parse(&json!({"title": "Argus", "route_base_path": "docs"})).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref path, .. } if path == "route_base_path"));
    }

    #[test]
    fn test_unknown_top_level_key_warns() {
        let (_, diagnostics) = parse(&json!({"title": "Argus", "plugins": ["sass"]})).unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.iter().next().unwrap().source, "plugins");
    }

    #[test]
    fn test_pass_through_options() {
        let (site, diagnostics) = parse(&json!({
            "title": "Argus",
            "favicon": "img/argus-logo.webp",
            "show_last_update_time": true,
        }))
        .unwrap();

        assert_eq!(site.favicon.as_deref(), Some("img/argus-logo.webp"));
        assert!(site.show_last_update_time);
        assert!(!site.show_last_update_author);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_i18n_duplicate_locale() {
        let err = parse(&json!({
            "title": "Argus",
            "i18n": {"locales": ["en", "fr", "en"]},
        }))
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::DuplicateKey { ref path, ref key } if path == "i18n.locales[2]" && key == "en")
        );
    }

    #[test]
    fn test_i18n_locales_must_include_default() {
        let err = parse(&json!({
            "title": "Argus",
            "i18n": {"default_locale": "fr", "locales": ["en"]},
        }))
        .unwrap_err();
        assert!(err.to_string().contains("i18n.locales"));
    }

    #[test]
    fn test_link_policy_from_str() {
        assert_eq!("warn".parse::<LinkPolicy>(), Ok(LinkPolicy::Warn));
        assert!("log".parse::<LinkPolicy>().is_err());
    }
}
