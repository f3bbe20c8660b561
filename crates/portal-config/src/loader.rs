//! Validation of raw configuration value trees.

use serde_json::Value;

use crate::ConfigError;
use crate::diagnostics::Diagnostics;
use crate::files::CliSettings;
use crate::merge::merge;
use crate::section::{PageConfig, parse_pages};
use crate::sidebar::{Sidebar, parse_sidebars};
use crate::site::{SiteConfig, Strictness};
use crate::theme::{PartialThemeConfig, ThemeConfig};
use crate::value::Table;

/// Field path prefix for keys of a theme override file.
const THEME_OVERRIDE_PATH: &str = "theme_override";

/// Validated, immutable build configuration.
#[derive(Clone, Debug)]
pub struct ValidatedConfig {
    pub site: SiteConfig,
    /// Sidebars in declaration order.
    pub sidebars: Vec<Sidebar>,
    /// The site's own `[theme]` table.
    pub theme: PartialThemeConfig,
    /// Per-build overrides layered on top of `theme`.
    pub theme_overrides: PartialThemeConfig,
    /// Custom pages.
    pub pages: Vec<PageConfig>,
    /// Warnings recorded while validating.
    pub diagnostics: Diagnostics,
}

impl ValidatedConfig {
    /// Produce the build's theme: defaults, then `[theme]`, then overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownOption` in strict mode if either layer
    /// carries an unrecognized key.
    pub fn resolve_theme(&self, diagnostics: &mut Diagnostics) -> Result<ThemeConfig, ConfigError> {
        let strictness = self.site.strictness;
        let base = merge(&ThemeConfig::default(), &self.theme, strictness, diagnostics)?;
        merge(&base, &self.theme_overrides, strictness, diagnostics)
    }

    /// Apply command-line settings on top of the validated values.
    pub fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(strict) = settings.strict {
            self.site.strictness = Strictness::from_strict_flag(strict);
        }
        if let Some(policy) = settings.on_broken_links {
            self.site.links.doc_links = policy;
        }
        if let Some(policy) = settings.on_broken_markdown_links {
            self.site.links.markdown_links = policy;
        }
    }
}

/// Entry point for configuration validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Validate the raw site configuration, sidebar description and
    /// optional theme overrides.
    ///
    /// Pure and deterministic: reads nothing but its arguments.
    ///
    /// # Errors
    ///
    /// Returns `MissingField`, `TypeMismatch`, `DuplicateKey` or `Validation`
    /// naming the field path of the first offending entry.
    pub fn load(
        site: &Value,
        sidebar: &Value,
        theme_overrides: Option<&Value>,
    ) -> Result<ValidatedConfig, ConfigError> {
        let mut diagnostics = Diagnostics::new();

        let table = Table::new(site, "")?;
        let site_config = SiteConfig::from_table(&table, &mut diagnostics)?;

        let theme = match table.optional_table("theme")? {
            Some(theme) => PartialThemeConfig::from_table(&theme)?,
            None => PartialThemeConfig::default(),
        };

        let theme_overrides = match theme_overrides {
            Some(value) => PartialThemeConfig::from_table(&Table::new(value, THEME_OVERRIDE_PATH)?)?,
            None => PartialThemeConfig::default(),
        };

        let pages = match table.optional_array("pages")? {
            Some(pages) => parse_pages(pages, &table.field_path("pages"))?,
            None => Vec::new(),
        };

        let sidebars = parse_sidebars(sidebar)?;

        tracing::debug!(
            sidebars = sidebars.len(),
            pages = pages.len(),
            warnings = diagnostics.len(),
            "Configuration validated"
        );

        Ok(ValidatedConfig {
            site: site_config,
            sidebars,
            theme,
            theme_overrides,
            pages,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::LinkPolicy;
    use crate::theme::{ColorMode, NavLink};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sidebar() -> Value {
        json!({"tutorialSidebar": ["getting-started/intro"]})
    }

    #[test]
    fn test_load_minimal() {
        let config = ConfigLoader::load(&json!({"title": "Argus"}), &sidebar(), None).unwrap();

        assert_eq!(config.site.title, "Argus");
        assert_eq!(config.sidebars.len(), 1);
        assert!(config.theme.is_empty());
        assert!(config.theme_overrides.is_empty());
        assert!(config.pages.is_empty());
        assert!(config.diagnostics.is_empty());
    }

    #[test]
    fn test_load_is_deterministic() {
        let site = json!({"title": "Argus", "theme": {"color_mode": "dark"}, "extra": 1});
        let first = ConfigLoader::load(&site, &sidebar(), None).unwrap();
        let second = ConfigLoader::load(&site, &sidebar(), None).unwrap();

        assert_eq!(first.site, second.site);
        assert_eq!(first.theme, second.theme);
        assert_eq!(first.diagnostics, second.diagnostics);
    }

    #[test]
    fn test_load_reports_sidebar_path() {
        let err = ConfigLoader::load(
            &json!({"title": "Argus"}),
            &json!({"tutorialSidebar": [{"type": "doc", "id": 7}]}),
            None,
        )
        .unwrap_err();

        assert!(
            matches!(err, ConfigError::TypeMismatch { ref path, .. } if path == "tutorialSidebar[0].id")
        );
    }

    #[test]
    fn test_theme_must_be_table() {
        let err = ConfigLoader::load(&json!({"title": "Argus", "theme": "dark"}), &sidebar(), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { ref path, .. } if path == "theme"));
    }

    #[test]
    fn test_resolve_theme_layers() {
        let site = json!({
            "title": "Argus",
            "theme": {
                "color_mode": "dark",
                "navbar_items": [{"label": "Docs", "to": "/getting-started/intro"}],
            },
        });
        let overrides = json!({"color_mode": "auto"});
        let config = ConfigLoader::load(&site, &sidebar(), Some(&overrides)).unwrap();

        let theme = config.resolve_theme(&mut Diagnostics::new()).unwrap();

        assert_eq!(theme.color_mode, ColorMode::Auto);
        assert_eq!(
            theme.navbar_items,
            vec![NavLink::internal("Docs", "/getting-started/intro")]
        );
    }

    #[test]
    fn test_resolve_theme_unknown_override_key_strict() {
        let overrides = json!({"hide_on_scroll": true});
        let config =
            ConfigLoader::load(&json!({"title": "Argus"}), &sidebar(), Some(&overrides)).unwrap();

        let err = config.resolve_theme(&mut Diagnostics::new()).unwrap_err();

        assert!(
            matches!(err, ConfigError::UnknownOption { ref key } if key == "theme_override.hide_on_scroll")
        );
    }

    #[test]
    fn test_resolve_theme_unknown_base_key_lenient() {
        let site = json!({"title": "Argus", "strict": false, "theme": {"announcement_bar": {}}});
        let config = ConfigLoader::load(&site, &sidebar(), None).unwrap();
        let mut diagnostics = Diagnostics::new();

        let theme = config.resolve_theme(&mut diagnostics).unwrap();

        assert_eq!(theme, ThemeConfig::default());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = ConfigLoader::load(&json!({"title": "Argus"}), &sidebar(), None).unwrap();

        config.apply_cli_settings(&CliSettings {
            strict: Some(false),
            on_broken_links: Some(LinkPolicy::Warn),
            ..CliSettings::default()
        });

        assert!(config.site.strictness.is_lenient());
        assert_eq!(config.site.links.doc_links, LinkPolicy::Warn);
        assert_eq!(config.site.links.markdown_links, LinkPolicy::Warn);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = ConfigLoader::load(&json!({"title": "Argus"}), &sidebar(), None).unwrap();
        let before = config.site.clone();

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.site, before);
    }
}
