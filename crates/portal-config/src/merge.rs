//! Theme configuration merging.

use crate::ConfigError;
use crate::diagnostics::Diagnostics;
use crate::site::Strictness;
use crate::theme::{PartialThemeConfig, ThemeConfig};

/// Merge an override layer onto a base theme.
///
/// Merge rules:
/// - scalar fields: the override value wins when present
/// - list fields: an override that supplies the field replaces the base
///   list wholesale, including with an empty list
/// - unknown keys: [`ConfigError::UnknownOption`] in strict mode, a
///   warning in lenient mode
///
/// `merge(base, &PartialThemeConfig::default(), ..)` returns `base`
/// unchanged.
///
/// # Errors
///
/// Returns `ConfigError::UnknownOption` for the first unknown key when
/// `strictness` is [`Strictness::Strict`].
pub fn merge(
    base: &ThemeConfig,
    overrides: &PartialThemeConfig,
    strictness: Strictness,
    diagnostics: &mut Diagnostics,
) -> Result<ThemeConfig, ConfigError> {
    match (strictness, overrides.unknown_keys.first()) {
        (Strictness::Strict, Some(key)) => {
            return Err(ConfigError::UnknownOption { key: key.clone() });
        }
        (Strictness::Lenient, _) => {
            for key in &overrides.unknown_keys {
                diagnostics.warn(key, "unknown theme option dropped");
            }
        }
        (Strictness::Strict, None) => {}
    }

    let pick = |value: &Option<String>, fallback: &Option<String>| {
        value.clone().or_else(|| fallback.clone())
    };

    Ok(ThemeConfig {
        navbar_items: overrides
            .navbar_items
            .clone()
            .unwrap_or_else(|| base.navbar_items.clone()),
        footer_groups: overrides
            .footer_groups
            .clone()
            .unwrap_or_else(|| base.footer_groups.clone()),
        prism_languages: overrides
            .prism_languages
            .clone()
            .unwrap_or_else(|| base.prism_languages.clone()),
        color_mode: overrides.color_mode.unwrap_or(base.color_mode),
        respect_prefers_color_scheme: overrides
            .respect_prefers_color_scheme
            .unwrap_or(base.respect_prefers_color_scheme),
        navbar_title: pick(&overrides.navbar_title, &base.navbar_title),
        navbar_logo: overrides
            .navbar_logo
            .clone()
            .or_else(|| base.navbar_logo.clone()),
        footer_style: overrides.footer_style.unwrap_or(base.footer_style),
        copyright: pick(&overrides.copyright, &base.copyright),
        prism_theme: pick(&overrides.prism_theme, &base.prism_theme),
        prism_dark_theme: pick(&overrides.prism_dark_theme, &base.prism_dark_theme),
        search: overrides.search.clone().or_else(|| base.search.clone()),
    })
}
