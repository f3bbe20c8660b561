//! Configuration management for Portal.
//!
//! Turns the raw site configuration, sidebar description and theme
//! overrides into a [`ValidatedConfig`] that the rest of the build reads by
//! reference. Validation is a pure function of the raw value trees; file
//! discovery, parsing and environment variable expansion live in
//! [`ProjectConfig::load`] and are the concern of the build driver.
//!
//! ## Theme merging
//!
//! [`merge`] combines a base [`ThemeConfig`] with a [`PartialThemeConfig`]:
//!
//! - scalar fields (`color_mode`, `search`, ...): the override wins when present
//! - list fields (`navbar_items`, `footer_groups`, `prism_languages`): an
//!   override that supplies the field replaces the base list wholesale
//! - unknown keys: fatal in [`Strictness::Strict`], dropped with a warning in
//!   [`Strictness::Lenient`]
//!
//! ## Environment Variable Expansion
//!
//! When loading from disk, string values under `theme.search` and `edit_url`
//! support `${VAR}` (error if unset) and `${VAR:-default}`.

mod diagnostics;
mod expand;
mod files;
mod loader;
mod merge;
mod section;
mod sidebar;
mod site;
mod theme;
mod value;

use std::path::PathBuf;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use files::{CONFIG_FILENAME, CliSettings, ProjectConfig, read_value};
pub use loader::{ConfigLoader, ValidatedConfig};
pub use merge::merge;
pub use section::{PageConfig, PageSection};
pub use sidebar::{CategoryItem, DocItem, Sidebar, SidebarItem};
pub use site::{BrokenLinkPolicies, I18nConfig, LinkPolicy, SiteConfig, Strictness};
pub use theme::{
    ColorMode, FooterGroup, FooterStyle, LinkTarget, NavLink, NavbarLogo, PartialThemeConfig,
    Position, ThemeConfig,
};

/// Configuration error.
///
/// Validation variants carry the dotted field path of the offending entry
/// (e.g. `theme.navbar_items[2].label`, `tutorial[0].items`).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML, YAML or JSON parsing error.
    #[error("Parse error in {}: {message}", path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
    /// Required field is absent or empty.
    #[error("Missing required field: {path}")]
    MissingField {
        /// Field path.
        path: String,
    },
    /// Field has the wrong type or an unrecognized value.
    #[error("Type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Field path.
        path: String,
        /// Description of the accepted values.
        expected: &'static str,
        /// What was found instead.
        found: String,
    },
    /// Key that must be unique appears more than once.
    #[error("Duplicate key at {path}: {key}")]
    DuplicateKey {
        /// Path of the second occurrence.
        path: String,
        /// The repeated key.
        key: String,
    },
    /// Unrecognized theme option in strict mode.
    #[error("Unknown option: {key}")]
    UnknownOption {
        /// Full path of the unknown key.
        key: String,
    },
    /// Value is well-typed but semantically invalid.
    #[error("Configuration error at {path}: {message}")]
    Validation {
        /// Field path.
        path: String,
        /// What is wrong with the value.
        message: String,
    },
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`theme.search.api_key`").
        field: String,
        /// Error message (e.g., "${`ALGOLIA_KEY`} not set").
        message: String,
    },
}
