//! Reading configuration files from disk.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::ConfigError;
use crate::expand::expand_site;
use crate::loader::{ConfigLoader, ValidatedConfig};
use crate::site::LinkPolicy;
use crate::value::type_mismatch;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "portal.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override sidebar description file.
    pub sidebar_path: Option<PathBuf>,
    /// Theme override file layered on top of `[theme]`.
    pub theme_override_path: Option<PathBuf>,
    /// Override strict mode.
    pub strict: Option<bool>,
    /// Override the doc-link breakage policy.
    pub on_broken_links: Option<LinkPolicy>,
    /// Override the markdown-link breakage policy.
    pub on_broken_markdown_links: Option<LinkPolicy>,
}

/// Configuration loaded from a project directory.
#[derive(Debug)]
pub struct ProjectConfig {
    /// Validated configuration with CLI settings applied.
    pub config: ValidatedConfig,
    /// Site configuration file.
    pub config_path: PathBuf,
    /// Sidebar description file that was read.
    pub sidebar_path: PathBuf,
    /// Theme override file that was read, if any.
    pub theme_override_path: Option<PathBuf>,
}

impl ProjectConfig {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise, searches
    /// for `portal.toml` in the current directory and its parents.
    ///
    /// Environment references in `edit_url` and `theme.search` are expanded
    /// before validation. CLI settings are applied after validation.
    ///
    /// # Errors
    ///
    /// Returns error if a file is missing, fails to parse, references an
    /// unset environment variable, or fails validation.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let config_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => Self::discover_config().ok_or_else(|| {
                let cwd = std::env::current_dir().unwrap_or_default();
                ConfigError::NotFound(cwd.join(CONFIG_FILENAME))
            })?,
        };
        let config_dir = config_path.parent().unwrap_or(Path::new("."));
        let default_settings = CliSettings::default();
        let settings = cli_settings.unwrap_or(&default_settings);

        let mut site = read_value(&config_path)?;
        expand_site(&mut site)?;

        let sidebar_path = match &settings.sidebar_path {
            Some(path) => path.clone(),
            None => config_dir.join(raw_sidebar_path(&site)?),
        };
        let sidebar = read_value(&sidebar_path)?;

        let overrides = settings
            .theme_override_path
            .as_deref()
            .map(read_value)
            .transpose()?;

        let mut config = ConfigLoader::load(&site, &sidebar, overrides.as_ref())?;
        config.apply_cli_settings(settings);

        tracing::debug!(
            config = %config_path.display(),
            sidebar = %sidebar_path.display(),
            "Loaded project configuration"
        );

        Ok(Self {
            config,
            config_path,
            sidebar_path,
            theme_override_path: settings.theme_override_path.clone(),
        })
    }

    /// Directory containing the site configuration file.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        self.config_path.parent().unwrap_or(Path::new("."))
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }
}

/// The `sidebar_path` setting, read before full validation so the sidebar
/// file can be located.
fn raw_sidebar_path(site: &Value) -> Result<&str, ConfigError> {
    match site.get("sidebar_path") {
        None | Some(Value::Null) => Ok("sidebars.yaml"),
        Some(Value::String(path)) => Ok(path),
        Some(other) => Err(type_mismatch("sidebar_path".to_owned(), "string", other)),
    }
}

/// Read a TOML, YAML or JSON file into a generic value tree.
///
/// The format is chosen by extension. An empty file reads as an empty table.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist and
/// `ConfigError::Parse` if it cannot be parsed.
pub fn read_value(path: &Path) -> Result<Value, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    let parse_error = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Some("yaml" | "yml") => serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Some("json") => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
        _ => Err(parse_error(
            "unsupported file extension (expected .toml, .yaml, .yml or .json)".to_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::Strictness;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_value_by_extension() {
        let dir = TempDir::new().unwrap();
        let toml = write(&dir, "a.toml", "title = \"Argus\"\n");
        let yaml = write(&dir, "b.yaml", "docs:\n  - intro\n");
        let json = write(&dir, "c.json", r#"{"color_mode": "dark"}"#);

        assert_eq!(read_value(&toml).unwrap()["title"], "Argus");
        assert_eq!(read_value(&yaml).unwrap()["docs"][0], "intro");
        assert_eq!(read_value(&json).unwrap()["color_mode"], "dark");
    }

    #[test]
    fn test_read_value_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "empty.yaml", "\n");

        assert_eq!(read_value(&path).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn test_read_value_not_found() {
        let err = read_value(Path::new("/nonexistent/portal.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_read_value_parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "broken.toml", "title = \n");

        let err = read_value(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_read_value_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "sidebars.js", "module.exports = {}");

        assert!(matches!(read_value(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_project_from_directory() {
        let dir = TempDir::new().unwrap();
        let config_path = write(
            &dir,
            CONFIG_FILENAME,
            "title = \"Argus\"\nsidebar_path = \"nav.yaml\"\n",
        );
        write(&dir, "nav.yaml", "tutorialSidebar:\n  - getting-started/intro\n");

        let project = ProjectConfig::load(Some(&config_path), None).unwrap();

        assert_eq!(project.config.site.title, "Argus");
        assert_eq!(project.sidebar_path, dir.path().join("nav.yaml"));
        assert_eq!(project.config_dir(), dir.path());
    }

    #[test]
    fn test_load_project_cli_settings() {
        let dir = TempDir::new().unwrap();
        let config_path = write(&dir, CONFIG_FILENAME, "title = \"Argus\"\n");
        let sidebar = write(&dir, "other.json", r#"{"docs": ["intro"]}"#);
        let overrides = write(&dir, "override.toml", "color_mode = \"dark\"\n");

        let settings = CliSettings {
            sidebar_path: Some(sidebar.clone()),
            theme_override_path: Some(overrides.clone()),
            strict: Some(false),
            ..CliSettings::default()
        };
        let project = ProjectConfig::load(Some(&config_path), Some(&settings)).unwrap();

        assert_eq!(project.sidebar_path, sidebar);
        assert_eq!(project.theme_override_path, Some(overrides));
        assert_eq!(project.config.site.strictness, Strictness::Lenient);
        assert_eq!(project.config.sidebars[0].name, "docs");
    }

    #[test]
    fn test_load_project_missing_sidebar() {
        let dir = TempDir::new().unwrap();
        let config_path = write(&dir, CONFIG_FILENAME, "title = \"Argus\"\n");

        let err = ProjectConfig::load(Some(&config_path), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(ref path) if path.ends_with("sidebars.yaml")));
    }

    #[test]
    fn test_load_project_expands_search_settings() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("PORTAL_TEST_SEARCH_KEY", "abc123");
        }

        let dir = TempDir::new().unwrap();
        let config_path = write(
            &dir,
            CONFIG_FILENAME,
            r#"
title = "Argus"

[theme.search]
api_key = "${PORTAL_TEST_SEARCH_KEY}"
index_name = "${PORTAL_TEST_SEARCH_INDEX:-argus}"
"#,
        );
        write(&dir, "sidebars.yaml", "docs:\n  - intro\n");

        let project = ProjectConfig::load(Some(&config_path), None).unwrap();
        let search = project.config.theme.search.unwrap();

        assert_eq!(search["api_key"], "abc123");
        assert_eq!(search["index_name"], "argus");

        unsafe {
            std::env::remove_var("PORTAL_TEST_SEARCH_KEY");
        }
    }

    #[test]
    fn test_sidebar_path_wrong_type() {
        let dir = TempDir::new().unwrap();
        let config_path = write(&dir, CONFIG_FILENAME, "title = \"Argus\"\nsidebar_path = 3\n");

        let err = ProjectConfig::load(Some(&config_path), None).unwrap_err();

        assert!(matches!(err, ConfigError::TypeMismatch { ref path, .. } if path == "sidebar_path"));
    }
}
