//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod check;

use std::path::PathBuf;

use clap::Args;
use portal_config::{CliSettings, LinkPolicy, ProjectConfig};
use portal_site::{RouteManifest, build_site};

use crate::error::CliError;
use crate::output::Output;

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;

/// Options shared by every command that loads a project.
#[derive(Args)]
pub(crate) struct ProjectArgs {
    /// Path to configuration file (default: auto-discover portal.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Sidebar description file (overrides config).
    #[arg(long)]
    pub sidebar: Option<PathBuf>,

    /// Theme override file (TOML, YAML or JSON) layered over [theme].
    #[arg(long)]
    pub theme_override: Option<PathBuf>,

    /// Record recoverable problems as diagnostics instead of failing.
    #[arg(long)]
    pub lenient: bool,

    /// Policy for broken doc links: throw or warn (overrides config).
    #[arg(long, value_name = "POLICY")]
    pub on_broken_links: Option<LinkPolicy>,

    /// Policy for broken markdown links: throw or warn (overrides config).
    #[arg(long, value_name = "POLICY")]
    pub on_broken_markdown_links: Option<LinkPolicy>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ProjectArgs {
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            sidebar_path: self.sidebar.clone(),
            theme_override_path: self.theme_override.clone(),
            strict: self.lenient.then_some(false),
            on_broken_links: self.on_broken_links,
            on_broken_markdown_links: self.on_broken_markdown_links,
        }
    }

    /// Load the project and build its manifest, reporting diagnostics.
    pub(crate) fn build(&self, output: &Output) -> Result<(ProjectConfig, RouteManifest), CliError> {
        let project = ProjectConfig::load(self.config.as_deref(), Some(&self.cli_settings()))?;

        output.info(&format!("Config: {}", project.config_path.display()));
        output.info(&format!("Sidebar: {}", project.sidebar_path.display()));
        if let Some(path) = &project.theme_override_path {
            output.info(&format!("Theme override: {}", path.display()));
        }

        let manifest = build_site(&project.config)?;
        output.diagnostics(&manifest.diagnostics);

        Ok((project, manifest))
    }
}

/// Fail if the build recorded error diagnostics.
pub(crate) fn ensure_no_errors(manifest: &RouteManifest) -> Result<(), CliError> {
    let errors = manifest.diagnostics.count(portal_config::Severity::Error);
    if errors > 0 {
        return Err(CliError::Diagnostics(errors));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args() -> ProjectArgs {
        ProjectArgs {
            config: None,
            sidebar: None,
            theme_override: None,
            lenient: false,
            on_broken_links: None,
            on_broken_markdown_links: None,
            verbose: false,
        }
    }

    #[test]
    fn test_cli_settings_default_leaves_config() {
        let settings = args().cli_settings();

        assert_eq!(settings.strict, None);
        assert_eq!(settings.on_broken_links, None);
        assert_eq!(settings.sidebar_path, None);
    }

    #[test]
    fn test_cli_settings_lenient() {
        let settings = ProjectArgs {
            lenient: true,
            on_broken_markdown_links: Some(LinkPolicy::Throw),
            ..args()
        }
        .cli_settings();

        assert_eq!(settings.strict, Some(false));
        assert_eq!(settings.on_broken_markdown_links, Some(LinkPolicy::Throw));
    }
}
