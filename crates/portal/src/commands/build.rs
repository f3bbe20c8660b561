//! `portal build` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use portal_site::RouteManifest;

use super::{ProjectArgs, ensure_no_errors};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Manifest output file (default: build/manifest.json next to the config).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let (project, manifest) = self.project.build(&output)?;

        let output_path = self
            .output
            .unwrap_or_else(|| project.config_dir().join("build/manifest.json"));
        write_manifest(&manifest, &output_path)?;

        output.info(&format!("Output: {}", output_path.display()));
        ensure_no_errors(&manifest)?;

        output.success(&format!(
            "Built {} routes to {}",
            manifest.routes.len(),
            output_path.display()
        ));
        Ok(())
    }
}

/// Write the manifest as pretty JSON, creating parent directories.
fn write_manifest(manifest: &RouteManifest, path: &Path) -> Result<(), CliError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, manifest.to_json()?)?;
    tracing::debug!(path = %path.display(), "Wrote manifest");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_config::ConfigLoader;
    use portal_site::build_site;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    #[test]
    fn test_write_manifest_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("build/nested/manifest.json");
        let config = ConfigLoader::load(
            &json!({"title": "Argus"}),
            &json!({"docs": ["intro"]}),
            None,
        )
        .unwrap();
        let manifest = build_site(&config).unwrap();

        write_manifest(&manifest, &path).unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["site"]["title"], "Argus");
        assert_eq!(written["routes"]["/intro"]["kind"], "doc");
    }
}
