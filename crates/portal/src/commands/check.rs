//! `portal check` command implementation.

use clap::Args;

use super::{ProjectArgs, ensure_no_errors};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

impl CheckArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let (_, manifest) = self.project.build(&output)?;
        ensure_no_errors(&manifest)?;

        output.success(&format!("{} routes OK", manifest.routes.len()));
        Ok(())
    }
}
