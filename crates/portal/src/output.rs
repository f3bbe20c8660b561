//! Colored terminal output utilities.

use console::{Style, Term};
use portal_config::{Diagnostic, Diagnostics, Severity};

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    dim: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            dim: Style::new().dim(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print every recorded diagnostic, then a one-line summary.
    pub(crate) fn diagnostics(&self, diagnostics: &Diagnostics) {
        for diagnostic in diagnostics {
            let line = format_diagnostic(diagnostic);
            match diagnostic.severity {
                Severity::Warning => self.warning(&line),
                Severity::Error => self.error(&line),
            }
        }
        if !diagnostics.is_empty() {
            let summary = format!(
                "{} warning(s), {} error(s)",
                diagnostics.count(Severity::Warning),
                diagnostics.count(Severity::Error)
            );
            let _ = self.term.write_line(&self.dim.apply_to(summary).to_string());
        }
    }
}

fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    let tag = match diagnostic.severity {
        Severity::Warning => "warning",
        Severity::Error => "error",
    };
    format!("{tag}: {}: {}", diagnostic.source, diagnostic.message)
}
