//! Non-fatal build diagnostics.
//!
//! Warnings (and, in lenient mode, errors that would otherwise abort the
//! build) are accumulated here and surfaced together when the build ends.

use serde::Serialize;

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Recorded and reported; never fails the build.
    Warning,
    /// Would have been fatal in strict mode.
    Error,
}

/// A single recorded diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity tag.
    pub severity: Severity,
    /// Where the problem was found (field path, page path or doc id).
    pub source: String,
    /// Human-readable description.
    pub message: String,
}

/// Ordered collection of diagnostics.
///
/// Each unit of work (config load, one page composition) owns its own
/// collection; collections are merged with [`Diagnostics::extend`] so that
/// no shared mutable state is needed during parallel composition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning.
    pub fn warn(&mut self, source: impl Into<String>, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            severity: Severity::Warning,
            source: source.into(),
            message: message.into(),
        };
        tracing::warn!(source = %diagnostic.source, "{}", diagnostic.message);
        self.entries.push(diagnostic);
    }

    /// Record an error that did not abort the build.
    pub fn error(&mut self, source: impl Into<String>, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            severity: Severity::Error,
            source: source.into(),
            message: message.into(),
        };
        tracing::error!(source = %diagnostic.source, "{}", diagnostic.message);
        self.entries.push(diagnostic);
    }

    /// Append all diagnostics from `other`, keeping their order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Number of diagnostics with the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_records_warning() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn("theme.foo", "unknown option dropped");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.count(Severity::Warning), 1);
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn test_extend_keeps_order() {
        let mut first = Diagnostics::new();
        first.warn("a", "first");
        let mut second = Diagnostics::new();
        second.error("b", "second");

        first.extend(second);

        let sources: Vec<_> = first.iter().map(|d| d.source.as_str()).collect();
        assert_eq!(sources, vec!["a", "b"]);
        assert!(first.has_errors());
    }

    #[test]
    fn test_serializes_as_list() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn("/intro", "broken link");

        let json = serde_json::to_value(&diagnostics).unwrap();

        assert!(json.is_array());
        assert_eq!(json[0]["severity"], "warning");
        assert_eq!(json[0]["source"], "/intro");
    }
}
