//! Link target resolution against the navigation tree.
//!
//! Internal targets take one of three forms:
//! - doc id: `getting-started/intro`
//! - absolute route: `/getting-started/intro` (trailing slash ignored)
//! - markdown file: `intro.md`, `./intro.mdx`, `../api/overview.md`,
//!   resolved relative to the directory of the linking doc
//!
//! Markdown references fall under the markdown-link policy, everything else
//! under the doc-link policy. A `#fragment` suffix is carried over to the
//! resolved route.

use std::collections::HashSet;

use portal_config::{
    BrokenLinkPolicies, Diagnostics, LinkPolicy, LinkTarget, Severity, Strictness,
};
use serde::Serialize;

use crate::error::RouteError;
use crate::navigation::NavigationTree;
use crate::route;

const MARKDOWN_EXTENSIONS: &[&str] = &[".mdx", ".md"];

/// Breakage class of an internal link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Doc id or route.
    Doc,
    /// Markdown file reference.
    Markdown,
}

/// Placeholder for a link that did not resolve.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BrokenLinkMarker {
    /// Target as written.
    pub target: String,
    pub kind: LinkKind,
    pub severity: Severity,
}

/// Outcome of resolving a link target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedPath {
    /// Canonical route (internal) or the URL itself (external).
    Resolved(String),
    Broken(BrokenLinkMarker),
}

impl ResolvedPath {
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Resolved(path) => Some(path),
            Self::Broken(_) => None,
        }
    }

    #[must_use]
    pub fn is_broken(&self) -> bool {
        matches!(self, Self::Broken(_))
    }
}

/// Where a link appears.
#[derive(Clone, Copy, Debug)]
pub struct LinkOrigin<'a> {
    /// Page route or config field path, used in diagnostics.
    pub source: &'a str,
    /// Doc id of the linking page, for relative markdown references.
    pub doc_id: Option<&'a str>,
}

impl<'a> LinkOrigin<'a> {
    /// Link on a page or in a config field that is not a doc.
    #[must_use]
    pub fn page(source: &'a str) -> Self {
        Self {
            source,
            doc_id: None,
        }
    }

    /// Link inside a doc page.
    #[must_use]
    pub fn doc(source: &'a str, doc_id: &'a str) -> Self {
        Self {
            source,
            doc_id: Some(doc_id),
        }
    }
}

/// Resolves link targets against an immutable navigation tree.
///
/// Holds only shared references and `Copy` settings, so one resolver can be
/// used from many threads at once.
pub struct LinkResolver<'a> {
    tree: &'a NavigationTree,
    routes: HashSet<String>,
    policies: BrokenLinkPolicies,
    strictness: Strictness,
}

impl<'a> LinkResolver<'a> {
    #[must_use]
    pub fn new(
        tree: &'a NavigationTree,
        policies: BrokenLinkPolicies,
        strictness: Strictness,
    ) -> Self {
        Self {
            tree,
            routes: HashSet::new(),
            policies,
            strictness,
        }
    }

    /// Accept additional routes (custom pages) as link targets.
    #[must_use]
    pub fn with_routes(mut self, routes: impl IntoIterator<Item = String>) -> Self {
        self.routes
            .extend(routes.into_iter().map(|r| route::normalize(&r)));
        self
    }

    /// Resolve a link target.
    ///
    /// External targets are only checked for URL syntax. Unresolved
    /// internal targets are handled by the policy of their breakage class:
    /// `warn` records a warning and returns a marker; `throw` fails in
    /// strict mode and records an error with a marker in lenient mode.
    ///
    /// # Errors
    ///
    /// Returns `RouteError::BrokenLink` for an unresolved target under the
    /// `throw` policy in strict mode.
    pub fn resolve(
        &self,
        target: &LinkTarget,
        origin: &LinkOrigin<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<ResolvedPath, RouteError> {
        match target {
            LinkTarget::External(href) => {
                if url::Url::parse(href).is_ok() {
                    Ok(ResolvedPath::Resolved(href.clone()))
                } else {
                    self.broken(href, LinkKind::Doc, origin, diagnostics)
                }
            }
            LinkTarget::Internal(to) => {
                let (base, fragment) = match to.split_once('#') {
                    Some((base, fragment)) => (base, Some(fragment)),
                    None => (to.as_str(), None),
                };
                if base.is_empty() {
                    return match fragment {
                        Some(fragment) if !fragment.is_empty() => {
                            Ok(ResolvedPath::Resolved(to.clone()))
                        }
                        _ => self.broken(to, LinkKind::Doc, origin, diagnostics),
                    };
                }

                let (found, kind) = match strip_markdown_extension(base) {
                    Some(file) => (self.lookup_markdown(file, origin), LinkKind::Markdown),
                    None => (self.lookup(base), LinkKind::Doc),
                };

                match found {
                    Some(path) => Ok(ResolvedPath::Resolved(match fragment {
                        Some(fragment) => format!("{path}#{fragment}"),
                        None => path,
                    })),
                    None => self.broken(to, kind, origin, diagnostics),
                }
            }
        }
    }

    /// Look up a doc id or absolute route.
    fn lookup(&self, target: &str) -> Option<String> {
        if target.starts_with('/') {
            let path = route::normalize(target);
            if self.tree.get(&path).is_some() || self.routes.contains(&path) {
                return Some(path);
            }
            return None;
        }
        self.tree
            .doc(target)
            .map(|idx| self.tree.entry(idx).path.clone())
    }

    /// Look up a markdown file reference, relative to the linking doc.
    fn lookup_markdown(&self, file: &str, origin: &LinkOrigin<'_>) -> Option<String> {
        let id = if let Some(absolute) = file.strip_prefix('/') {
            route::resolve_relative("", absolute)?
        } else {
            let dir = origin.doc_id.map_or("", route::doc_dir);
            route::resolve_relative(dir, file)?
        };
        self.tree
            .doc(&id)
            .map(|idx| self.tree.entry(idx).path.clone())
    }

    fn broken(
        &self,
        target: &str,
        kind: LinkKind,
        origin: &LinkOrigin<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<ResolvedPath, RouteError> {
        let policy = match kind {
            LinkKind::Doc => self.policies.doc_links,
            LinkKind::Markdown => self.policies.markdown_links,
        };
        let message = format!("broken link: {target}");

        let severity = match (policy, self.strictness) {
            (LinkPolicy::Warn, _) => {
                diagnostics.warn(origin.source, message);
                Severity::Warning
            }
            (LinkPolicy::Throw, Strictness::Lenient) => {
                diagnostics.error(origin.source, message);
                Severity::Error
            }
            (LinkPolicy::Throw, Strictness::Strict) => {
                return Err(RouteError::BrokenLink {
                    target: target.to_owned(),
                    origin: origin.source.to_owned(),
                });
            }
        };

        Ok(ResolvedPath::Broken(BrokenLinkMarker {
            target: target.to_owned(),
            kind,
            severity,
        }))
    }
}

fn strip_markdown_extension(target: &str) -> Option<&str> {
    MARKDOWN_EXTENSIONS
        .iter()
        .find_map(|ext| target.strip_suffix(ext))
}
