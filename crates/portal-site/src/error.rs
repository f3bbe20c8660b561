//! Error types for navigation, link resolution and composition.

use portal_config::ConfigError;

/// Structural route error.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// Doc id or route path claimed twice.
    #[error("Duplicate route: {id} ({path})")]
    DuplicateRoute {
        /// Doc id, category label or page path.
        id: String,
        /// The contested route.
        path: String,
    },
    /// Internal link target that does not resolve, under the `throw` policy.
    #[error("Broken link in {origin}: {target}")]
    BrokenLink {
        /// Target as written.
        target: String,
        /// Page path or config field the link appears in.
        origin: String,
    },
    /// Category without children.
    #[error("Category {label} at {path} has no items")]
    EmptyCategory {
        /// Category label.
        label: String,
        /// Category route.
        path: String,
    },
}

/// Page composition error. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// Section reads a shared state key no earlier section provides.
    #[error("Section {section_id} requires unknown shared state: {key}")]
    UnknownSharedState {
        /// Offending section.
        section_id: String,
        /// Missing key.
        key: String,
    },
    /// Two sections share an id.
    #[error("Duplicate section id: {section_id}")]
    DuplicateSectionId {
        /// Repeated id.
        section_id: String,
    },
    /// Link inside a section's props failed to resolve.
    #[error("Section {section_id}: {source}")]
    Link {
        /// Section containing the link.
        section_id: String,
        /// Underlying route error.
        #[source]
        source: RouteError,
    },
}

/// Site build error.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Route(#[from] RouteError),
    /// Page failed to compose.
    #[error("Failed to compose {path}: {source}")]
    Compose {
        /// Route of the page.
        path: String,
        #[source]
        source: ComposeError,
    },
}
