//! Navigation, link resolution and page composition for Portal.
//!
//! This crate provides:
//! - [`NavigationTree`]: immutable tree of routes built from sidebars
//! - [`LinkResolver`]: link target resolution with broken-link policies
//! - [`compose`]: ordered assembly of page sections
//! - [`build_site`]: the full build producing a [`RouteManifest`]
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use portal_config::ProjectConfig;
//! use portal_site::build_site;
//!
//! let project = ProjectConfig::load(None, None)?;
//! let manifest = build_site(&project.config)?;
//! println!("{}", manifest.to_json()?);
//! # Ok(())
//! # }
//! ```

mod compose;
mod error;
mod links;
mod navigation;
pub mod route;
mod site;

pub use compose::{RenderTree, RenderedSection, compose};
pub use error::{BuildError, ComposeError, RouteError};
pub use links::{BrokenLinkMarker, LinkKind, LinkOrigin, LinkResolver, ResolvedPath};
pub use navigation::{
    Breadcrumb, NavigationEntry, NavigationNode, NavigationTree, NodeKind, PageLink, TreeBuilder,
    build,
};
pub use site::{
    PageDescriptor, PageKind, ResolvedFooterGroup, ResolvedNavLink, RouteManifest, SidebarManifest,
    SiteInfo, build_site,
};
