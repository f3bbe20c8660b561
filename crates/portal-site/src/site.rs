//! Site build: from validated configuration to route manifest.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use portal_config::{
    Diagnostics, FooterStyle, I18nConfig, NavLink, PageSection, Position, ThemeConfig,
    ValidatedConfig,
};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::json;

use crate::compose::{RenderTree, compose};
use crate::error::{BuildError, RouteError};
use crate::links::{LinkOrigin, LinkResolver, ResolvedPath};
use crate::navigation::{Breadcrumb, NavigationNode, NavigationTree, NodeKind, PageLink};
use crate::route;

/// Kind of page behind a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Doc,
    Category,
    Custom,
}

/// Everything the rendering engine needs to render one route.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    pub kind: PageKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_url: Option<String>,
    pub breadcrumbs: Vec<Breadcrumb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
    pub sections: RenderTree,
}

/// Navbar or footer link after resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedNavLink {
    pub label: String,
    /// Target as configured.
    pub target: String,
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub broken: bool,
}

/// Footer column after resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedFooterGroup {
    pub title: String,
    pub links: Vec<ResolvedNavLink>,
}

/// Site-level settings passed through to the rendering engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    pub show_last_update_time: bool,
    pub show_last_update_author: bool,
    pub footer_style: FooterStyle,
    pub i18n: I18nConfig,
}

/// Resolved tree of one sidebar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarManifest {
    pub name: String,
    pub root: NavigationNode,
}

/// Fully resolved output of a build.
#[derive(Clone, Debug, Serialize)]
pub struct RouteManifest {
    pub site: SiteInfo,
    pub theme: ThemeConfig,
    pub navbar: Vec<ResolvedNavLink>,
    pub footer: Vec<ResolvedFooterGroup>,
    pub sidebars: Vec<SidebarManifest>,
    /// Page descriptors keyed by route, sorted.
    pub routes: BTreeMap<String, PageDescriptor>,
    pub diagnostics: Diagnostics,
}

impl RouteManifest {
    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// One page to compose.
enum PageJob<'a> {
    Node(usize),
    Custom(&'a portal_config::PageConfig),
}

/// Build the route manifest for a validated configuration.
///
/// Builds the navigation tree and theme once, then composes every page in
/// parallel against them. The first fatal error aborts the build; in
/// lenient mode recoverable problems end up in
/// [`RouteManifest::diagnostics`].
///
/// # Errors
///
/// Returns `BuildError::Config` for theme merge failures,
/// `BuildError::Route` for duplicate routes or broken theme links, and
/// `BuildError::Compose` for a page that fails to compose.
pub fn build_site(config: &ValidatedConfig) -> Result<RouteManifest, BuildError> {
    let site = &config.site;
    let mut diagnostics = config.diagnostics.clone();

    let theme = config.resolve_theme(&mut diagnostics)?;
    let tree = NavigationTree::from_sidebars(&config.sidebars, &site.route_base_path)?;

    let mut custom_paths = Vec::with_capacity(config.pages.len());
    for page in &config.pages {
        let path = route::normalize(&page.path);
        if tree.get(&path).is_some() || custom_paths.contains(&path) {
            return Err(RouteError::DuplicateRoute {
                id: page.path.clone(),
                path,
            }
            .into());
        }
        custom_paths.push(path);
    }

    let resolver = LinkResolver::new(&tree, site.links, site.strictness)
        .with_routes(custom_paths.iter().cloned());

    let navbar = resolve_nav_links(&theme.navbar_items, "theme.navbar_items", &resolver, &mut diagnostics)?;
    let footer = theme
        .footer_groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let field = format!("theme.footer_groups[{i}].links");
            Ok(ResolvedFooterGroup {
                title: group.title.clone(),
                links: resolve_nav_links(&group.links, &field, &resolver, &mut diagnostics)?,
            })
        })
        .collect::<Result<Vec<_>, RouteError>>()?;

    let jobs: Vec<PageJob<'_>> = tree
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.kind != NodeKind::Root)
        .map(|(idx, _)| PageJob::Node(idx))
        .chain(config.pages.iter().map(PageJob::Custom))
        .collect();

    let pages: Vec<(String, PageDescriptor, Diagnostics)> = jobs
        .par_iter()
        .map(|job| match job {
            PageJob::Node(idx) => compose_node(&tree, *idx, config, &resolver),
            PageJob::Custom(page) => compose_custom(page, config, &resolver),
        })
        .collect::<Result<_, _>>()?;

    let mut routes = BTreeMap::new();
    for (path, descriptor, page_diagnostics) in pages {
        diagnostics.extend(page_diagnostics);
        match routes.entry(path) {
            Entry::Vacant(slot) => {
                slot.insert(descriptor);
            }
            Entry::Occupied(slot) => {
                return Err(RouteError::DuplicateRoute {
                    id: descriptor.doc_id.unwrap_or(descriptor.title),
                    path: slot.key().clone(),
                }
                .into());
            }
        }
    }

    let sidebars = tree
        .roots()
        .iter()
        .map(|&root| SidebarManifest {
            name: tree.entry(root).sidebar.clone(),
            root: tree.node(root),
        })
        .collect();

    tracing::info!(
        routes = routes.len(),
        warnings = diagnostics.count(portal_config::Severity::Warning),
        errors = diagnostics.count(portal_config::Severity::Error),
        "Built route manifest"
    );

    Ok(RouteManifest {
        site: SiteInfo {
            title: site.title.clone(),
            tagline: site.tagline.clone(),
            url: site.url.clone(),
            base_url: site.base_url.clone(),
            favicon: site.favicon.clone(),
            show_last_update_time: site.show_last_update_time,
            show_last_update_author: site.show_last_update_author,
            footer_style: theme.footer_style,
            i18n: site.i18n.clone(),
        },
        theme,
        navbar,
        footer,
        sidebars,
        routes,
        diagnostics,
    })
}

fn resolve_nav_links(
    links: &[NavLink],
    field: &str,
    resolver: &LinkResolver<'_>,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<ResolvedNavLink>, RouteError> {
    links
        .iter()
        .enumerate()
        .map(|(i, link)| {
            let source = format!("{field}[{i}]");
            let resolved = resolver.resolve(&link.target, &LinkOrigin::page(&source), diagnostics)?;
            Ok(ResolvedNavLink {
                label: link.label.clone(),
                target: link.target.as_str().to_owned(),
                position: link.position,
                broken: resolved.is_broken(),
                resolved: resolved.path().map(str::to_owned),
            })
        })
        .collect()
}

/// Compose the page of a category or doc node.
fn compose_node(
    tree: &NavigationTree,
    idx: usize,
    config: &ValidatedConfig,
    resolver: &LinkResolver<'_>,
) -> Result<(String, PageDescriptor, Diagnostics), BuildError> {
    let entry = tree.entry(idx);
    let mut diagnostics = Diagnostics::new();

    let (kind, sections, origin) = match entry.kind {
        NodeKind::Doc => (
            PageKind::Doc,
            vec![PageSection::new("doc", "content").with_prop("id", json!(entry.id))],
            LinkOrigin::doc(&entry.path, &entry.id),
        ),
        NodeKind::Category | NodeKind::Root => {
            let items: Vec<_> = tree
                .children(idx)
                .iter()
                .map(|&c| {
                    let child = tree.entry(c);
                    json!({"label": child.label, "to": child.path})
                })
                .collect();
            (
                PageKind::Category,
                vec![PageSection::new("generated-index", "index").with_prop("items", json!(items))],
                LinkOrigin::page(&entry.path),
            )
        }
    };

    let rendered = compose(&sections, resolver, &origin, &mut diagnostics).map_err(|source| {
        BuildError::Compose {
            path: entry.path.clone(),
            source,
        }
    })?;

    let is_doc = kind == PageKind::Doc;
    let edit_url = config
        .site
        .edit_url
        .as_ref()
        .filter(|_| is_doc)
        .map(|base| format!("{}/{}.md", base.trim_end_matches('/'), entry.id));

    let descriptor = PageDescriptor {
        kind,
        title: entry.label.clone(),
        sidebar: Some(entry.sidebar.clone()),
        doc_id: is_doc.then(|| entry.id.clone()),
        edit_url,
        breadcrumbs: tree.breadcrumbs(idx),
        previous: tree.previous(idx),
        next: tree.next(idx),
        sections: rendered,
    };

    tracing::debug!(path = %entry.path, "Composed page");
    Ok((entry.path.clone(), descriptor, diagnostics))
}

/// Compose a custom page from its configured sections.
fn compose_custom(
    page: &portal_config::PageConfig,
    config: &ValidatedConfig,
    resolver: &LinkResolver<'_>,
) -> Result<(String, PageDescriptor, Diagnostics), BuildError> {
    let path = route::normalize(&page.path);
    let mut diagnostics = Diagnostics::new();

    let rendered = compose(
        &page.sections,
        resolver,
        &LinkOrigin::page(&path),
        &mut diagnostics,
    )
    .map_err(|source| BuildError::Compose {
        path: path.clone(),
        source,
    })?;

    let descriptor = PageDescriptor {
        kind: PageKind::Custom,
        title: page
            .title
            .clone()
            .unwrap_or_else(|| config.site.title.clone()),
        sidebar: None,
        doc_id: None,
        edit_url: None,
        breadcrumbs: Vec::new(),
        previous: None,
        next: None,
        sections: rendered,
    };

    tracing::debug!(path = %path, "Composed custom page");
    Ok((path, descriptor, diagnostics))
}
