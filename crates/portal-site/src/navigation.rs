//! Navigation tree built from sidebar descriptions.
//!
//! # Architecture
//!
//! Nodes of every sidebar are stored in one flat `Vec` in pre-order, with
//! parent/children relationships tracked by indices:
//! - O(1) route lookups via `path_index`
//! - O(1) doc id lookups via `doc_index`
//! - O(d) breadcrumb building where d is the node depth
//!
//! The nested [`NavigationNode`] form is produced on demand for output.
//! A tree is never mutated after [`TreeBuilder::build`]; a changed sidebar
//! means building a new tree.

use std::collections::HashMap;

use portal_config::{Sidebar, SidebarItem};
use serde::Serialize;

use crate::error::RouteError;
use crate::route;

/// What a navigation node stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Synthetic root of a sidebar.
    Root,
    Category,
    Doc,
}

/// One node of the navigation tree, without its children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationEntry {
    /// Doc id for docs, route for categories, sidebar name for roots.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Canonical route.
    pub path: String,
    pub kind: NodeKind,
    /// Name of the sidebar the node belongs to.
    pub sidebar: String,
    /// Whether a category starts collapsed.
    pub collapsed: bool,
    /// Pre-order position within the sidebar (root = 0).
    pub order: usize,
}

/// Nested navigation node for output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavigationNode {
    pub id: String,
    pub label: String,
    pub path: String,
    pub kind: NodeKind,
    pub sidebar: String,
    pub collapsed: bool,
    pub order: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavigationNode>,
}

/// Ancestor link shown above a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub path: String,
}

/// Link to an adjacent doc page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub title: String,
    pub path: String,
}

/// Immutable navigation tree over all sidebars.
#[derive(Debug)]
pub struct NavigationTree {
    nodes: Vec<NavigationEntry>,
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
    roots: Vec<usize>,
    path_index: HashMap<String, usize>,
    doc_index: HashMap<String, usize>,
    /// Doc nodes of each sidebar in display order, parallel to `roots`.
    doc_sequences: Vec<Vec<usize>>,
    /// Position of each doc node within its sidebar's sequence.
    sequence_positions: Vec<Option<usize>>,
}

impl NavigationTree {
    /// Build one tree covering all sidebars.
    ///
    /// Doc ids and routes must be unique across every sidebar.
    ///
    /// # Errors
    ///
    /// Returns `RouteError::DuplicateRoute` on a repeated doc id or route and
    /// `RouteError::EmptyCategory` for a category without items.
    pub fn from_sidebars(sidebars: &[Sidebar], base_path: &str) -> Result<Self, RouteError> {
        let mut builder = TreeBuilder::new(base_path);
        for sidebar in sidebars {
            builder.add_sidebar(&sidebar.name, &sidebar.items)?;
        }
        Ok(builder.build())
    }

    /// Look up a node by route.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<usize> {
        self.path_index.get(path).copied()
    }

    /// Look up a doc node by doc id.
    #[must_use]
    pub fn doc(&self, id: &str) -> Option<usize> {
        self.doc_index.get(id).copied()
    }

    #[must_use]
    pub fn entry(&self, idx: usize) -> &NavigationEntry {
        &self.nodes[idx]
    }

    /// All nodes in pre-order, sidebar by sidebar.
    #[must_use]
    pub fn entries(&self) -> &[NavigationEntry] {
        &self.nodes
    }

    /// Child indices of a node in display order.
    #[must_use]
    pub fn children(&self, idx: usize) -> &[usize] {
        &self.children[idx]
    }

    /// Root node indices, one per sidebar.
    #[must_use]
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Number of nodes excluding the synthetic roots.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.path_index.len()
    }

    /// Nested form of the subtree rooted at `idx`.
    #[must_use]
    pub fn node(&self, idx: usize) -> NavigationNode {
        let entry = &self.nodes[idx];
        NavigationNode {
            id: entry.id.clone(),
            label: entry.label.clone(),
            path: entry.path.clone(),
            kind: entry.kind,
            sidebar: entry.sidebar.clone(),
            collapsed: entry.collapsed,
            order: entry.order,
            children: self.children[idx].iter().map(|&c| self.node(c)).collect(),
        }
    }

    /// Ancestor categories of a node, outermost first.
    ///
    /// The sidebar root and the node itself are excluded.
    #[must_use]
    pub fn breadcrumbs(&self, idx: usize) -> Vec<Breadcrumb> {
        let mut breadcrumbs = Vec::new();
        let mut current = self.parents[idx];
        while let Some(i) = current {
            if self.nodes[i].kind == NodeKind::Root {
                break;
            }
            breadcrumbs.push(Breadcrumb {
                label: self.nodes[i].label.clone(),
                path: self.nodes[i].path.clone(),
            });
            current = self.parents[i];
        }
        breadcrumbs.reverse();
        breadcrumbs
    }

    /// Previous doc page of the same sidebar in display order.
    #[must_use]
    pub fn previous(&self, idx: usize) -> Option<PageLink> {
        let position = self.sequence_positions[idx]?;
        let sequence = self.sequence_of(idx)?;
        position
            .checked_sub(1)
            .and_then(|p| sequence.get(p))
            .map(|&i| self.page_link(i))
    }

    /// Next doc page of the same sidebar in display order.
    #[must_use]
    pub fn next(&self, idx: usize) -> Option<PageLink> {
        let position = self.sequence_positions[idx]?;
        let sequence = self.sequence_of(idx)?;
        sequence.get(position + 1).map(|&i| self.page_link(i))
    }

    fn sequence_of(&self, idx: usize) -> Option<&Vec<usize>> {
        let mut root = idx;
        while let Some(parent) = self.parents[root] {
            root = parent;
        }
        let sidebar = self.roots.iter().position(|&r| r == root)?;
        self.doc_sequences.get(sidebar)
    }

    fn page_link(&self, idx: usize) -> PageLink {
        PageLink {
            title: self.nodes[idx].label.clone(),
            path: self.nodes[idx].path.clone(),
        }
    }
}

/// Build the tree for a single item list and return its synthetic root.
///
/// # Errors
///
/// Same as [`NavigationTree::from_sidebars`].
pub fn build(items: &[SidebarItem], base_path: &str) -> Result<NavigationNode, RouteError> {
    let mut builder = TreeBuilder::new(base_path);
    let root = builder.add_sidebar("", items)?;
    Ok(builder.build().node(root))
}

/// Builder for [`NavigationTree`].
pub struct TreeBuilder {
    base_path: String,
    nodes: Vec<NavigationEntry>,
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
    roots: Vec<usize>,
    path_index: HashMap<String, usize>,
    doc_index: HashMap<String, usize>,
    doc_sequences: Vec<Vec<usize>>,
}

impl TreeBuilder {
    /// Create a builder. Top-level nodes are placed under `base_path`.
    #[must_use]
    pub fn new(base_path: &str) -> Self {
        Self {
            base_path: route::normalize(base_path),
            nodes: Vec::new(),
            children: Vec::new(),
            parents: Vec::new(),
            roots: Vec::new(),
            path_index: HashMap::new(),
            doc_index: HashMap::new(),
            doc_sequences: Vec::new(),
        }
    }

    /// Add a sidebar, depth-first, preserving item order.
    ///
    /// Returns the index of the sidebar's root node.
    ///
    /// # Errors
    ///
    /// Returns `RouteError::DuplicateRoute` if a doc id or route already
    /// exists in this builder, `RouteError::EmptyCategory` for a category
    /// without items.
    pub fn add_sidebar(&mut self, name: &str, items: &[SidebarItem]) -> Result<usize, RouteError> {
        let root = self.push(
            NavigationEntry {
                id: name.to_owned(),
                label: name.to_owned(),
                path: self.base_path.clone(),
                kind: NodeKind::Root,
                sidebar: name.to_owned(),
                collapsed: false,
                order: 0,
            },
            None,
        );
        self.roots.push(root);
        self.doc_sequences.push(Vec::new());

        let base_path = self.base_path.clone();
        self.add_items(items, root, &base_path, name, root)?;

        tracing::debug!(
            sidebar = name,
            nodes = self.nodes.len() - root,
            "Built navigation tree"
        );
        Ok(root)
    }

    fn add_items(
        &mut self,
        items: &[SidebarItem],
        parent: usize,
        parent_path: &str,
        sidebar: &str,
        root: usize,
    ) -> Result<(), RouteError> {
        for item in items {
            let order = self.nodes.len() - root;
            match item {
                SidebarItem::Doc(doc) => {
                    let path = match &doc.route {
                        Some(route) => route::normalize(route),
                        None => route::join(&self.base_path, &doc.id),
                    };
                    if self.doc_index.contains_key(&doc.id) {
                        return Err(RouteError::DuplicateRoute {
                            id: doc.id.clone(),
                            path,
                        });
                    }
                    self.claim_path(&path, &doc.id)?;

                    let idx = self.push(
                        NavigationEntry {
                            id: doc.id.clone(),
                            label: doc
                                .label
                                .clone()
                                .unwrap_or_else(|| route::label_from_id(&doc.id)),
                            path,
                            kind: NodeKind::Doc,
                            sidebar: sidebar.to_owned(),
                            collapsed: false,
                            order,
                        },
                        Some(parent),
                    );
                    self.doc_index.insert(doc.id.clone(), idx);
                    if let Some(sequence) = self.doc_sequences.last_mut() {
                        sequence.push(idx);
                    }
                }
                SidebarItem::Category(category) => {
                    let slug = category
                        .slug
                        .clone()
                        .unwrap_or_else(|| route::slugify(&category.label));
                    let path = route::join(parent_path, &slug);
                    if category.items.is_empty() {
                        return Err(RouteError::EmptyCategory {
                            label: category.label.clone(),
                            path,
                        });
                    }
                    self.claim_path(&path, &category.label)?;

                    let idx = self.push(
                        NavigationEntry {
                            id: path.clone(),
                            label: category.label.clone(),
                            path: path.clone(),
                            kind: NodeKind::Category,
                            sidebar: sidebar.to_owned(),
                            collapsed: category.collapsed.unwrap_or(false),
                            order,
                        },
                        Some(parent),
                    );
                    self.add_items(&category.items, idx, &path, sidebar, root)?;
                }
            }
        }
        Ok(())
    }

    /// Reserve a route, failing if another node already holds it.
    ///
    /// The base path belongs to the sidebar roots and is never claimable.
    fn claim_path(&mut self, path: &str, id: &str) -> Result<(), RouteError> {
        if path == self.base_path || self.path_index.contains_key(path) {
            return Err(RouteError::DuplicateRoute {
                id: id.to_owned(),
                path: path.to_owned(),
            });
        }
        // The node is pushed right after, at this index.
        self.path_index.insert(path.to_owned(), self.nodes.len());
        Ok(())
    }

    fn push(&mut self, entry: NavigationEntry, parent: Option<usize>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(entry);
        self.children.push(Vec::new());
        self.parents.push(parent);
        if let Some(parent) = parent {
            self.children[parent].push(idx);
        }
        idx
    }

    /// Build the [`NavigationTree`].
    #[must_use]
    pub fn build(self) -> NavigationTree {
        let mut sequence_positions = vec![None; self.nodes.len()];
        for sequence in &self.doc_sequences {
            for (position, &idx) in sequence.iter().enumerate() {
                sequence_positions[idx] = Some(position);
            }
        }

        NavigationTree {
            nodes: self.nodes,
            children: self.children,
            parents: self.parents,
            roots: self.roots,
            path_index: self.path_index,
            doc_index: self.doc_index,
            doc_sequences: self.doc_sequences,
            sequence_positions,
        }
    }
}
