//! Page composition from declarative sections.

use std::collections::HashSet;

use portal_config::{Diagnostics, LinkTarget, PageSection};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ComposeError;
use crate::links::{LinkOrigin, LinkResolver, ResolvedPath};

/// A section with its links resolved.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderedSection {
    pub id: String,
    pub kind: String,
    pub props: Map<String, Value>,
}

/// Ordered, render-ready sections of one page.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RenderTree {
    pub sections: Vec<RenderedSection>,
}

/// Assemble sections into a render tree, in the order given.
///
/// Section ids must be unique. A section may only require shared state
/// keys provided by an earlier section. Link objects in props (any table
/// with exactly one of `to` or `href`) are resolved and annotated with
/// `resolved: <path>` or `broken: true`.
///
/// # Errors
///
/// Returns `ComposeError::DuplicateSectionId`,
/// `ComposeError::UnknownSharedState`, or `ComposeError::Link` when a link
/// fails under the `throw` policy.
pub fn compose(
    sections: &[PageSection],
    resolver: &LinkResolver<'_>,
    origin: &LinkOrigin<'_>,
    diagnostics: &mut Diagnostics,
) -> Result<RenderTree, ComposeError> {
    let mut seen = HashSet::with_capacity(sections.len());
    for section in sections {
        if !seen.insert(section.section_id.as_str()) {
            return Err(ComposeError::DuplicateSectionId {
                section_id: section.section_id.clone(),
            });
        }
    }

    let mut provided: HashSet<&str> = HashSet::new();
    let mut rendered = Vec::with_capacity(sections.len());
    for section in sections {
        if let Some(key) = section
            .requires
            .iter()
            .find(|key| !provided.contains(key.as_str()))
        {
            return Err(ComposeError::UnknownSharedState {
                section_id: section.section_id.clone(),
                key: key.clone(),
            });
        }
        provided.extend(section.provides.iter().map(String::as_str));

        let mut props = section.props.clone();
        for value in props.values_mut() {
            resolve_links(value, resolver, origin, diagnostics).map_err(|source| {
                ComposeError::Link {
                    section_id: section.section_id.clone(),
                    source,
                }
            })?;
        }

        rendered.push(RenderedSection {
            id: section.section_id.clone(),
            kind: section.kind.clone(),
            props,
        });
    }

    Ok(RenderTree { sections: rendered })
}

fn resolve_links(
    value: &mut Value,
    resolver: &LinkResolver<'_>,
    origin: &LinkOrigin<'_>,
    diagnostics: &mut Diagnostics,
) -> Result<(), crate::RouteError> {
    match value {
        Value::Object(map) => {
            if let Some(target) = link_target(map) {
                match resolver.resolve(&target, origin, diagnostics)? {
                    ResolvedPath::Resolved(path) => {
                        map.insert("resolved".to_owned(), Value::String(path));
                    }
                    ResolvedPath::Broken(_) => {
                        map.insert("broken".to_owned(), Value::Bool(true));
                    }
                }
                return Ok(());
            }
            for child in map.values_mut() {
                resolve_links(child, resolver, origin, diagnostics)?;
            }
        }
        Value::Array(items) => {
            for item in items {
                resolve_links(item, resolver, origin, diagnostics)?;
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
    Ok(())
}

/// The target of a link object, if `map` is one.
fn link_target(map: &Map<String, Value>) -> Option<LinkTarget> {
    match (map.get("to"), map.get("href")) {
        (Some(Value::String(to)), None) => Some(LinkTarget::Internal(to.clone())),
        (None, Some(Value::String(href))) => Some(LinkTarget::External(href.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::NavigationTree;
    use portal_config::{BrokenLinkPolicies, LinkPolicy, Sidebar, SidebarItem, Strictness};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tree() -> NavigationTree {
        NavigationTree::from_sidebars(
            &[Sidebar {
                name: "docs".to_owned(),
                items: vec![
                    SidebarItem::doc("getting-started/quickstart"),
                    SidebarItem::doc("api-reference/overview"),
                ],
            }],
            "/",
        )
        .unwrap()
    }

    fn run(sections: &[PageSection]) -> Result<RenderTree, ComposeError> {
        let tree = tree();
        let resolver = LinkResolver::new(&tree, BrokenLinkPolicies::default(), Strictness::Strict);
        compose(
            sections,
            &resolver,
            &LinkOrigin::page("/"),
            &mut Diagnostics::new(),
        )
    }

    #[test]
    fn test_compose_keeps_order() {
        let sections = vec![
            PageSection::new("hero", "hero"),
            PageSection::new("why-choose", "why"),
            PageSection::new("code-comparison", "comparison"),
            PageSection::new("final-cta", "cta"),
        ];

        let tree = run(&sections).unwrap();

        let ids: Vec<_> = tree.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["hero", "why", "comparison", "cta"]);
    }

    #[test]
    fn test_compose_empty_page() {
        assert_eq!(run(&[]).unwrap(), RenderTree::default());
    }

    #[test]
    fn test_duplicate_section_id() {
        let sections = vec![
            PageSection::new("hero", "top"),
            PageSection::new("final-cta", "top"),
        ];

        let err = run(&sections).unwrap_err();

        assert!(matches!(err, ComposeError::DuplicateSectionId { ref section_id } if section_id == "top"));
    }

    #[test]
    fn test_requires_earlier_provider() {
        let sections = vec![
            PageSection::new("hero", "hero").providing("install-command"),
            PageSection::new("final-cta", "cta").requiring("install-command"),
        ];

        assert!(run(&sections).is_ok());
    }

    #[test]
    fn test_requires_later_provider_fails() {
        let sections = vec![
            PageSection::new("final-cta", "cta").requiring("install-command"),
            PageSection::new("hero", "hero").providing("install-command"),
        ];

        let err = run(&sections).unwrap_err();

        assert!(
            matches!(err, ComposeError::UnknownSharedState { ref section_id, ref key } if section_id == "cta" && key == "install-command")
        );
    }

    #[test]
    fn test_duplicate_id_checked_before_shared_state() {
        let sections = vec![
            PageSection::new("a", "x").requiring("missing"),
            PageSection::new("b", "x"),
        ];

        assert!(matches!(
            run(&sections).unwrap_err(),
            ComposeError::DuplicateSectionId { .. }
        ));
    }

    #[test]
    fn test_links_in_props_resolved() {
        let sections = vec![
            PageSection::new("hero", "hero")
                .with_prop(
                    "buttons",
                    json!([
                        {"label": "Get Started", "to": "/getting-started/quickstart"},
                        {"label": "API", "to": "api-reference/overview"},
                        {"label": "GitHub", "href": "https://github.com/lucocozz/argus"},
                    ]),
                )
                .with_prop("title", json!("Modern C argument parsing")),
        ];

        let tree = run(&sections).unwrap();

        let props = &tree.sections[0].props;
        assert_eq!(props["buttons"][0]["resolved"], "/getting-started/quickstart");
        assert_eq!(props["buttons"][1]["resolved"], "/api-reference/overview");
        assert_eq!(props["buttons"][2]["resolved"], "https://github.com/lucocozz/argus");
        assert_eq!(props["title"], "Modern C argument parsing");
    }

    #[test]
    fn test_broken_link_in_props_fails_under_throw() {
        let sections =
            vec![PageSection::new("hero", "hero").with_prop("cta", json!({"to": "/missing"}))];

        let err = run(&sections).unwrap_err();

        assert!(matches!(err, ComposeError::Link { ref section_id, .. } if section_id == "hero"));
    }

    #[test]
    fn test_broken_link_in_props_marked_under_warn() {
        let tree = tree();
        let policies = BrokenLinkPolicies {
            doc_links: LinkPolicy::Warn,
            markdown_links: LinkPolicy::Warn,
        };
        let resolver = LinkResolver::new(&tree, policies, Strictness::Strict);
        let sections =
            vec![PageSection::new("hero", "hero").with_prop("cta", json!({"to": "/missing"}))];
        let mut diagnostics = Diagnostics::new();

        let rendered = compose(&sections, &resolver, &LinkOrigin::page("/"), &mut diagnostics).unwrap();

        assert_eq!(rendered.sections[0].props["cta"]["broken"], true);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_object_with_both_keys_left_alone() {
        let sections = vec![
            PageSection::new("hero", "hero")
                .with_prop("odd", json!({"to": "/missing", "href": "also"})),
        ];

        let tree = run(&sections).unwrap();

        assert_eq!(tree.sections[0].props["odd"], json!({"to": "/missing", "href": "also"}));
    }
}
