//! Route path helpers.
//!
//! Routes are absolute, `/`-separated, without a trailing slash (the root
//! route is `/`).

/// Normalize a route: leading slash, no empty segments, no trailing slash.
#[must_use]
pub fn normalize(path: &str) -> String {
    let mut result = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        result.push('/');
        result.push_str(segment);
    }
    if result.is_empty() {
        result.push('/');
    }
    result
}

/// Append a relative segment (or several) to a route.
#[must_use]
pub fn join(base: &str, segment: &str) -> String {
    normalize(&format!("{base}/{segment}"))
}

/// Convert text to a URL-safe slug.
///
/// Keeps lowercase ASCII alphanumerics; runs of whitespace, `-` and `_`
/// collapse into one dash; everything else (emoji included) is dropped.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Title-cased label from the last segment of a doc id.
///
/// `getting-started/quick_start` becomes `Quick Start`.
#[must_use]
pub fn label_from_id(id: &str) -> String {
    let slug = id.rsplit('/').next().unwrap_or(id);
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

/// Directory part of a doc id (`api/overview` → `api`, `intro` → ``).
#[must_use]
pub fn doc_dir(id: &str) -> &str {
    id.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Resolve a relative file reference against a directory.
///
/// Handles `.` and `..` segments. Returns `None` when the reference climbs
/// above the docs root.
#[must_use]
pub fn resolve_relative(dir: &str, reference: &str) -> Option<String> {
    let mut segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in reference.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    Some(segments.join("/"))
}
