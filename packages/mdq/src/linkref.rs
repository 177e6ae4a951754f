//! Link-reference parsing and canonicalization.

use crate::node::{escape_title, unescape_title, Node};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Matches the skeleton of a `[ref]: ...` line: the label and everything
/// after the colon. The url/title split of the remainder is done by hand
/// below, since the title may contain arbitrary characters and whitespace
/// that a single regex can't unambiguously separate from the url.
static LINK_REF_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[([^\]]+)\]:(.*)$").unwrap());

/// Parses a single line as a `[ref]: url "title"` link reference. Returns
/// `None` if the line doesn't match the grammar at all, in which case the
/// caller should treat the line as ordinary paragraph text; this is never
/// a hard parse error.
pub fn parse_link_ref_line(line: &str) -> Option<Node> {
    let caps = LINK_REF_LINE.captures(line)?;
    let link_ref = caps[1].to_string();
    let rest = caps[2].trim_start();

    let (url_part, title_part) = if let Some(quote_start) = rest.find('"') {
        // Only treat the quote as a title opener if everything before it is
        // the (possibly absent) url, and a closing quote exists at the very
        // end (allowing trailing whitespace).
        let before = &rest[..quote_start];
        let after_trimmed = rest[quote_start..].trim_end();
        if after_trimmed.len() >= 2 && after_trimmed.ends_with('"') {
            (before.trim_end(), Some(&after_trimmed[1..after_trimmed.len() - 1]))
        } else {
            (rest.trim_end(), None)
        }
    } else {
        (rest.trim_end(), None)
    };

    let url = if url_part.is_empty() {
        None
    } else {
        Some(url_part.to_string())
    };
    let title = title_part.filter(|t| !t.is_empty()).map(unescape_title);

    Some(Node::LinkRef { link_ref, url, title })
}

/// Re-serializes a single `LinkRef` node's url/title into their escaped
/// textual forms. Exposed for callers building `LinkRef` nodes directly.
pub fn format_title(title: &str) -> String {
    escape_title(title)
}

/// Canonicalizes a list of `LinkRef` nodes: dedup by `link_ref` (last
/// occurrence wins), sorted ascending by `link_ref`. When `sort` is
/// `false`, the original order and any duplicates are preserved verbatim.
pub fn canonicalize_link_refs(link_refs: Vec<Node>, sort: bool) -> Vec<Node> {
    if !sort {
        return link_refs;
    }

    let mut by_ref: HashMap<String, Node> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for node in link_refs {
        let Node::LinkRef { link_ref, .. } = &node else {
            continue;
        };
        if !by_ref.contains_key(link_ref) {
            order.push(link_ref.clone());
        }
        by_ref.insert(link_ref.clone(), node);
    }

    let mut refs: Vec<String> = order;
    refs.sort();
    refs.into_iter()
        .map(|r| by_ref.remove(&r).unwrap())
        .collect()
}
