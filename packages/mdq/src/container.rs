//! Structural traversal and rewriting over `Node` trees.
//!
//! Every operation here is pure: it consumes (or borrows) a list of
//! children and returns a new, rewritten list, rebuilding `Vec<Node>`
//! wholesale rather than mutating individual elements in place.

use crate::node::Node;

/// Maps each `(Option<&child>, index)` position — including one synthetic
/// `(None, children.len())` position at the end, so callers can append — to
/// a replacement sequence. When `filter` is `true`, positions for which `f`
/// returns `None` are dropped from the output; otherwise the original child
/// (if any) is kept unchanged.
pub fn replace_in(
    children: &[Node],
    filter: bool,
    mut f: impl FnMut(Option<&Node>, usize) -> Option<Vec<Node>>,
) -> Vec<Node> {
    let mut out = Vec::with_capacity(children.len());
    for (i, child) in children.iter().enumerate() {
        match f(Some(child), i) {
            Some(replacement) => out.extend(replacement),
            None if !filter => out.push(child.clone()),
            None => {}
        }
    }
    if let Some(appended) = f(None, children.len()) {
        out.extend(appended);
    }
    out
}

/// Finds the first child for which `f` is defined and splices its result in
/// place. If nothing matches, `if_not_found` is optionally appended (or, if
/// `replace` is `true`, used to replace the entire child list), and the
/// search is retried once — matching against the appended fallback is
/// allowed.
pub fn flat_map_first_in(
    children: &[Node],
    if_not_found: Option<Vec<Node>>,
    replace: bool,
    mut f: impl FnMut(&Node) -> Option<Vec<Node>>,
) -> Vec<Node> {
    if let Some(result) = splice_first(children, &mut f) {
        return result;
    }

    let fallback_children: Vec<Node> = match (if_not_found, replace) {
        (Some(fallback), true) => fallback,
        (Some(fallback), false) => {
            let mut combined = children.to_vec();
            combined.extend(fallback);
            combined
        }
        (None, _) => return children.to_vec(),
    };

    splice_first(&fallback_children, &mut f).unwrap_or(fallback_children)
}

fn splice_first(
    children: &[Node],
    f: &mut impl FnMut(&Node) -> Option<Vec<Node>>,
) -> Option<Vec<Node>> {
    for (i, child) in children.iter().enumerate() {
        if let Some(replacement) = f(child) {
            let mut out = Vec::with_capacity(children.len() + replacement.len());
            out.extend_from_slice(&children[..i]);
            out.extend(replacement);
            out.extend_from_slice(&children[i + 1..]);
            return Some(out);
        }
    }
    None
}

/// As [`flat_map_first_in`], but `f` produces a single replacement node
/// rather than a sequence.
pub fn map_first_in(
    children: &[Node],
    if_not_found: Option<Node>,
    replace: bool,
    mut f: impl FnMut(&Node) -> Option<Node>,
) -> Vec<Node> {
    flat_map_first_in(
        children,
        if_not_found.map(|n| vec![n]),
        replace,
        |child| f(child).map(|n| vec![n]),
    )
}

/// Pre-order depth-first search: tests the current node, then its children,
/// returning the first defined result.
pub fn collect_first_recursive<T>(node: &Node, f: &impl Fn(&Node) -> Option<T>) -> Option<T> {
    if let Some(found) = f(node) {
        return Some(found);
    }
    for child in node.children().unwrap_or(&[]) {
        if let Some(found) = collect_first_recursive(child, f) {
            return Some(found);
        }
    }
    None
}

/// Top-down rewrite: for each child of `node`, if `f` matches it, the child
/// is substituted with `f`'s result; otherwise the rewrite recurses into
/// that child's own children.
pub fn replace_recursively(node: &Node, f: &impl Fn(&Node) -> Option<Node>) -> Node {
    let Some(children) = node.children() else {
        return node.clone();
    };
    let new_children = children
        .iter()
        .map(|child| match f(child) {
            Some(replacement) => replacement,
            None => replace_recursively(child, f),
        })
        .collect();
    with_children(node, new_children)
}

/// Rebuilds `node` with `new_children`, preserving its own fields.
fn with_children(node: &Node, new_children: Vec<Node>) -> Node {
    match node {
        Node::Document(_) => Node::Document(new_children),
        Node::Header { level, title, .. } => Node::Header {
            level: *level,
            title: title.clone(),
            children: new_children,
        },
        other => other.clone(),
    }
}

impl Node {
    /// Adds a new child `Header` one level deeper than `self`, with the
    /// given `title` and inner children. The new header is placed after all
    /// non-`Header` children but before any existing `Header` children at
    /// its own level. If an identical header (same level and title) already
    /// exists there, this is a no-op (no duplicate is created).
    pub fn prepend(&self, title: &str, inner: Vec<Node>) -> Node {
        let Some(children) = self.children() else {
            return self.clone();
        };
        let my_level = match self {
            Node::Header { level, .. } => *level,
            _ => 0,
        };
        let new_level = my_level + 1;

        let already_exists = children.iter().any(|c| {
            matches!(c, Node::Header { level, title: t, .. } if *level == new_level && t == title)
        });
        if already_exists {
            return self.clone();
        }

        let insert_at = children
            .iter()
            .position(|c| matches!(c, Node::Header { level, .. } if *level == new_level))
            .unwrap_or(children.len());

        let new_header = Node::Header {
            level: new_level,
            title: title.to_string(),
            children: inner,
        };

        let mut new_children = children.to_vec();
        new_children.insert(insert_at, new_header);
        with_children(self, new_children)
    }
}
