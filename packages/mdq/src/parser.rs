//! The document parser pipeline: four passes plus an organization pass,
//! turning raw text into a normalized header tree.

use crate::linkref::{canonicalize_link_refs, parse_link_ref_line};
use crate::node::Node;
use crate::table::try_parse_table;
use once_cell::sync::Lazy;
use regex::Regex;

/// Parser configuration. Currently carries a single option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOpts {
    /// Whether `LinkRef`s should be deduplicated (last occurrence wins) and
    /// sorted lexicographically by their label within each `Header`'s
    /// children. Defaults to `true`.
    pub sort_link_refs: bool,
}
impl Default for ParserOpts {
    fn default() -> Self {
        Self { sort_link_refs: true }
    }
}

/// Parses `text` into a normalized document tree. This never fails: any
/// text that doesn't fit a specific construct's grammar is preserved as
/// opaque Paragraph or Code content.
pub fn parse(text: &str, opts: &ParserOpts) -> Node {
    let flat = pass1_segment(text);
    let flat = pass2_split_headers(flat);
    let flat = pass3_refine_tables(flat);

    let mut idx = 0;
    let children = treeify(&flat, &mut idx, 0);
    let root = Node::Header {
        level: 0,
        title: String::new(),
        children,
    };
    let organized = organize(root, opts);
    finalize_root(organized)
}

// ---------------------------------------------------------------------
// Pass 1 — structural segmentation
// ---------------------------------------------------------------------

static SPECIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?P<comment>(?s)<!--.*?-->)|(?P<fence>(?m)^```(?P<fence_lang>[^\n]*)\n(?s:(?P<fence_body>.*?))```(?:\n|\z))|(?P<linkref>(?m)^\[[^\]\n]+\]:[^\n]*$)"#,
    )
    .unwrap()
});

/// Splits `gap` (a run of text between two special constructs, or before the
/// first/after the last one) into Paragraph nodes, one per blank-line
/// delimited block, dropping blocks that are blank throughout.
static BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n+").unwrap());

fn push_paragraph_blocks(gap: &str, out: &mut Vec<Node>) {
    for block in BLANK_LINE.split(gap) {
        if !block.trim().is_empty() {
            out.push(Node::Paragraph(block.to_string()));
        }
    }
}

fn pass1_segment(text: &str) -> Vec<Node> {
    let mut out = Vec::new();
    let mut cursor = 0;
    for caps in SPECIAL.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        push_paragraph_blocks(&text[cursor..whole.start()], &mut out);

        if let Some(m) = caps.name("comment") {
            let body = &m.as_str()[4..m.as_str().len() - 3];
            out.push(Node::Comment(body.to_string()));
        } else if caps.name("fence").is_some() {
            let lang = caps.name("fence_lang").map(|m| m.as_str()).unwrap_or("");
            let body = caps.name("fence_body").map(|m| m.as_str()).unwrap_or("");
            let mut content = body.to_string();
            if !content.ends_with('\n') {
                content.push('\n');
            }
            out.push(Node::Code {
                language: lang.to_string(),
                content,
            });
        } else if let Some(m) = caps.name("linkref") {
            match parse_link_ref_line(m.as_str()) {
                Some(node) => out.push(node),
                // Unparseable; fall back to ordinary paragraph text rather
                // than losing the line.
                None => push_paragraph_blocks(m.as_str(), &mut out),
            }
        }

        cursor = whole.end();
    }
    push_paragraph_blocks(&text[cursor..], &mut out);
    out
}

// ---------------------------------------------------------------------
// Pass 2 — header extraction
// ---------------------------------------------------------------------

static ATX_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,9}) (.*)$").unwrap());

fn atx_header(line: &str) -> Option<(u8, String)> {
    let caps = ATX_HEADER.captures(line)?;
    Some((caps[1].len() as u8, caps[2].trim().to_string()))
}

/// `None` if `line` isn't a pure setext underline; otherwise the header
/// level it denotes (1 for `===+`, 2 for `---+`).
fn setext_level(line: &str) -> Option<u8> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.chars().all(|c| c == '=') {
        Some(1)
    } else if trimmed.chars().all(|c| c == '-') {
        Some(2)
    } else {
        None
    }
}

/// Splits a single Paragraph's text at header boundaries (setext or atx),
/// producing, for each boundary: an optional leading Paragraph, then a
/// Header (with no children yet — those are filled in by treeification).
fn split_headers(text: &str) -> Vec<Node> {
    let lines: Vec<&str> = text.lines().collect();
    let mut out = Vec::new();
    let mut buf: Vec<&str> = Vec::new();

    let flush = |buf: &mut Vec<&str>, out: &mut Vec<Node>| {
        if !buf.is_empty() {
            let text = buf.join("\n");
            if !text.trim().is_empty() {
                out.push(Node::Paragraph(text));
            }
            buf.clear();
        }
    };

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if let Some((level, title)) = atx_header(line) {
            flush(&mut buf, &mut out);
            out.push(Node::Header {
                level,
                title,
                children: Vec::new(),
            });
            i += 1;
            continue;
        }
        if i + 1 < lines.len() && !line.trim().is_empty() {
            if let Some(level) = setext_level(lines[i + 1]) {
                flush(&mut buf, &mut out);
                out.push(Node::Header {
                    level,
                    title: line.trim().to_string(),
                    children: Vec::new(),
                });
                i += 2;
                continue;
            }
        }
        buf.push(line);
        i += 1;
    }
    flush(&mut buf, &mut out);
    out
}

fn pass2_split_headers(flat: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::with_capacity(flat.len());
    for node in flat {
        match node {
            Node::Paragraph(text) => out.extend(split_headers(&text)),
            other => out.push(other),
        }
    }
    out
}

// ---------------------------------------------------------------------
// Pass 3 — paragraph refinement into tables
// ---------------------------------------------------------------------

fn pass3_refine_tables(flat: Vec<Node>) -> Vec<Node> {
    flat.into_iter()
        .map(|node| match &node {
            Node::Paragraph(text) => try_parse_table(text).unwrap_or(node),
            _ => node,
        })
        .collect()
}

// ---------------------------------------------------------------------
// Pass 4 — treeification
// ---------------------------------------------------------------------

fn treeify(nodes: &[Node], idx: &mut usize, level: u8) -> Vec<Node> {
    let mut children = Vec::new();
    while *idx < nodes.len() {
        match &nodes[*idx] {
            Node::Header { level: child_level, .. } if *child_level > level => {
                let (child_level, title) = match &nodes[*idx] {
                    Node::Header { level, title, .. } => (*level, title.clone()),
                    _ => unreachable!(),
                };
                *idx += 1;
                let grandchildren = treeify(nodes, idx, child_level);
                children.push(Node::Header {
                    level: child_level,
                    title,
                    children: grandchildren,
                });
            }
            Node::Header { .. } => break,
            _ => {
                children.push(nodes[*idx].clone());
                *idx += 1;
            }
        }
    }
    children
}

// ---------------------------------------------------------------------
// Organization pass
// ---------------------------------------------------------------------

fn organize(node: Node, opts: &ParserOpts) -> Node {
    match node {
        Node::Header { level, title, children } => {
            let mut rest = Vec::new();
            let mut link_refs = Vec::new();
            let mut headers = Vec::new();
            for child in children {
                match child {
                    Node::Header { .. } => headers.push(organize(child, opts)),
                    Node::LinkRef { .. } => link_refs.push(child),
                    other => rest.push(other),
                }
            }
            let link_refs = canonicalize_link_refs(link_refs, opts.sort_link_refs);

            let mut new_children = Vec::with_capacity(rest.len() + link_refs.len() + headers.len());
            new_children.extend(rest);
            new_children.extend(link_refs);
            new_children.extend(headers);

            Node::Header { level, title, children: new_children }
        }
        other => other,
    }
}

fn finalize_root(node: Node) -> Node {
    match node {
        Node::Header { level: 0, children, .. } => Node::Document(children),
        other => other,
    }
}
