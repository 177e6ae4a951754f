//! The tree model: every Markdown construct this crate understands, and the
//! `build`/`pre_space` serialization contract every variant implements.

use crate::codec::JsonCodec;
use crate::format::FormatCfg;

/// The width of a setext underline (`===` or `---`) under a level 1 or 2
/// heading.
const SETEXT_WIDTH: usize = 78;

/// Column alignment of a table, inferred from its separator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// One row of a [`Node::Table`]. Row `0` is the header row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow {
    pub cells: Vec<String>,
}
impl TableRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }
    /// Gets a cell by index, supporting negative (from-the-end) indices. Out
    /// of range yields an empty string; there is no distinction at this API
    /// between a missing cell and a genuinely empty one.
    pub fn cell_at(&self, idx: i64) -> &str {
        resolve_index(idx, self.cells.len())
            .map(|i| self.cells[i].as_str())
            .unwrap_or("")
    }
    /// The first cell, used as this row's name for `row(name)`/table-cell
    /// lookups. Empty if the row has no cells.
    pub fn head(&self) -> &str {
        self.cells.first().map(|s| s.as_str()).unwrap_or("")
    }
}

/// Every Markdown construct this crate understands is exactly one of these.
/// Nodes are value-like: every mutation returns a new `Node`.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An invisible top-level container, used when text precedes the first
    /// level-1 header or when multiple level-1 headers exist.
    Document(Vec<Node>),
    /// A section. `level` is in `[0, 9]`; `0` is reserved for the parser's
    /// synthetic root (which is always rewritten to `Document` before the
    /// tree is handed back to callers).
    Header {
        level: u8,
        title: String,
        children: Vec<Node>,
    },
    /// A trimmed text blob.
    Paragraph(String),
    /// The raw body of an HTML-style comment, without `<!--`/`-->`.
    Comment(String),
    /// A fenced code block. `content` always ends in a single `\n`.
    Code { language: String, content: String },
    /// A `[ref]: url "title"` line.
    LinkRef {
        link_ref: String,
        url: Option<String>,
        title: Option<String>,
    },
    /// A table: one alignment per column, then an ordered sequence of rows.
    Table {
        aligns: Vec<Alignment>,
        rows: Vec<TableRow>,
    },
}

impl Node {
    /// True for nodes that can hold children nodes (as opposed to leaves,
    /// which hold only strings or cells).
    pub fn is_container(&self) -> bool {
        matches!(self, Node::Document(_) | Node::Header { .. } | Node::Table { .. })
    }

    /// The node's children, if it's a [`Node::Document`] or [`Node::Header`].
    /// `Table` is a container in the generic traversal sense, but its rows
    /// are not `Node`s, so it has no entry here; callers working
    /// generically over the tree should match on it separately when they
    /// need table rows.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Document(children) => Some(children),
            Node::Header { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Document(children) => Some(children),
            Node::Header { children, .. } => Some(children),
            _ => None,
        }
    }

    /// The node's title, for `Header`; `None` for everything else (including
    /// `Document`, which has no title of its own).
    pub fn title(&self) -> Option<&str> {
        match self {
            Node::Header { title, .. } => Some(title),
            _ => None,
        }
    }

    /// Appends this node's serialized form to `out`.
    pub fn build(&self, out: &mut String, cfg: &FormatCfg, codec: Option<&dyn JsonCodec>) {
        match self {
            Node::Document(children) => build_siblings(children, out, cfg, codec),
            Node::Header { level, title, children } => {
                if *level > 0 {
                    match level {
                        1 | 2 => {
                            out.push_str(title);
                            out.push('\n');
                            out.push_str(&(if *level == 1 { "=" } else { "-" }).repeat(SETEXT_WIDTH));
                            out.push('\n');
                        }
                        _ => {
                            out.push_str(&"#".repeat(*level as usize));
                            out.push(' ');
                            out.push_str(title);
                            out.push('\n');
                        }
                    }
                }
                build_siblings(children, out, cfg, codec);
            }
            Node::Paragraph(text) => {
                out.push_str(text.trim());
                out.push('\n');
            }
            Node::Comment(body) => {
                out.push_str("<!--");
                out.push_str(body);
                out.push_str("-->\n");
            }
            Node::Code { language, content } => {
                out.push_str("```");
                out.push_str(language);
                out.push('\n');
                out.push_str(&crate::codec::process_code_body(language, content, codec));
                out.push_str("```\n");
            }
            Node::LinkRef { link_ref, url, title } => {
                out.push('[');
                out.push_str(link_ref);
                out.push_str("]:");
                if let Some(url) = url {
                    if !url.is_empty() {
                        out.push(' ');
                        out.push_str(url);
                    }
                }
                if let Some(title) = title {
                    if !title.is_empty() {
                        out.push_str(" \"");
                        out.push_str(&escape_title(title));
                        out.push('"');
                    }
                }
                out.push('\n');
            }
            Node::Table { .. } => crate::table::build_table(self, out),
        }
    }

    /// Appends the inter-node whitespace that should precede this node given
    /// the immediately preceding sibling, if any.
    pub fn pre_space(&self, out: &mut String, prev: Option<&Node>) {
        match prev {
            None => {}
            Some(Node::LinkRef { .. }) if matches!(self, Node::LinkRef { .. }) => {}
            Some(_) => out.push('\n'),
        }
    }
}

fn build_siblings(children: &[Node], out: &mut String, cfg: &FormatCfg, codec: Option<&dyn JsonCodec>) {
    let mut prev: Option<&Node> = None;
    for child in children {
        child.pre_space(out, prev);
        child.build(out, cfg, codec);
        prev = Some(child);
    }
}

/// Escapes a `LinkRef` title for serialization: `\` then `"`.
pub fn escape_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}

/// Unescapes a `LinkRef` title parsed from text: `\\` -> `\`, `\"` -> `"`.
pub fn unescape_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut chars = title.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Resolves a (possibly negative) index against a length: non-negative `n`
/// indexes from the front, negative `-k` indexes `len - k` from the front.
/// Out of range yields `None`.
pub fn resolve_index(idx: i64, len: usize) -> Option<usize> {
    let resolved = if idx >= 0 { idx } else { len as i64 + idx };
    if resolved >= 0 && (resolved as usize) < len {
        Some(resolved as usize)
    } else {
        None
    }
}
