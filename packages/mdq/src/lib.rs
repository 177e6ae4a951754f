//! A library for parsing Markdown text into a structured document tree,
//! mutating that tree programmatically, serializing it back to Markdown
//! with stable normalization, and querying sub-trees via MarkdQL, a compact
//! path expression language.

mod codec;
mod container;
mod error;
mod format;
mod linkref;
mod node;
mod parser;
mod query;
mod table;

#[cfg(test)]
mod tests;

pub use codec::JsonCodec;
pub use container::{collect_first_recursive, flat_map_first_in, map_first_in, replace_in, replace_recursively};
pub use error::QueryError;
pub use format::FormatCfg;
pub use node::{Alignment, Node, TableRow};
pub use parser::ParserOpts;
pub use query::{QueryState, StepOutcome};
pub use table::{ColSel, RowSel};

#[cfg(feature = "json-codec")]
pub use codec::SerdeJsonCodec;

/// Parses `text` into a normalized document tree. This never fails: any
/// text that doesn't fit a specific construct's grammar is preserved as
/// opaque paragraph or code content.
pub fn parse(text: &str, opts: &ParserOpts) -> Node {
    parser::parse(text, opts)
}

/// Serializes `node` back to Markdown text, using `cfg` for output style
/// and, if supplied, `codec` to prettify/minify fenced JSON code blocks.
/// Without a codec, Code nodes are emitted unchanged regardless of
/// language.
pub fn build(node: &Node, cfg: &FormatCfg, codec: Option<&dyn JsonCodec>) -> String {
    let mut out = String::new();
    node.build(&mut out, cfg, codec);
    out
}

/// Evaluates a MarkdQL expression against `root`.
pub fn query(expr: &str, root: &Node) -> Result<Vec<Node>, QueryError> {
    query::query(expr, root)
}
