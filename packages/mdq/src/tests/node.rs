use crate::node::resolve_index;
use crate::*;

fn build_node(node: &Node) -> String {
    build(node, &FormatCfg::default(), None)
}

#[test]
fn paragraph_trims_and_terminates_with_newline() {
    let node = Node::Paragraph("  hello world  \n".to_string());
    assert_eq!(build_node(&node), "hello world\n");
}

#[test]
fn comment_round_trip() {
    let node = Node::Comment(" a comment ".to_string());
    assert_eq!(build_node(&node), "<!-- a comment -->\n");
}

#[test]
fn level1_header_uses_setext_equals() {
    let node = Node::Header {
        level: 1,
        title: "Title".to_string(),
        children: vec![],
    };
    let text = build_node(&node);
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Title"));
    assert_eq!(lines.next(), Some("=".repeat(78).as_str()));
}

#[test]
fn level2_header_uses_setext_dashes() {
    let node = Node::Header {
        level: 2,
        title: "Title".to_string(),
        children: vec![],
    };
    let text = build_node(&node);
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Title"));
    assert_eq!(lines.next(), Some("-".repeat(78).as_str()));
}

#[test]
fn level3_plus_header_uses_atx() {
    let node = Node::Header {
        level: 3,
        title: "Title".to_string(),
        children: vec![],
    };
    assert_eq!(build_node(&node), "### Title\n");
}

#[test]
fn document_level0_children_get_blank_line_between_siblings() {
    let node = Node::Document(vec![
        Node::Paragraph("one".to_string()),
        Node::Paragraph("two".to_string()),
    ]);
    assert_eq!(build_node(&node), "one\n\ntwo\n");
}

#[test]
fn consecutive_link_refs_have_no_blank_line_between_them() {
    let node = Node::Document(vec![
        Node::LinkRef { link_ref: "a".to_string(), url: Some("u1".to_string()), title: None },
        Node::LinkRef { link_ref: "b".to_string(), url: Some("u2".to_string()), title: None },
    ]);
    assert_eq!(build_node(&node), "[a]: u1\n[b]: u2\n");
}

#[test]
fn empty_document_builds_to_empty_string() {
    let node = Node::Document(vec![]);
    assert_eq!(build_node(&node), "");
}

#[test]
fn link_ref_title_escapes_backslash_and_quote() {
    let node = Node::LinkRef {
        link_ref: "x".to_string(),
        url: Some("url".to_string()),
        title: Some("a \"quote\" and a \\backslash".to_string()),
    };
    assert_eq!(build_node(&node), "[x]: url \"a \\\"quote\\\" and a \\\\backslash\"\n");
}

#[test]
fn code_block_round_trips_without_a_codec() {
    let node = Node::Code { language: "rust".to_string(), content: "fn main() {}\n".to_string() };
    assert_eq!(build_node(&node), "```rust\nfn main() {}\n```\n");
}

#[test]
fn negative_resolve_index_counts_from_the_end() {
    assert_eq!(resolve_index(-1, 3), Some(2));
    assert_eq!(resolve_index(-3, 3), Some(0));
    assert_eq!(resolve_index(-4, 3), None);
    assert_eq!(resolve_index(3, 3), None);
    assert_eq!(resolve_index(0, 0), None);
}
