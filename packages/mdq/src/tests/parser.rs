use crate::*;

fn round_trip(text: &str) -> String {
    let doc = parse(text, &ParserOpts::default());
    build(&doc, &FormatCfg::default(), None)
}

#[test]
fn header_round_trip_setext_and_atx() {
    let input = "English\n===\nHello world\n# French\nBonjour tout le monde\n";
    let expected = format!(
        "English\n{}\n\nHello world\n\nFrench\n{}\n\nBonjour tout le monde\n",
        "=".repeat(78),
        "=".repeat(78)
    );
    assert_eq!(round_trip(input), expected);
}

#[test]
fn link_ref_canonicalization_end_to_end() {
    let input = "[url]: url\n[dup]: dup\n[dup]: dup \"last\"\n";
    assert_eq!(round_trip(input), "[dup]: dup \"last\"\n[url]: url\n");
}

#[test]
fn link_ref_order_preserved_when_sorting_disabled() {
    let input = "[url]: url\n[dup]: dup\n[dup]: dup \"last\"\n";
    let doc = parse(input, &ParserOpts { sort_link_refs: false });
    let out = build(&doc, &FormatCfg::default(), None);
    assert_eq!(out, "[url]: url\n[dup]: dup\n[dup]: dup \"last\"\n");
}

#[test]
fn table_with_alignments_round_trips() {
    let input = "Id1|Id2|Id3|Name\n:--|:-:|-:|--:\n1|1|1|One\n22|22|22|Two\n";
    let out = round_trip(input);
    let mut lines = out.lines();
    assert_eq!(lines.next(), Some("| Id1 | Id2 | Id3 | Name |"));
    assert_eq!(lines.next(), Some("|-----|:---:|----:|-----:|"));
}

#[test]
fn empty_input_parses_to_empty_document_and_builds_empty_string() {
    let doc = parse("", &ParserOpts::default());
    assert_eq!(doc, Node::Document(vec![]));
    assert_eq!(build(&doc, &FormatCfg::default(), None), "");
}

#[test]
fn invalid_json_code_block_round_trips_unchanged_without_a_codec() {
    let input = "```json\n{ not valid json\n```\n";
    assert_eq!(round_trip(input), input);
}

#[test]
fn comment_code_and_paragraph_segmentation() {
    let input = "<!-- a note -->\n\n```rust\nfn main() {}\n```\n\nSome text.\n";
    let doc = parse(input, &ParserOpts::default());
    let Node::Document(children) = doc else { panic!("expected Document") };
    assert_eq!(children.len(), 3);
    assert!(matches!(children[0], Node::Comment(_)));
    assert!(matches!(children[1], Node::Code { .. }));
    assert!(matches!(children[2], Node::Paragraph(_)));
}

#[test]
fn header_monotonicity_holds_for_nested_and_skipped_levels() {
    let input = "# A\n### C\n## B\n";
    let doc = parse(input, &ParserOpts::default());
    let Node::Document(children) = doc else { panic!("expected Document") };
    assert_eq!(children.len(), 1);
    let Node::Header { level: a_level, children: a_children, .. } = &children[0] else {
        panic!("expected Header")
    };
    assert_eq!(*a_level, 1);
    for child in a_children {
        if let Node::Header { level, .. } = child {
            assert!(*level > *a_level);
        }
    }
}

#[test]
fn multiple_top_level_headers_become_document_siblings() {
    let doc = parse("# One\n# Two\n", &ParserOpts::default());
    let Node::Document(children) = doc else { panic!("expected Document") };
    assert_eq!(children.len(), 2);
}

#[test]
fn round_trip_is_idempotent() {
    let input = "Intro text\n\n# Section\nBody\n\n[ref]: http://example.com \"A Title\"\n";
    let once = round_trip(input);
    let twice = round_trip(&once);
    assert_eq!(once, twice);
}

#[test]
fn text_before_first_header_becomes_a_sibling_paragraph() {
    let doc = parse("Intro\n\n# Heading\nBody\n", &ParserOpts::default());
    let Node::Document(children) = doc else { panic!("expected Document") };
    assert!(matches!(children[0], Node::Paragraph(_)));
    assert!(matches!(children[1], Node::Header { .. }));
}
