use crate::*;

fn doc(text: &str) -> Node {
    parse(text, &ParserOpts::default())
}

#[test]
fn query_dotted_path_through_nested_headers() {
    let root = doc("# A\n## B\n### C\nHello ABC\n");
    let result = query("A.B.C[*]", &root).unwrap();
    assert_eq!(result, vec![Node::Paragraph("Hello ABC".to_string())]);
}

#[test]
fn query_recursive_descent_with_negative_index() {
    // A contains B; B contains C and C2 (in that order) — so B[-1] is C2.
    let root = doc("# A\n## B\n### C\n### C2\n");
    let result = query("..B[-1]", &root).unwrap();
    let Node::Header { title, .. } = &result[0] else { panic!("expected Header") };
    assert_eq!(title, "C2");
}

#[test]
fn query_table_cell_by_column_and_row_name() {
    let root = doc("# T\nTo Do|Description\n---|---\nR2|D2\n");
    let result = query("..|To Do[Description,R2]", &root).unwrap();
    assert_eq!(result, vec![Node::Paragraph("D2".to_string())]);
}

#[test]
fn query_unrecognized_prefix_is_an_error() {
    let root = doc("# A\n");
    let err = query("A[", &root).unwrap_err();
    assert!(matches!(err, QueryError::UnrecognizedQuery(_)));
}

#[test]
fn query_invalid_regex_is_an_error() {
    let root = doc("# A\n");
    let err = query("/[/", &root).unwrap_err();
    assert!(matches!(err, QueryError::InvalidRegex(_)));
}

#[test]
fn query_out_of_range_index_yields_empty_not_an_error() {
    let root = doc("# A\nHello\n");
    let result = query("A[99]", &root).unwrap();
    assert_eq!(result, Vec::<Node>::new());
}

#[test]
fn query_empty_expression_is_identity() {
    let root = doc("# A\nHello\n");
    let result = query("", &root).unwrap();
    assert_eq!(result, vec![root]);
}

#[test]
fn query_regex_token_matches_header_title() {
    let root = doc("# Alpha\nfirst\n# Beta\nsecond\n");
    let result = query("/^B.*/[*]", &root).unwrap();
    assert_eq!(result, vec![Node::Paragraph("second".to_string())]);
}

#[test]
fn query_quoted_token_with_escaped_dot() {
    let root = doc("# A.B\nHello\n");
    let result = query(r#""A\.B"[*]"#, &root).unwrap();
    assert_eq!(result, vec![Node::Paragraph("Hello".to_string())]);
}

#[test]
fn query_missing_header_yields_empty_sequence() {
    let root = doc("# A\nHello\n");
    let result = query("Nope[*]", &root).unwrap();
    assert_eq!(result, Vec::<Node>::new());
}

#[test]
fn query_index_past_a_leaf_clamps_to_the_leaf() {
    let root = doc("# A\nHello\n");
    let result = query("A[0][0][0]", &root).unwrap();
    assert_eq!(result, vec![Node::Paragraph("Hello".to_string())]);
}

#[test]
fn query_empty_quoted_token_is_an_identity_step() {
    let root = doc("# A\n## B\nHello\n");
    let result = query(r#"A."".B[*]"#, &root).unwrap();
    assert_eq!(result, vec![Node::Paragraph("Hello".to_string())]);
}
