//! MarkdQL: the step-wise path query language.

use crate::container::collect_first_recursive;
use crate::error::QueryError;
use crate::node::{resolve_index, Node};
use crate::table::{ColSel, RowSel};
use once_cell::sync::Lazy;
use regex::Regex;

static SEP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\.\.|\.)?(\|)?").unwrap());
static QUOTED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^"((?:[^"\\]|\\.)*)""#).unwrap());
static REGEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/((?:[^/\\]|\\.)+)/").unwrap());
static BAREWORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^([^"/\[.| ][^.|\[]*)"#).unwrap());
static INDEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^\[(?:"((?:[^"\\]|\\.)*)"|([^\]]*))\]"#).unwrap());

/// Unescapes the universal `\.` -> `.` rule shared by quoted tokens, regex
/// tokens (applied before compilation), and quoted index contents. A
/// trailing lone backslash is kept as-is.
fn unescape_universal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

enum TokenSpec {
    Bareword(String),
    Quoted(String),
    Regex(Regex),
}

fn token_matches(token: &TokenSpec, title: &str) -> bool {
    match token {
        TokenSpec::Bareword(s) | TokenSpec::Quoted(s) => title == s,
        TokenSpec::Regex(re) => re.is_match(title),
    }
}

enum TokenErr {
    /// The head of the remainder doesn't match any recognized step syntax.
    Malformed,
    /// A `/…/` token was well-formed lexically but failed to compile.
    BadRegex(String),
}

fn parse_token(s: &str) -> Result<Option<(TokenSpec, usize)>, TokenErr> {
    if s.starts_with('"') {
        let caps = QUOTED_RE.captures(s).ok_or(TokenErr::Malformed)?;
        let raw = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let end = caps.get(0).unwrap().end();
        return Ok(Some((TokenSpec::Quoted(unescape_universal(raw)), end)));
    }
    if s.starts_with('/') {
        let caps = REGEX_RE.captures(s).ok_or(TokenErr::Malformed)?;
        let raw = &caps[1];
        let end = caps.get(0).unwrap().end();
        let unescaped = unescape_universal(raw);
        let re = Regex::new(&unescaped).map_err(|_| TokenErr::BadRegex(raw.to_string()))?;
        return Ok(Some((TokenSpec::Regex(re), end)));
    }
    match BAREWORD_RE.captures(s) {
        Some(caps) => {
            let end = caps.get(0).unwrap().end();
            Ok(Some((TokenSpec::Bareword(caps[1].to_string()), end)))
        }
        None => Ok(None),
    }
}

/// `Err` iff `s` starts with `[` but isn't a well-formed index.
fn parse_index(s: &str) -> Result<Option<(String, usize)>, ()> {
    if !s.starts_with('[') {
        return Ok(None);
    }
    let caps = INDEX_RE.captures(s).ok_or(())?;
    let end = caps.get(0).unwrap().end();
    let content = match caps.get(1) {
        Some(quoted) => unescape_universal(quoted.as_str()),
        None => caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
    };
    Ok(Some((content, end)))
}

/// The title a query token is matched against: a `Header`'s own title, or —
/// since `Table` carries no title field of its own — the first cell of its
/// header row, the conventional label for a lookup-style table.
fn query_title(node: &Node) -> Option<String> {
    match node {
        Node::Header { title, .. } => Some(title.clone()),
        Node::Table { .. } => Some(node.row(RowSel::Index(0)).head().to_string()),
        _ => None,
    }
}

fn find_first_recursive(node: &Node, pred: &impl Fn(&Node) -> bool) -> Option<Node> {
    for child in node.children().unwrap_or(&[]) {
        if let Some(found) = collect_first_recursive(child, &|n| if pred(n) { Some(n.clone()) } else { None }) {
            return Some(found);
        }
    }
    None
}

fn apply_token(candidates: &[Node], table: bool, recursive: bool, token: Option<&TokenSpec>) -> Vec<Node> {
    let Some(token) = token else {
        return candidates.to_vec();
    };
    if matches!(token, TokenSpec::Quoted(s) if s.is_empty()) {
        // An empty quoted token ("") is a zero-length token: identity, not a
        // literal match against an empty title.
        return candidates.to_vec();
    }
    if candidates.len() != 1 {
        return Vec::new();
    }
    let root = &candidates[0];
    if !root.is_container() {
        return Vec::new();
    }

    let pred = |n: &Node| -> bool {
        let is_right_kind = if table {
            matches!(n, Node::Table { .. })
        } else {
            matches!(n, Node::Header { .. })
        };
        is_right_kind && query_title(n).map(|t| token_matches(token, &t)).unwrap_or(false)
    };

    let found = if recursive {
        find_first_recursive(root, &pred)
    } else {
        root.children().unwrap_or(&[]).iter().find(|c| pred(c)).cloned()
    };

    found.into_iter().collect()
}

fn index_container(children: &[Node], idx: &str) -> Vec<Node> {
    if idx == "*" {
        return children.to_vec();
    }
    match idx.parse::<i64>() {
        Ok(n) => resolve_index(n, children.len())
            .map(|i| vec![children[i].clone()])
            .unwrap_or_default(),
        Err(_) => Vec::new(),
    }
}

fn apply_index(candidates: &[Node], index: Option<&str>) -> Vec<Node> {
    let Some(idx) = index else {
        return candidates.to_vec();
    };
    if candidates.len() != 1 {
        return Vec::new();
    }
    let node = &candidates[0];

    if let Some(children) = node.children() {
        return index_container(children, idx);
    }
    if matches!(node, Node::Table { .. }) {
        if let Some((col, row)) = idx.split_once(',') {
            let value = node.cell(ColSel::Name(col), RowSel::Name(row));
            return vec![Node::Paragraph(value)];
        }
        return Vec::new();
    }
    // Indexing past a leaf clamps to the leaf itself rather than vanishing.
    vec![node.clone()]
}

/// The result of evaluating one step: either another step remains, or the
/// query has reached its final candidate set.
pub enum StepOutcome {
    Continue(QueryState),
    Done(Vec<Node>),
}

/// The evaluator's state: the current candidate set and unconsumed query
/// text. Exposed publicly so callers and tests can drive evaluation one
/// step at a time instead of only through [`query`].
#[derive(Debug, Clone)]
pub struct QueryState {
    original: String,
    candidates: Vec<Node>,
    remainder: String,
}

impl QueryState {
    pub fn new(expr: &str, root: Node) -> Self {
        Self {
            original: expr.to_string(),
            candidates: vec![root],
            remainder: expr.to_string(),
        }
    }

    pub fn candidates(&self) -> &[Node] {
        &self.candidates
    }

    pub fn remainder(&self) -> &str {
        &self.remainder
    }

    /// Applies one step of query evaluation and reports whether evaluation
    /// is complete.
    pub fn step(&self) -> Result<StepOutcome, QueryError> {
        let s = self.remainder.as_str();

        let sep_caps = SEP_RE.captures(s).expect("sep regex is fully optional, always matches");
        let sep_end = sep_caps.get(0).unwrap().end();
        let recursive = sep_caps.get(1).map(|m| m.as_str() == "..").unwrap_or(false);
        let table = sep_caps.get(2).is_some();
        let after_sep = &s[sep_end..];

        let token = parse_token(after_sep).map_err(|e| match e {
            TokenErr::Malformed => QueryError::UnrecognizedQuery(self.original.clone()),
            TokenErr::BadRegex(raw) => QueryError::InvalidRegex(raw),
        })?;
        let after_token = match &token {
            Some((_, len)) => &after_sep[*len..],
            None => after_sep,
        };

        let index = parse_index(after_token).map_err(|_| QueryError::UnrecognizedQuery(self.original.clone()))?;
        let after_index = match &index {
            Some((_, len)) => &after_token[*len..],
            None => after_token,
        };

        if !s.is_empty() && token.is_none() && index.is_none() {
            return Err(QueryError::UnrecognizedQuery(self.original.clone()));
        }

        let token_spec = token.map(|(t, _)| t);
        let index_str = index.map(|(i, _)| i);

        let matched = apply_token(&self.candidates, table, recursive, token_spec.as_ref());
        let result = apply_index(&matched, index_str.as_deref());

        let new_remainder = after_index.to_string();
        if result.is_empty() || new_remainder.is_empty() || new_remainder == "." {
            Ok(StepOutcome::Done(result))
        } else {
            Ok(StepOutcome::Continue(QueryState {
                original: self.original.clone(),
                candidates: result,
                remainder: new_remainder,
            }))
        }
    }
}

/// Evaluates `expr` against `root`. Never panics; the only failures are
/// [`QueryError::UnrecognizedQuery`] and [`QueryError::InvalidRegex`].
pub fn query(expr: &str, root: &Node) -> Result<Vec<Node>, QueryError> {
    let mut state = QueryState::new(expr, root.clone());
    loop {
        match state.step()? {
            StepOutcome::Done(result) => return Ok(result),
            StepOutcome::Continue(next) => state = next,
        }
    }
}
