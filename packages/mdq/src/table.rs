//! Table parsing, formatting, and cell addressing.

use crate::node::{resolve_index, Alignment, Node, TableRow};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a single alignment-row cell: centered (`:---:`), right (`---:`),
/// left with an explicit colon (`:---`), or plain (`---`).
static ALIGN_CELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(:-+:|---+|:--+|-+-:)\s*$").unwrap());

/// Splits a line into raw cells on `|` that is not preceded by `\`, keeping
/// the backslash in the resulting text (table-cell escaping is purely a
/// splitting concern, not one of the crate's escape domains). Trailing
/// all-whitespace cells are dropped; a leading empty cell (from a leading
/// `|`) is preserved here and normalized away later, once, if the whole
/// table uses that style.
fn tokenize_row(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            current.push(c);
            if let Some(next) = chars.next() {
                current.push(next);
            }
            continue;
        }
        if c == '|' {
            cells.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    cells.push(current);

    while cells.len() > 1 && cells.last().map(|c| c.trim().is_empty()).unwrap_or(false) {
        cells.pop();
    }
    cells
}

fn parse_alignment(cell: &str) -> Option<Alignment> {
    if !ALIGN_CELL.is_match(cell) {
        return None;
    }
    let trimmed = cell.trim();
    let left = trimmed.starts_with(':');
    let right = trimmed.ends_with(':');
    Some(match (left, right) {
        (true, true) => Alignment::Center,
        (false, true) => Alignment::Right,
        _ => Alignment::Left,
    })
}

/// Attempts to parse `text` (a Paragraph's full content) as a table.
/// Returns `None` if it isn't one, in which case the caller should keep
/// the original Paragraph (this is never an error).
pub fn try_parse_table(text: &str) -> Option<Node> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < 2 {
        return None;
    }

    let mut raw_rows: Vec<Vec<String>> = lines.iter().map(|l| tokenize_row(l)).collect();

    let has_leading_pipe = raw_rows[1]
        .first()
        .map(|c| c.trim().is_empty())
        .unwrap_or(false);
    if has_leading_pipe {
        for row in raw_rows.iter_mut() {
            if !row.is_empty() {
                row.remove(0);
            }
        }
    }

    let align_line = &raw_rows[1];
    let mut aligns = Vec::with_capacity(align_line.len());
    for cell in align_line {
        aligns.push(parse_alignment(cell)?);
    }
    if aligns.len() < align_line.len() {
        return None;
    }

    let mut rows = Vec::with_capacity(raw_rows.len() - 1);
    rows.push(TableRow::new(
        raw_rows[0].iter().map(|c| c.trim().to_string()).collect(),
    ));
    for raw in &raw_rows[2..] {
        rows.push(TableRow::new(raw.iter().map(|c| c.trim().to_string()).collect()));
    }

    Some(Node::Table { aligns, rows })
}

/// Appends a `Table` node's serialized form to `out`.
pub fn build_table(node: &Node, out: &mut String) {
    let Node::Table { aligns, rows } = node else {
        return;
    };
    let col_count = aligns.len();
    let mut widths = vec![1usize; col_count];
    for row in rows {
        for i in 0..col_count.min(row.cells.len()) {
            widths[i] = widths[i].max(row.cells[i].chars().count());
        }
    }

    let mut rows_iter = rows.iter();
    let header = rows_iter.next().cloned().unwrap_or_default();
    build_row(&header, aligns, &widths, out);

    out.push('|');
    for (i, align) in aligns.iter().enumerate() {
        out.push_str(&separator_cell(*align, widths[i]));
        out.push('|');
    }
    out.push('\n');

    for row in rows_iter {
        build_row(row, aligns, &widths, out);
    }
}

fn separator_cell(align: Alignment, width: usize) -> String {
    let total = width + 2;
    let mut chars = vec!['-'; total];
    match align {
        Alignment::Left => {}
        Alignment::Right => chars[total - 1] = ':',
        Alignment::Center => {
            chars[0] = ':';
            chars[total - 1] = ':';
        }
    }
    chars.into_iter().collect()
}

fn build_row(row: &TableRow, aligns: &[Alignment], widths: &[usize], out: &mut String) {
    out.push('|');
    for (i, align) in aligns.iter().enumerate() {
        let cell = row.cells.get(i).map(|s| s.as_str()).unwrap_or("");
        out.push(' ');
        out.push_str(&justify(cell, widths[i], *align));
        out.push_str(" |");
    }
    // Ragged overflow: cells past the aligned grid are appended unpadded.
    for cell in row.cells.iter().skip(aligns.len()) {
        out.push(' ');
        out.push_str(cell);
        out.push_str(" |");
    }
    out.push('\n');
}

fn justify(cell: &str, width: usize, align: Alignment) -> String {
    let len = cell.chars().count();
    if len >= width {
        return cell.to_string();
    }
    let pad = width - len;
    match align {
        Alignment::Left => format!("{cell}{}", " ".repeat(pad)),
        Alignment::Right => format!("{}{cell}", " ".repeat(pad)),
        Alignment::Center => {
            let left = pad / 2;
            let right = pad - left;
            format!("{}{cell}{}", " ".repeat(left), " ".repeat(right))
        }
    }
}

/// Selects a row by its position or by the value of its first cell.
#[derive(Debug, Clone, Copy)]
pub enum RowSel<'a> {
    Index(i64),
    Name(&'a str),
}
/// Selects a column by its position or by the header row's matching cell.
#[derive(Debug, Clone, Copy)]
pub enum ColSel<'a> {
    Index(i64),
    Name(&'a str),
}

impl Node {
    /// Gets a row by index or by name (the first cell of the header row, or
    /// of any data row). Any miss yields an empty row.
    pub fn row(&self, sel: RowSel) -> TableRow {
        let Node::Table { rows, .. } = self else {
            return TableRow::default();
        };
        match sel {
            RowSel::Index(idx) => resolve_index(idx, rows.len())
                .map(|i| rows[i].clone())
                .unwrap_or_default(),
            RowSel::Name(name) => rows
                .iter()
                .find(|r| r.head() == name)
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// Resolves a column selector to an index by consulting the header row.
    /// `None` if the column selector is a name that doesn't match any header
    /// cell.
    fn column_index(&self, sel: ColSel) -> Option<usize> {
        let Node::Table { rows, aligns } = self else {
            return None;
        };
        match sel {
            ColSel::Index(idx) => resolve_index(idx, aligns.len()),
            ColSel::Name(name) => rows.first()?.cells.iter().position(|c| c == name),
        }
    }

    /// Gets a cell by (column, row) selectors. Any miss yields an empty
    /// string; there is no way at this API to distinguish a missing cell
    /// from a genuinely empty one.
    pub fn cell(&self, col: ColSel, row: RowSel) -> String {
        let row = self.row(row);
        let Some(col_idx) = self.column_index(col) else {
            return String::new();
        };
        row.cell_at(col_idx as i64).to_string()
    }

    /// Returns a new `Table` with the cell at `(col, row)` set to `value`.
    pub fn updated(&self, col: usize, row: usize, value: &str) -> Node {
        let Node::Table { aligns, rows } = self else {
            return self.clone();
        };
        let mut aligns = aligns.clone();
        let mut rows = rows.clone();

        if row == 0 && aligns.len() <= col {
            aligns.resize(col + 1, Alignment::Left);
        }
        while rows.len() <= row {
            rows.push(TableRow::default());
        }

        let target = &mut rows[row];
        if target.cells.len() <= col {
            target.cells.resize(col + 1, String::new());
        }
        target.cells[col] = value.to_string();
        while target.cells.last().map(|c| c.is_empty()).unwrap_or(false) {
            target.cells.pop();
        }

        Node::Table { aligns, rows }
    }

    /// As [`Self::updated`], but the row is addressed by the value of its
    /// first cell. If no row has that name, a new one is appended with its
    /// first cell set to `row_name`.
    pub fn updated_by_row_name(&self, col: usize, row_name: &str, value: &str) -> Node {
        let Node::Table { rows, .. } = self else {
            return self.clone();
        };
        let row_idx = rows.iter().position(|r| r.head() == row_name);
        match row_idx {
            Some(idx) => self.updated(col, idx, value),
            None => {
                let mut with_new_row = self.clone();
                if let Node::Table { rows, .. } = &mut with_new_row {
                    let mut new_row = TableRow::default();
                    new_row.cells.push(row_name.to_string());
                    rows.push(new_row);
                }
                let new_row_idx = if let Node::Table { rows, .. } = &with_new_row {
                    rows.len() - 1
                } else {
                    unreachable!()
                };
                with_new_row.updated(col, new_row_idx, value)
            }
        }
    }

    /// As [`Self::updated`], but both column and row are addressed by name.
    /// If the column doesn't exist, a new header cell is inserted (and thus
    /// a new column created) for it.
    pub fn updated_by_names(&self, col_name: &str, row_name: &str, value: &str) -> Node {
        let Node::Table { rows, .. } = self else {
            return self.clone();
        };
        let col_idx = rows.first().and_then(|h| h.cells.iter().position(|c| c == col_name));
        match col_idx {
            Some(idx) => self.updated_by_row_name(idx, row_name, value),
            None => {
                let new_col_idx = rows.first().map(|h| h.cells.len()).unwrap_or(0);
                let with_new_col = self.updated(new_col_idx, 0, col_name);
                with_new_col.updated_by_row_name(new_col_idx, row_name, value)
            }
        }
    }
}
