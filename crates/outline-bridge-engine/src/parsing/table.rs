//! # Table Transpiling
//!
//! Pipe tables on the markdown side, chained nested bullets on the outline
//! side:
//!
//! ```text
//! - {{[[table]]}}
//!   - **A**
//!     - **B**
//!   - 1
//!     - 2
//! ```
//!
//! Each row is a bullet one level under the marker and every further cell is
//! nested one level inside the previous cell. The host reads tables in exactly
//! this shape, so it is reproduced as is.

use log::debug;

use crate::{error::Recovery, parsing::outline::OutlineLine};

/// Filler for cells a short row is missing. Never empty, so a re-serialised
/// row keeps its `| |` delimiters.
pub const EMPTY_CELL: &str = " ";
pub const TABLE_MARKER: &str = "{{[[table]]}}";
const SHORT_TABLE_MARKER: &str = "{{table}}";
const HEADER_DECORATIONS: [&str; 4] = ["**", "__", "^^", "=="];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    fn from_separator(cell: &str) -> Alignment {
        match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) => Alignment::Center,
            (false, true) => Alignment::Right,
            (true, false) => Alignment::Left,
            (false, false) => Alignment::None,
        }
    }

    fn separator(self) -> &'static str {
        match self {
            Alignment::None => "---",
            Alignment::Left => ":---",
            Alignment::Center => ":---:",
            Alignment::Right => "---:",
        }
    }

    /// CSS `text-align` value, if any.
    pub fn css(self) -> Option<&'static str> {
        match self {
            Alignment::None => None,
            Alignment::Left => Some("left"),
            Alignment::Center => Some("center"),
            Alignment::Right => Some("right"),
        }
    }
}

/// A table with every row padded to the same number of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableModel {
    pub header_cells: Vec<String>,
    pub alignments: Vec<Alignment>,
    pub rows: Vec<Vec<String>>,
}

impl TableModel {
    fn padded(
        mut header_cells: Vec<String>,
        mut alignments: Vec<Alignment>,
        mut rows: Vec<Vec<String>>,
    ) -> TableModel {
        let width = rows
            .iter()
            .map(Vec::len)
            .chain([header_cells.len()])
            .max()
            .unwrap_or(0);
        header_cells.resize(width, EMPTY_CELL.to_string());
        alignments.resize(width, Alignment::None);
        for row in &mut rows {
            row.resize(width, EMPTY_CELL.to_string());
        }
        TableModel {
            header_cells,
            alignments,
            rows,
        }
    }

    pub fn width(&self) -> usize {
        self.header_cells.len()
    }

    /// Parses pipe-table lines: a header row, a separator row, then data rows.
    pub fn parse_markdown<S: AsRef<str>>(lines: &[S]) -> Result<TableModel, Recovery> {
        let malformed = |reason| Recovery::MalformedTable {
            reason,
            lines: lines.len(),
        };
        let [header, separator, data @ ..] = lines else {
            return Err(malformed("fewer than two rows"));
        };

        let separator = split_row(separator.as_ref());
        if !separator.iter().all(|cell| is_separator_cell(cell)) {
            return Err(malformed("missing separator row"));
        }
        if data.is_empty() {
            return Err(malformed("no data rows"));
        }

        Ok(TableModel::padded(
            split_row(header.as_ref()),
            separator
                .iter()
                .map(|cell| Alignment::from_separator(cell))
                .collect(),
            data.iter().map(|row| split_row(row.as_ref())).collect(),
        ))
    }

    /// The chained outline encoding, starting with the marker at `marker_level`.
    ///
    /// `cell` converts one markdown cell to outline inline syntax.
    pub fn outline_chain(
        &self,
        marker_level: usize,
        mut cell: impl FnMut(&str) -> String,
    ) -> Vec<OutlineLine> {
        let mut out = vec![OutlineLine::new(marker_level, TABLE_MARKER)];
        let header = self.header_cells.iter().map(|c| {
            let text = cell(c.trim());
            if text.is_empty() {
                text
            } else {
                format!("**{text}**")
            }
        });
        let header: Vec<String> = header.collect();

        for row in std::iter::once(header).chain(
            self.rows
                .iter()
                .map(|row| row.iter().map(|c| cell(c.trim())).collect()),
        ) {
            for (depth, text) in row.into_iter().enumerate() {
                out.push(OutlineLine::new(marker_level + 1 + depth, text));
            }
        }
        out
    }

    /// Rebuilds a table from the blocks following a marker at `marker_level`.
    ///
    /// Returns the table (or why there is none) and how many of `following`
    /// belong to it. A line at the row level starts a row, a line exactly one
    /// level under the previous cell continues it, and any other descendant is
    /// a branch and skipped.
    pub fn from_outline(
        marker_level: usize,
        following: &[OutlineLine],
    ) -> (Result<TableModel, Recovery>, usize) {
        let base = marker_level + 1;
        let mut rows: Vec<Vec<String>> = vec![];
        let mut prev_level = base;
        let mut consumed = 0;

        for line in following.iter().take_while(|l| l.level > marker_level) {
            consumed += 1;
            if line.level == base {
                rows.push(vec![line.content.trim().to_string()]);
                prev_level = base;
            } else if line.level == prev_level + 1 && !rows.is_empty() {
                if let Some(row) = rows.last_mut() {
                    row.push(line.content.trim().to_string());
                }
                prev_level += 1;
            } else {
                debug!(
                    "skipping table branch at level {} (row cells end at {})",
                    line.level, prev_level
                );
            }
        }

        let mut rows = rows.into_iter();
        let Some(header) = rows.next() else {
            return (
                Err(Recovery::MalformedTable {
                    reason: "table marker without rows",
                    lines: consumed + 1,
                }),
                0,
            );
        };
        let header = header.iter().map(|c| strip_decoration(c).to_string()).collect();
        let rows = rows.collect();
        (Ok(TableModel::padded(header, vec![], rows)), consumed)
    }

    /// Renders the table as pipe-table markdown.
    pub fn to_markdown(&self) -> String {
        let mut lines = vec![pipe_row(&self.header_cells)];
        lines.push(format!(
            "|{}|",
            self.alignments
                .iter()
                .map(|a| format!(" {} ", a.separator()))
                .collect::<Vec<_>>()
                .join("|")
        ));
        lines.extend(self.rows.iter().map(|row| pipe_row(row)));
        lines.join("\n")
    }
}

/// Whether an outline block's content marks a table.
pub fn is_table_marker(content: &str) -> bool {
    let content = content.trim();
    content == TABLE_MARKER || content == SHORT_TABLE_MARKER
}

fn pipe_row(cells: &[String]) -> String {
    let cells: Vec<String> = cells
        .iter()
        .map(|c| {
            if c.trim().is_empty() {
                EMPTY_CELL.to_string()
            } else {
                format!(" {} ", c.trim())
            }
        })
        .collect();
    format!("|{}|", cells.join("|"))
}

/// Splits `| a | b |` into trimmed cells. `\|` does not split.
fn split_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = match line.strip_suffix('|') {
        Some(inner) if !inner.ends_with('\\') => inner,
        _ => line,
    };

    let mut cells = vec![];
    let mut cell = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('\\');
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

fn is_separator_cell(cell: &str) -> bool {
    cell.contains('-') && cell.chars().all(|c| matches!(c, '-' | ':' | ' '))
}

/// Removes emphasis wrapped around a whole header cell.
fn strip_decoration(cell: &str) -> &str {
    let mut cell = cell.trim();
    'outer: loop {
        for marker in HEADER_DECORATIONS {
            if cell.len() > 2 * marker.len() && cell.starts_with(marker) && cell.ends_with(marker)
            {
                cell = cell[marker.len()..cell.len() - marker.len()].trim();
                continue 'outer;
            }
        }
        return cell;
    }
}
