//! Reading and writing the host's indented outline text.
//!
//! A block line is `"  " × level + "- " + content`. A non-marker line indented
//! at least `(level + 1) × 2` columns under a block continues that block's
//! content; unindented non-marker lines are read as level-0 blocks.

use crate::parsing::blocks::kinds::Indent;

/// One outline block: its nesting level and its (possibly multi-line) content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineLine {
    pub level: usize,
    pub content: String,
}

impl OutlineLine {
    pub fn new(level: usize, content: impl Into<String>) -> Self {
        Self {
            level,
            content: content.into(),
        }
    }
}

pub const BULLET: &str = "- ";

/// Reads outline text into its blocks.
pub fn read_outline(text: &str) -> Vec<OutlineLine> {
    let mut out: Vec<OutlineLine> = vec![];
    // Blank lines are kept only when a continuation line follows them.
    let mut pending_blanks = 0;

    for raw in text.lines() {
        let (cols, offset) = Indent::measure(raw);
        let body = raw[offset..].trim_end();
        if body.is_empty() {
            pending_blanks += 1;
            continue;
        }

        if let Some(last) = out.last_mut() {
            let continuation_cols = (last.level + 1) * Indent::LEVEL_WIDTH;
            let is_marker = body == "-" || body.starts_with(BULLET);
            if !is_marker && cols >= continuation_cols {
                for _ in 0..=pending_blanks {
                    last.content.push('\n');
                }
                last.content
                    .push_str(Indent::strip_columns(raw, continuation_cols).trim_end());
                pending_blanks = 0;
                continue;
            }
        }
        pending_blanks = 0;

        let level = Indent::level(cols);
        let content = if body == "-" {
            ""
        } else {
            body.strip_prefix(BULLET).unwrap_or(body)
        };
        out.push(OutlineLine::new(level, content.trim_start()));
    }
    out
}

/// Writes outline blocks back to text.
///
/// Continuation lines of multi-line content are indented one level deeper
/// than the block's marker.
pub fn write_outline(lines: &[OutlineLine]) -> String {
    let mut out = String::new();
    for line in lines {
        let indent = " ".repeat(line.level * Indent::LEVEL_WIDTH);
        let mut parts = line.content.split('\n');
        let first = parts.next().unwrap_or("");

        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&indent);
        if first.is_empty() {
            out.push('-');
        } else {
            out.push_str(BULLET);
            out.push_str(first);
        }
        for rest in parts {
            out.push('\n');
            if !rest.is_empty() {
                out.push_str(&indent);
                out.push_str("  ");
                out.push_str(rest);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_levels_and_content() {
        let lines = read_outline("- a\n  - b\n    - c\n- d");
        assert_eq!(
            lines,
            vec![
                OutlineLine::new(0, "a"),
                OutlineLine::new(1, "b"),
                OutlineLine::new(2, "c"),
                OutlineLine::new(0, "d"),
            ]
        );
    }

    #[test]
    fn indented_non_marker_lines_continue_the_block() {
        let lines = read_outline("- ```rust\n  let x = 1;\n    nested();\n  ```\n- after");
        assert_eq!(
            lines,
            vec![
                OutlineLine::new(0, "```rust\nlet x = 1;\n  nested();\n```"),
                OutlineLine::new(0, "after"),
            ]
        );
    }

    #[test]
    fn unindented_text_is_a_top_level_block() {
        assert_eq!(
            read_outline("plain\n\n- bullet"),
            vec![OutlineLine::new(0, "plain"), OutlineLine::new(0, "bullet")]
        );
    }

    #[test]
    fn tabs_are_two_columns() {
        assert_eq!(
            read_outline("- a\n\t- b"),
            vec![OutlineLine::new(0, "a"), OutlineLine::new(1, "b")]
        );
    }

    #[test]
    fn blank_line_inside_continuation_is_kept() {
        let lines = read_outline("- ```\n  one\n\n  two\n  ```");
        assert_eq!(lines, vec![OutlineLine::new(0, "```\none\n\ntwo\n```")]);
    }

    #[test]
    fn write_indents_continuations() {
        let text = write_outline(&[
            OutlineLine::new(0, "# Title"),
            OutlineLine::new(1, "```\ncode\n```"),
            OutlineLine::new(1, ""),
        ]);
        assert_eq!(text, "- # Title\n  - ```\n    code\n    ```\n  -");
    }

    #[test]
    fn write_then_read_is_stable() {
        let lines = vec![
            OutlineLine::new(0, "a"),
            OutlineLine::new(1, "> quote\n> more"),
            OutlineLine::new(2, "c"),
        ];
        assert_eq!(read_outline(&write_outline(&lines)), lines);
    }
}
