use crate::vault::{SpanKind, block_placeholder};

use super::{
    kinds::{BlockQuote, Heading, Indent, ListMarker, Rule, TaskBox},
    types::{ListType, Task},
};

/// The list-specific facts of a list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLine<'a> {
    pub indent_level: usize,
    pub list_type: ListType,
    pub number: Option<u64>,
    pub task: Option<Task>,
    pub text: &'a str,
}

/// Classification of a single line containing only local facts.
///
/// This is phase 1 of block parsing: each line is classified independently
/// without reference to surrounding context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    Blank,
    /// The line holds nothing but one code-block or callout sentinel.
    Placeholder {
        indent_level: usize,
        kind: SpanKind,
        index: usize,
    },
    Heading {
        level: u8,
        text: &'a str,
    },
    Rule,
    Quote {
        text: &'a str,
    },
    ListItem(ListLine<'a>),
    TableRow(&'a str),
    Text(&'a str),
}

/// Classifies individual lines for the block parsing phase.
pub struct MarkdownLineClassifier;

impl MarkdownLineClassifier {
    /// Classifies a line into a [`LineClass`].
    ///
    /// Rules are checked before list markers so `- - -` is a rule.
    pub fn classify<'a>(&self, line: &'a str) -> LineClass<'a> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return LineClass::Blank;
        }

        let (cols, offset) = Indent::measure(line);
        let body = &line[offset..];

        if let Some((kind, index)) = block_placeholder(line) {
            return LineClass::Placeholder {
                indent_level: Indent::level(cols),
                kind,
                index,
            };
        }
        if let Some((level, text)) = Heading::parse(line) {
            return LineClass::Heading { level, text };
        }
        if Rule::matches(line) {
            return LineClass::Rule;
        }
        let (depth, quoted) = BlockQuote::strip_prefixes(line);
        if depth > 0 {
            return LineClass::Quote {
                text: quoted.trim_end(),
            };
        }
        if let Some(marker) = ListMarker::parse(body) {
            let (task, text) = TaskBox::parse(&body[marker.len..]);
            return LineClass::ListItem(ListLine {
                indent_level: Indent::level(cols),
                list_type: marker.list_type,
                number: marker.number,
                task,
                text: text.trim(),
            });
        }
        if body.starts_with('|') {
            return LineClass::TableRow(body.trim_end());
        }
        LineClass::Text(body.trim_end())
    }
}
