use crate::{
    parsing::{inline::Inline, table::TableModel},
    vault::SpanKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    Bullet,
    Numbered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Todo,
    Done,
}

/// A stack entry for one currently-open list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListFrame {
    pub indent_level: usize,
    pub list_type: ListType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// The number written in the source, for numbered items.
    pub number: Option<u64>,
    pub task: Option<Task>,
    pub content: Vec<Inline>,
    /// Block placeholders (code, callouts) indented under this item.
    pub attached: Vec<Block>,
    pub children: Vec<List>,
    /// A blank line followed this item inside the list.
    pub soft_break: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub list_type: ListType,
    pub items: Vec<ListItem>,
}

impl List {
    /// First number of a numbered list, when it is not 1.
    pub fn start(&self) -> Option<u64> {
        self.items
            .first()
            .and_then(|item| item.number)
            .filter(|&n| n != 1)
    }
}

/// A parsed block of a markdown message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `level` is the number of `#` written (1–6).
    Heading { level: u8, content: Vec<Inline> },
    Rule,
    /// One entry per quoted line.
    Quote(Vec<Vec<Inline>>),
    List(List),
    Table(TableModel),
    /// One entry per source line.
    Paragraph(Vec<Vec<Inline>>),
    /// A line holding only a code-block or callout sentinel.
    Placeholder { kind: SpanKind, index: usize },
}
