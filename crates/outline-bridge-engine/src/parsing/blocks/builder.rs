use log::debug;

use crate::parsing::{
    inline::{Dialect, Inline, parse_inline},
    table::TableModel,
};

use super::{
    classify::{LineClass, ListLine},
    types::{Block, List, ListFrame, ListItem},
};

#[derive(Debug)]
enum LeafState {
    None,
    Paragraph(Vec<String>),
    Quote(Vec<String>),
    Table(Vec<String>),
}

/// An open list on the frame stack.
#[derive(Debug)]
struct OpenList {
    frame: ListFrame,
    list: List,
}

/// Turns classified lines into [`Block`]s.
///
/// Lists are built with an explicit stack of frames: a line nests only when
/// its level is strictly deeper than the top frame, an equal level with a
/// different list type closes and reopens, and a closed frame becomes a
/// sub-list of its parent's last item.
pub struct BlockBuilder {
    frames: Vec<OpenList>,
    leaf: LeafState,
    pending_blank: bool,
    out: Vec<Block>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self {
            frames: vec![],
            leaf: LeafState::None,
            pending_blank: false,
            out: vec![],
        }
    }

    pub fn push(&mut self, c: &LineClass<'_>) {
        if matches!(c, LineClass::Blank) {
            if self.frames.is_empty() {
                self.flush_leaf();
            } else {
                self.pending_blank = true;
            }
            return;
        }
        let after_blank = std::mem::take(&mut self.pending_blank);

        match c {
            LineClass::Blank => {}
            LineClass::ListItem(line) => {
                self.flush_leaf();
                if after_blank {
                    self.mark_soft_break();
                }
                self.push_item(line);
            }
            LineClass::Placeholder {
                indent_level,
                kind,
                index,
            } => {
                let block = Block::Placeholder {
                    kind: *kind,
                    index: *index,
                };
                if *indent_level > 0 && !self.frames.is_empty() {
                    if after_blank {
                        self.mark_soft_break();
                    }
                    self.attach(*indent_level, block);
                } else {
                    self.close_all_lists();
                    self.flush_leaf();
                    self.out.push(block);
                }
            }
            LineClass::Heading { level, text } => {
                self.close_all_lists();
                self.flush_leaf();
                self.out.push(Block::Heading {
                    level: *level,
                    content: inlines(text),
                });
            }
            LineClass::Rule => {
                self.close_all_lists();
                self.flush_leaf();
                self.out.push(Block::Rule);
            }
            LineClass::Quote { text } => {
                self.close_all_lists();
                match &mut self.leaf {
                    LeafState::Quote(lines) => lines.push(text.to_string()),
                    _ => {
                        self.flush_leaf();
                        self.leaf = LeafState::Quote(vec![text.to_string()]);
                    }
                }
            }
            LineClass::TableRow(row) => {
                self.close_all_lists();
                match &mut self.leaf {
                    LeafState::Table(lines) => lines.push(row.to_string()),
                    _ => {
                        self.flush_leaf();
                        self.leaf = LeafState::Table(vec![row.to_string()]);
                    }
                }
            }
            LineClass::Text(text) => {
                self.close_all_lists();
                match &mut self.leaf {
                    LeafState::Paragraph(lines) => lines.push(text.to_string()),
                    _ => {
                        self.flush_leaf();
                        self.leaf = LeafState::Paragraph(vec![text.to_string()]);
                    }
                }
            }
        }
    }

    pub fn finish(mut self) -> Vec<Block> {
        // EOF flush
        self.close_all_lists();
        self.flush_leaf();
        self.out
    }

    fn push_item(&mut self, line: &ListLine<'_>) {
        while self
            .frames
            .last()
            .is_some_and(|top| top.frame.indent_level > line.indent_level)
        {
            self.close_top();
        }

        let reopen = match self.frames.last().map(|top| top.frame) {
            None => true,
            Some(top) if top.indent_level < line.indent_level => true,
            Some(top) if top.list_type != line.list_type => {
                self.close_top();
                true
            }
            Some(_) => false,
        };
        if reopen {
            self.frames.push(OpenList {
                frame: ListFrame {
                    indent_level: line.indent_level,
                    list_type: line.list_type,
                },
                list: List {
                    list_type: line.list_type,
                    items: vec![],
                },
            });
        }

        if let Some(top) = self.frames.last_mut() {
            top.list.items.push(ListItem {
                number: line.number,
                task: line.task,
                content: inlines(line.text),
                attached: vec![],
                children: vec![],
                soft_break: false,
            });
        }
    }

    /// Attaches a block to the item that owns indentation `level`.
    fn attach(&mut self, level: usize, block: Block) {
        while self.frames.len() > 1
            && self
                .frames
                .last()
                .is_some_and(|top| top.frame.indent_level >= level)
        {
            self.close_top();
        }
        if let Some(item) = self.last_item() {
            item.attached.push(block);
        }
    }

    fn last_item(&mut self) -> Option<&mut ListItem> {
        self.frames.last_mut()?.list.items.last_mut()
    }

    fn mark_soft_break(&mut self) {
        if let Some(item) = self.last_item() {
            item.soft_break = true;
        }
    }

    fn close_top(&mut self) {
        let Some(closed) = self.frames.pop() else {
            return;
        };
        match self.frames.last_mut().and_then(|p| p.list.items.last_mut()) {
            Some(parent) => parent.children.push(closed.list),
            None => self.out.push(Block::List(closed.list)),
        }
    }

    fn close_all_lists(&mut self) {
        while !self.frames.is_empty() {
            self.close_top();
        }
    }

    fn flush_leaf(&mut self) {
        match std::mem::replace(&mut self.leaf, LeafState::None) {
            LeafState::None => {}
            LeafState::Paragraph(lines) => {
                self.out
                    .push(Block::Paragraph(lines.iter().map(|l| inlines(l)).collect()));
            }
            LeafState::Quote(lines) => {
                self.out
                    .push(Block::Quote(lines.iter().map(|l| inlines(l)).collect()));
            }
            LeafState::Table(lines) => match TableModel::parse_markdown(&lines) {
                Ok(model) => self.out.push(Block::Table(model)),
                Err(err) => {
                    debug!("{err}");
                    self.out.push(Block::Paragraph(
                        lines.into_iter().map(|l| vec![Inline::Text(l)]).collect(),
                    ));
                }
            },
        }
    }
}

impl Default for BlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn inlines(text: &str) -> Vec<Inline> {
    parse_inline(text, Dialect::Markdown)
}
