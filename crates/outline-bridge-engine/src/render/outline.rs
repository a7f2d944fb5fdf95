//! Outline printer: markdown blocks to the host's indented bullets.
//!
//! Blocks after a heading nest one level under it until a heading of the same
//! or higher rank. Paragraphs and quotes become one bullet each, with their
//! extra lines as continuations.

use crate::{
    bridge::BridgeOptions,
    parsing::{
        blocks::{Block, List, ListType, Task},
        inline::Dialect,
        outline::{OutlineLine, write_outline},
        parse_document,
    },
    vault::{ProtectedSpan, SpanKind, Vault, sentinel},
};

use super::{LinkParts, OUTLINE_MARKS, indent_continuations, print_inlines, translate_line};

pub const TODO_MARKER: &str = "{{[[TODO]]}}";
pub const DONE_MARKER: &str = "{{[[DONE]]}}";

pub fn render(markdown: &str, options: &BridgeOptions) -> String {
    let (protected, vault) = Vault::protect_all(markdown);
    let mut writer = OutlineWriter {
        lines: vec![],
        headings: vec![],
        max_heading_level: options.max_heading_level.max(1),
    };
    for block in parse_document(&protected) {
        writer.block(&block);
    }
    let text = write_outline(&writer.lines);
    vault.restore(&text, render_span)
}

struct OutlineWriter {
    lines: Vec<OutlineLine>,
    /// Levels of the headings currently open, outermost first.
    headings: Vec<u8>,
    max_heading_level: u8,
}

impl OutlineWriter {
    fn base(&self) -> usize {
        self.headings.len()
    }

    fn emit(&mut self, level: usize, content: impl Into<String>) {
        self.lines.push(OutlineLine::new(level, content));
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Heading { level, content } => {
                while self.headings.last().is_some_and(|open| open >= level) {
                    self.headings.pop();
                }
                let hashes = "#".repeat(usize::from((*level).min(self.max_heading_level)));
                let text = print_inlines(content, &OUTLINE_MARKS);
                self.emit(self.base(), format!("{hashes} {text}"));
                self.headings.push(*level);
            }
            Block::Rule => self.emit(self.base(), "---"),
            Block::Quote(lines) => {
                let content = lines
                    .iter()
                    .map(|line| format!("> {}", print_inlines(line, &OUTLINE_MARKS)))
                    .collect::<Vec<_>>()
                    .join("\n");
                self.emit(self.base(), content);
            }
            Block::Paragraph(lines) => {
                let content = lines
                    .iter()
                    .map(|line| print_inlines(line, &OUTLINE_MARKS))
                    .collect::<Vec<_>>()
                    .join("\n");
                self.emit(self.base(), content);
            }
            Block::List(list) => self.list(list, self.base()),
            Block::Table(model) => {
                let chain = model.outline_chain(self.base(), |cell| {
                    translate_line(cell, Dialect::Markdown, &OUTLINE_MARKS)
                });
                self.lines.extend(chain);
            }
            Block::Placeholder { kind, index } => self.emit(self.base(), sentinel(*kind, *index)),
        }
    }

    fn list(&mut self, list: &List, level: usize) {
        for item in &list.items {
            let mut content = String::new();
            match item.task {
                Some(Task::Todo) => content.push_str(&format!("{TODO_MARKER} ")),
                Some(Task::Done) => content.push_str(&format!("{DONE_MARKER} ")),
                None => {}
            }
            if list.list_type == ListType::Numbered {
                content.push_str(&format!("{}. ", item.number.unwrap_or(1)));
            }
            content.push_str(&print_inlines(&item.content, &OUTLINE_MARKS));
            self.emit(level, content.trim_end());

            for attached in &item.attached {
                if let Block::Placeholder { kind, index } = attached {
                    self.emit(level + 1, sentinel(*kind, *index));
                }
            }
            for child in &item.children {
                self.list(child, level + 1);
            }
        }
    }
}

/// Spans come back as written, with link text moved to outline emphasis and
/// multi-line spans indented as continuation lines of their bullet.
fn render_span(span: &ProtectedSpan, indent: &str) -> String {
    let text = match span.kind {
        SpanKind::LinkOrImage => LinkParts::split(&span.original_text)
            .map(|parts| parts.relabel(Dialect::Markdown, &OUTLINE_MARKS))
            .unwrap_or_else(|| span.original_text.clone()),
        _ => span.original_text.clone(),
    };
    indent_continuations(&text, &format!("{indent}  "))
}
