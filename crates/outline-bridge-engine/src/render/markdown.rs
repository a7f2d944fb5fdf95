//! Markdown printer: outline text back to markdown.
//!
//! Heading bullets become ATX headings and their children move back out to
//! the heading's indentation. Table markers become pipe tables. Bullets whose
//! content is a fence, callout, quote or rule become that block; every other
//! bullet is a list item at its depth.

use log::debug;

use crate::{
    parsing::{
        blocks::kinds::{Heading, ListMarker, Rule},
        blocks::ListType,
        inline::Dialect,
        outline::read_outline,
        table::{TableModel, is_table_marker},
    },
    vault::{ProtectedSpan, SpanKind, Vault, block_placeholder},
};

use super::{LinkParts, MARKDOWN_MARKS, indent_continuations, translate_line};

const TODO_MARKERS: [&str; 2] = ["{{[[TODO]]}}", "{{TODO}}"];
const DONE_MARKERS: [&str; 2] = ["{{[[DONE]]}}", "{{DONE}}"];

pub fn render(outline: &str) -> String {
    let lines = read_outline(outline);
    let mut vault = Vault::new();
    let mut writer = MarkdownWriter::default();
    // Outline levels of the heading bullets currently open.
    let mut headings: Vec<usize> = vec![];
    let mut i = 0;

    while let Some(line) = lines.get(i) {
        i += 1;
        while headings.last().is_some_and(|&open| open >= line.level) {
            headings.pop();
        }
        let depth = line
            .level
            .saturating_sub(headings.last().map_or(0, |&open| open + 1));
        let indent = "  ".repeat(depth);

        if is_table_marker(&line.content) {
            match TableModel::from_outline(line.level, &lines[i..]) {
                (Ok(mut model), consumed) => {
                    for cell in model
                        .header_cells
                        .iter_mut()
                        .chain(model.rows.iter_mut().flatten())
                    {
                        *cell = convert(&mut vault, cell);
                    }
                    let table = indent_continuations(&model.to_markdown(), &indent);
                    writer.block(depth, &format!("{indent}{table}"));
                    i += consumed;
                    continue;
                }
                (Err(err), _) => debug!("{err}"),
            }
        }

        let (task, content) = split_task(&line.content);
        let converted = convert(&mut vault, content);
        let first = converted.lines().next().unwrap_or("");

        if task.is_none() && !converted.contains('\n') {
            if let Some((level, text)) = Heading::parse(&converted) {
                writer.block(0, &format!("{} {text}", "#".repeat(usize::from(level))));
                headings.push(line.level);
                continue;
            }
        }

        let standalone = block_placeholder(first).is_some()
            || first.starts_with('>')
            || (Rule::matches(first) && !converted.contains('\n'));
        if task.is_none() && standalone {
            let block = if Rule::matches(first) {
                Rule::MARKDOWN.to_string()
            } else {
                converted
            };
            writer.block(depth, &format!("{indent}{}", indent_continuations(&block, &indent)));
            continue;
        }

        let (marker, text) = match ListMarker::parse(&converted) {
            Some(m) if m.list_type == ListType::Numbered => {
                (converted[..m.len].trim_end().to_string(), &converted[m.len..])
            }
            _ => ("-".to_string(), converted.as_str()),
        };
        let task = task.map(|done| if done { "[x] " } else { "[ ] " }).unwrap_or("");
        let continuation = format!("{indent}{}", " ".repeat(marker.len() + 1));
        writer.list_line(&format!(
            "{indent}{marker} {task}{}",
            indent_continuations(text, &continuation)
        ));
    }

    vault.restore(&writer.out, render_span)
}

/// Splits a leading task marker off a bullet's content. `Some(true)` is done.
fn split_task(content: &str) -> (Option<bool>, &str) {
    for marker in TODO_MARKERS {
        if let Some(rest) = content.strip_prefix(marker) {
            return (Some(false), rest.trim_start());
        }
    }
    for marker in DONE_MARKERS {
        if let Some(rest) = content.strip_prefix(marker) {
            return (Some(true), rest.trim_start());
        }
    }
    (None, content)
}

/// Protects one bullet's content and re-prints each line as markdown.
fn convert(vault: &mut Vault, content: &str) -> String {
    vault
        .protect_in_order(content)
        .split('\n')
        .map(|line| translate_line(line, Dialect::Outline, &MARKDOWN_MARKS))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_span(span: &ProtectedSpan, indent: &str) -> String {
    let text = match span.kind {
        SpanKind::LinkOrImage => LinkParts::split(&span.original_text)
            .map(|parts| parts.relabel(Dialect::Outline, &MARKDOWN_MARKS))
            .unwrap_or_else(|| span.original_text.clone()),
        _ => span.original_text.clone(),
    };
    indent_continuations(&text, indent)
}

/// Joins blocks with blank lines and keeps consecutive list lines together.
#[derive(Default)]
struct MarkdownWriter {
    out: String,
    in_list: bool,
}

impl MarkdownWriter {
    /// A standalone block. Nested ones stay inside the surrounding list.
    fn block(&mut self, depth: usize, text: &str) {
        if depth > 0 && self.in_list {
            self.out.push('\n');
        } else if !self.out.is_empty() {
            self.out.push_str("\n\n");
        }
        self.out.push_str(text);
        self.in_list = depth > 0 && self.in_list;
    }

    fn list_line(&mut self, text: &str) {
        if self.in_list {
            self.out.push('\n');
        } else if !self.out.is_empty() {
            self.out.push_str("\n\n");
        }
        self.out.push_str(text);
        self.in_list = true;
    }
}
