//! # Printers
//!
//! Independent printers from the parsed tree to each output format:
//!
//! - **`html`**: clickable markup for display (sanitized afterwards by the bridge)
//! - **`outline`**: the host's indented bullet text
//! - **`markdown`**: markdown rebuilt from outline text
//! - **`embed`**: HTML for `{{…}}` embeds and task markers
//!
//! The two plain-text dialects share [`print_inlines`] and differ only in
//! their emphasis markers.

pub mod embed;
pub mod html;
pub mod markdown;
pub mod outline;

use crate::{
    parsing::inline::{Dialect, Inline, parse_inline},
    vault::sentinel,
};

/// Emphasis markers of a plain-text dialect.
pub struct TextMarks {
    pub strong: &'static str,
    pub emphasis: &'static str,
    pub strikethrough: &'static str,
    pub highlight: &'static str,
}

pub const OUTLINE_MARKS: TextMarks = TextMarks {
    strong: "**",
    emphasis: "__",
    strikethrough: "~~",
    highlight: "^^",
};

pub const MARKDOWN_MARKS: TextMarks = TextMarks {
    strong: "**",
    emphasis: "*",
    strikethrough: "~~",
    highlight: "==",
};

/// Prints inline nodes back to text with the given markers.
///
/// Protected spans print as their sentinel, to be restored by the caller.
pub fn print_inlines(nodes: &[Inline], marks: &TextMarks) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Inline::Text(text) | Inline::Url(text) => out.push_str(text),
            Inline::Strong(children) => wrap(&mut out, marks.strong, children, marks),
            Inline::Emphasis(children) => wrap(&mut out, marks.emphasis, children, marks),
            Inline::Strikethrough(children) => {
                wrap(&mut out, marks.strikethrough, children, marks)
            }
            Inline::Highlight(children) => wrap(&mut out, marks.highlight, children, marks),
            Inline::PageRef { title, label } => match label {
                Some(label) => {
                    out.push_str(&format!("[{}]([[{title}]])", print_inlines(label, marks)))
                }
                None => out.push_str(&format!("[[{title}]]")),
            },
            Inline::BlockRef { uid, label } => match label {
                Some(label) => {
                    out.push_str(&format!("[{}]((({uid})))", print_inlines(label, marks)))
                }
                None => out.push_str(&format!("(({uid}))")),
            },
            Inline::Tag { title, bracketed } => {
                if *bracketed {
                    out.push_str(&format!("#[[{title}]]"));
                } else {
                    out.push_str(&format!("#{title}"));
                }
            }
            Inline::Protected { kind, index } => out.push_str(&sentinel(*kind, *index)),
        }
    }
    out
}

fn wrap(out: &mut String, marker: &str, children: &[Inline], marks: &TextMarks) {
    out.push_str(marker);
    out.push_str(&print_inlines(children, marks));
    out.push_str(marker);
}

/// Re-prints one line of text from one dialect into another.
pub fn translate_line(line: &str, from: Dialect, to: &TextMarks) -> String {
    print_inlines(&parse_inline(line, from), to)
}

/// The parts of a protected `[label](url "title")` or `![alt](url)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkParts<'a> {
    pub image: bool,
    pub label: &'a str,
    pub url: &'a str,
    pub title: Option<&'a str>,
}

impl<'a> LinkParts<'a> {
    pub fn split(text: &'a str) -> Option<LinkParts<'a>> {
        let image = text.starts_with('!');
        let rest = text.strip_prefix('!').unwrap_or(text).strip_prefix('[')?;
        let label_end = rest.find("](")?;
        let label = &rest[..label_end];
        let target = rest[label_end + 2..].strip_suffix(')')?;
        let (url, title) = match target.split_once(char::is_whitespace) {
            Some((url, title)) => (url, Some(title.trim().trim_matches('"'))),
            None => (target, None),
        };
        Some(LinkParts {
            image,
            label,
            url,
            title,
        })
    }

    /// The link with its label re-printed in another dialect.
    pub fn relabel(&self, from: Dialect, to: &TextMarks) -> String {
        let label = if self.image {
            self.label.to_string()
        } else {
            translate_line(self.label, from, to)
        };
        let bang = if self.image { "!" } else { "" };
        match self.title {
            Some(title) => format!("{bang}[{label}]({} \"{title}\")", self.url),
            None => format!("{bang}[{label}]({})", self.url),
        }
    }
}

/// Prefixes every line after the first with `indent`.
pub fn indent_continuations(text: &str, indent: &str) -> String {
    if indent.is_empty() {
        return text.to_string();
    }
    let mut lines = text.split('\n');
    let mut out = lines.next().unwrap_or("").to_string();
    for line in lines {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(indent);
            out.push_str(line);
        }
    }
    out
}
