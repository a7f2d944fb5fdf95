//! HTML printer.
//!
//! Text nodes pass through as written; the sanitizer that runs afterwards
//! escapes stray markup. Attribute values and code are always escaped here.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::{
    bridge::BridgeOptions,
    parsing::{
        blocks::{
            Block, List, ListType, Task,
            kinds::{BlockQuote, Heading},
        },
        inline::{Dialect, Inline, kinds::BareUrl, parse_inline},
        parse_document,
        table::{Alignment, TableModel},
    },
    vault::{ProtectedSpan, SpanKind, Vault, sentinel},
};

use super::{LinkParts, embed};

/// Paragraph content starting with one of these is not wrapped in `<p>`.
const BLOCK_TAGS: [&str; 15] = [
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "ul", "ol", "li", "table", "blockquote", "pre",
    "hr", "div",
];

/// Callouts nested deeper than this render their body as plain text.
const MAX_CALLOUT_DEPTH: usize = 8;

/// Renders markdown to unsanitized HTML.
pub fn render_fragment(markdown: &str, options: &BridgeOptions) -> String {
    fragment(markdown, options, 0)
}

/// Renders one fragment; callout bodies recurse with `depth + 1`.
fn fragment(markdown: &str, options: &BridgeOptions, depth: usize) -> String {
    let (protected, vault) = Vault::protect_all(markdown);
    let html = blocks(&parse_document(&protected), options);
    vault.restore(&html, |span, _| render_span(span, &vault, options, depth))
}

pub fn blocks(blocks: &[Block], options: &BridgeOptions) -> String {
    blocks
        .iter()
        .map(|block| self::block(block, options))
        .collect::<Vec<_>>()
        .join("\n")
}

fn block(block: &Block, options: &BridgeOptions) -> String {
    match block {
        Block::Heading { level, content } => {
            let rank = Heading::html_rank(*level);
            format!("<h{rank}>{}</h{rank}>", inlines(content, options))
        }
        Block::Rule => "<hr>".to_string(),
        Block::Quote(lines) => format!("<blockquote>{}</blockquote>", joined(lines, options)),
        Block::List(list) => self::list(list, options),
        Block::Table(model) => table(model, options),
        Block::Paragraph(lines) => {
            let content = joined(lines, options);
            if starts_with_block_tag(&content) {
                content
            } else {
                format!("<p>{content}</p>")
            }
        }
        Block::Placeholder { kind, index } => sentinel(*kind, *index),
    }
}

/// Lines of a paragraph or quote, separated by explicit breaks.
fn joined(lines: &[Vec<Inline>], options: &BridgeOptions) -> String {
    lines
        .iter()
        .map(|line| inlines(line, options))
        .collect::<Vec<_>>()
        .join("<br>")
}

fn starts_with_block_tag(html: &str) -> bool {
    let Some(rest) = html.trim_start().strip_prefix('<') else {
        return false;
    };
    let name = rest
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCK_TAGS.contains(&name.as_str())
}

fn list(list: &List, options: &BridgeOptions) -> String {
    let (open, close) = match (list.list_type, list.start()) {
        (ListType::Bullet, _) => ("<ul>".to_string(), "</ul>"),
        (ListType::Numbered, Some(start)) => (format!("<ol start=\"{start}\">"), "</ol>"),
        (ListType::Numbered, None) => ("<ol>".to_string(), "</ol>"),
    };

    let mut out = open;
    for item in &list.items {
        out.push_str("<li>");
        match item.task {
            Some(Task::Todo) => out.push_str(embed::TODO_GLYPH),
            Some(Task::Done) => out.push_str(embed::DONE_GLYPH),
            None => {}
        }
        if item.task.is_some() {
            out.push(' ');
        }
        out.push_str(&inlines(&item.content, options));
        if item.soft_break {
            out.push_str("<br>");
        }
        for attached in &item.attached {
            out.push_str(&block(attached, options));
        }
        for child in &item.children {
            out.push_str(&self::list(child, options));
        }
        out.push_str("</li>");
    }
    out.push_str(close);
    out
}

fn table(model: &TableModel, options: &BridgeOptions) -> String {
    let cell = |tag: &str, text: &str, align: Alignment| {
        let content = inlines(&parse_inline(text.trim(), Dialect::Markdown), options);
        match align.css() {
            Some(css) => format!("<{tag} style=\"text-align: {css}\">{content}</{tag}>"),
            None => format!("<{tag}>{content}</{tag}>"),
        }
    };

    let mut out = String::from("<table><thead><tr>");
    for (text, align) in model.header_cells.iter().zip(&model.alignments) {
        out.push_str(&cell("th", text, *align));
    }
    out.push_str("</tr></thead><tbody>");
    for row in &model.rows {
        out.push_str("<tr>");
        for (text, align) in row.iter().zip(&model.alignments) {
            out.push_str(&cell("td", text, *align));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

/// Prints inline nodes as HTML.
pub fn inlines(nodes: &[Inline], options: &BridgeOptions) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Inline::Text(text) => out.push_str(text),
            Inline::Strong(children) => tagged(&mut out, "strong", children, options),
            Inline::Emphasis(children) => tagged(&mut out, "em", children, options),
            Inline::Strikethrough(children) => tagged(&mut out, "del", children, options),
            Inline::Highlight(children) => tagged(&mut out, "mark", children, options),
            Inline::PageRef { title, label } => {
                let text = match label {
                    Some(label) => inlines(label, options),
                    None => encode_text(title).into_owned(),
                };
                out.push_str(&page_ref_anchor("page-ref", title, &text));
            }
            Inline::BlockRef { uid, label } => {
                let text = match label {
                    Some(label) => inlines(label, options),
                    None => format!("(({uid}))"),
                };
                out.push_str(&block_ref_anchor("block-ref", uid, &text));
            }
            Inline::Tag { title, .. } => {
                let text = format!("#{}", encode_text(title));
                out.push_str(&page_ref_anchor("tag", title, &text));
            }
            Inline::Url(url) => {
                out.push_str(&external_anchor(&BareUrl::href(url), &encode_text(url), "", options))
            }
            Inline::Protected { kind, index } => out.push_str(&sentinel(*kind, *index)),
        }
    }
    out
}

fn tagged(out: &mut String, tag: &str, children: &[Inline], options: &BridgeOptions) {
    out.push_str(&format!("<{tag}>{}</{tag}>", inlines(children, options)));
}

pub(crate) fn page_ref_anchor(class: &str, title: &str, text: &str) -> String {
    format!(
        "<a class=\"{class}\" data-page-title=\"{}\">{text}</a>",
        encode_double_quoted_attribute(title)
    )
}

pub(crate) fn block_ref_anchor(class: &str, uid: &str, text: &str) -> String {
    format!(
        "<a class=\"{class}\" data-block-uid=\"{}\">{text}</a>",
        encode_double_quoted_attribute(uid)
    )
}

/// An anchor to an outside address. `extra` holds already-escaped attributes.
pub(crate) fn external_anchor(
    href: &str,
    text: &str,
    extra: &str,
    options: &BridgeOptions,
) -> String {
    let target = if options.link_target_blank {
        " target=\"_blank\""
    } else {
        ""
    };
    format!(
        "<a{extra} href=\"{}\"{target} rel=\"noopener noreferrer\">{text}</a>",
        encode_double_quoted_attribute(href)
    )
}

/// Renders one protected span as HTML.
fn render_span(
    span: &ProtectedSpan,
    vault: &Vault,
    options: &BridgeOptions,
    depth: usize,
) -> String {
    let text = span.original_text.as_str();
    match span.kind {
        SpanKind::CodeBlock => code_block(text),
        SpanKind::InlineCode => {
            let inner = if text.starts_with("``") && text.len() >= 4 {
                text[2..text.len() - 2].trim()
            } else {
                text.trim_matches('`')
            };
            format!("<code>{}</code>", encode_text(inner))
        }
        SpanKind::Formula => text.to_string(),
        SpanKind::LinkOrImage => link_or_image(text, vault, options),
        SpanKind::MediaEmbed => embed::html(text, options),
        SpanKind::Callout => callout(text, options, depth),
    }
}

fn code_block(text: &str) -> String {
    let mut lines = text.lines();
    let opener = lines.next().unwrap_or("");
    let lang = opener.trim_start_matches(['`', '~']).trim();
    let body: Vec<&str> = lines.collect();
    let body = match body.split_last() {
        Some((_closer, inner)) => inner.join("\n"),
        None => String::new(),
    };

    if lang.is_empty() {
        format!("<pre><code>{}</code></pre>", encode_text(&body))
    } else {
        format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            encode_double_quoted_attribute(lang),
            encode_text(&body)
        )
    }
}

/// Attribute values (alt, title) get the original text of nested spans.
fn link_or_image(text: &str, vault: &Vault, options: &BridgeOptions) -> String {
    let Some(parts) = LinkParts::split(text) else {
        return text.to_string();
    };
    let title = parts
        .title
        .map(|t| {
            let t = vault.expand(t);
            format!(" title=\"{}\"", encode_double_quoted_attribute(&t))
        })
        .unwrap_or_default();

    if parts.image {
        return format!(
            "<img src=\"{}\" alt=\"{}\"{title}>",
            encode_double_quoted_attribute(parts.url),
            encode_double_quoted_attribute(&vault.expand(parts.label))
        );
    }
    let label = inlines(&parse_inline(parts.label, Dialect::Markdown), options);
    external_anchor(parts.url, &label, &title, options)
}

/// `> [!NOTE] Title` + quoted body lines.
///
/// One quote level is removed from each line, so quotes and callouts inside
/// the body keep theirs.
fn callout(text: &str, options: &BridgeOptions, depth: usize) -> String {
    let mut lines = text.lines().map(BlockQuote::strip_one);
    let first = lines.next().unwrap_or("");
    let (kind, title) = match first.strip_prefix("[!").and_then(|r| r.split_once(']')) {
        Some((kind, title)) => (kind.to_ascii_lowercase(), title.trim()),
        None => ("note".to_string(), first.trim()),
    };
    let title = if title.is_empty() {
        capitalize(&kind)
    } else {
        title.to_string()
    };
    let body = lines.collect::<Vec<_>>().join("\n");

    let mut out = format!(
        "<blockquote class=\"callout callout-{}\"><p class=\"callout-title\">{}</p>",
        encode_double_quoted_attribute(&kind),
        inlines(&parse_inline(&title, Dialect::Markdown), options)
    );
    if !body.trim().is_empty() {
        let rendered = if depth < MAX_CALLOUT_DEPTH {
            fragment(&body, options, depth + 1)
        } else {
            format!("<p>{}</p>", encode_text(&body))
        };
        out.push_str(&rendered);
    }
    out.push_str("</blockquote>");
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(markdown: &str) -> String {
        render_fragment(markdown, &BridgeOptions::default())
    }

    #[test]
    fn emphasis_and_paragraph() {
        assert_eq!(
            render("**bold** and *italic*"),
            "<p><strong>bold</strong> and <em>italic</em></p>"
        );
    }

    #[test]
    fn headings_start_at_h2() {
        assert_eq!(render("# Title"), "<h2>Title</h2>");
        assert_eq!(render("###### Deep"), "<h6>Deep</h6>");
    }

    #[test]
    fn nested_list_markup() {
        assert_eq!(
            render("- item1\n  - item2"),
            "<ul><li>item1<ul><li>item2</li></ul></li></ul>"
        );
    }

    #[test]
    fn numbered_list_keeps_its_start() {
        assert_eq!(
            render("3. three\n4. four"),
            "<ol start=\"3\"><li>three</li><li>four</li></ol>"
        );
    }

    #[test]
    fn task_items_get_glyphs() {
        assert_eq!(
            render("- [ ] todo\n- [x] done"),
            "<ul><li><span class=\"task task-todo\">☐</span> todo</li>\
             <li><span class=\"task task-done\">☑</span> done</li></ul>"
        );
    }

    #[test]
    fn soft_break_renders_after_item() {
        assert_eq!(render("- a\n\n- b"), "<ul><li>a<br></li><li>b</li></ul>");
    }

    #[test]
    fn references_become_data_anchors() {
        assert_eq!(
            render("((abc123xyz))"),
            "<p><a class=\"block-ref\" data-block-uid=\"abc123xyz\">((abc123xyz))</a></p>"
        );
        assert_eq!(
            render("[[My Page]] #tag"),
            "<p><a class=\"page-ref\" data-page-title=\"My Page\">My Page</a> \
             <a class=\"tag\" data-page-title=\"tag\">#tag</a></p>"
        );
    }

    #[test]
    fn bare_www_url_gets_https() {
        assert_eq!(
            render("www.example.com"),
            "<p><a href=\"https://www.example.com\" target=\"_blank\" \
             rel=\"noopener noreferrer\">www.example.com</a></p>"
        );
    }

    #[test]
    fn target_blank_is_optional() {
        let options = BridgeOptions {
            link_target_blank: false,
            ..BridgeOptions::default()
        };
        assert_eq!(
            render_fragment("https://x.example", &options),
            "<p><a href=\"https://x.example\" rel=\"noopener noreferrer\">https://x.example</a></p>"
        );
    }

    #[test]
    fn code_is_escaped_and_untouched() {
        assert_eq!(
            render("```html\n<b>**x**</b>\n```"),
            "<pre><code class=\"language-html\">&lt;b&gt;**x**&lt;/b&gt;</code></pre>"
        );
        assert_eq!(
            render("use `[[not a ref]]`"),
            "<p>use <code>[[not a ref]]</code></p>"
        );
    }

    #[test]
    fn image_inside_link() {
        assert_eq!(
            render("[![logo](https://img.example/l.png)](https://site.example)"),
            "<p><a href=\"https://site.example\" target=\"_blank\" rel=\"noopener noreferrer\">\
             <img src=\"https://img.example/l.png\" alt=\"logo\"></a></p>"
        );
    }

    #[test]
    fn table_with_alignment() {
        assert_eq!(
            render("| A | B |\n|:-:| - |\n| 1 | 2 |"),
            "<table><thead><tr><th style=\"text-align: center\">A</th><th>B</th></tr></thead>\
             <tbody><tr><td style=\"text-align: center\">1</td><td>2</td></tr></tbody></table>"
        );
    }

    #[test]
    fn callout_body_is_rendered() {
        assert_eq!(
            render("> [!WARNING]\n> Be **careful**"),
            "<blockquote class=\"callout callout-warning\"><p class=\"callout-title\">Warning</p>\
             <p>Be <strong>careful</strong></p></blockquote>"
        );
    }

    #[test]
    fn callout_keeps_nested_quote() {
        assert_eq!(
            render("> [!NOTE] t\n> > nested quote"),
            "<blockquote class=\"callout callout-note\"><p class=\"callout-title\">t</p>\
             <blockquote>nested quote</blockquote></blockquote>"
        );
    }

    #[test]
    fn callout_inside_callout() {
        assert_eq!(
            render("> [!NOTE] outer\n> > [!TIP] inner\n> > body"),
            "<blockquote class=\"callout callout-note\"><p class=\"callout-title\">outer</p>\
             <blockquote class=\"callout callout-tip\"><p class=\"callout-title\">inner</p>\
             <p>body</p></blockquote></blockquote>"
        );
    }

    #[test]
    fn deep_callout_nesting_is_cut_off() {
        let markdown = (0..40)
            .map(|level| format!("{}[!NOTE] level {level}", "> ".repeat(level + 1)))
            .collect::<Vec<_>>()
            .join("\n");
        let html = render(&markdown);

        assert_eq!(html.matches("callout-note").count(), MAX_CALLOUT_DEPTH + 1);
        assert_eq!(
            html.matches("<blockquote").count(),
            html.matches("</blockquote>").count()
        );
    }

    #[test]
    fn image_alt_and_title_hold_plain_text() {
        assert_eq!(
            render("![`c`](https://i.example/a.png)"),
            "<p><img src=\"https://i.example/a.png\" alt=\"`c`\"></p>"
        );
        assert_eq!(
            render("[x](https://e.example \"`t`\")"),
            "<p><a title=\"`t`\" href=\"https://e.example\" target=\"_blank\" \
             rel=\"noopener noreferrer\">x</a></p>"
        );
    }

    #[test]
    fn quote_lines_join_with_breaks() {
        assert_eq!(render("> a\n> b"), "<blockquote>a<br>b</blockquote>");
    }

    #[test]
    fn code_block_inside_list_item() {
        assert_eq!(
            render("- run\n  ```\n  cargo\n  ```"),
            "<ul><li>run<pre><code>cargo</code></pre></li></ul>"
        );
    }
}
