//! HTML for `{{…}}` embeds.
//!
//! Media embeds (`{{[[youtube]]: url}}` and friends) become descriptive
//! anchors, named embeds pointing at a block or page become reference anchors
//! and `{{[[TODO]]}}` / `{{[[DONE]]}}` become task glyphs. Anything else is
//! shown as an inert component label.

use html_escape::encode_text;

use crate::{
    bridge::BridgeOptions,
    parsing::inline::kinds::{BareUrl, BlockRef, PageRef},
};

use super::html::{block_ref_anchor, external_anchor, page_ref_anchor};

pub const TODO_GLYPH: &str = r#"<span class="task task-todo">☐</span>"#;
pub const DONE_GLYPH: &str = r#"<span class="task task-done">☑</span>"#;

const MEDIA: [(&str, &str); 4] = [
    ("youtube", "YouTube video"),
    ("video", "Video"),
    ("audio", "Audio"),
    ("pdf", "PDF"),
];

fn unbracket(s: &str) -> &str {
    s.strip_prefix(PageRef::OPEN)
        .and_then(|s| s.strip_suffix(PageRef::CLOSE))
        .unwrap_or(s)
}

pub fn html(original: &str, options: &BridgeOptions) -> String {
    let inner = original
        .trim()
        .strip_prefix("{{")
        .and_then(|s| s.strip_suffix("}}"))
        .unwrap_or(original)
        .trim();
    let (name, arg) = match inner.split_once(':') {
        Some((name, arg)) => (unbracket(name.trim()), Some(arg.trim())),
        None => (unbracket(inner), None),
    };
    let lower = name.to_ascii_lowercase();

    let Some(arg) = arg else {
        return match lower.as_str() {
            "todo" => TODO_GLYPH.to_string(),
            "done" => DONE_GLYPH.to_string(),
            _ => component(inner),
        };
    };

    if let Some((_, label)) = MEDIA.iter().find(|(media, _)| *media == lower) {
        if BareUrl::match_len(arg) == Some(arg.len()) {
            let text = format!("{label}: {}", encode_text(arg));
            let class = format!(" class=\"media-embed media-{lower}\"");
            return external_anchor(&BareUrl::href(arg), &text, &class, options);
        }
    }

    if let Some((uid, len)) = BlockRef::parse(arg) {
        if len == arg.len() {
            let text = format!("{}: (({uid}))", encode_text(name));
            return block_ref_anchor("block-ref embed", uid, &text);
        }
    }

    if PageRef::balanced_len(arg) == Some(arg.len()) {
        let title = unbracket(arg);
        let text = format!("{}: {}", encode_text(name), encode_text(title));
        return page_ref_anchor("page-ref embed", title, &text);
    }

    if BareUrl::match_len(arg) == Some(arg.len()) {
        let text = format!("{}: {}", encode_text(name), encode_text(arg));
        return external_anchor(&BareUrl::href(arg), &text, " class=\"roam-component\"", options);
    }

    component(inner)
}

fn component(inner: &str) -> String {
    format!("<span class=\"roam-component\">{}</span>", encode_text(inner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(original: &str) -> String {
        html(original, &BridgeOptions::default())
    }

    #[test]
    fn task_markers() {
        assert_eq!(render("{{[[TODO]]}}"), TODO_GLYPH);
        assert_eq!(render("{{DONE}}"), DONE_GLYPH);
    }

    #[test]
    fn media_embed_becomes_descriptive_anchor() {
        assert_eq!(
            render("{{[[youtube]]: https://youtu.be/abc}}"),
            "<a class=\"media-embed media-youtube\" href=\"https://youtu.be/abc\" \
             target=\"_blank\" rel=\"noopener noreferrer\">YouTube video: https://youtu.be/abc</a>"
        );
    }

    #[test]
    fn named_block_embed() {
        assert_eq!(
            render("{{[[embed]]: ((abc123xyz))}}"),
            "<a class=\"block-ref embed\" data-block-uid=\"abc123xyz\">embed: ((abc123xyz))</a>"
        );
    }

    #[test]
    fn named_page_embed() {
        assert_eq!(
            render("{{[[mentions]]: [[Project X]]}}"),
            "<a class=\"page-ref embed\" data-page-title=\"Project X\">mentions: Project X</a>"
        );
    }

    #[test]
    fn unknown_component_is_inert() {
        assert_eq!(
            render("{{word-count}}"),
            "<span class=\"roam-component\">word-count</span>"
        );
    }
}
