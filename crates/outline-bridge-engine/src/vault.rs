//! # Placeholder Vault
//!
//! Fragile spans (code, links, embeds, callouts, formulas) are lifted out of a
//! message before any structural parsing and replaced by sentinel tokens. The
//! parsers and printers treat a sentinel as an opaque word; at the very end
//! [`Vault::restore`] swaps every sentinel for its rendered span.
//!
//! ## Sentinel shape
//!
//! `U+E000 KIND-index U+E001`. The private-use delimiters make every match a
//! whole-token match (`LINK-1` can never be found inside `LINK-12`), and they
//! are stripped from caller input so a message cannot forge a sentinel.
//!
//! ## Raw zones
//!
//! Inline code, formulas and callouts are raw: if their matched text contains
//! sentinels of spans protected earlier, those are folded back into the raw
//! text and the inner spans are marked absorbed. Links keep nested sentinels
//! (an image inside a link label) and rely on reverse-order restore instead.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::Recovery;

pub const SENTINEL_OPEN: char = '\u{E000}';
pub const SENTINEL_CLOSE: char = '\u{E001}';

/// What a protected span contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    CodeBlock,
    MediaEmbed,
    Callout,
    InlineCode,
    Formula,
    LinkOrImage,
}

const CODE_BLOCK_PATTERNS: &[&str] = &[
    r"(?ms)^(?P<keep>[ \t]*)```[^\n`]*\n.*?^[ \t]*```[ \t]*$",
    r"(?ms)^(?P<keep>[ \t]*)~~~[^\n~]*\n.*?^[ \t]*~~~[ \t]*$",
];
const MEDIA_EMBED_PATTERNS: &[&str] = &[r"\{\{[^{}\n]+\}\}"];
const CALLOUT_PATTERNS: &[&str] =
    &[r"(?m)^(?P<keep>[ \t]*)>[ \t]*\[![A-Za-z]+\][^\n]*(?:\n[ \t]*>[^\n]*)*"];
const INLINE_CODE_PATTERNS: &[&str] = &[r"``[^\n]+?``|`[^`\n]+`"];
const FORMULA_PATTERNS: &[&str] = &[r"\$\$[^\n]+?\$\$"];
// Images before links so `[![alt](img)](url)` nests the image inside the link.
const LINK_OR_IMAGE_PATTERNS: &[&str] = &[
    r#"!\[[^\]\n]*\]\([^()\s\[\]]+(?:\([^()\s]*\)[^()\s]*)?(?:\s+"[^"\n]*")?\)"#,
    r#"\[[^\[\]\n]*\]\([^()\s\[\]]+(?:\([^()\s]*\)[^()\s]*)?(?:\s+"[^"\n]*")?\)"#,
];

impl SpanKind {
    /// Protection order used by [`Vault::protect_in_order`].
    pub const PRIORITY: [SpanKind; 6] = [
        SpanKind::CodeBlock,
        SpanKind::MediaEmbed,
        SpanKind::Callout,
        SpanKind::InlineCode,
        SpanKind::Formula,
        SpanKind::LinkOrImage,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            SpanKind::CodeBlock => "CODEBLOCK",
            SpanKind::MediaEmbed => "EMBED",
            SpanKind::Callout => "CALLOUT",
            SpanKind::InlineCode => "CODE",
            SpanKind::Formula => "FORMULA",
            SpanKind::LinkOrImage => "LINK",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        SpanKind::PRIORITY.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Raw zones keep their text verbatim, nested sentinels included.
    pub fn is_raw_zone(self) -> bool {
        matches!(
            self,
            SpanKind::InlineCode | SpanKind::Formula | SpanKind::Callout
        )
    }

    /// Spans that render as blocks and therefore occupy a line of their own.
    pub fn is_block_level(self) -> bool {
        matches!(self, SpanKind::CodeBlock | SpanKind::Callout)
    }

    fn patterns(self) -> &'static [Regex] {
        static CODE_BLOCK: OnceLock<Vec<Regex>> = OnceLock::new();
        static MEDIA_EMBED: OnceLock<Vec<Regex>> = OnceLock::new();
        static CALLOUT: OnceLock<Vec<Regex>> = OnceLock::new();
        static INLINE_CODE: OnceLock<Vec<Regex>> = OnceLock::new();
        static FORMULA: OnceLock<Vec<Regex>> = OnceLock::new();
        static LINK_OR_IMAGE: OnceLock<Vec<Regex>> = OnceLock::new();

        let (cell, sources) = match self {
            SpanKind::CodeBlock => (&CODE_BLOCK, CODE_BLOCK_PATTERNS),
            SpanKind::MediaEmbed => (&MEDIA_EMBED, MEDIA_EMBED_PATTERNS),
            SpanKind::Callout => (&CALLOUT, CALLOUT_PATTERNS),
            SpanKind::InlineCode => (&INLINE_CODE, INLINE_CODE_PATTERNS),
            SpanKind::Formula => (&FORMULA, FORMULA_PATTERNS),
            SpanKind::LinkOrImage => (&LINK_OR_IMAGE, LINK_OR_IMAGE_PATTERNS),
        };
        cell.get_or_init(|| {
            sources
                .iter()
                .map(|src| Regex::new(src).expect("invalid vault pattern"))
                .collect()
        })
    }
}

/// One span lifted out of the text, owned by the vault that protected it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedSpan {
    pub kind: SpanKind,
    /// Position in the vault; also the number in the sentinel.
    pub index: usize,
    /// The matched text, with any kept indentation removed from its lines.
    pub original_text: String,
    absorbed: bool,
}

/// Whether `c` is one of the two sentinel delimiters.
pub fn is_sentinel_char(c: char) -> bool {
    c == SENTINEL_OPEN || c == SENTINEL_CLOSE
}

/// Builds the sentinel token for a span.
pub fn sentinel(kind: SpanKind, index: usize) -> String {
    format!("{SENTINEL_OPEN}{}-{index}{SENTINEL_CLOSE}", kind.tag())
}

/// Parses a sentinel at the start of `s`.
///
/// Returns the span kind, its index and the byte length of the token.
pub fn parse_sentinel(s: &str) -> Option<(SpanKind, usize, usize)> {
    let rest = s.strip_prefix(SENTINEL_OPEN)?;
    let close = rest.find(SENTINEL_CLOSE)?;
    let (tag, index) = rest[..close].split_once('-')?;
    let kind = SpanKind::from_tag(tag)?;
    let index = index.parse().ok()?;
    Some((
        kind,
        index,
        SENTINEL_OPEN.len_utf8() + close + SENTINEL_CLOSE.len_utf8(),
    ))
}

/// Returns the block-level span a line consists of, if the line holds nothing else.
pub fn block_placeholder(line: &str) -> Option<(SpanKind, usize)> {
    let trimmed = line.trim();
    let (kind, index, len) = parse_sentinel(trimmed)?;
    (len == trimmed.len() && kind.is_block_level()).then_some((kind, index))
}

fn sentinel_regex() -> &'static Regex {
    static SENTINEL: OnceLock<Regex> = OnceLock::new();
    SENTINEL.get_or_init(|| {
        Regex::new(&format!("{SENTINEL_OPEN}[A-Z]+-[0-9]+{SENTINEL_CLOSE}"))
            .expect("invalid sentinel regex")
    })
}

/// Per-call table of protected spans.
#[derive(Debug, Default)]
pub struct Vault {
    spans: Vec<ProtectedSpan>,
}

impl Vault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Protects every kind of span in priority order with a fresh vault.
    pub fn protect_all(text: &str) -> (String, Vault) {
        let mut vault = Vault::new();
        let protected = vault.protect_in_order(text);
        (protected, vault)
    }

    /// Protects every kind of span in priority order, appending to this vault.
    ///
    /// Sentinel delimiters already present in `text` are removed first.
    pub fn protect_in_order(&mut self, text: &str) -> String {
        let mut out = text.replace([SENTINEL_OPEN, SENTINEL_CLOSE], "");
        for kind in SpanKind::PRIORITY {
            out = self.protect(&out, kind);
        }
        out
    }

    /// Replaces every non-overlapping match of `kind`'s patterns with a sentinel.
    pub fn protect(&mut self, text: &str, kind: SpanKind) -> String {
        let mut out = text.to_string();
        for re in kind.patterns() {
            out = re
                .replace_all(&out, |caps: &Captures<'_>| self.extract(kind, caps))
                .into_owned();
        }
        out
    }

    fn extract(&mut self, kind: SpanKind, caps: &Captures<'_>) -> String {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        let keep = caps.name("keep").map_or("", |m| m.as_str());
        let body = dedent_continuations(&whole[keep.len()..], keep.len());
        let original_text = if kind.is_raw_zone() {
            self.absorb(&body)
        } else {
            body
        };

        let index = self.spans.len();
        self.spans.push(ProtectedSpan {
            kind,
            index,
            original_text,
            absorbed: false,
        });
        format!("{keep}{}", sentinel(kind, index))
    }

    /// Folds sentinels found in `text` back into their original text.
    fn absorb(&mut self, text: &str) -> String {
        sentinel_regex()
            .replace_all(text, |caps: &Captures<'_>| {
                let token = &caps[0];
                let live = parse_sentinel(token).and_then(|(kind, index, _)| {
                    self.spans
                        .get(index)
                        .filter(|span| span.kind == kind && !span.absorbed)
                        .map(|span| span.index)
                });
                match live {
                    Some(index) => {
                        self.spans[index].absorbed = true;
                        let inner = self.spans[index].original_text.clone();
                        self.absorb(&inner)
                    }
                    None => token.to_string(),
                }
            })
            .into_owned()
    }

    /// Replaces every sentinel in `text` with the original text of its span,
    /// recursively. For attribute values, which cannot hold rendered markup.
    pub fn expand(&self, text: &str) -> String {
        sentinel_regex()
            .replace_all(text, |caps: &Captures<'_>| {
                let token = &caps[0];
                let span = parse_sentinel(token).and_then(|(kind, index, _)| {
                    self.spans.get(index).filter(|span| span.kind == kind)
                });
                match span {
                    Some(span) => self.expand(&span.original_text),
                    None => token.to_string(),
                }
            })
            .into_owned()
    }

    pub fn get(&self, index: usize) -> Option<&ProtectedSpan> {
        self.spans.get(index)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Substitutes every live span back into `text`, innermost last.
    ///
    /// Spans are visited in reverse protection order so a link is restored
    /// before the image sentinel inside its label. `render` receives the span
    /// and the leading whitespace of the line hosting its sentinel, which lets
    /// multi-line replacements indent their continuation lines.
    pub fn restore<F>(&self, text: &str, mut render: F) -> String
    where
        F: FnMut(&ProtectedSpan, &str) -> String,
    {
        let mut out = text.to_string();
        for span in self.spans.iter().rev().filter(|span| !span.absorbed) {
            let token = sentinel(span.kind, span.index);
            let Some(at) = out.find(&token) else {
                log::debug!(
                    "{}-{} was dropped before restore",
                    span.kind.tag(),
                    span.index
                );
                continue;
            };
            let replacement = render(span, line_indent(&out, at));
            out.replace_range(at..at + token.len(), &replacement);
        }

        for leftover in sentinel_regex().find_iter(&out) {
            let token = leftover
                .as_str()
                .trim_matches([SENTINEL_OPEN, SENTINEL_CLOSE])
                .to_string();
            log::debug!("{}", Recovery::UnknownSentinel { token });
        }
        out
    }
}

/// Leading whitespace of the line containing byte offset `at`.
fn line_indent(text: &str, at: usize) -> &str {
    let start = text[..at].rfind('\n').map_or(0, |i| i + 1);
    let line = &text[start..at];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

/// Removes up to `width` columns of indentation from every line but the first.
fn dedent_continuations(body: &str, width: usize) -> String {
    if width == 0 {
        return body.to_string();
    }
    body.split('\n')
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                return line;
            }
            let ws = line.len() - line.trim_start_matches([' ', '\t']).len();
            &line[ws.min(width)..]
        })
        .collect::<Vec<_>>()
        .join("\n")
}
