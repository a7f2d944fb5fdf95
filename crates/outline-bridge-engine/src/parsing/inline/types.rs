use crate::vault::SpanKind;

/// A parsed inline node.
///
/// Nodes own their text; a block's inlines are short-lived and printed once
/// per target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Plain text, including delimiters that never found a partner.
    Text(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Highlight(Vec<Inline>),
    /// `[[Title]]`, or `[label]([[Title]])` when `label` is set.
    PageRef {
        title: String,
        label: Option<Vec<Inline>>,
    },
    /// `((uid))`, or `[label](((uid)))` when `label` is set.
    BlockRef {
        uid: String,
        label: Option<Vec<Inline>>,
    },
    /// `#title`, or `#[[title]]` when `bracketed`.
    Tag { title: String, bracketed: bool },
    /// A bare `http(s)://` or `www.` address.
    Url(String),
    /// A vault sentinel standing in for a protected span.
    Protected { kind: SpanKind, index: usize },
}
