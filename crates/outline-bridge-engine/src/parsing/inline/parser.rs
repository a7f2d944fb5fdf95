use log::debug;

use crate::{
    error::Recovery,
    vault::{SENTINEL_OPEN, parse_sentinel},
};

use super::{
    Dialect,
    cursor::Cursor,
    kinds::{BareUrl, BlockRef, Delimiter, Emphasis, EmphasisRole, NamedRef, PageRef, Tag},
    types::Inline,
};

/// Emphasis nested deeper than this stays literal text.
pub const MAX_NESTING: usize = 32;

/// Parses one block's vault-protected text into [`Inline`] nodes.
///
/// Constructs are tried in precedence order at every position; text between
/// them is emitted as `Inline::Text`. Delimiters that never find a partner
/// stay in the text.
pub fn parse_inline(s: &str, dialect: Dialect) -> Vec<Inline> {
    parse_nested(s, dialect, 0)
}

/// Offsets from which each delimiter is known to have no closer.
///
/// A delimiter with no closer after offset `p` has none after any later
/// offset either, so each spelling scans a given text at most once.
#[derive(Default)]
struct Unclosed([Option<usize>; Emphasis::DELIMITERS.len()]);

impl Unclosed {
    fn known(&self, slot: usize, from: usize) -> bool {
        self.0[slot].is_some_and(|failed| from >= failed)
    }

    fn record(&mut self, slot: usize, from: usize) {
        let failed = self.0[slot].map_or(from, |prev| prev.min(from));
        self.0[slot] = Some(failed);
    }
}

fn parse_nested(s: &str, dialect: Dialect, depth: usize) -> Vec<Inline> {
    let mut cur = Cursor::new(s);
    let mut unclosed = Unclosed::default();
    let mut out = vec![];
    let mut text = String::new();

    fn flush_text(out: &mut Vec<Inline>, text: &mut String) {
        if !text.is_empty() {
            out.push(Inline::Text(std::mem::take(text)));
        }
    }

    while let Some(c) = cur.peek() {
        let node = try_parse_sentinel(&mut cur)
            .or_else(|| try_parse_url(&mut cur))
            .or_else(|| try_parse_emphasis(&mut cur, dialect, depth, &mut unclosed))
            .or_else(|| try_parse_named_ref(&mut cur, dialect, depth))
            .or_else(|| try_parse_page_ref(&mut cur))
            .or_else(|| try_parse_block_ref(&mut cur))
            .or_else(|| try_parse_tag(&mut cur));

        match node {
            Some(node) => {
                flush_text(&mut out, &mut text);
                out.push(node);
            }
            None => {
                text.push(c);
                cur.bump();
            }
        }
    }

    flush_text(&mut out, &mut text);
    out
}

fn try_parse_sentinel(cur: &mut Cursor<'_>) -> Option<Inline> {
    if cur.peek() != Some(SENTINEL_OPEN) {
        return None;
    }
    let (kind, index, len) = parse_sentinel(cur.rest())?;
    cur.bump_n(len);
    Some(Inline::Protected { kind, index })
}

fn try_parse_url(cur: &mut Cursor<'_>) -> Option<Inline> {
    if !matches!(cur.peek(), Some('h' | 'w')) || cur.prev().is_some_and(char::is_alphanumeric) {
        return None;
    }
    let len = BareUrl::match_len(cur.rest())?;
    let url = cur.slice(cur.pos(), cur.pos() + len).to_string();
    cur.bump_n(len);
    Some(Inline::Url(url))
}

/// Number of consecutive `ch` at the start of `s`.
fn run_len(s: &str, ch: char) -> usize {
    s.chars().take_while(|&c| c == ch).count()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// Attempts every delimiter spelling that can open at the cursor.
///
/// On failure the cursor is left where it was.
fn try_parse_emphasis(
    cur: &mut Cursor<'_>,
    dialect: Dialect,
    depth: usize,
    unclosed: &mut Unclosed,
) -> Option<Inline> {
    let c = cur.peek()?;
    if !Emphasis::starts_delimiter(c) || depth >= MAX_NESTING {
        return None;
    }
    // Openers only distinguish runs of one, two and three or more.
    let run = cur.rest().chars().take_while(|&x| x == c).take(3).count();

    for (slot, delim) in Emphasis::DELIMITERS
        .iter()
        .enumerate()
        .filter(|(_, d)| d.ch() == c && d.enabled_in(dialect))
    {
        if !opens_run(delim, run) {
            continue;
        }
        if delim.word_bound && cur.prev().is_some_and(is_word_char) {
            continue;
        }
        let inner_start = cur.pos() + delim.marker.len();
        let after = cur.s[inner_start..].chars().next();
        if after.is_none_or(char::is_whitespace) || unclosed.known(slot, inner_start) {
            continue;
        }

        match find_closer(cur.s, inner_start, delim) {
            Some(close) => {
                let inner = cur.slice(inner_start, close);
                let children = parse_nested(inner, dialect, depth + 1);
                cur.i = close + delim.marker.len();
                return Some(wrap(delim.role.resolve(dialect), children));
            }
            None => {
                unclosed.record(slot, inner_start);
                debug!(
                    "{}",
                    Recovery::UnbalancedDelimiter {
                        delimiter: delim.marker
                    }
                );
            }
        }
    }
    None
}

/// Whether a run of `run` marker characters can open `delim`.
fn opens_run(delim: &Delimiter, run: usize) -> bool {
    match delim.marker.len() {
        1 => run != 2,
        width => run >= width,
    }
}

/// Byte offset of the closing delimiter for a span whose content starts at `from`.
///
/// A closer is the tail of a run of marker characters that is not preceded
/// by whitespace; word-bound delimiters must also not be followed by a word
/// character.
fn find_closer(s: &str, from: usize, delim: &Delimiter) -> Option<usize> {
    let ch = delim.ch();
    let width = delim.marker.len();
    let mut i = from;

    while let Some(c) = s.get(i..).and_then(|rest| rest.chars().next()) {
        if c != ch {
            i += c.len_utf8();
            continue;
        }
        let run = run_len(&s[i..], ch);
        let preceded_by_space = s[..i].chars().next_back().is_none_or(char::is_whitespace);

        if i > from && !preceded_by_space && delim.closes_run(run) {
            let close = i + run - width;
            let followed_by_word = s[close + width..].chars().next().is_some_and(is_word_char);
            if !(delim.word_bound && followed_by_word) {
                return Some(close);
            }
        }
        i += run * ch.len_utf8();
    }
    None
}

fn wrap(role: EmphasisRole, children: Vec<Inline>) -> Inline {
    match role {
        EmphasisRole::StrongEmphasis => Inline::Strong(vec![Inline::Emphasis(children)]),
        EmphasisRole::Strong | EmphasisRole::DoubleUnderscore => Inline::Strong(children),
        EmphasisRole::Strikethrough => Inline::Strikethrough(children),
        EmphasisRole::Highlight => Inline::Highlight(children),
        EmphasisRole::Emphasis => Inline::Emphasis(children),
    }
}

/// Attempts `[label](((uid)))` or `[label]([[Title]])`.
///
/// Matched before the bare forms so the label and the reference stay one token.
fn try_parse_named_ref(cur: &mut Cursor<'_>, dialect: Dialect, depth: usize) -> Option<Inline> {
    if cur.peek() != Some(NamedRef::LABEL_OPEN) || cur.starts_with(PageRef::OPEN) {
        return None;
    }
    let rest = cur.rest();
    let label_end = 1 + rest[1..].find([NamedRef::LABEL_CLOSE, NamedRef::LABEL_OPEN, '\n'])?;
    if !rest[label_end..].starts_with(NamedRef::LABEL_CLOSE) || label_end <= 1 {
        return None;
    }
    let label = parse_nested(&rest[1..label_end], dialect, depth + 1);

    let target_start = label_end + 1;
    let target = rest[target_start..].strip_prefix(NamedRef::TARGET_OPEN)?;

    let (node, target_len) = if let Some((uid, len)) = BlockRef::parse(target) {
        (
            Inline::BlockRef {
                uid: uid.to_string(),
                label: Some(label),
            },
            len,
        )
    } else {
        let len = PageRef::balanced_len(target)?;
        (
            Inline::PageRef {
                title: page_title(&target[..len]).to_string(),
                label: Some(label),
            },
            len,
        )
    };

    if !target[target_len..].starts_with(NamedRef::TARGET_CLOSE) {
        return None;
    }
    cur.bump_n(target_start + 1 + target_len + 1);
    Some(node)
}

/// The title inside a balanced `[[…]]` token.
fn page_title(token: &str) -> &str {
    &token[PageRef::OPEN.len()..token.len() - PageRef::CLOSE.len()]
}

fn try_parse_page_ref(cur: &mut Cursor<'_>) -> Option<Inline> {
    let len = PageRef::balanced_len(cur.rest())?;
    let title = page_title(&cur.rest()[..len]).to_string();
    cur.bump_n(len);
    Some(Inline::PageRef { title, label: None })
}

fn try_parse_block_ref(cur: &mut Cursor<'_>) -> Option<Inline> {
    let (uid, len) = BlockRef::parse(cur.rest())?;
    let uid = uid.to_string();
    cur.bump_n(len);
    Some(Inline::BlockRef { uid, label: None })
}

/// Attempts `#word` or `#[[Multi word]]`.
///
/// A `#` after a word character or URL punctuation is never a tag.
fn try_parse_tag(cur: &mut Cursor<'_>) -> Option<Inline> {
    if cur.peek() != Some(Tag::SIGIL) || cur.prev().is_some_and(Tag::blocks_sigil) {
        return None;
    }
    let after = &cur.rest()[Tag::SIGIL.len_utf8()..];

    if let Some(len) = PageRef::balanced_len(after) {
        let title = page_title(&after[..len]).to_string();
        cur.bump_n(Tag::SIGIL.len_utf8() + len);
        return Some(Inline::Tag {
            title,
            bracketed: true,
        });
    }

    let len = after
        .find(|c: char| !Tag::is_word_char(c))
        .unwrap_or(after.len());
    if len == 0 {
        return None;
    }
    let title = after[..len].to_string();
    cur.bump_n(Tag::SIGIL.len_utf8() + len);
    Some(Inline::Tag {
        title,
        bracketed: false,
    })
}
