/// `[[Title]]`
pub struct PageRef;

impl PageRef {
    pub const OPEN: &'static str = "[[";
    pub const CLOSE: &'static str = "]]";

    /// Byte length of a balanced `[[…]]` at the start of `s`, brackets included.
    ///
    /// Nested `[[…]]` pairs inside the title are kept as part of it.
    pub fn balanced_len(s: &str) -> Option<usize> {
        if !s.starts_with(Self::OPEN) {
            return None;
        }
        let mut depth = 0usize;
        let mut i = 0usize;
        while i < s.len() {
            let rest = &s[i..];
            if rest.starts_with('\n') {
                return None;
            }
            if rest.starts_with(Self::OPEN) {
                depth += 1;
                i += Self::OPEN.len();
            } else if rest.starts_with(Self::CLOSE) {
                depth -= 1;
                i += Self::CLOSE.len();
                if depth == 0 {
                    return (i > Self::OPEN.len() + Self::CLOSE.len()).then_some(i);
                }
            } else {
                i += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
        None
    }
}

/// `((uid))`
pub struct BlockRef;

impl BlockRef {
    pub const OPEN: &'static str = "((";
    pub const CLOSE: &'static str = "))";
    pub const MIN_UID: usize = 9;
    pub const MAX_UID: usize = 10;

    pub fn is_uid_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_' || c == '-'
    }

    /// The uid of a `((uid))` at the start of `s`, and the full token length.
    pub fn parse(s: &str) -> Option<(&str, usize)> {
        let inner = s.strip_prefix(Self::OPEN)?;
        let uid_len = inner
            .find(|c: char| !Self::is_uid_char(c))
            .unwrap_or(inner.len());
        let uid = &inner[..uid_len];
        let closed = inner[uid_len..].starts_with(Self::CLOSE);
        let sized = (Self::MIN_UID..=Self::MAX_UID).contains(&uid.len());
        (closed && sized).then(|| (uid, Self::OPEN.len() + uid_len + Self::CLOSE.len()))
    }
}

/// `[label](((uid)))` and `[label]([[Title]])`
pub struct NamedRef;

impl NamedRef {
    pub const LABEL_OPEN: char = '[';
    pub const LABEL_CLOSE: char = ']';
    pub const TARGET_OPEN: char = '(';
    pub const TARGET_CLOSE: char = ')';
}

/// `#word` and `#[[Multi word]]`
pub struct Tag;

impl Tag {
    pub const SIGIL: char = '#';

    /// Characters that, right before `#`, mean it is part of a URL or word.
    pub fn blocks_sigil(prev: char) -> bool {
        prev.is_alphanumeric() || matches!(prev, '_' | '/' | '&' | ':' | '=' | '?' | '#')
    }

    pub fn is_word_char(c: char) -> bool {
        c.is_alphanumeric() || matches!(c, '_' | '-' | '/')
    }
}
