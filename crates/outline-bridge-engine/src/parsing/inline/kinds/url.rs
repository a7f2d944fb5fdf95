use crate::vault::is_sentinel_char;

/// Bare `http://`, `https://` and `www.` addresses.
pub struct BareUrl;

impl BareUrl {
    pub const PREFIXES: [&'static str; 3] = ["https://", "http://", "www."];
    /// Trailing punctuation that belongs to the sentence, not the address.
    pub const TRAILING: [char; 8] = ['.', ',', ':', ';', '!', '?', '*', '~'];

    /// Length of the address at the start of `s`, if one starts there.
    pub fn match_len(s: &str) -> Option<usize> {
        let prefix = Self::PREFIXES.iter().find(|p| s.starts_with(**p))?;
        let end = s
            .find(|c: char| {
                c.is_whitespace() || matches!(c, '<' | '>' | '"') || is_sentinel_char(c)
            })
            .unwrap_or(s.len());
        let mut url = &s[..end];

        loop {
            let Some(last) = url.chars().next_back() else {
                break;
            };
            let unbalanced_paren =
                last == ')' && url.matches('(').count() < url.matches(')').count();
            if Self::TRAILING.contains(&last) || unbalanced_paren {
                url = &url[..url.len() - last.len_utf8()];
            } else {
                break;
            }
        }

        (url.len() > prefix.len()).then_some(url.len())
    }

    /// The address with a scheme, for use in `href`.
    pub fn href(url: &str) -> String {
        if url.starts_with("www.") {
            format!("https://{url}")
        } else {
            url.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_punctuation_is_trimmed() {
        assert_eq!(BareUrl::match_len("https://example.com/a."), Some(21));
        assert_eq!(BareUrl::match_len("www.example.com, then"), Some(15));
    }

    #[test]
    fn balanced_parens_stay() {
        let s = "https://en.wikipedia.org/wiki/Rust_(language))";
        assert_eq!(BareUrl::match_len(s), Some(s.len() - 1));
    }

    #[test]
    fn bare_prefix_is_not_a_url() {
        assert_eq!(BareUrl::match_len("https:// nothing"), None);
        assert_eq!(BareUrl::match_len("plain"), None);
    }

    #[test]
    fn www_gets_a_scheme() {
        assert_eq!(BareUrl::href("www.example.com"), "https://www.example.com");
        assert_eq!(BareUrl::href("http://x.org"), "http://x.org");
    }
}
