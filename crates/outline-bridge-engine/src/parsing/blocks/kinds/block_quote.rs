/// Blockquote line syntax.
pub struct BlockQuote;

impl BlockQuote {
    pub const PREFIX: char = '>';
    /// What printers put in front of a quoted line.
    pub const MARKER: &'static str = "> ";

    /// Strips every leading `>` (with its optional space) from a line.
    ///
    /// Nested quotes fold into one, so only the depth and the remaining text
    /// are reported.
    ///
    /// # Returns
    /// - `depth`: number of `>` prefixes found (0 if not a blockquote)
    /// - the text after the last prefix
    pub fn strip_prefixes(s: &str) -> (u8, &str) {
        let mut rest = s;
        let mut depth = 0u8;

        loop {
            let trimmed = rest.trim_start_matches([' ', '\t']);
            match trimmed.strip_prefix(Self::PREFIX) {
                Some(after) => {
                    depth = depth.saturating_add(1);
                    rest = after.strip_prefix(' ').unwrap_or(after);
                }
                None => break,
            }
        }
        if depth == 0 { (0, s) } else { (depth, rest) }
    }

    /// Strips one leading `>` and its optional space; other lines pass through.
    pub fn strip_one(s: &str) -> &str {
        match s.trim_start_matches([' ', '\t']).strip_prefix(Self::PREFIX) {
            Some(after) => after.strip_prefix(' ').unwrap_or(after),
            None => s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_no_quote() {
        assert_eq!(BlockQuote::strip_prefixes("hello"), (0, "hello"));
    }

    #[test]
    fn strip_single_quote() {
        assert_eq!(BlockQuote::strip_prefixes("> hello"), (1, "hello"));
    }

    #[test]
    fn strip_spaced_nested_quote() {
        assert_eq!(BlockQuote::strip_prefixes("> > hello"), (2, "hello"));
    }

    #[test]
    fn strip_nested_quote_no_space() {
        assert_eq!(BlockQuote::strip_prefixes(">> hello"), (2, "hello"));
    }

    #[test]
    fn strip_one_keeps_inner_levels() {
        assert_eq!(BlockQuote::strip_one("> > nested"), "> nested");
        assert_eq!(BlockQuote::strip_one(">>x"), ">x");
        assert_eq!(BlockQuote::strip_one("  > body"), "body");
        assert_eq!(BlockQuote::strip_one("plain"), "plain");
    }

    #[test]
    fn empty_quote_line() {
        assert_eq!(BlockQuote::strip_prefixes(">"), (1, ""));
    }
}
