/// ATX headings `#` … `######`.
pub struct Heading;

impl Heading {
    pub const MARKER: char = '#';
    pub const MAX_LEVEL: u8 = 6;

    /// Parses `## Title` into its level and title text.
    ///
    /// A marker must be followed by a space, so `#tag` stays inline.
    pub fn parse(line: &str) -> Option<(u8, &str)> {
        let trimmed = line.trim_start();
        let hashes = trimmed.chars().take_while(|&c| c == Self::MARKER).count();
        if hashes == 0 || hashes > usize::from(Self::MAX_LEVEL) {
            return None;
        }
        let rest = &trimmed[hashes..];
        if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
            return None;
        }
        let level = u8::try_from(hashes).ok()?;
        Some((level, rest.trim()))
    }

    /// HTML heading rank. `h1` belongs to the host's page title, so every
    /// level moves down one and `######` shares `h6` with `#####`.
    pub fn html_rank(level: u8) -> u8 {
        (level + 1).min(Self::MAX_LEVEL)
    }
}
