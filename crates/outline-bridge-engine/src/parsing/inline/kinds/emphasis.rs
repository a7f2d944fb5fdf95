use crate::parsing::inline::Dialect;

/// What a delimiter pair means once matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmphasisRole {
    StrongEmphasis,
    Strong,
    Strikethrough,
    Highlight,
    /// `__x__`: strong in markdown, italic in the outline dialect.
    DoubleUnderscore,
    Emphasis,
}

impl EmphasisRole {
    /// Resolves dialect-dependent roles.
    pub fn resolve(self, dialect: Dialect) -> EmphasisRole {
        match (self, dialect) {
            (EmphasisRole::DoubleUnderscore, Dialect::Markdown) => EmphasisRole::Strong,
            (EmphasisRole::DoubleUnderscore, Dialect::Outline) => EmphasisRole::Emphasis,
            (role, _) => role,
        }
    }
}

/// One emphasis delimiter spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter {
    pub marker: &'static str,
    pub role: EmphasisRole,
    /// Only opens after, and only closes before, a non-word character.
    pub word_bound: bool,
}

impl Delimiter {
    /// The repeated character the marker is made of.
    pub fn ch(&self) -> char {
        self.marker.chars().next().unwrap_or('*')
    }

    /// Whether a run of `run` marker characters can close this delimiter.
    ///
    /// Runs of exactly two never close a single-character delimiter; they
    /// belong to a nested strong span.
    pub fn closes_run(&self, run: usize) -> bool {
        let width = self.marker.len();
        match width {
            1 => run == 1 || run >= 3,
            _ => run >= width,
        }
    }

    pub fn enabled_in(&self, dialect: Dialect) -> bool {
        !(self.marker == "_" && dialect == Dialect::Outline)
    }
}

pub struct Emphasis;

impl Emphasis {
    /// Every spelling, longest first so `***` wins over `**` over `*`.
    pub const DELIMITERS: [Delimiter; 8] = [
        Delimiter {
            marker: "***",
            role: EmphasisRole::StrongEmphasis,
            word_bound: false,
        },
        Delimiter {
            marker: "**",
            role: EmphasisRole::Strong,
            word_bound: false,
        },
        Delimiter {
            marker: "~~",
            role: EmphasisRole::Strikethrough,
            word_bound: false,
        },
        Delimiter {
            marker: "==",
            role: EmphasisRole::Highlight,
            word_bound: false,
        },
        Delimiter {
            marker: "^^",
            role: EmphasisRole::Highlight,
            word_bound: false,
        },
        Delimiter {
            marker: "__",
            role: EmphasisRole::DoubleUnderscore,
            word_bound: true,
        },
        Delimiter {
            marker: "*",
            role: EmphasisRole::Emphasis,
            word_bound: false,
        },
        Delimiter {
            marker: "_",
            role: EmphasisRole::Emphasis,
            word_bound: true,
        },
    ];

    pub fn starts_delimiter(c: char) -> bool {
        matches!(c, '*' | '~' | '=' | '^' | '_')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_underscore_depends_on_dialect() {
        assert_eq!(
            EmphasisRole::DoubleUnderscore.resolve(Dialect::Markdown),
            EmphasisRole::Strong
        );
        assert_eq!(
            EmphasisRole::DoubleUnderscore.resolve(Dialect::Outline),
            EmphasisRole::Emphasis
        );
        assert_eq!(
            EmphasisRole::Highlight.resolve(Dialect::Outline),
            EmphasisRole::Highlight
        );
    }

    #[test]
    fn single_star_skips_double_runs() {
        let star = Emphasis::DELIMITERS[6];
        assert!(star.closes_run(1));
        assert!(!star.closes_run(2));
        assert!(star.closes_run(3));
    }

    #[test]
    fn single_underscore_is_markdown_only() {
        let underscore = Emphasis::DELIMITERS[7];
        assert!(underscore.enabled_in(Dialect::Markdown));
        assert!(!underscore.enabled_in(Dialect::Outline));
    }
}
