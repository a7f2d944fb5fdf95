/// Horizontal rules: three or more of one of `-`, `*`, `_`, spaces allowed between.
pub struct Rule;

impl Rule {
    pub const CHARS: [char; 3] = ['-', '*', '_'];
    pub const MARKDOWN: &'static str = "---";

    pub fn matches(line: &str) -> bool {
        let mut chars = line.chars().filter(|c| !c.is_whitespace());
        let Some(first) = chars.next() else {
            return false;
        };
        if !Self::CHARS.contains(&first) {
            return false;
        }
        let mut count = 1;
        for c in chars {
            if c != first {
                return false;
            }
            count += 1;
        }
        count >= 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_rules() {
        assert!(Rule::matches("---"));
        assert!(Rule::matches("* * *"));
        assert!(Rule::matches("  _____"));
    }

    #[test]
    fn rejects_non_rules() {
        assert!(!Rule::matches("--"));
        assert!(!Rule::matches("-*-"));
        assert!(!Rule::matches("- item"));
        assert!(!Rule::matches(""));
    }
}
