use crate::parsing::blocks::types::{ListType, Task};

/// Leading-whitespace measurement shared by lists and the outline reader.
pub struct Indent;

impl Indent {
    pub const TAB_WIDTH: usize = 2;
    pub const LEVEL_WIDTH: usize = 2;

    /// Columns of leading whitespace and the byte offset where content starts.
    pub fn measure(line: &str) -> (usize, usize) {
        let mut cols = 0;
        let mut bytes = 0;
        for c in line.chars() {
            match c {
                ' ' => cols += 1,
                '\t' => cols += Self::TAB_WIDTH,
                _ => break,
            }
            bytes += 1;
        }
        (cols, bytes)
    }

    /// Nesting level for a column count, rounded down.
    pub fn level(cols: usize) -> usize {
        cols / Self::LEVEL_WIDTH
    }

    /// Drops up to `cols` columns of leading whitespace.
    pub fn strip_columns(line: &str, cols: usize) -> &str {
        let mut seen = 0;
        let mut bytes = 0;
        for c in line.chars() {
            let width = match c {
                ' ' => 1,
                '\t' => Self::TAB_WIDTH,
                _ => break,
            };
            if seen + width > cols {
                break;
            }
            seen += width;
            bytes += 1;
        }
        &line[bytes..]
    }
}

/// A recognised list-item prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    pub list_type: ListType,
    pub number: Option<u64>,
    /// Byte length of the marker including its trailing space.
    pub len: usize,
}

impl ListMarker {
    pub const BULLETS: [char; 4] = ['-', '*', '•', '+'];

    /// Parses the marker at the start of `s` (indentation already removed).
    pub fn parse(s: &str) -> Option<ListMarker> {
        let first = s.chars().next()?;

        if Self::BULLETS.contains(&first) {
            let after = &s[first.len_utf8()..];
            return Self::spaced(after).then(|| ListMarker {
                list_type: ListType::Bullet,
                number: None,
                len: first.len_utf8() + usize::from(!after.is_empty()),
            });
        }

        let digits = s.chars().take_while(char::is_ascii_digit).count();
        if digits == 0 || digits > 9 {
            return None;
        }
        let after = s[digits..].strip_prefix('.')?;
        let number = s[..digits].parse().ok()?;
        Self::spaced(after).then(|| ListMarker {
            list_type: ListType::Numbered,
            number: Some(number),
            len: digits + 1 + usize::from(!after.is_empty()),
        })
    }

    fn spaced(after: &str) -> bool {
        after.is_empty() || after.starts_with([' ', '\t'])
    }
}

/// `[ ]` / `[x]` at the start of an item's text.
pub struct TaskBox;

impl TaskBox {
    pub const TODO: &'static str = "[ ]";
    pub const DONE: &'static str = "[x]";

    pub fn parse(text: &str) -> (Option<Task>, &str) {
        let task = if text.starts_with(Self::TODO) {
            Some(Task::Todo)
        } else if text.starts_with(Self::DONE) || text.starts_with("[X]") {
            Some(Task::Done)
        } else {
            None
        };
        match task {
            Some(task) => {
                let rest = &text[Self::TODO.len()..];
                if rest.is_empty() || rest.starts_with(' ') {
                    (Some(task), rest.trim_start())
                } else {
                    (None, text)
                }
            }
            None => (None, text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_count_as_two_columns() {
        assert_eq!(Indent::measure("\t- x"), (2, 1));
        assert_eq!(Indent::measure("   - x"), (3, 3));
        assert_eq!(Indent::level(3), 1);
        assert_eq!(Indent::level(4), 2);
    }

    #[test]
    fn strip_columns_stops_at_content() {
        assert_eq!(Indent::strip_columns("    code", 2), "  code");
        assert_eq!(Indent::strip_columns(" x", 4), "x");
        assert_eq!(Indent::strip_columns("\tx", 1), "\tx");
    }

    #[test]
    fn bullet_markers() {
        for s in ["- a", "* a", "• a", "+ a"] {
            let marker = ListMarker::parse(s).unwrap();
            assert_eq!(marker.list_type, ListType::Bullet);
            assert_eq!(&s[marker.len..], "a");
        }
    }

    #[test]
    fn numbered_marker_keeps_its_number() {
        let marker = ListMarker::parse("12. twelve").unwrap();
        assert_eq!(marker.list_type, ListType::Numbered);
        assert_eq!(marker.number, Some(12));
        assert_eq!(marker.len, 4);
    }

    #[test]
    fn emphasis_is_not_a_bullet() {
        assert_eq!(ListMarker::parse("*italic*"), None);
        assert_eq!(ListMarker::parse("3.14 is pi"), None);
    }

    #[test]
    fn task_boxes() {
        assert_eq!(TaskBox::parse("[ ] write"), (Some(Task::Todo), "write"));
        assert_eq!(TaskBox::parse("[x] done"), (Some(Task::Done), "done"));
        assert_eq!(TaskBox::parse("[link] x"), (None, "[link] x"));
    }
}
