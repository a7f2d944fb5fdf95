//! Allow-list HTML cleanup for rendered output.
//!
//! Runs over the printer's output as a single pass of tag matches. Blocked
//! elements and comments go first, with their content. Every remaining tag is
//! kept only if allow-listed, with allow-listed attributes whose values pass
//! the URL and style checks. Text between tags has stray `<`/`>` escaped, and
//! the open/close structure is rebalanced so every kept element is closed.

use std::sync::OnceLock;

use html_escape::{decode_html_entities, encode_double_quoted_attribute};
use log::debug;
use regex::{Captures, Regex};

const BLOCKED_TAGS: [&str; 7] = [
    "script", "style", "iframe", "object", "embed", "noscript", "template",
];

const ALLOWED_TAGS: [&str; 27] = [
    "h2", "h3", "h4", "h5", "h6", "p", "br", "ul", "ol", "li", "table", "thead", "tbody", "tr",
    "th", "td", "blockquote", "hr", "code", "pre", "strong", "em", "del", "mark", "img", "a",
    "span",
];

const VOID_TAGS: [&str; 3] = ["br", "hr", "img"];

const ALLOWED_ATTRIBUTES: [&str; 12] = [
    "href",
    "target",
    "rel",
    "class",
    "style",
    "src",
    "alt",
    "title",
    "data-block-uid",
    "data-page-title",
    "data-page-uid",
    "start",
];

const URL_ATTRIBUTES: [&str; 2] = ["href", "src"];

const UNSAFE_STYLE: [&str; 3] = ["url(", "expression", "javascript:"];

pub const DEFAULT_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(r#"<(/?)([a-zA-Z][\w:-]*)(\s(?:[^"'>]|"[^"]*"|'[^']*')*)?(/?)>"#)
            .expect("invalid tag regex")
    })
}

fn attr_regex() -> &'static Regex {
    static ATTR: OnceLock<Regex> = OnceLock::new();
    ATTR.get_or_init(|| {
        Regex::new(r#"([a-zA-Z_][\w:.-]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
            .expect("invalid attribute regex")
    })
}

fn comment_regex() -> &'static Regex {
    static COMMENT: OnceLock<Regex> = OnceLock::new();
    COMMENT.get_or_init(|| Regex::new(r"(?s)<!--.*?(?:-->|$)").expect("invalid comment regex"))
}

/// Per blocked tag: the paired element, then an unterminated opener to the end.
fn blocked_regexes() -> &'static [(Regex, Regex)] {
    static BLOCKED: OnceLock<Vec<(Regex, Regex)>> = OnceLock::new();
    BLOCKED.get_or_init(|| {
        BLOCKED_TAGS
            .iter()
            .map(|tag| {
                let paired = format!(r"(?is)<\s*{tag}\b[^>]*>.*?<\s*/\s*{tag}\s*>");
                let open = format!(r"(?is)<\s*{tag}\b.*$");
                (
                    Regex::new(&paired).expect("invalid blocked element regex"),
                    Regex::new(&open).expect("invalid blocked element regex"),
                )
            })
            .collect()
    })
}

fn event_handler_regex() -> &'static Regex {
    static EVENT: OnceLock<Regex> = OnceLock::new();
    EVENT.get_or_init(|| Regex::new(r"(?i)(\bon\w+\s*)=").expect("invalid event handler regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UrlClass {
    Safe,
    Unsafe,
}

/// Lowercased, without whitespace and control characters that browsers skip
/// inside a scheme.
fn normalize_url(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| !c.is_control() && !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitizer {
    allowed_schemes: Vec<String>,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self {
            allowed_schemes: DEFAULT_SCHEMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Sanitizer {
    pub fn new(allowed_schemes: &[String]) -> Self {
        Self {
            allowed_schemes: allowed_schemes
                .iter()
                .map(|scheme| scheme.trim().trim_end_matches(':').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn sanitize(&self, html: &str) -> String {
        let html = strip_blocked(html);
        let mut out = String::with_capacity(html.len());
        let mut open: Vec<String> = vec![];
        let mut last = 0;

        for caps in tag_regex().captures_iter(&html) {
            let Some(whole) = caps.get(0) else { continue };
            out.push_str(&escape_text(&html[last..whole.start()]));
            last = whole.end();
            self.tag(&caps, &mut open, &mut out);
        }
        out.push_str(&escape_text(&html[last..]));

        while let Some(name) = open.pop() {
            out.push_str(&format!("</{name}>"));
        }
        out
    }

    fn tag(&self, caps: &Captures<'_>, open: &mut Vec<String>, out: &mut String) {
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let name = caps[2].to_ascii_lowercase();
        let attrs = caps.get(3).map_or("", |m| m.as_str());
        let self_closing =
            caps.get(4).is_some_and(|m| !m.as_str().is_empty()) || attrs.trim_end().ends_with('/');

        if !ALLOWED_TAGS.contains(&name.as_str()) {
            debug!("removed tag <{}{name}>", if closing { "/" } else { "" });
            return;
        }
        let void = VOID_TAGS.contains(&name.as_str());

        if closing {
            if void {
                return;
            }
            // Close everything opened inside the matching element.
            match open.iter().rposition(|o| *o == name) {
                Some(at) => {
                    for inner in open.drain(at..).rev() {
                        out.push_str(&format!("</{inner}>"));
                    }
                }
                None => debug!("dropped stray </{name}>"),
            }
            return;
        }

        out.push_str(&format!("<{name}{}>", self.attributes(attrs)));
        if void {
            return;
        }
        if self_closing {
            out.push_str(&format!("</{name}>"));
        } else {
            open.push(name);
        }
    }

    fn attributes(&self, attrs: &str) -> String {
        let mut kept = String::new();
        for caps in attr_regex().captures_iter(attrs.trim_end_matches('/')) {
            let name = caps[1].to_ascii_lowercase();
            let Some(raw) = caps.get(2).or(caps.get(3)).or(caps.get(4)) else {
                continue;
            };
            if name.starts_with("on") || !ALLOWED_ATTRIBUTES.contains(&name.as_str()) {
                debug!("removed attribute {name}");
                continue;
            }
            let value = decode_html_entities(raw.as_str());
            if !self.attribute_allowed(&name, &value) {
                debug!("removed unsafe {name} value");
                continue;
            }
            let encoded = encode_double_quoted_attribute(&value);
            kept.push_str(&format!(" {name}=\"{}\"", disarm_handlers(&encoded)));
        }
        kept
    }

    fn attribute_allowed(&self, name: &str, value: &str) -> bool {
        if URL_ATTRIBUTES.contains(&name) {
            return self.classify_url(value) == UrlClass::Safe;
        }
        if name == "style" {
            let normalized = normalize_url(value);
            return !UNSAFE_STYLE.iter().any(|bad| normalized.contains(bad));
        }
        true
    }

    fn classify_url(&self, value: &str) -> UrlClass {
        let normalized = normalize_url(value);
        let Some(colon) = normalized.find(':') else {
            return UrlClass::Safe;
        };
        // A path, query or fragment before the first colon makes it relative.
        if normalized[..colon].contains(['/', '?', '#']) {
            return UrlClass::Safe;
        }
        let scheme = &normalized[..colon];
        if self.allowed_schemes.iter().any(|allowed| allowed == scheme) {
            UrlClass::Safe
        } else {
            UrlClass::Unsafe
        }
    }
}

fn strip_blocked(html: &str) -> String {
    let mut result = comment_regex().replace_all(html, "").into_owned();
    for (paired, open) in blocked_regexes() {
        result = paired.replace_all(&result, "").into_owned();
        result = open.replace_all(&result, "").into_owned();
    }
    result
}

/// Escapes stray angle brackets in text between tags.
fn escape_text(text: &str) -> String {
    disarm_handlers(&text.replace('<', "&lt;").replace('>', "&gt;"))
}

/// `onerror=` and friends lose their `=`.
fn disarm_handlers(text: &str) -> String {
    event_handler_regex()
        .replace_all(text, "${1}&#61;")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn clean(html: &str) -> String {
        Sanitizer::default().sanitize(html)
    }

    #[test]
    fn keeps_rendered_markup() {
        let html = "<ul><li><a class=\"block-ref\" data-block-uid=\"abc123xyz\">((abc123xyz))</a>\
                    </li></ul><ol start=\"3\"><li>x</li></ol>";
        assert_eq!(clean(html), html);
    }

    #[rstest]
    #[case("<p>a<script>alert(1)</script>b</p>", "<p>ab</p>")]
    #[case("<p>a<SCRIPT src=x>\nalert(1)\n</script >b</p>", "<p>ab</p>")]
    #[case("<p>a</p><style>p{}</style>", "<p>a</p>")]
    #[case("<p>a<!-- hidden --></p>", "<p>a</p>")]
    #[case("<p>a</p><iframe src=\"https://x.example\">", "<p>a</p>")]
    fn blocked_elements_are_removed(#[case] html: &str, #[case] expected: &str) {
        assert_eq!(clean(html), expected);
    }

    #[test]
    fn event_handlers_are_dropped() {
        assert_eq!(
            clean("<img src=\"https://x.example/a.png\" onerror=\"alert(1)\" alt=\"a\">"),
            "<img src=\"https://x.example/a.png\" alt=\"a\">"
        );
    }

    #[rstest]
    #[case("javascript:alert(1)")]
    #[case("JavaScript:alert(1)")]
    #[case("java\tscript:alert(1)")]
    #[case("&#106;avascript:alert(1)")]
    #[case("data:text/html,x")]
    fn unsafe_urls_are_dropped(#[case] href: &str) {
        assert_eq!(
            clean(&format!("<a href=\"{href}\">x</a>")),
            "<a>x</a>"
        );
    }

    #[rstest]
    #[case("https://x.example/a?b=c")]
    #[case("mailto:me@x.example")]
    #[case("/relative/path")]
    #[case("#fragment")]
    #[case("page.html")]
    fn safe_urls_are_kept(#[case] href: &str) {
        let html = format!("<a href=\"{href}\">x</a>");
        assert_eq!(clean(&html), html);
    }

    #[test]
    fn configured_schemes_replace_the_defaults() {
        let sanitizer = Sanitizer::new(&["https".to_string(), "ftp:".to_string()]);
        let html = "<a href=\"ftp://x.example\">f</a><a href=\"http://x.example\">h</a>";
        assert_eq!(
            sanitizer.sanitize(html),
            "<a href=\"ftp://x.example\">f</a><a>h</a>"
        );
    }

    #[test]
    fn unsafe_styles_are_dropped() {
        assert_eq!(
            clean("<td style=\"text-align: center\">a</td><td style=\"background:url(x)\">b</td>"),
            "<td style=\"text-align: center\">a</td><td>b</td>"
        );
    }

    #[test]
    fn unknown_tags_and_attributes_go() {
        assert_eq!(
            clean("<div id=\"x\"><h1>T</h1><p data-x=\"1\" class=\"c\">p</p></div>"),
            "T<p class=\"c\">p</p>"
        );
    }

    #[test]
    fn unbalanced_tags_are_closed() {
        assert_eq!(clean("<ul><li><strong>a</li>"), "<ul><li><strong>a</strong></li></ul>");
        assert_eq!(clean("a</p></em>b"), "ab");
    }

    #[test]
    fn self_closing_forms() {
        assert_eq!(clean("a<br/>b<br />c<span/>"), "a<br>b<br>c<span></span>");
    }

    #[test]
    fn stray_markup_in_text_is_inert() {
        assert_eq!(clean("a < b > c"), "a &lt; b &gt; c");
        assert_eq!(
            clean("<p>x onerror=alert(1)</p>"),
            "<p>x onerror&#61;alert(1)</p>"
        );
    }

    #[test]
    fn handlers_inside_attribute_values_are_disarmed() {
        assert_eq!(
            clean("<a title='x\" onerror=\"y'>t</a>"),
            "<a title=\"x&quot; onerror&#61;&quot;y\">t</a>"
        );
    }

    #[test]
    fn attribute_values_are_reencoded() {
        assert_eq!(
            clean("<a title='say \"hi\" &amp; go' href=/x>t</a>"),
            "<a title=\"say &quot;hi&quot; &amp; go\" href=\"/x\">t</a>"
        );
    }
}
