//! # Format Bridge
//!
//! The public conversions. Every operation takes a plain string and returns a
//! plain string; all working state lives in the call.
//!
//! ```
//! use outline_bridge_engine::{render_to_html, to_outline_format};
//!
//! assert_eq!(render_to_html("**hi**"), "<p><strong>hi</strong></p>");
//! assert_eq!(to_outline_format("*hi*"), "- __hi__");
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    render::{html, markdown, outline},
    sanitize::{DEFAULT_SCHEMES, Sanitizer},
};

/// Rendering options. Serialized as part of the user configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeOptions {
    /// Open external links in a new tab.
    pub link_target_blank: bool,
    /// Schemes allowed in `href`/`src`; relative and fragment URLs always pass.
    pub allowed_url_schemes: Vec<String>,
    /// Deepest heading written in outline text.
    pub max_heading_level: u8,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            link_target_blank: true,
            allowed_url_schemes: DEFAULT_SCHEMES.iter().map(|s| s.to_string()).collect(),
            max_heading_level: 3,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormatBridge {
    options: BridgeOptions,
    sanitizer: Sanitizer,
}

impl FormatBridge {
    pub fn new(options: BridgeOptions) -> Self {
        let sanitizer = Sanitizer::new(&options.allowed_url_schemes);
        Self { options, sanitizer }
    }

    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    /// Markdown to sanitized HTML.
    pub fn render_to_html(&self, markdown: &str) -> String {
        let markdown = normalize_newlines(markdown);
        if markdown.trim().is_empty() {
            return String::new();
        }
        let html = html::render_fragment(&markdown, &self.options);
        self.sanitizer.sanitize(&html)
    }

    /// Like [`render_to_html`](Self::render_to_html), memoized in a map the
    /// caller owns.
    pub fn render_to_html_cached(
        &self,
        markdown: &str,
        cache: &mut HashMap<String, String>,
    ) -> String {
        if let Some(html) = cache.get(markdown) {
            return html.clone();
        }
        let html = self.render_to_html(markdown);
        cache.insert(markdown.to_string(), html.clone());
        html
    }

    /// Markdown to the host's outline text.
    pub fn to_outline_format(&self, markdown: &str) -> String {
        let markdown = normalize_newlines(markdown);
        if markdown.trim().is_empty() {
            return String::new();
        }
        outline::render(&markdown, &self.options)
    }

    /// Outline text back to markdown.
    pub fn from_outline_format(&self, outline: &str) -> String {
        let outline = normalize_newlines(outline);
        if outline.trim().is_empty() {
            return String::new();
        }
        markdown::render(&outline)
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

pub fn render_to_html(markdown: &str) -> String {
    FormatBridge::default().render_to_html(markdown)
}

pub fn to_outline_format(markdown: &str) -> String {
    FormatBridge::default().to_outline_format(markdown)
}

pub fn from_outline_format(outline: &str) -> String {
    FormatBridge::default().from_outline_format(outline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(render_to_html(""), "");
        assert_eq!(to_outline_format("  \n"), "");
        assert_eq!(from_outline_format("\n"), "");
    }

    #[test]
    fn crlf_input_is_normalized() {
        assert_eq!(
            render_to_html("- a\r\n- b\r\n"),
            "<ul><li>a</li><li>b</li></ul>"
        );
    }

    #[test]
    fn html_is_sanitized() {
        assert_eq!(
            render_to_html("hi <script>alert(1)</script><img src=x onerror=alert(1)>"),
            "<p>hi <img src=\"x\"></p>"
        );
    }

    #[test]
    fn configured_schemes_reach_the_sanitizer() {
        let bridge = FormatBridge::new(BridgeOptions {
            allowed_url_schemes: vec!["https".to_string()],
            ..BridgeOptions::default()
        });
        assert_eq!(
            bridge.render_to_html("[a](mailto:me@x.example)"),
            "<p><a target=\"_blank\" rel=\"noopener noreferrer\">a</a></p>"
        );
    }

    #[test]
    fn cache_is_filled_and_reused() {
        let bridge = FormatBridge::default();
        let mut cache = HashMap::new();
        let first = bridge.render_to_html_cached("**x**", &mut cache);
        assert_eq!(cache.get("**x**"), Some(&first));

        cache.insert("**x**".to_string(), "stale".to_string());
        assert_eq!(bridge.render_to_html_cached("**x**", &mut cache), "stale");
    }

    #[test]
    fn sentinel_characters_in_input_cannot_forge_spans() {
        let forged = "\u{E000}LINK-0\u{E001} [a](https://x.example)";
        assert_eq!(
            render_to_html(forged),
            "<p>LINK-0 <a href=\"https://x.example\" target=\"_blank\" \
             rel=\"noopener noreferrer\">a</a></p>"
        );
    }

    #[test]
    fn default_options() {
        let options = BridgeOptions::default();
        assert!(options.link_target_blank);
        assert_eq!(options.max_heading_level, 3);
        assert_eq!(options.allowed_url_schemes, ["http", "https", "mailto"]);
    }

    #[test]
    fn options_round_trip_through_serde() {
        let options = BridgeOptions {
            link_target_blank: false,
            allowed_url_schemes: vec!["https".to_string()],
            max_heading_level: 2,
        };
        let encoded = toml::to_string(&options).unwrap();
        let decoded: BridgeOptions = toml::from_str(&encoded).unwrap();
        assert_eq!(decoded, options);
    }

    #[test]
    fn missing_option_fields_take_defaults() {
        let decoded: BridgeOptions = toml::from_str("max_heading_level = 1").unwrap();
        assert_eq!(
            decoded,
            BridgeOptions {
                max_heading_level: 1,
                ..BridgeOptions::default()
            }
        );
    }
}
