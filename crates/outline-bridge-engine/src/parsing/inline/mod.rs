//! # Inline Parsing
//!
//! Cursor-based recursive-descent parsing of one block's text into [`Inline`]
//! nodes.
//!
//! ## Architecture
//!
//! The text handed to this module has already been through the vault, so code,
//! links, images, embeds and formulas appear as opaque sentinels and never need
//! to be recognised here. What is left is emphasis and the entity references
//! of the outline host (page refs, block refs, tags) plus bare URLs.
//!
//! Precedence lives in one ordered dispatch in [`parser`], not in the order of
//! string passes:
//!
//! 1. sentinel
//! 2. bare URL
//! 3. emphasis delimiters, longest first
//! 4. named references (`[label](((uid)))`, `[label]([[Title]])`)
//! 5. page references `[[Title]]`
//! 6. block references `((uid))`
//! 7. tags `#word` / `#[[Multi word]]`
//!
//! ## Modules
//!
//! - **`types`**: the `Inline` node enum
//! - **`kinds`**: delimiter constants owned per construct
//! - **`cursor`**: `Cursor` for char-by-char scanning
//! - **`parser`**: `parse_inline()` with `try_parse_*` helpers

pub mod cursor;
pub mod kinds;
pub mod parser;
pub mod types;

pub use parser::parse_inline;
pub use types::Inline;

/// The inline syntax a piece of text is written in.
///
/// The two dialects disagree on `__x__`: strong in markdown, italic in the
/// outline host. Single-underscore emphasis only exists in markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Markdown,
    Outline,
}
