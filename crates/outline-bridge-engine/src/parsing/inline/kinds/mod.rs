//! # Inline Kinds
//!
//! Delimiter knowledge for each inline construct. The parser asks these types
//! for their markers; it never hardcodes `[[` or `((`.

pub mod emphasis;
pub mod reference;
pub mod url;

pub use emphasis::{Delimiter, Emphasis, EmphasisRole};
pub use reference::{BlockRef, NamedRef, PageRef, Tag};
pub use url::BareUrl;
