pub mod bridge;
pub mod error;
pub mod parsing;
pub mod render;
pub mod sanitize;
pub mod vault;

// Re-export key types for easier usage
pub use bridge::{
    BridgeOptions, FormatBridge, from_outline_format, render_to_html, to_outline_format,
};
pub use error::Recovery;
pub use parsing::table::{Alignment, TableModel};
pub use sanitize::Sanitizer;
pub use vault::{ProtectedSpan, SpanKind, Vault};
