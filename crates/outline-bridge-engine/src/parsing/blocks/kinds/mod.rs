pub mod block_quote;
pub mod heading;
pub mod list_marker;
pub mod rule;

pub use block_quote::BlockQuote;
pub use heading::Heading;
pub use list_marker::{Indent, ListMarker, TaskBox};
pub use rule::Rule;
