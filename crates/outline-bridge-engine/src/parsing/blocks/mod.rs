//! # Block Parsing
//!
//! Two-phase, line-oriented block parsing of a vault-protected message.
//!
//! ## Parsing Phases
//!
//! 1. **Line Classification** (`classify`): each line becomes a `LineClass`
//!    holding only local facts (indent level, list marker, heading level,
//!    whether it is a lone block sentinel)
//!
//! 2. **Block Construction** (`builder`): a `BlockBuilder` keeps the stack of
//!    open list frames and the current leaf (paragraph, quote, table rows)
//!    and emits `Block`s as they close
//!
//! ## Modules
//!
//! - **`types`**: `Block`, `List`, `ListItem`, `ListFrame`
//! - **`kinds`**: per-construct syntax (BlockQuote, Heading, Rule, ListMarker)
//! - **`classify`**: `MarkdownLineClassifier` produces a `LineClass` per line
//! - **`builder`**: `BlockBuilder` state machine for block construction
//!
//! ## Key Invariants
//!
//! - Every list frame opened is closed, innermost first, before `finish`
//!   returns
//! - Fenced code and callouts never reach this module as text; they arrive as
//!   `Placeholder` lines

pub mod builder;
pub mod classify;
pub mod kinds;
pub mod types;

pub use builder::BlockBuilder;
pub use classify::{LineClass, ListLine, MarkdownLineClassifier};
pub use types::{Block, List, ListFrame, ListItem, ListType, Task};
