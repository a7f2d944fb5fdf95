//! Recoverable conditions met while converting a message.
//!
//! None of these ever reach a caller: every public conversion is total. They
//! are produced as `Err` values by the component that notices the problem and
//! recovered (with a log line) by the component that owns the fallback.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Recovery {
    /// A table candidate that cannot be laid out as a table.
    #[error("malformed table ({reason}); passing {lines} line(s) through verbatim")]
    MalformedTable { reason: &'static str, lines: usize },

    /// An emphasis or code delimiter without a matching closer.
    #[error("unbalanced `{delimiter}` delimiter; treating it as literal text")]
    UnbalancedDelimiter { delimiter: &'static str },

    /// A sentinel-shaped token with no protected span behind it.
    #[error("no protected span for sentinel {token:?}; leaving it in place")]
    UnknownSentinel { token: String },
}
