//! Error type shared by the fallible entry points of `OpenMap`.

use thiserror::Error;

/// Failures surfaced by `OpenMap`.
///
/// Ordinary conditions (empty map, tombstones, a table about to grow) never
/// produce an error; only the required-value accessor and the checked
/// constructors do.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapError {
    /// A lookup that requires a value found no matching key.
    #[error("key not found")]
    NotFound,
    /// The capacity hint cannot be rounded to a supported power of two.
    #[error("invalid capacity hint {hint}: exceeds the maximum of {max} slots")]
    InvalidCapacity { hint: usize, max: usize },
    /// A load-factor pair that cannot drive growth.
    #[error("invalid load factor {num}/{den}: {reason}")]
    InvalidLoadFactor {
        num: usize,
        den: usize,
        reason: &'static str,
    },
}
