//! Error types for coordinate-set operations.

/// Errors from misusing a coordinate set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordError {
    /// The operation needs a finite set but this one may never end.
    #[error("cannot {op} a potentially unbounded coordinate set")]
    Unbounded { op: &'static str },
}
