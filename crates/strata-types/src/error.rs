/// Errors from foundation type construction and parsing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypeError {
    /// A hex string could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A byte sequence had the wrong length.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// A geometry had too few coordinates to be valid.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}
