//! Error types for iconreg-blocks

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Anchor not found: {anchor}")]
    AnchorNotFound { anchor: String },

    #[error("Anchor {anchor} occurs {count} times, expected exactly one")]
    DuplicateAnchor { anchor: String, count: usize },

    #[error("Anchor {anchor} has no closing sentinel")]
    UnterminatedAnchor { anchor: String },

    #[error("No line for {target} inside the anchor region")]
    AnchorLineNotFound { target: String },

    #[error("{count} lines match {target}, refusing to pick one")]
    AmbiguousMatch { target: String, count: usize },

    #[error("Invalid match pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
