//! Anchor-region parsing and line editing for the icon registrar.
//!
//! Generated sources carry sentinel comments that delimit the only span the
//! registrar is allowed to rewrite:
//!
//! ```text
//! // User custom icons
//! Style->Set("UtilityExtend.NEXIcon", ...);
//! // ============================================================================
//! ```
//!
//! [`TextDocument`] keeps the file as lines (remembering its line ending and
//! trailing newline), [`AnchorRegion`] is the resolved span of one
//! [`AnchorSpec`], and [`LineMatcher`] locates a target line inside a region
//! with an explicit strict strategy and an explicit fallback strategy.
//! Everything outside a region is carried through byte-for-byte.

pub mod anchor;
pub mod document;
pub mod error;
pub mod matcher;

pub use anchor::{AnchorRegion, AnchorSpec};
pub use document::{InsertOutcome, LineEnding, TextDocument};
pub use error::{Error, Result};
pub use matcher::{LineMatch, LineMatcher, LinePattern, MatchStrategy};
