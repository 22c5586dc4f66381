//! Anchor sentinels and the regions they delimit.

use crate::error::{Error, Result};
use std::ops::Range;

/// The sentinel pair that delimits one editable region of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSpec {
    /// Text identifying the start line; must occur on exactly one line.
    pub start: String,
    /// Text identifying the end line; the first match after the start wins.
    pub end: String,
}

impl AnchorSpec {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// A resolved anchor span, as 0-based line indices of its two sentinel lines.
///
/// The editable body is every line strictly between `start` and `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorRegion {
    pub start: usize,
    pub end: usize,
}

impl AnchorRegion {
    /// Resolve `spec` against `lines`.
    ///
    /// # Errors
    ///
    /// - [`Error::AnchorNotFound`] when no line carries the start sentinel
    /// - [`Error::DuplicateAnchor`] when more than one line does
    /// - [`Error::UnterminatedAnchor`] when no end sentinel follows it
    pub fn locate<S: AsRef<str>>(lines: &[S], spec: &AnchorSpec) -> Result<Self> {
        let starts: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.as_ref().contains(spec.start.as_str()))
            .map(|(idx, _)| idx)
            .collect();

        let start = match starts.as_slice() {
            [] => {
                return Err(Error::AnchorNotFound {
                    anchor: spec.start.clone(),
                });
            }
            [single] => *single,
            many => {
                return Err(Error::DuplicateAnchor {
                    anchor: spec.start.clone(),
                    count: many.len(),
                });
            }
        };

        let end = lines
            .iter()
            .enumerate()
            .skip(start + 1)
            .find(|(_, line)| line.as_ref().contains(spec.end.as_str()))
            .map(|(idx, _)| idx)
            .ok_or_else(|| Error::UnterminatedAnchor {
                anchor: spec.start.clone(),
            })?;

        Ok(Self { start, end })
    }

    /// Line indices of the editable body.
    pub fn body(&self) -> Range<usize> {
        self.start + 1..self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.body().contains(&index)
    }

    pub fn body_len(&self) -> usize {
        self.end - self.start - 1
    }
}
