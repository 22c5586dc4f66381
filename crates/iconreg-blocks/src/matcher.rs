//! Two-tier line matching inside an anchor region.
//!
//! A [`LineMatcher`] pairs a strict structural pattern with an explicit
//! fallback. The strict pattern is tried first; the fallback runs only when
//! the strict one finds nothing. Either tier finding more than one line is an
//! [`Error::AmbiguousMatch`], never a guess.

use crate::anchor::AnchorRegion;
use crate::document::TextDocument;
use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;

/// Which tier located a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    Strict,
    Fallback,
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// A predicate over a single line.
#[derive(Debug, Clone)]
pub enum LinePattern {
    /// The regex must match somewhere in the line.
    Regex(Regex),
    /// Every fragment must occur, each after the end of the previous one.
    Contains(Vec<String>),
}

impl LinePattern {
    pub fn regex(pattern: &str) -> Result<Self> {
        Ok(Self::Regex(Regex::new(pattern)?))
    }

    pub fn contains<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Contains(fragments.into_iter().map(Into::into).collect())
    }

    pub fn is_match(&self, line: &str) -> bool {
        match self {
            Self::Regex(re) => re.is_match(line),
            Self::Contains(fragments) => {
                let mut rest = line;
                for fragment in fragments {
                    match rest.find(fragment.as_str()) {
                        Some(pos) => rest = &rest[pos + fragment.len()..],
                        None => return false,
                    }
                }
                true
            }
        }
    }
}

/// A located line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMatch {
    /// Index into the document's lines
    pub index: usize,
    pub strategy: MatchStrategy,
}

/// Strict-then-fallback locator for one target.
#[derive(Debug, Clone)]
pub struct LineMatcher {
    target: String,
    strict: LinePattern,
    fallback: LinePattern,
}

impl LineMatcher {
    /// `target` names what is being looked for in errors and logs.
    pub fn new(target: impl Into<String>, strict: LinePattern, fallback: LinePattern) -> Self {
        Self {
            target: target.into(),
            strict,
            fallback,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Locate the single line in `region` this matcher describes.
    ///
    /// # Errors
    ///
    /// - [`Error::AmbiguousMatch`] if the first tier with any hit has several
    /// - [`Error::AnchorLineNotFound`] if neither tier matches
    pub fn locate(&self, doc: &TextDocument, region: &AnchorRegion) -> Result<LineMatch> {
        for (strategy, pattern) in [
            (MatchStrategy::Strict, &self.strict),
            (MatchStrategy::Fallback, &self.fallback),
        ] {
            let hits = Self::scan(doc, region, pattern);
            match hits.as_slice() {
                [] => continue,
                [index] => {
                    tracing::debug!(target_name = %self.target, %strategy, line = index, "located line");
                    return Ok(LineMatch {
                        index: *index,
                        strategy,
                    });
                }
                many => {
                    return Err(Error::AmbiguousMatch {
                        target: self.target.clone(),
                        count: many.len(),
                    });
                }
            }
        }

        Err(Error::AnchorLineNotFound {
            target: self.target.clone(),
        })
    }

    fn scan(doc: &TextDocument, region: &AnchorRegion, pattern: &LinePattern) -> Vec<usize> {
        region
            .body()
            .filter(|&idx| doc.line(idx).is_some_and(|line| pattern.is_match(line)))
            .collect()
    }
}
