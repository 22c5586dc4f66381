//! Line-oriented text documents.
//!
//! A [`TextDocument`] splits file content into lines while remembering the
//! line ending and whether the file ended with a newline, so that
//! `TextDocument::parse(s).render() == s` for any input using a single
//! line-ending convention.

use crate::anchor::{AnchorRegion, AnchorSpec};
use crate::error::Result;

/// Line terminator used when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }

    /// Detect from the first line terminator in `content`.
    pub fn detect(content: &str) -> Self {
        match content.find('\n') {
            Some(idx) if idx > 0 && content.as_bytes()[idx - 1] == b'\r' => Self::CrLf,
            _ => Self::Lf,
        }
    }
}

/// Result of inserting lines into a region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Lines appended to the region
    pub inserted: Vec<String>,
    /// Lines already present in the region (compared trimmed)
    pub skipped: Vec<String>,
}

impl InsertOutcome {
    pub fn is_noop(&self) -> bool {
        self.inserted.is_empty()
    }
}

/// A text file held as lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    lines: Vec<String>,
    newline: LineEnding,
    trailing_newline: bool,
}

impl TextDocument {
    /// Split `content` into lines.
    ///
    /// # Example
    /// ```
    /// use iconreg_blocks::TextDocument;
    ///
    /// let doc = TextDocument::parse("a\r\nb\r\n");
    /// assert_eq!(doc.lines(), ["a", "b"]);
    /// assert_eq!(doc.render(), "a\r\nb\r\n");
    /// ```
    pub fn parse(content: &str) -> Self {
        let newline = LineEnding::detect(content);
        let trailing_newline = content.ends_with('\n');
        let body = content.strip_suffix('\n').unwrap_or(content);
        let lines = if content.is_empty() {
            Vec::new()
        } else {
            body.split('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
                .collect()
        };

        Self {
            lines,
            newline,
            trailing_newline,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_ending(&self) -> LineEnding {
        self.newline
    }

    /// Join the lines back with the original terminator.
    pub fn render(&self) -> String {
        let mut out = self.lines.join(self.newline.as_str());
        if self.trailing_newline && !self.lines.is_empty() {
            out.push_str(self.newline.as_str());
        }
        out
    }

    /// Resolve an anchor in this document.
    pub fn locate(&self, spec: &AnchorSpec) -> Result<AnchorRegion> {
        AnchorRegion::locate(&self.lines, spec)
    }

    /// The body lines of `region`.
    pub fn region_lines(&self, region: &AnchorRegion) -> &[String] {
        &self.lines[region.body()]
    }

    /// Append `lines` just before the region's end sentinel, skipping any line
    /// whose trimmed text already appears in the region. `region` is updated
    /// to cover the new lines.
    pub fn insert_before_end<I, S>(&mut self, region: &mut AnchorRegion, lines: I) -> InsertOutcome
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut outcome = InsertOutcome::default();

        for line in lines {
            let line = line.into();
            let exists = self
                .region_lines(region)
                .iter()
                .any(|existing| existing.trim() == line.trim());
            if exists {
                tracing::debug!(line = %line.trim(), "line already in region, skipping");
                outcome.skipped.push(line);
                continue;
            }

            self.lines.insert(region.end, line.clone());
            region.end += 1;
            outcome.inserted.push(line);
        }

        outcome
    }

    /// Remove the body line at `index` and shrink `region` accordingly.
    ///
    /// Returns the removed line, or `None` if `index` is outside the body.
    pub fn remove_line(&mut self, region: &mut AnchorRegion, index: usize) -> Option<String> {
        if !region.contains(index) {
            return None;
        }
        region.end -= 1;
        Some(self.lines.remove(index))
    }

    /// Insert a line at `index` (clamped to the end of the document).
    pub fn insert_line(&mut self, index: usize, line: impl Into<String>) {
        let index = index.min(self.lines.len());
        self.lines.insert(index, line.into());
    }

    /// Remove the line at `index` regardless of any region.
    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        (index < self.lines.len()).then(|| self.lines.remove(index))
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Make `render` end with a line terminator.
    pub fn ensure_trailing_newline(&mut self) {
        self.trailing_newline = true;
    }

    /// Replace the line at `index`, returning the previous text.
    pub fn replace_line(&mut self, index: usize, line: impl Into<String>) -> Option<String> {
        self.lines
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, line.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "head\n// User custom icons\n    one\n// ====\ntail\n";

    fn spec() -> AnchorSpec {
        AnchorSpec::new("// User custom icons", "// ====")
    }

    #[test]
    fn test_parse_render_preserves_text() {
        for input in ["", "a", "a\n", "a\nb", "a\r\nb\r\n", "\n\n"] {
            assert_eq!(TextDocument::parse(input).render(), input);
        }
    }

    #[test]
    fn test_detect_crlf() {
        assert_eq!(LineEnding::detect("a\r\nb"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("a\nb\r\n"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("no newline"), LineEnding::Lf);
    }

    #[test]
    fn test_insert_before_end() {
        let mut doc = TextDocument::parse(SAMPLE);
        let mut region = doc.locate(&spec()).unwrap();

        let outcome = doc.insert_before_end(&mut region, ["    two", "    one"]);

        assert_eq!(outcome.inserted, vec!["    two".to_string()]);
        assert_eq!(outcome.skipped, vec!["    one".to_string()]);
        assert_eq!(
            doc.render(),
            "head\n// User custom icons\n    one\n    two\n// ====\ntail\n"
        );
        assert_eq!(region, doc.locate(&spec()).unwrap());
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut doc = TextDocument::parse(SAMPLE);
        let mut region = doc.locate(&spec()).unwrap();
        doc.insert_before_end(&mut region, ["    two"]);
        let once = doc.render();

        let outcome = doc.insert_before_end(&mut region, ["  two  "]);

        assert!(outcome.is_noop());
        assert_eq!(doc.render(), once);
    }

    #[test]
    fn test_remove_line_only_inside_region() {
        let mut doc = TextDocument::parse(SAMPLE);
        let mut region = doc.locate(&spec()).unwrap();

        assert_eq!(doc.remove_line(&mut region, 0), None);
        assert_eq!(doc.remove_line(&mut region, 2).as_deref(), Some("    one"));
        assert_eq!(doc.render(), "head\n// User custom icons\n// ====\ntail\n");
        assert_eq!(region.body_len(), 0);
    }

    #[test]
    fn test_replace_line() {
        let mut doc = TextDocument::parse("x\r\ny\r\n");
        let old = doc.replace_line(1, "z");
        assert_eq!(old.as_deref(), Some("y"));
        assert_eq!(doc.render(), "x\r\nz\r\n");
        assert_eq!(doc.replace_line(9, "q"), None);
    }

    #[test]
    fn test_free_editing() {
        let mut doc = TextDocument::parse("");
        doc.push_line("[Section]");
        doc.insert_line(5, "b");
        doc.insert_line(1, "a");
        doc.ensure_trailing_newline();
        assert_eq!(doc.render(), "[Section]\na\nb\n");
        assert_eq!(doc.remove_at(1).as_deref(), Some("a"));
        assert_eq!(doc.remove_at(7), None);
    }
}
