//! Value grammar of `+Key=(...)` config lines
//!
//! ```text
//! (ButtonName="Tools",ButtonType=DropdownButton,DropdownItems=((Name="A"),(Name="B")))
//! ```
//!
//! Values are a quoted string, a bare token, or a balanced parenthesised
//! list kept as raw text. Balance is counted character by character, with
//! quoted sections skipped, so nesting depth is unbounded.

use std::fmt;

/// Why a value list failed to parse
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("value list must be wrapped in parentheses")]
    NotAList,

    #[error("unbalanced parentheses")]
    Unbalanced,

    #[error("unterminated quoted string")]
    UnterminatedQuote,

    #[error("expected key=value, found `{0}`")]
    MissingEquals(String),

    #[error("unexpected text after value: `{0}`")]
    TrailingText(String),
}

/// One field value, preserving how it was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// `"text"`, stored without the quotes
    Quoted(String),
    /// Unquoted token, trimmed
    Bare(String),
    /// `( ... )`, stored raw including the outer parentheses
    List(String),
}

impl FieldValue {
    /// The value with quotes removed; lists stay raw.
    pub fn text(&self) -> &str {
        match self {
            Self::Quoted(s) | Self::Bare(s) | Self::List(s) => s,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quoted(s) => write!(f, "\"{s}\""),
            Self::Bare(s) | Self::List(s) => write!(f, "{s}"),
        }
    }
}

/// Byte index of the `)` closing the `(` at `open`.
fn closing_paren(text: &str, open: usize) -> Result<usize, GrammarError> {
    let mut depth = 0usize;
    let mut in_quote = false;

    for (idx, ch) in text[open..].char_indices() {
        match ch {
            '"' => in_quote = !in_quote,
            '(' if !in_quote => depth += 1,
            ')' if !in_quote => {
                depth = depth.checked_sub(1).ok_or(GrammarError::Unbalanced)?;
                if depth == 0 {
                    return Ok(open + idx);
                }
            }
            _ => {}
        }
    }

    if in_quote {
        Err(GrammarError::UnterminatedQuote)
    } else {
        Err(GrammarError::Unbalanced)
    }
}

/// Check that `text` is a single balanced `( ... )` list.
pub fn validate_list(text: &str) -> Result<(), GrammarError> {
    let text = text.trim();
    if !text.starts_with('(') {
        return Err(GrammarError::NotAList);
    }
    let close = closing_paren(text, 0)?;
    let rest = &text[close + 1..];
    if rest.trim().is_empty() {
        Ok(())
    } else {
        Err(GrammarError::TrailingText(rest.trim().to_string()))
    }
}

/// Parse `(<key>=<value>,...)` into ordered fields.
pub fn parse_fields(text: &str) -> Result<Vec<(String, FieldValue)>, GrammarError> {
    let text = text.trim();
    validate_list(text)?;
    let inner = &text[1..text.len() - 1];

    let mut fields = Vec::new();
    let mut rest = inner.trim_start();

    while !rest.is_empty() {
        let eq = rest
            .find('=')
            .ok_or_else(|| GrammarError::MissingEquals(rest.to_string()))?;
        let key = rest[..eq].trim();
        if key.is_empty() || key.contains([',', '(', ')', '"']) {
            return Err(GrammarError::MissingEquals(rest.to_string()));
        }
        let after = rest[eq + 1..].trim_start();

        let (value, remainder) = if let Some(stripped) = after.strip_prefix('"') {
            let end = stripped.find('"').ok_or(GrammarError::UnterminatedQuote)?;
            (
                FieldValue::Quoted(stripped[..end].to_string()),
                &stripped[end + 1..],
            )
        } else if after.starts_with('(') {
            let close = closing_paren(after, 0)?;
            (
                FieldValue::List(after[..=close].to_string()),
                &after[close + 1..],
            )
        } else {
            let end = after.find(',').unwrap_or(after.len());
            let token = after[..end].trim();
            if token.contains(['(', ')', '"']) {
                return Err(GrammarError::Unbalanced);
            }
            (FieldValue::Bare(token.to_string()), &after[end..])
        };

        fields.push((key.to_string(), value));

        let remainder = remainder.trim_start();
        rest = match remainder.strip_prefix(',') {
            Some(next) => next.trim_start(),
            None if remainder.is_empty() => remainder,
            None => return Err(GrammarError::TrailingText(remainder.to_string())),
        };
    }

    Ok(fields)
}
