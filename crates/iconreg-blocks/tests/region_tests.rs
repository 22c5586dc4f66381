//! Integration tests for region-confined editing.

use iconreg_blocks::{AnchorSpec, Error, LineMatcher, LinePattern, MatchStrategy, TextDocument};
use pretty_assertions::assert_eq;
use rstest::rstest;

const END: &str = "// ============================================================================";

const STYLE: &str = r#"#include "UtilityExtendStyle.h"

void FUtilityExtendStyle::Initialize()
{
    Style->Set("UtilityExtend.Builtin", new IMAGE_BRUSH_SVG(TEXT("Builtin"), FVector2D(20.0f, 20.0f)));

    // User custom icons
    Style->Set("UtilityExtend.Alpha", new IMAGE_BRUSH_SVG(TEXT("Alpha"), FVector2D(20.0f, 20.0f)));
    // ============================================================================
}
"#;

fn style_anchor() -> AnchorSpec {
    AnchorSpec::new("// User custom icons", END)
}

#[test]
fn test_insert_only_touches_region() {
    let mut doc = TextDocument::parse(STYLE);
    let mut region = doc.locate(&style_anchor()).unwrap();
    let line = r#"    Style->Set("UtilityExtend.Beta", new IMAGE_BRUSH_SVG(TEXT("Beta"), FVector2D(20.0f, 20.0f)));"#;

    let outcome = doc.insert_before_end(&mut region, [line]);
    assert_eq!(outcome.inserted.len(), 1);

    let rendered = doc.render();
    let expected = STYLE.replace(
        "    // ============================================================================",
        &format!("{line}\n    // ============================================================================"),
    );
    assert_eq!(rendered, expected);
}

#[test]
fn test_remove_located_line_leaves_rest_identical() {
    let mut doc = TextDocument::parse(STYLE);
    let mut region = doc.locate(&style_anchor()).unwrap();
    let matcher = LineMatcher::new(
        "UtilityExtend.Alpha",
        LinePattern::regex(r#"^\s*Style->Set\("UtilityExtend\.Alpha", new IMAGE_BRUSH_SVG\(TEXT\("[^"]*"\), FVector2D\([^)]*\)\)\);\s*$"#).unwrap(),
        LinePattern::regex(r#"^\s*Style->Set\("UtilityExtend\.Alpha"[^;]*;\s*$"#).unwrap(),
    );

    let found = matcher.locate(&doc, &region).unwrap();
    assert_eq!(found.strategy, MatchStrategy::Strict);
    doc.remove_line(&mut region, found.index).unwrap();

    let expected: String = STYLE
        .lines()
        .filter(|l| !l.contains("UtilityExtend.Alpha"))
        .map(|l| format!("{l}\n"))
        .collect();
    assert_eq!(doc.render(), expected);
}

#[test]
fn test_builtin_line_outside_region_is_not_found() {
    let doc = TextDocument::parse(STYLE);
    let region = doc.locate(&style_anchor()).unwrap();
    let matcher = LineMatcher::new(
        "UtilityExtend.Builtin",
        LinePattern::contains([r#"Set("UtilityExtend.Builtin""#]),
        LinePattern::contains([r#""UtilityExtend.Builtin""#]),
    );

    let err = matcher.locate(&doc, &region).unwrap_err();
    assert!(matches!(err, Error::AnchorLineNotFound { .. }));
}

#[rstest]
#[case::missing("// nothing\n", "not found")]
#[case::duplicate("// User custom icons\n// User custom icons\n// ====\n", "occurs 2 times")]
#[case::unterminated("// User custom icons\nbody\n", "no closing sentinel")]
fn test_anchor_errors(#[case] input: &str, #[case] message: &str) {
    let doc = TextDocument::parse(input);
    let err = doc
        .locate(&AnchorSpec::new("// User custom icons", "// ===="))
        .unwrap_err();
    assert!(err.to_string().contains(message), "{err}");
}
