//! The two generated source artifacts: line templates and match patterns.
//!
//! Style mapping lines:
//!
//! ```text
//! Style->Set("UtilityExtend.Save", new IMAGE_BRUSH_SVG(TEXT("Save"), FVector2D(20.0f, 20.0f)));
//! ```
//!
//! Icon registry lines:
//!
//! ```text
//! IconInfos.Add(FToolbarIconInfo(TEXT("UtilityExtend.Save"), TEXT("Save"), TEXT("Plugin icon")));
//! ```

use crate::scanner::{Origin, ResourceEntity};
use crate::settings::Settings;
use crate::Result;
use iconreg_blocks::{AnchorSpec, LineMatcher, LinePattern};
use iconreg_fs::{NormalizedPath, PluginLayout};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Reads `Style->Set("<qualified name>"` anywhere in a line.
pub(crate) static MAPPING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Style->Set\(\s*"([^"]+)""#).expect("valid regex"));

/// Reads the `(qualified, friendly, description)` triple of a registry call.
pub(crate) static REGISTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"FToolbarIconInfo\(\s*TEXT\(\s*"([^"]+)"\s*\)\s*,\s*TEXT\(\s*"([^"]*)"\s*\)\s*,\s*TEXT\(\s*"([^"]*)"\s*\)\s*\)"#,
    )
    .expect("valid regex")
});

/// Which generated source file an entry lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    StyleMapping,
    IconRegistry,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 2] = [ArtifactKind::StyleMapping, ArtifactKind::IconRegistry];

    pub fn path(&self, layout: &PluginLayout) -> NormalizedPath {
        match self {
            Self::StyleMapping => layout.style_file(),
            Self::IconRegistry => layout.registry_file(),
        }
    }

    pub fn anchor(&self, settings: &Settings) -> AnchorSpec {
        match self {
            Self::StyleMapping => settings.anchors.style.to_spec(),
            Self::IconRegistry => settings.anchors.registry.to_spec(),
        }
    }

    /// The line registering `resource` in this artifact.
    pub fn insert_line(&self, settings: &Settings, resource: &ResourceEntity) -> String {
        let qualified = settings.qualified_name(&resource.name);
        match self {
            Self::StyleMapping => format!(
                r#"    Style->Set("{qualified}", new IMAGE_BRUSH_SVG(TEXT("{name}"), FVector2D({size})));"#,
                name = resource.name,
                size = settings.brush_size,
            ),
            Self::IconRegistry => {
                let description = match resource.origin {
                    Origin::Plugin => &settings.descriptions.plugin,
                    Origin::Project => &settings.descriptions.project,
                };
                format!(
                    r#"    IconInfos.Add(FToolbarIconInfo(TEXT("{qualified}"), TEXT("{name}"), TEXT("{description}")));"#,
                    name = resource.name,
                )
            }
        }
    }

    /// Strict and fallback locators for the line registering `qualified`.
    ///
    /// Both tiers anchor on the complete quoted qualified name, so
    /// `NS.icon` never matches a line for `NS.icon2`.
    pub fn delete_matcher(&self, qualified: &str) -> Result<LineMatcher> {
        let qn = regex::escape(qualified);
        let (strict, fallback) = match self {
            Self::StyleMapping => (
                format!(
                    r#"^\s*Style->Set\("{qn}", new IMAGE_BRUSH_SVG\(TEXT\("[^"]*"\), FVector2D\([^)]*\)\)\);\s*$"#
                ),
                format!(r#"^\s*Style->Set\("{qn}"[^;]*;\s*$"#),
            ),
            Self::IconRegistry => (
                format!(
                    r#"^\s*IconInfos\.Add\(FToolbarIconInfo\(TEXT\("{qn}"\), TEXT\("[^"]*"\), TEXT\("[^"]*"\)\)\);\s*$"#
                ),
                format!(r#"^\s*IconInfos\.Add\(FToolbarIconInfo\(TEXT\("{qn}"\)[^;]*;\s*$"#),
            ),
        };

        Ok(LineMatcher::new(
            qualified,
            LinePattern::regex(&strict)?,
            LinePattern::regex(&fallback)?,
        ))
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StyleMapping => write!(f, "style-mapping"),
            Self::IconRegistry => write!(f, "icon-registry"),
        }
    }
}

/// Registry triple regex with the friendly name of `qualified` fixed to `old`.
fn rename_strict(qualified: &str, old: &str) -> String {
    format!(
        r#"FToolbarIconInfo\(\s*TEXT\(\s*"{qn}"\s*\)\s*,\s*TEXT\(\s*"({old})"\s*\)\s*,\s*TEXT\(\s*"[^"]*"\s*\)\s*\)"#,
        qn = regex::escape(qualified),
        old = regex::escape(old),
    )
}

fn text_token(value: &str) -> String {
    format!(r#"TEXT("{value}")"#)
}

/// Locator for the registry line of `qualified` whose friendly name is `old`.
pub fn rename_matcher(qualified: &str, old: &str) -> Result<LineMatcher> {
    Ok(LineMatcher::new(
        format!("{qualified} ({old})"),
        LinePattern::regex(&rename_strict(qualified, old))?,
        LinePattern::contains([text_token(qualified), text_token(old)]),
    ))
}

/// Rewrite only the friendly-name span of a located registry line.
///
/// Returns `None` if the line does not carry `qualified` followed by `old`.
pub fn rewrite_friendly_name(line: &str, qualified: &str, old: &str, new: &str) -> Option<String> {
    let strict = Regex::new(&rename_strict(qualified, old)).ok()?;
    let span = match strict.captures(line).and_then(|c| c.get(1)) {
        Some(m) => m.range(),
        None => {
            let qn_token = text_token(qualified);
            let old_token = text_token(old);
            let after_qn = line.find(&qn_token)? + qn_token.len();
            let token_start = after_qn + line[after_qn..].find(&old_token)?;
            let value_start = token_start + "TEXT(\"".len();
            value_start..value_start + old.len()
        }
    };

    let mut rewritten = String::with_capacity(line.len() + new.len());
    rewritten.push_str(&line[..span.start]);
    rewritten.push_str(new);
    rewritten.push_str(&line[span.end..]);
    Some(rewritten)
}

/// Whether a line is a `//` comment and should be ignored when reading.
pub(crate) fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with("//")
}
