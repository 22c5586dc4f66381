//! Button configs: parse, edit and full regeneration of the managed key

use super::grammar::{self, FieldValue};
use crate::{Error, Result};
use iconreg_blocks::TextDocument;
use iconreg_fs::{NormalizedPath, PluginLayout};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which config file a button belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigScope {
    /// Plugin-level `Default<N>Persistent.ini`
    Persistent,
    /// Project-level `Default<N>.ini`
    Project,
}

impl ConfigScope {
    pub const ALL: [ConfigScope; 2] = [ConfigScope::Persistent, ConfigScope::Project];

    pub fn section(&self, plugin_name: &str) -> String {
        match self {
            Self::Persistent => format!("/Script/{plugin_name}.{plugin_name}PersistentSettings"),
            Self::Project => format!("/Script/{plugin_name}.{plugin_name}Settings"),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Persistent => "PersistentButtonConfigs",
            Self::Project => "ToolbarButtonConfigs",
        }
    }

    /// Config file of this scope; `None` for project scope without a project.
    pub fn path(&self, layout: &PluginLayout) -> Option<NormalizedPath> {
        match self {
            Self::Persistent => Some(layout.persistent_config()),
            Self::Project => layout.project_config(),
        }
    }
}

impl fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persistent => write!(f, "persistent"),
            Self::Project => write!(f, "project"),
        }
    }
}

impl FromStr for ConfigScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "persistent" | "plugin" => Ok(Self::Persistent),
            "project" => Ok(Self::Project),
            _ => Err(Error::InvalidValue {
                field: "scope".into(),
                message: format!("unknown scope `{s}`"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonType {
    #[default]
    Single,
    Dropdown,
}

impl ButtonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "SingleButton",
            Self::Dropdown => "DropdownButton",
        }
    }
}

impl fmt::Display for ButtonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ButtonType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "SingleButton" | "single" => Ok(Self::Single),
            "DropdownButton" | "dropdown" => Ok(Self::Dropdown),
            _ => Err(Error::InvalidValue {
                field: "ButtonType".into(),
                message: format!("unknown button type `{s}`"),
            }),
        }
    }
}

/// One toolbar button entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonConfig {
    pub name: String,
    pub button_type: ButtonType,
    /// Friendly name of the icon shown on the button
    pub icon: String,
    /// Opaque class reference; never rewritten by edits
    pub bound_class: String,
    /// Raw `( ... )` text; only emitted for dropdown buttons
    pub dropdown_items: Option<String>,
    /// Unknown keys, preserved in order
    pub extras: Vec<(String, FieldValue)>,
    pub scope: ConfigScope,
}

impl ButtonConfig {
    fn from_fields(fields: Vec<(String, FieldValue)>, scope: ConfigScope) -> std::result::Result<Self, String> {
        let mut name = None;
        let mut button_type = ButtonType::default();
        let mut icon = String::new();
        let mut bound_class = String::new();
        let mut dropdown_items = None;
        let mut extras = Vec::new();

        for (key, value) in fields {
            match key.as_str() {
                "ButtonName" => name = Some(value.text().to_string()),
                "ButtonType" => {
                    button_type = value
                        .text()
                        .parse()
                        .map_err(|_| format!("unknown ButtonType `{}`", value.text()))?;
                }
                "ButtonIconName" => icon = value.text().to_string(),
                "BoundClass" => bound_class = value.text().to_string(),
                "DropdownItems" => match value {
                    FieldValue::List(raw) => dropdown_items = Some(raw),
                    other if other.text().is_empty() => dropdown_items = None,
                    other => return Err(format!("DropdownItems must be a list, found `{other}`")),
                },
                _ => extras.push((key, value)),
            }
        }

        let name = name.ok_or_else(|| "missing ButtonName".to_string())?;
        Ok(Self {
            name,
            button_type,
            icon,
            bound_class,
            dropdown_items,
            extras,
            scope,
        })
    }

    fn has_items(&self) -> bool {
        self.dropdown_items
            .as_deref()
            .is_some_and(|items| !items.trim().is_empty() && items.trim() != "()")
    }

    /// The `+<key>=(...)` line for this config.
    pub fn to_line(&self) -> String {
        let mut parts = vec![
            format!("ButtonName=\"{}\"", self.name),
            format!("ButtonType={}", self.button_type),
            format!("BoundClass=\"{}\"", self.bound_class),
            format!("ButtonIconName=\"{}\"", self.icon),
        ];
        if self.button_type == ButtonType::Dropdown
            && self.has_items()
            && let Some(items) = &self.dropdown_items
        {
            parts.push(format!("DropdownItems={}", items.trim()));
        }
        parts.extend(self.extras.iter().map(|(k, v)| format!("{k}={v}")));
        format!("+{}=({})", self.scope.key(), parts.join(","))
    }
}

/// User-editable fields of a button; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonEdit {
    pub name: Option<String>,
    pub button_type: Option<ButtonType>,
    pub icon: Option<String>,
    pub dropdown_items: Option<String>,
}

fn check_quotable(field: &str, value: &str) -> Result<()> {
    if value.contains(['"', '\n', '\r']) {
        return Err(Error::InvalidValue {
            field: field.into(),
            message: "quotes and line breaks are not allowed".into(),
        });
    }
    Ok(())
}

impl ButtonEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.button_type.is_none()
            && self.icon.is_none()
            && self.dropdown_items.is_none()
    }

    /// Apply to `config`. Validation happens before any field changes.
    pub fn apply(&self, config: &mut ButtonConfig) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(Error::InvalidValue {
                    field: "ButtonName".into(),
                    message: "must not be empty".into(),
                });
            }
            check_quotable("ButtonName", name)?;
        }
        if let Some(icon) = &self.icon {
            check_quotable("ButtonIconName", icon)?;
        }
        let items = match &self.dropdown_items {
            Some(raw) => {
                let raw = raw.trim();
                let wrapped = if raw.starts_with('(') {
                    raw.to_string()
                } else {
                    format!("({raw})")
                };
                grammar::validate_list(&wrapped).map_err(|e| Error::InvalidValue {
                    field: "DropdownItems".into(),
                    message: e.to_string(),
                })?;
                Some(wrapped)
            }
            None => None,
        };

        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(button_type) = self.button_type {
            config.button_type = button_type;
        }
        if let Some(icon) = &self.icon {
            config.icon = icon.clone();
        }
        if items.is_some() {
            config.dropdown_items = items;
        }
        Ok(())
    }
}

fn is_section_header(line: &str) -> bool {
    let line = line.trim();
    line.starts_with('[') && line.ends_with(']')
}

/// Reads and rewrites one managed key inside one named section.
#[derive(Debug, Clone)]
pub struct ConfigModel {
    scope: ConfigScope,
    section: String,
    source: PathBuf,
}

impl ConfigModel {
    /// `source` only labels parse errors.
    pub fn new(scope: ConfigScope, plugin_name: &str, source: impl Into<PathBuf>) -> Self {
        Self {
            scope,
            section: scope.section(plugin_name),
            source: source.into(),
        }
    }

    pub fn scope(&self) -> ConfigScope {
        self.scope
    }

    fn header(&self) -> String {
        format!("[{}]", self.section)
    }

    fn managed_prefix(&self) -> String {
        format!("+{}=", self.scope.key())
    }

    /// Line range of the section body, if the section exists.
    fn section_body(&self, doc: &TextDocument) -> Option<(usize, usize)> {
        let header = self.header();
        let start = doc.lines().iter().position(|l| l.trim() == header)? + 1;
        let end = doc.lines()[start..]
            .iter()
            .position(|l| is_section_header(l))
            .map_or(doc.len(), |p| start + p);
        Some((start, end))
    }

    /// Every managed entry of the section, in file order.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigParseError`] naming the first malformed line.
    pub fn parse(&self, text: &str) -> Result<Vec<ButtonConfig>> {
        let doc = TextDocument::parse(text);
        let Some((start, end)) = self.section_body(&doc) else {
            return Ok(Vec::new());
        };
        let prefix = self.managed_prefix();

        let mut configs = Vec::new();
        for idx in start..end {
            let line = doc.line(idx).unwrap_or_default().trim();
            let Some(body) = line.strip_prefix(prefix.as_str()) else {
                continue;
            };
            let parsed = grammar::parse_fields(body)
                .map_err(|e| e.to_string())
                .and_then(|fields| ButtonConfig::from_fields(fields, self.scope));
            match parsed {
                Ok(config) => configs.push(config),
                Err(message) => {
                    return Err(Error::ConfigParseError {
                        path: self.source.clone(),
                        line: idx + 1,
                        message,
                    });
                }
            }
        }

        Ok(configs)
    }

    /// Replace every managed line of the section with `configs`.
    ///
    /// Unmanaged lines keep their text and order. New lines go after the
    /// last non-blank line of the section; a missing section is appended to
    /// the file. The text is parsed first and never rewritten if malformed.
    pub fn regenerate(&self, text: &str, configs: &[ButtonConfig]) -> Result<String> {
        self.parse(text)?;

        let mut doc = TextDocument::parse(text);
        let lines: Vec<String> = configs
            .iter()
            .map(|c| ButtonConfig {
                scope: self.scope,
                ..c.clone()
            })
            .map(|c| c.to_line())
            .collect();

        match self.section_body(&doc) {
            Some((start, mut end)) => {
                let prefix = self.managed_prefix();
                for idx in (start..end).rev() {
                    if doc.line(idx).is_some_and(|l| l.trim().starts_with(prefix.as_str())) {
                        doc.remove_at(idx);
                        end -= 1;
                    }
                }
                let insert_at = (start..end)
                    .rev()
                    .find(|&idx| doc.line(idx).is_some_and(|l| !l.trim().is_empty()))
                    .map_or(start, |idx| idx + 1);
                for (offset, line) in lines.into_iter().enumerate() {
                    doc.insert_line(insert_at + offset, line);
                }
            }
            None => {
                let was_empty = doc.is_empty();
                if doc.lines().last().is_some_and(|l| !l.trim().is_empty()) {
                    doc.push_line("");
                }
                doc.push_line(self.header());
                for line in lines {
                    doc.push_line(line);
                }
                if was_empty {
                    doc.ensure_trailing_newline();
                }
            }
        }

        tracing::debug!(section = %self.section, count = configs.len(), "regenerated button configs");
        Ok(doc.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PERSISTENT: &str = "; header comment\r
[/Script/UtilityExtend.UtilityExtendPersistentSettings]\r
bEnabled=True\r
+PersistentButtonConfigs=(ButtonName=\"Open\",ButtonType=SingleButton,BoundClass=\"/Game/BP_Open.BP_Open_C\",ButtonIconName=\"Open\",bShowButtonText=True)\r
+PersistentButtonConfigs=(ButtonName=\"Tools\",ButtonType=DropdownButton,BoundClass=\"\",ButtonIconName=\"Gear\",DropdownItems=((Name=\"A\",Class=\"/Game/A\"),(Name=\"B\")))\r
\r
[/Script/Other.Settings]\r
+PersistentButtonConfigs=(ButtonName=\"NotOurs\")\r
";

    fn model() -> ConfigModel {
        ConfigModel::new(ConfigScope::Persistent, "UtilityExtend", "DefaultUtilityExtendPersistent.ini")
    }

    #[test]
    fn test_parse_section_only() {
        let configs = model().parse(PERSISTENT).unwrap();

        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].name, "Open");
        assert_eq!(configs[0].bound_class, "/Game/BP_Open.BP_Open_C");
        assert_eq!(configs[0].extras.len(), 1);
        assert_eq!(configs[1].button_type, ButtonType::Dropdown);
        assert_eq!(
            configs[1].dropdown_items.as_deref(),
            Some("((Name=\"A\",Class=\"/Game/A\"),(Name=\"B\"))")
        );
    }

    #[test]
    fn test_regenerate_unchanged_is_identity() {
        let model = model();
        let configs = model.parse(PERSISTENT).unwrap();
        assert_eq!(model.regenerate(PERSISTENT, &configs).unwrap(), PERSISTENT);
    }

    #[test]
    fn test_regenerate_adds_fourth_in_place() {
        let text = "[/Script/UtilityExtend.UtilityExtendPersistentSettings]
before=1
+PersistentButtonConfigs=(ButtonName=\"A\",ButtonType=SingleButton,BoundClass=\"\",ButtonIconName=\"\")
+PersistentButtonConfigs=(ButtonName=\"B\",ButtonType=SingleButton,BoundClass=\"\",ButtonIconName=\"\")
+PersistentButtonConfigs=(ButtonName=\"C\",ButtonType=SingleButton,BoundClass=\"\",ButtonIconName=\"\")

[Next]
after=2
";
        let model = model();
        let mut configs = model.parse(text).unwrap();
        let mut d = configs[0].clone();
        d.name = "D".into();
        configs.push(d);

        let out = model.regenerate(text, &configs).unwrap();

        let expected = "[/Script/UtilityExtend.UtilityExtendPersistentSettings]
before=1
+PersistentButtonConfigs=(ButtonName=\"A\",ButtonType=SingleButton,BoundClass=\"\",ButtonIconName=\"\")
+PersistentButtonConfigs=(ButtonName=\"B\",ButtonType=SingleButton,BoundClass=\"\",ButtonIconName=\"\")
+PersistentButtonConfigs=(ButtonName=\"C\",ButtonType=SingleButton,BoundClass=\"\",ButtonIconName=\"\")
+PersistentButtonConfigs=(ButtonName=\"D\",ButtonType=SingleButton,BoundClass=\"\",ButtonIconName=\"\")

[Next]
after=2
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_regenerate_creates_section() {
        let model = ConfigModel::new(ConfigScope::Project, "NS", "DefaultNS.ini");
        let config = ButtonConfig {
            name: "Go".into(),
            button_type: ButtonType::Single,
            icon: "Go".into(),
            bound_class: String::new(),
            dropdown_items: Some("(x)".into()),
            extras: Vec::new(),
            scope: ConfigScope::Persistent,
        };

        assert_eq!(
            model.regenerate("", std::slice::from_ref(&config)).unwrap(),
            "[/Script/NS.NSSettings]\n+ToolbarButtonConfigs=(ButtonName=\"Go\",ButtonType=SingleButton,BoundClass=\"\",ButtonIconName=\"Go\")\n"
        );
        assert_eq!(
            model.regenerate("[Other]\nk=v\n", &[]).unwrap(),
            "[Other]\nk=v\n\n[/Script/NS.NSSettings]\n"
        );
    }

    #[test]
    fn test_malformed_line_blocks_regeneration() {
        let text = "[/Script/UtilityExtend.UtilityExtendPersistentSettings]\n+PersistentButtonConfigs=(ButtonName=\"Open\",DropdownItems=((x)\n";
        let err = model().regenerate(text, &[]).unwrap_err();
        match err {
            Error::ConfigParseError { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_type_and_missing_name() {
        let bad_type = "[/Script/UtilityExtend.UtilityExtendPersistentSettings]\n+PersistentButtonConfigs=(ButtonName=\"x\",ButtonType=Huge)\n";
        let no_name = "[/Script/UtilityExtend.UtilityExtendPersistentSettings]\n+PersistentButtonConfigs=(ButtonType=SingleButton)\n";

        assert!(model().parse(bad_type).unwrap_err().to_string().contains("Huge"));
        assert!(model().parse(no_name).unwrap_err().to_string().contains("ButtonName"));
    }

    #[test]
    fn test_edit_keeps_bound_class() {
        let mut config = model().parse(PERSISTENT).unwrap().remove(0);
        let edit = ButtonEdit {
            name: Some("Open Level".into()),
            button_type: Some(ButtonType::Dropdown),
            icon: None,
            dropdown_items: Some("(Name=\"X\")".into()),
        };

        edit.apply(&mut config).unwrap();

        assert_eq!(config.name, "Open Level");
        assert_eq!(config.icon, "Open");
        assert_eq!(config.bound_class, "/Game/BP_Open.BP_Open_C");
        assert_eq!(
            config.to_line(),
            "+PersistentButtonConfigs=(ButtonName=\"Open Level\",ButtonType=DropdownButton,BoundClass=\"/Game/BP_Open.BP_Open_C\",ButtonIconName=\"Open\",DropdownItems=(Name=\"X\"),bShowButtonText=True)"
        );
    }

    #[test]
    fn test_edit_rejects_bad_values() {
        let mut config = model().parse(PERSISTENT).unwrap().remove(0);
        let before = config.clone();
        let edit = ButtonEdit {
            name: Some("fine".into()),
            dropdown_items: Some("((unbalanced".into()),
            ..ButtonEdit::default()
        };

        assert!(edit.apply(&mut config).is_err());
        assert_eq!(config, before);
    }
}
