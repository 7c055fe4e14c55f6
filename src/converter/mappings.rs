/// Translation rules from legacy widget kinds to React components
use crate::converter::ast::{PropValue, WidgetKind};
use indexmap::IndexMap;
use std::fmt;

/// A value on the generated side: a scalar, a nested object such as
/// `style`, an array, or a raw JavaScript expression
#[derive(Debug, Clone, PartialEq)]
pub enum TargetValue {
    Scalar(PropValue),
    Object(IndexMap<String, TargetValue>),
    Array(Vec<TargetValue>),
    Callback(String),
}

impl TargetValue {
    pub fn object<'a>(fields: impl IntoIterator<Item = (&'a str, TargetValue)>) -> Self {
        TargetValue::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }
}

impl From<PropValue> for TargetValue {
    fn from(value: PropValue) -> Self {
        TargetValue::Scalar(value)
    }
}

impl From<&str> for TargetValue {
    fn from(s: &str) -> Self {
        TargetValue::Scalar(PropValue::from(s))
    }
}

impl From<bool> for TargetValue {
    fn from(b: bool) -> Self {
        TargetValue::Scalar(PropValue::Bool(b))
    }
}

/// Where a translated property lands: `disabled`, or `style.display`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPath {
    pub name: String,
    pub field: Option<String>,
}

/// Value rewriting implied by a target path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTransform {
    /// `true` → "block", `false` → "none"
    Visibility,
    /// Source `enabled` becomes target `disabled`
    InvertEnabled,
    PassThrough,
}

impl TargetPath {
    pub fn parse(path: &str) -> Self {
        match path.split_once('.') {
            Some((name, field)) => TargetPath {
                name: name.to_string(),
                field: Some(field.to_string()),
            },
            None => TargetPath {
                name: path.to_string(),
                field: None,
            },
        }
    }

    pub fn transform(&self) -> ValueTransform {
        match self.field.as_deref() {
            Some("display") => ValueTransform::Visibility,
            Some(_) => ValueTransform::PassThrough,
            None if self.name == "disabled" => ValueTransform::InvertEnabled,
            None => ValueTransform::PassThrough,
        }
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}.{}", self.name, field),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappingRule {
    pub source_kind: WidgetKind,
    pub target_component: String,
    pub property_translation: IndexMap<String, TargetPath>,
    pub default_properties: IndexMap<String, TargetValue>,
    pub event_translation: IndexMap<String, String>,
}

impl MappingRule {
    pub fn new(source_kind: WidgetKind, target_component: &str) -> Self {
        MappingRule {
            source_kind,
            target_component: target_component.to_string(),
            property_translation: IndexMap::new(),
            default_properties: IndexMap::new(),
            event_translation: IndexMap::new(),
        }
    }

    pub fn property(mut self, source: &str, target: &str) -> Self {
        self.property_translation
            .insert(source.to_string(), TargetPath::parse(target));
        self
    }

    pub fn default_value(mut self, name: &str, value: impl Into<TargetValue>) -> Self {
        self.default_properties.insert(name.to_string(), value.into());
        self
    }

    pub fn event(mut self, source: &str, target: &str) -> Self {
        self.event_translation
            .insert(source.to_string(), target.to_string());
        self
    }
}

/// Ordered, immutable rule registry. The first rule matching a kind wins.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingTable {
    rules: Vec<MappingRule>,
}

impl MappingTable {
    /// The rules shipped with formshift
    pub fn builtin() -> Self {
        MappingTable {
            rules: builtin_rules(),
        }
    }

    /// Built-in rules with `custom` rules taking precedence
    pub fn with_custom(custom: Vec<MappingRule>) -> Self {
        let mut rules = custom;
        rules.extend(builtin_rules());
        MappingTable { rules }
    }

    pub fn lookup(&self, kind: &WidgetKind) -> Option<&MappingRule> {
        self.rules.iter().find(|rule| &rule.source_kind == kind)
    }

    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }
}

impl Default for MappingTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_rules() -> Vec<MappingRule> {
    use WidgetKind::*;

    vec![
        MappingRule::new(Form, "div")
            .property("width", "width")
            .property("height", "height")
            .property("title", "title")
            .property("background-color", "style.backgroundColor")
            .default_value(
                "style",
                TargetValue::object([
                    ("width", TargetValue::from("100%")),
                    ("height", TargetValue::from("100%")),
                ]),
            ),
        MappingRule::new(Container, "div")
            .property("width", "width")
            .property("height", "height")
            .property("background-color", "style.backgroundColor")
            .property("visible", "style.display"),
        MappingRule::new(Grid, "DataGrid")
            .property("id", "id")
            .property("width", "width")
            .property("height", "height")
            .property("row-count", "rowCount")
            .property("column-count", "columnCount")
            .default_value("data", TargetValue::Array(Vec::new()))
            .event("oncellclick", "onCellClick")
            .event("onrowchanged", "onRowChanged")
            .event("oncellchanged", "onCellChanged"),
        MappingRule::new(Edit, "input")
            .property("id", "id")
            .property("width", "width")
            .property("height", "height")
            .property("value", "value")
            .property("text", "value")
            .property("readonly", "readOnly")
            .property("enabled", "disabled")
            .property("placeholder", "placeholder")
            .property("type", "type")
            .default_value("type", "text")
            .event("onchanged", "onChange")
            .event("onfocus", "onFocus")
            .event("onblur", "onBlur"),
        MappingRule::new(Button, "button")
            .property("id", "id")
            .property("width", "width")
            .property("height", "height")
            .property("text", "children")
            .property("enabled", "disabled")
            .property("visible", "style.display")
            .default_value("type", "button")
            .event("onclick", "onClick")
            .event("onfocus", "onFocus")
            .event("onblur", "onBlur"),
        MappingRule::new(Combo, "select")
            .property("id", "id")
            .property("width", "width")
            .property("height", "height")
            .property("value", "value")
            .property("enabled", "disabled")
            .event("onchanged", "onChange")
            .event("onfocus", "onFocus")
            .event("onblur", "onBlur"),
        MappingRule::new(CheckBox, "input")
            .property("id", "id")
            .property("text", "children")
            .property("checked", "checked")
            .property("enabled", "disabled")
            .default_value("type", "checkbox")
            .event("onchanged", "onChange")
            .event("onclick", "onClick"),
        MappingRule::new(Radio, "input")
            .property("id", "id")
            .property("text", "children")
            .property("checked", "checked")
            .property("value", "value")
            .property("enabled", "disabled")
            .default_value("type", "radio")
            .event("onchanged", "onChange")
            .event("onclick", "onClick"),
        MappingRule::new(Static, "label")
            .property("id", "id")
            .property("text", "children")
            .property("width", "width")
            .property("height", "height")
            .property("text-align", "style.textAlign"),
        MappingRule::new(Tab, "Tabs")
            .property("id", "id")
            .property("width", "width")
            .property("height", "height")
            .property("tab-count", "tabCount")
            .event("ontabchanged", "onTabChanged"),
        MappingRule::new(Div, "div")
            .property("id", "id")
            .property("width", "width")
            .property("height", "height")
            .property("background-color", "style.backgroundColor")
            .property("visible", "style.display"),
        MappingRule::new(Image, "img")
            .property("id", "id")
            .property("width", "width")
            .property("height", "height")
            .property("src", "src")
            .property("alt", "alt"),
        MappingRule::new(TreeView, "TreeView")
            .property("id", "id")
            .property("width", "width")
            .property("height", "height")
            .property("data", "data")
            .event("onitemclick", "onItemClick")
            .event("onitemchanged", "onItemChanged"),
        MappingRule::new(ListBox, "select")
            .property("id", "id")
            .property("width", "width")
            .property("height", "height")
            .property("multiple", "multiple")
            .property("value", "value")
            .default_value("multiple", false)
            .event("onchanged", "onChange")
            .event("onitemclick", "onClick"),
        MappingRule::new(Calendar, "input")
            .property("id", "id")
            .property("width", "width")
            .property("height", "height")
            .property("value", "value")
            .property("type", "type")
            .default_value("type", "date")
            .event("onchanged", "onChange"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_stable() {
        let table = MappingTable::builtin();
        let before = table.clone();

        for rule in before.rules() {
            let first = table.lookup(&rule.source_kind).cloned();
            let second = table.lookup(&rule.source_kind).cloned();
            assert_eq!(first, second);
            assert!(first.is_some());
        }

        assert_eq!(table, before, "lookup must not mutate the table");
    }

    #[test]
    fn test_unknown_kind_is_absent() {
        let table = MappingTable::builtin();
        assert!(table.lookup(&WidgetKind::parse("UnknownWidget123")).is_none());
    }

    #[test]
    fn test_custom_rules_take_precedence() {
        let custom = MappingRule::new(WidgetKind::Button, "Button").property("text", "label");
        let table = MappingTable::with_custom(vec![custom]);

        let rule = table.lookup(&WidgetKind::Button).unwrap();
        assert_eq!(rule.target_component, "Button");
        assert_eq!(table.rules().len(), MappingTable::builtin().rules().len() + 1);
    }

    #[test]
    fn test_target_path_transforms() {
        assert_eq!(TargetPath::parse("style.display").transform(), ValueTransform::Visibility);
        assert_eq!(TargetPath::parse("disabled").transform(), ValueTransform::InvertEnabled);
        assert_eq!(TargetPath::parse("style.textAlign").transform(), ValueTransform::PassThrough);
        assert_eq!(TargetPath::parse("value").transform(), ValueTransform::PassThrough);
    }

    #[test]
    fn test_target_path_display() {
        assert_eq!(TargetPath::parse("style.backgroundColor").to_string(), "style.backgroundColor");
        assert_eq!(TargetPath::parse("rowCount").to_string(), "rowCount");
    }

    #[test]
    fn test_button_rule_shape() {
        let table = MappingTable::builtin();
        let rule = table.lookup(&WidgetKind::Button).unwrap();
        assert_eq!(rule.target_component, "button");
        assert_eq!(rule.event_translation.get("onclick").map(String::as_str), Some("onClick"));
        assert_eq!(rule.default_properties.get("type"), Some(&TargetValue::from("button")));
    }
}
