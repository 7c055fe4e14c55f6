/// Intermediate model for parsed legacy forms
use indexmap::IndexMap;
use std::fmt;

/// A property value, typed once when the markup is parsed
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Str(s.to_string())
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

/// Widget kinds understood by the built-in mapping table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Form,
    Container,
    Grid,
    Edit,
    Button,
    Combo,
    CheckBox,
    Radio,
    Static,
    Tab,
    Div,
    Image,
    TreeView,
    ListBox,
    Calendar,
    /// Anything else, kept verbatim
    Other(String),
}

impl WidgetKind {
    pub fn parse(name: &str) -> WidgetKind {
        match name {
            "Form" => WidgetKind::Form,
            "Container" => WidgetKind::Container,
            "Grid" => WidgetKind::Grid,
            "Edit" => WidgetKind::Edit,
            "Button" => WidgetKind::Button,
            "Combo" => WidgetKind::Combo,
            "CheckBox" => WidgetKind::CheckBox,
            "Radio" => WidgetKind::Radio,
            "Static" => WidgetKind::Static,
            "Tab" => WidgetKind::Tab,
            "Div" => WidgetKind::Div,
            "Image" => WidgetKind::Image,
            "TreeView" => WidgetKind::TreeView,
            "ListBox" => WidgetKind::ListBox,
            "Calendar" => WidgetKind::Calendar,
            other => WidgetKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            WidgetKind::Form => "Form",
            WidgetKind::Container => "Container",
            WidgetKind::Grid => "Grid",
            WidgetKind::Edit => "Edit",
            WidgetKind::Button => "Button",
            WidgetKind::Combo => "Combo",
            WidgetKind::CheckBox => "CheckBox",
            WidgetKind::Radio => "Radio",
            WidgetKind::Static => "Static",
            WidgetKind::Tab => "Tab",
            WidgetKind::Div => "Div",
            WidgetKind::Image => "Image",
            WidgetKind::TreeView => "TreeView",
            WidgetKind::ListBox => "ListBox",
            WidgetKind::Calendar => "Calendar",
            WidgetKind::Other(name) => name,
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceElement {
    pub id: String,
    /// None for a generic node that never declared its type
    pub kind: Option<WidgetKind>,
    pub properties: IndexMap<String, PropValue>,
    /// None when the element declares no events at all
    pub events: Option<IndexMap<String, String>>,
    pub children: Vec<SourceElement>,
}

impl SourceElement {
    pub fn new(id: &str, kind: WidgetKind) -> Self {
        SourceElement {
            id: id.to_string(),
            kind: Some(kind),
            properties: IndexMap::new(),
            events: None,
            children: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: &str, value: PropValue) -> Self {
        self.properties.insert(name.to_string(), value);
        self
    }

    pub fn with_event(mut self, event: &str, handler: &str) -> Self {
        self.events
            .get_or_insert_with(IndexMap::new)
            .insert(event.to_string(), handler.to_string());
        self
    }

    pub fn with_child(mut self, child: SourceElement) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceForm {
    pub id: String,
    pub name: String,
    pub properties: IndexMap<String, PropValue>,
    pub elements: Vec<SourceElement>,
}

impl SourceForm {
    pub fn new(id: &str, name: &str) -> Self {
        SourceForm {
            id: id.to_string(),
            name: name.to_string(),
            properties: IndexMap::new(),
            elements: Vec::new(),
        }
    }
}

/// An input document that could not be parsed
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedInput {
    pub file: String,
    pub message: String,
}

/// Everything collected from one batch of inputs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub forms: Vec<SourceForm>,
    /// Handler name → raw body text
    pub handlers: IndexMap<String, String>,
    pub skipped: Vec<SkippedInput>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }
}
