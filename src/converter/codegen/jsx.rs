/// JSX text rendering for translated elements
use crate::converter::ast::{PropValue, WidgetKind};
use crate::converter::mappings::TargetValue;
use indexmap::IndexMap;

const INDENT: &str = "  ";

/// Render one element. A `children` prop becomes text content; rendered
/// child fragments are nested one level deeper.
pub fn element(
    component: &str,
    mut props: IndexMap<String, TargetValue>,
    children: Vec<String>,
) -> String {
    let text = props.shift_remove("children").map(|value| text_content(&value));

    let mut open = format!("<{}", component);
    for (name, value) in &props {
        open.push(' ');
        open.push_str(&attribute(name, value));
    }

    match (text, children.is_empty()) {
        (None, true) => format!("{} />", open),
        (Some(text), true) => format!("{}>{}</{}>", open, text, component),
        (text, false) => {
            let mut out = format!("{}>\n", open);
            if let Some(text) = text {
                out.push_str(&indent(&text, INDENT));
                out.push('\n');
            }
            for child in &children {
                out.push_str(&indent(child, INDENT));
                out.push('\n');
            }
            out.push_str(&format!("</{}>", component));
            out
        }
    }
}

/// Stand-in for an element whose kind has no mapping rule
pub fn placeholder(kind: &WidgetKind, id: &str) -> String {
    let label = if id.is_empty() {
        kind.to_string()
    } else {
        format!("{} ({})", kind, id)
    };
    format!("{{/* unsupported component: {} */}}", label.replace("*/", "* /"))
}

pub fn attribute(name: &str, value: &TargetValue) -> String {
    match value {
        TargetValue::Scalar(PropValue::Bool(true)) => name.to_string(),
        TargetValue::Scalar(PropValue::Str(s)) if !needs_expression(s) => {
            format!("{}=\"{}\"", name, s)
        }
        other => format!("{}={{{}}}", name, expression(other)),
    }
}

/// JavaScript expression for a value
pub fn expression(value: &TargetValue) -> String {
    match value {
        TargetValue::Scalar(PropValue::Bool(b)) => b.to_string(),
        TargetValue::Scalar(PropValue::Int(i)) => i.to_string(),
        TargetValue::Scalar(PropValue::Float(x)) => x.to_string(),
        TargetValue::Scalar(PropValue::Str(s)) => string_literal(s),
        TargetValue::Object(fields) if fields.is_empty() => "{}".to_string(),
        TargetValue::Object(fields) => {
            let body: Vec<String> = fields
                .iter()
                .map(|(key, v)| format!("{}: {}", object_key(key), expression(v)))
                .collect();
            format!("{{ {} }}", body.join(", "))
        }
        TargetValue::Array(items) => {
            let body: Vec<String> = items.iter().map(expression).collect();
            format!("[{}]", body.join(", "))
        }
        TargetValue::Callback(code) => code.clone(),
    }
}

pub fn string_literal(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s.replace('"', "\\\"")))
}

/// Prefix every non-empty line
pub fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn text_content(value: &TargetValue) -> String {
    match value {
        TargetValue::Scalar(PropValue::Str(s)) if is_plain_text(s) => s.clone(),
        other => format!("{{{}}}", expression(other)),
    }
}

/// Attribute strings cannot hold quotes, and `&` would be read as an entity
fn needs_expression(s: &str) -> bool {
    s.contains(['"', '\n', '\r', '&'])
}

fn is_plain_text(s: &str) -> bool {
    !s.is_empty()
        && s.trim() == s
        && !s.contains(['{', '}', '<', '>', '&', '\n', '\r'])
}

fn object_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if is_identifier {
        key.to_string()
    } else {
        string_literal(key)
    }
}
