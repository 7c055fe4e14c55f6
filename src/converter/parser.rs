/// Parser for legacy XML form definitions
///
/// A document may hold any number of `Form` elements. Widgets are declared
/// either as typed tags (`<Button id="btn" text="OK"/>`) or as generic
/// `<Component type="Button">` nodes; properties and events can be given as
/// attributes or as `<property>` / `<event>` children.
use crate::converter::ast::*;
use crate::converter::codegen::MAX_DEPTH;
use crate::converter::error::ParseError;
use indexmap::IndexMap;
use regex::Regex;
use roxmltree::{Document, Node};
use std::sync::LazyLock;

static INTEGER_LITERAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+$").unwrap());
static DECIMAL_LITERAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d*\.\d+$").unwrap());

const FORM_TAG: &str = "Form";
const GENERIC_TAG: &str = "Component";
const PROPERTY_TAG: &str = "property";
const EVENT_TAG: &str = "event";

/// Grouping tags whose children belong to the enclosing element
const WRAPPER_TAGS: &[&str] = &["Layouts", "Layout", "Objects", "Properties", "Events"];

/// Deepest tag nesting accepted before handing a document to the XML parser
pub const MAX_MARKUP_DEPTH: usize = MAX_DEPTH + 32;

/// Parse one markup document into its forms
pub fn parse(document: &str) -> Result<Vec<SourceForm>, ParseError> {
    check_nesting(document, MAX_MARKUP_DEPTH)?;
    let doc = Document::parse(document).map_err(|e| ParseError::MalformedMarkup(e.to_string()))?;

    let mut forms = Vec::new();
    collect_forms(doc.root_element(), &mut forms);
    Ok(forms)
}

/// Infer the type of a literal property value
pub fn coerce_value(raw: &str) -> PropValue {
    if raw == "true" || raw == "false" {
        return PropValue::Bool(raw == "true");
    }

    if INTEGER_LITERAL.is_match(raw) {
        return match raw.parse::<i64>() {
            Ok(i) => PropValue::Int(i),
            // Out of i64 range, still a number
            Err(_) => finite_float(raw),
        };
    }

    if DECIMAL_LITERAL.is_match(raw) {
        return finite_float(raw);
    }

    PropValue::Str(raw.to_string())
}

/// Literals beyond f64 range stay text; `inf` is not a JavaScript number
fn finite_float(raw: &str) -> PropValue {
    match raw.parse::<f64>() {
        Ok(x) if x.is_finite() => PropValue::Float(x),
        _ => PropValue::Str(raw.to_string()),
    }
}

/// Count open tags without building a tree. Comments, CDATA, processing
/// instructions and declarations don't nest.
fn check_nesting(document: &str, limit: usize) -> Result<(), ParseError> {
    let bytes = document.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }

        let rest = &document[i..];
        let skip_to = move |terminator: &str| {
            rest.find(terminator)
                .map_or(bytes.len(), |p| i + p + terminator.len())
        };

        if rest.starts_with("<!--") {
            i = skip_to("-->");
        } else if rest.starts_with("<![CDATA[") {
            i = skip_to("]]>");
        } else if rest.starts_with("<?") {
            i = skip_to("?>");
        } else if rest.starts_with("<!") {
            i = skip_to(">");
        } else if rest.starts_with("</") {
            depth = depth.saturating_sub(1);
            i = skip_to(">");
        } else {
            let end = tag_end(bytes, i + 1);
            if end < bytes.len() && bytes[end - 1] != b'/' {
                depth += 1;
                if depth > limit {
                    return Err(ParseError::TooDeep { limit });
                }
            }
            i = end + 1;
        }
    }

    Ok(())
}

/// Index of the `>` closing a start tag, skipping quoted attribute values
fn tag_end(bytes: &[u8], start: usize) -> usize {
    let mut quote = None;
    let mut j = start;

    while j < bytes.len() {
        match (quote, bytes[j]) {
            (Some(q), b) if b == q => quote = None,
            (None, b'"' | b'\'') => quote = Some(bytes[j]),
            (None, b'>') => return j,
            _ => {}
        }
        j += 1;
    }

    j
}

fn collect_forms(node: Node, forms: &mut Vec<SourceForm>) {
    if node.tag_name().name() == FORM_TAG {
        forms.push(parse_form(node));
        return;
    }

    for child in node.children().filter(|n| n.is_element()) {
        collect_forms(child, forms);
    }
}

fn parse_form(node: Node) -> SourceForm {
    let mut form = SourceForm::new(
        node.attribute("id").unwrap_or(""),
        node.attribute("name").unwrap_or(""),
    );

    let mut events = IndexMap::new();
    read_attributes(node, &["id", "name"], &mut form.properties, &mut events);
    scan_children(node, &mut form.properties, &mut events, &mut form.elements);

    form
}

fn parse_element(node: Node) -> SourceElement {
    let tag = node.tag_name().name();
    let declared_type = node.attribute("type").filter(|t| !t.is_empty());

    // `type` names the kind only on generic nodes; typed tags keep it as a property
    let (kind, reserved): (_, &[&str]) = if tag == GENERIC_TAG {
        (declared_type.map(WidgetKind::parse), &["id", "type"])
    } else {
        (Some(WidgetKind::parse(tag)), &["id"])
    };

    let mut properties = IndexMap::new();
    let mut events = IndexMap::new();
    let mut children = Vec::new();

    read_attributes(node, reserved, &mut properties, &mut events);
    scan_children(node, &mut properties, &mut events, &mut children);

    SourceElement {
        id: node.attribute("id").unwrap_or("").to_string(),
        kind,
        properties,
        events: if events.is_empty() { None } else { Some(events) },
        children,
    }
}

/// Inline attributes: `on*` names bind events, everything else is a property
fn read_attributes(
    node: Node,
    reserved: &[&str],
    properties: &mut IndexMap<String, PropValue>,
    events: &mut IndexMap<String, String>,
) {
    for attr in node.attributes() {
        let name = attr.name();
        if reserved.contains(&name) {
            continue;
        }

        if is_event_name(name) {
            if !attr.value().is_empty() {
                events.insert(name.to_string(), attr.value().to_string());
            }
        } else {
            properties.insert(name.to_string(), coerce_value(attr.value()));
        }
    }
}

fn scan_children(
    node: Node,
    properties: &mut IndexMap<String, PropValue>,
    events: &mut IndexMap<String, String>,
    children: &mut Vec<SourceElement>,
) {
    for child in node.children().filter(|n| n.is_element()) {
        let tag = child.tag_name().name();

        if tag == PROPERTY_TAG {
            if let Some((name, value)) = entry(child, "value") {
                properties.insert(name, coerce_value(&value));
            }
        } else if tag == EVENT_TAG {
            if let Some((name, handler)) = entry(child, "handler") {
                if !handler.is_empty() {
                    events.insert(name, handler);
                }
            }
        } else if WRAPPER_TAGS.contains(&tag) {
            scan_children(child, properties, events, children);
        } else {
            children.push(parse_element(child));
        }
    }
}

/// Read a `name` + value pair, the value falling back to the text content
fn entry(node: Node, value_attr: &str) -> Option<(String, String)> {
    let name = node.attribute("name").filter(|n| !n.is_empty())?;
    let value = node
        .attribute(value_attr)
        .map(str::to_string)
        .or_else(|| node.text().map(|t| t.trim().to_string()))?;

    Some((name.to_string(), value))
}

fn is_event_name(name: &str) -> bool {
    name.strip_prefix("on")
        .and_then(|rest| rest.chars().next())
        .map_or(false, |c| c.is_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_value_is_total() {
        assert_eq!(coerce_value("true"), PropValue::Bool(true));
        assert_eq!(coerce_value("false"), PropValue::Bool(false));
        assert_eq!(coerce_value("42"), PropValue::Int(42));
        assert_eq!(coerce_value("-7"), PropValue::Int(-7));
        assert_eq!(coerce_value("3.14"), PropValue::Float(3.14));
        assert_eq!(coerce_value(".5"), PropValue::Float(0.5));
        assert_eq!(coerce_value("hello"), PropValue::Str("hello".to_string()));
        assert_eq!(coerce_value(""), PropValue::Str(String::new()));
        assert_eq!(coerce_value("True"), PropValue::Str("True".to_string()));
        assert_eq!(coerce_value("1.2.3"), PropValue::Str("1.2.3".to_string()));
        assert_eq!(coerce_value("12px"), PropValue::Str("12px".to_string()));
    }

    #[test]
    fn test_coerce_value_overflowing_integer_becomes_float() {
        assert!(matches!(coerce_value("99999999999999999999"), PropValue::Float(_)));
    }

    #[test]
    fn test_parse_generic_components() {
        let source = r#"
<Application>
  <Form id="frmLogin" name="LoginForm">
    <property name="title" value="Login"/>
    <Component id="btnSubmit" type="Button">
      <property name="text" value="Submit"/>
      <property name="width" value="120"/>
      <event name="onclick" handler="Submit_click"/>
    </Component>
  </Form>
</Application>"#;

        let forms = parse(source).unwrap();
        assert_eq!(forms.len(), 1);

        let form = &forms[0];
        assert_eq!(form.id, "frmLogin");
        assert_eq!(form.name, "LoginForm");
        assert_eq!(form.properties.get("title"), Some(&PropValue::from("Login")));
        assert_eq!(form.elements.len(), 1);

        let button = &form.elements[0];
        assert_eq!(button.id, "btnSubmit");
        assert_eq!(button.kind, Some(WidgetKind::Button));
        assert_eq!(button.properties.get("text"), Some(&PropValue::from("Submit")));
        assert_eq!(button.properties.get("width"), Some(&PropValue::Int(120)));
        let events = button.events.as_ref().unwrap();
        assert_eq!(events.get("onclick").map(String::as_str), Some("Submit_click"));
    }

    #[test]
    fn test_parse_typed_tags_with_inline_attributes() {
        let source = r#"
<Form id="frmMain" name="main">
  <Layouts>
    <Layout>
      <Edit id="edtName" value="kim" enabled="false" onchanged="edtName_onchanged"/>
      <Div id="divBox">
        <Static id="lbl" text="Name"/>
      </Div>
    </Layout>
  </Layouts>
</Form>"#;

        let forms = parse(source).unwrap();
        let form = &forms[0];
        assert_eq!(form.elements.len(), 2, "wrapper tags are transparent");

        let edit = &form.elements[0];
        assert_eq!(edit.kind, Some(WidgetKind::Edit));
        assert_eq!(edit.properties.get("enabled"), Some(&PropValue::Bool(false)));
        assert!(!edit.properties.contains_key("onchanged"));
        assert_eq!(
            edit.events.as_ref().and_then(|e| e.get("onchanged")).map(String::as_str),
            Some("edtName_onchanged")
        );

        let div = &form.elements[1];
        assert_eq!(div.children.len(), 1);
        assert_eq!(div.children[0].kind, Some(WidgetKind::Static));
    }

    #[test]
    fn test_element_without_events_has_none() {
        let forms = parse(r#"<Form id="f"><Button id="b" text="x"/></Form>"#).unwrap();
        assert!(forms[0].elements[0].events.is_none());
    }

    #[test]
    fn test_generic_component_without_type_has_no_kind() {
        let forms = parse(r#"<Form id="f"><Component id="c"/></Form>"#).unwrap();
        assert_eq!(forms[0].elements[0].kind, None);
    }

    #[test]
    fn test_property_child_overrides_attribute_and_reads_text() {
        let source = r#"<Form id="f"><Edit id="e" value="a"><property name="value">b</property></Edit></Form>"#;
        let forms = parse(source).unwrap();
        assert_eq!(forms[0].elements[0].properties.get("value"), Some(&PropValue::from("b")));
    }

    #[test]
    fn test_multiple_forms_and_nested_form_element() {
        let source = r#"
<FormList>
  <Form id="a" name="First"><Form id="inner"/></Form>
  <Form id="b" name="Second"/>
</FormList>"#;

        let forms = parse(source).unwrap();
        assert_eq!(forms.len(), 2);
        assert_eq!(forms[0].elements[0].kind, Some(WidgetKind::Form));
        assert_eq!(forms[1].id, "b");
    }

    #[test]
    fn test_malformed_markup_is_rejected() {
        let err = parse("<Form id=\"x\"><Button></Form>").unwrap_err();
        let ParseError::MalformedMarkup(message) = &err else {
            panic!("expected malformed markup, got {:?}", err);
        };
        assert!(!message.is_empty());
    }

    #[test]
    fn test_document_without_forms_yields_nothing() {
        assert!(parse("<Application/>").unwrap().is_empty());
    }

    fn nested_divs(depth: usize) -> String {
        let mut source = String::from("<Form id=\"f\">");
        for i in 0..depth {
            source.push_str(&format!("<Div id=\"d{}\">", i));
        }
        source.push_str(&"</Div>".repeat(depth));
        source.push_str("</Form>");
        source
    }

    #[test]
    fn test_excessive_nesting_is_rejected_before_tree_building() {
        let err = parse(&nested_divs(600)).unwrap_err();
        assert_eq!(err, ParseError::TooDeep { limit: MAX_MARKUP_DEPTH });
    }

    #[test]
    fn test_nesting_scan_ignores_comments_and_self_closing_tags() {
        let mut source = String::from("<Form id=\"f\"><!-- <a><b><c> -->");
        for i in 0..(MAX_MARKUP_DEPTH * 2) {
            source.push_str(&format!("<Static id=\"s{}\" text=\"a > b\"/>", i));
        }
        source.push_str("<![CDATA[<x><y>]]></Form>");
        let forms = parse(&source).unwrap();
        assert_eq!(forms[0].elements.len(), MAX_MARKUP_DEPTH * 2);

        assert!(parse(&nested_divs(MAX_DEPTH)).is_ok());
    }

    #[test]
    fn test_type_attribute_on_typed_tag_is_a_property() {
        let source = concat!(
            r#"<Form id="f"><Edit id="pw" type="password"/>"#,
            r#"<Component id="c" type="Edit"/></Form>"#
        );
        let forms = parse(source).unwrap();

        let edit = &forms[0].elements[0];
        assert_eq!(edit.kind, Some(WidgetKind::Edit));
        assert_eq!(edit.properties.get("type"), Some(&PropValue::from("password")));

        let generic = &forms[0].elements[1];
        assert_eq!(generic.kind, Some(WidgetKind::Edit));
        assert!(!generic.properties.contains_key("type"));
    }

    #[test]
    fn test_numbers_beyond_float_range_stay_text() {
        let huge = "9".repeat(401);
        assert_eq!(coerce_value(&huge), PropValue::Str(huge.clone()));

        let huge_decimal = format!("{}.5", huge);
        assert_eq!(coerce_value(&huge_decimal), PropValue::Str(huge_decimal.clone()));
    }

    #[test]
    fn test_event_names_need_lowercase_after_on() {
        assert!(is_event_name("onclick"));
        assert!(is_event_name("onitemchanged"));
        assert!(!is_event_name("on"));
        assert!(!is_event_name("onClick"));
    }
}
