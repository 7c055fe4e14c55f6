/// Code generator for React components
pub mod handlers;
pub mod jsx;

use crate::converter::ast::*;
use crate::converter::error::ConvertError;
use crate::converter::mappings::{
    MappingRule, MappingTable, TargetPath, TargetValue, ValueTransform,
};
use crate::converter::naming::{handler_identifier, to_pascal_case};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Deepest element nesting the emitter will descend into
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Tsx,
    Jsx,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Tsx => "tsx",
            OutputFormat::Jsx => "jsx",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    pub format: OutputFormat,
    /// Directory prefix of every generated unit path
    pub components_dir: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            format: OutputFormat::Tsx,
            components_dir: "src/components".to_string(),
        }
    }
}

/// One generated source file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedUnit {
    pub name: String,
    pub path: String,
    pub code: String,
    pub imports: Vec<String>,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOutcome {
    pub success: bool,
    pub units: Vec<GeneratedUnit>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ConversionError>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Default for ConversionOutcome {
    fn default() -> Self {
        ConversionOutcome {
            success: true,
            units: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

pub struct Converter<'a> {
    table: &'a MappingTable,
    options: &'a ConvertOptions,
}

impl<'a> Converter<'a> {
    pub fn new(table: &'a MappingTable, options: &'a ConvertOptions) -> Self {
        Converter { table, options }
    }

    /// Convert every form. A failing form is reported and skipped; the
    /// others still produce units.
    pub fn convert(&self, project: &Project) -> ConversionOutcome {
        let mut outcome = ConversionOutcome::default();

        for skipped in &project.skipped {
            outcome
                .warnings
                .push(format!("skipped {}: {}", skipped.file, skipped.message));
        }

        for form in &project.forms {
            let mut emitter = FormEmitter::new(self.table, self.options, &project.handlers, form);
            let result = emitter.emit();
            outcome.warnings.append(&mut emitter.warnings);

            match result {
                Ok(unit) => outcome.units.push(unit),
                Err(e) => {
                    tracing::warn!(form = %form.id, "conversion failed: {}", e);
                    outcome.errors.push(ConversionError {
                        component_id: Some(form.id.clone()),
                        message: e.to_string(),
                    });
                }
            }
        }

        outcome.success = outcome.errors.is_empty();
        outcome
    }
}

/// Per-form emission state
struct FormEmitter<'a> {
    table: &'a MappingTable,
    options: &'a ConvertOptions,
    handlers: &'a IndexMap<String, String>,
    form: &'a SourceForm,
    imports: IndexSet<String>,
    dependencies: IndexSet<String>,
    warnings: Vec<String>,
}

impl<'a> FormEmitter<'a> {
    fn new(
        table: &'a MappingTable,
        options: &'a ConvertOptions,
        handlers: &'a IndexMap<String, String>,
        form: &'a SourceForm,
    ) -> Self {
        let mut imports = IndexSet::new();
        imports.insert("React".to_string());

        FormEmitter {
            table,
            options,
            handlers,
            form,
            imports,
            dependencies: IndexSet::new(),
            warnings: Vec::new(),
        }
    }

    fn emit(&mut self) -> Result<GeneratedUnit, ConvertError> {
        let name = component_name(self.form)?;

        let mut rendered = Vec::new();
        for element in &self.form.elements {
            rendered.push(self.render_element(element, 1)?);
        }
        let tree = self.render_container(rendered);
        let code = self.generate_code(&name, &tree);

        Ok(GeneratedUnit {
            path: format!(
                "{}/{}.{}",
                self.options.components_dir.trim_end_matches('/'),
                name,
                self.options.format.extension()
            ),
            name,
            code,
            imports: self.imports.iter().cloned().collect(),
            dependencies: self.dependencies.iter().cloned().collect(),
        })
    }

    fn render_element(
        &mut self,
        element: &SourceElement,
        depth: usize,
    ) -> Result<String, ConvertError> {
        if depth > MAX_DEPTH {
            return Err(ConvertError::TooDeep {
                element: element.id.clone(),
                limit: MAX_DEPTH,
            });
        }

        let kind = element.kind.as_ref().ok_or_else(|| ConvertError::MissingKind {
            element: element.id.clone(),
        })?;

        let Some(rule) = self.table.lookup(kind) else {
            tracing::debug!(kind = %kind, element = %element.id, "no mapping rule");
            self.warnings.push(format!(
                "no mapping rule for kind '{}' (element '{}' in form '{}')",
                kind, element.id, self.form.id
            ));
            return Ok(jsx::placeholder(kind, &element.id));
        };

        // The element id is offered to translation ahead of declared properties
        let implicit_id = (!element.id.is_empty() && !element.properties.contains_key("id"))
            .then(|| PropValue::Str(element.id.clone()));
        let mut declared: Vec<(&str, &PropValue)> = Vec::new();
        if let Some(id) = &implicit_id {
            declared.push(("id", id));
        }
        declared.extend(element.properties.iter().map(|(k, v)| (k.as_str(), v)));

        let mut props = translate_properties(declared.into_iter(), rule);
        self.translate_events(element, rule, &mut props);
        self.track_component(&rule.target_component);

        let mut children = Vec::new();
        for child in &element.children {
            children.push(self.render_element(child, depth + 1)?);
        }

        Ok(jsx::element(&rule.target_component, props, children))
    }

    fn translate_events(
        &mut self,
        element: &SourceElement,
        rule: &MappingRule,
        props: &mut IndexMap<String, TargetValue>,
    ) {
        let Some(events) = &element.events else {
            return;
        };

        for (event, handler) in events {
            let Some(target) = rule.event_translation.get(event) else {
                self.warnings.push(format!(
                    "event '{}' on element '{}' has no {} equivalent, dropped",
                    event, element.id, rule.target_component
                ));
                continue;
            };

            let callback = match self.handlers.get(handler) {
                Some(body) => handlers::inline_callback(body),
                None => {
                    self.warnings.push(format!(
                        "handler '{}' bound to '{}' on element '{}' was not found in any script",
                        handler, event, element.id
                    ));
                    handler_identifier(handler)
                }
            };

            props.insert(target.clone(), TargetValue::Callback(callback));
        }
    }

    /// The form itself becomes the wrapping container, rendered through the
    /// `Form` rule when the table has one.
    fn render_container(&mut self, children: Vec<String>) -> String {
        match self.table.lookup(&WidgetKind::Form) {
            Some(rule) => {
                let declared = self.form.properties.iter().map(|(k, v)| (k.as_str(), v));
                let props = translate_properties(declared, rule);
                self.track_component(&rule.target_component);
                jsx::element(&rule.target_component, props, children)
            }
            None => jsx::element("div", IndexMap::new(), children),
        }
    }

    fn track_component(&mut self, component: &str) {
        if !is_primitive(component) {
            self.imports.insert(component.to_string());
            self.dependencies.insert(component.to_lowercase());
        }
    }

    fn generate_code(&self, name: &str, tree: &str) -> String {
        let mut output = String::new();

        output.push_str("import React from 'react';\n");
        for import in self.imports.iter().filter(|i| i.as_str() != "React") {
            output.push_str(&format!("import {} from '{}';\n", import, import.to_lowercase()));
        }
        output.push('\n');

        match self.options.format {
            OutputFormat::Tsx => {
                output.push_str(&format!("interface {}Props {{}}\n\n", name));
                output.push_str(&format!("const {0}: React.FC<{0}Props> = () => {{\n", name));
            }
            OutputFormat::Jsx => {
                output.push_str(&format!("const {} = () => {{\n", name));
            }
        }

        // Every project handler is emitted into every unit
        for (handler, body) in self.handlers {
            for line in handlers::handler_declaration(handler, body, self.options.format) {
                if !line.is_empty() {
                    output.push_str("  ");
                    output.push_str(&line);
                }
                output.push('\n');
            }
            output.push('\n');
        }

        output.push_str("  return (\n");
        output.push_str(&jsx::indent(tree, "    "));
        output.push_str("\n  );\n");
        output.push_str("};\n\n");
        output.push_str(&format!("export default {};\n", name));

        output
    }
}

/// Component identifier for a form: its name, or its id when unnamed
fn component_name(form: &SourceForm) -> Result<String, ConvertError> {
    let source = if form.name.trim().is_empty() {
        &form.id
    } else {
        &form.name
    };

    let name = to_pascal_case(source);
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ConvertError::InvalidComponentName {
            source_name: source.clone(),
        });
    }

    Ok(name)
}

/// Lower-case names are intrinsic JSX elements and need no import
fn is_primitive(component: &str) -> bool {
    component.starts_with(|c: char| c.is_ascii_lowercase())
}

/// Apply a rule's property translation, then overlay its defaults.
/// Explicit values win over defaults; nested objects merge per field.
fn translate_properties<'k, 'v>(
    declared: impl Iterator<Item = (&'k str, &'v PropValue)>,
    rule: &MappingRule,
) -> IndexMap<String, TargetValue> {
    let mut props = IndexMap::new();

    for (name, value) in declared {
        let Some(path) = rule.property_translation.get(name) else {
            tracing::trace!(
                property = name,
                kind = %rule.source_kind,
                "property has no translation"
            );
            continue;
        };
        assign(&mut props, path, transform_value(path.transform(), value));
    }

    for (name, default) in &rule.default_properties {
        match (props.get_mut(name), default) {
            (None, _) => {
                props.insert(name.clone(), default.clone());
            }
            (Some(TargetValue::Object(explicit)), TargetValue::Object(fields)) => {
                for (field, value) in fields {
                    explicit.entry(field.clone()).or_insert_with(|| value.clone());
                }
            }
            (Some(_), _) => {}
        }
    }

    props
}

fn transform_value(transform: ValueTransform, value: &PropValue) -> TargetValue {
    match (transform, value) {
        (ValueTransform::Visibility, PropValue::Bool(shown)) => {
            TargetValue::from(if *shown { "block" } else { "none" })
        }
        (ValueTransform::InvertEnabled, PropValue::Bool(enabled)) => TargetValue::from(!*enabled),
        _ => TargetValue::Scalar(value.clone()),
    }
}

fn assign(props: &mut IndexMap<String, TargetValue>, path: &TargetPath, value: TargetValue) {
    let Some(field) = &path.field else {
        props.insert(path.name.clone(), value);
        return;
    };

    let slot = props
        .entry(path.name.clone())
        .or_insert_with(|| TargetValue::Object(IndexMap::new()));

    match slot {
        TargetValue::Object(fields) => {
            fields.insert(field.clone(), value);
        }
        other => {
            let mut fields = IndexMap::new();
            fields.insert(field.clone(), value);
            *other = TargetValue::Object(fields);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_with(forms: Vec<SourceForm>) -> Project {
        Project {
            forms,
            ..Project::default()
        }
    }

    fn convert(project: &Project) -> ConversionOutcome {
        let table = MappingTable::builtin();
        let options = ConvertOptions::default();
        Converter::new(&table, &options).convert(project)
    }

    fn single_element_form(element: SourceElement) -> SourceForm {
        let mut form = SourceForm::new("frm", "Sample");
        form.elements.push(element);
        form
    }

    #[test]
    fn test_empty_project_succeeds() {
        let outcome = convert(&Project::new());
        assert!(outcome.success);
        assert!(outcome.units.is_empty());
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_unmapped_kind_falls_back_with_warning() {
        let element = SourceElement::new("w1", WidgetKind::parse("UnknownWidget123"))
            .with_property("text", PropValue::from("lost"))
            .with_child(SourceElement::new("inner", WidgetKind::Button));

        let outcome = convert(&project_with(vec![single_element_form(element)]));

        assert!(outcome.success);
        assert!(outcome.warnings.iter().any(|w| w.contains("UnknownWidget123")));
        let code = &outcome.units[0].code;
        assert!(code.contains("{/* unsupported component: UnknownWidget123 (w1) */}"));
        assert!(!code.contains("lost"), "fallback contributes no properties");
        assert!(!code.contains("<button"), "children of an unmapped element are dropped");
    }

    #[test]
    fn test_failing_form_is_contained() {
        let good = single_element_form(SourceElement::new("ok", WidgetKind::Button));
        let mut bad = SourceForm::new("frmBad", "Broken");
        bad.elements.push(SourceElement {
            kind: None,
            ..SourceElement::new("nokind", WidgetKind::Button)
        });

        let outcome = convert(&project_with(vec![good, bad]));

        assert!(!outcome.success);
        assert_eq!(outcome.units.len(), 1);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].component_id.as_deref(), Some("frmBad"));
        assert!(outcome.errors[0].message.contains("nokind"));
    }

    #[test]
    fn test_enabled_is_inverted_to_disabled() {
        for enabled in [true, false] {
            let rule =
                MappingRule::new(WidgetKind::Button, "button").property("enabled", "disabled");
            let value = PropValue::Bool(enabled);
            let props = translate_properties(std::iter::once(("enabled", &value)), &rule);
            assert_eq!(props.get("disabled"), Some(&TargetValue::from(!enabled)));
        }
    }

    #[test]
    fn test_visibility_becomes_display_keyword() {
        let rule = MappingTable::builtin().lookup(&WidgetKind::Div).cloned().unwrap();
        let hidden = PropValue::Bool(false);
        let props = translate_properties(std::iter::once(("visible", &hidden)), &rule);

        assert_eq!(
            props.get("style"),
            Some(&TargetValue::object([("display", TargetValue::from("none"))]))
        );
    }

    #[test]
    fn test_explicit_properties_beat_defaults() {
        let table = MappingTable::builtin();
        let rule = table.lookup(&WidgetKind::Calendar).unwrap();
        let explicit = PropValue::from("datetime-local");
        let props = translate_properties(std::iter::once(("type", &explicit)), rule);
        assert_eq!(props.get("type"), Some(&TargetValue::from("datetime-local")));

        let props = translate_properties(std::iter::empty(), rule);
        assert_eq!(props.get("type"), Some(&TargetValue::from("date")));
    }

    #[test]
    fn test_nested_defaults_merge_per_field() {
        let table = MappingTable::builtin();
        let rule = table.lookup(&WidgetKind::Form).unwrap();
        let color = PropValue::from("#fff");
        let props = translate_properties(std::iter::once(("background-color", &color)), rule);

        assert_eq!(
            props.get("style"),
            Some(&TargetValue::object([
                ("backgroundColor", TargetValue::from("#fff")),
                ("width", TargetValue::from("100%")),
                ("height", TargetValue::from("100%")),
            ]))
        );
    }

    #[test]
    fn test_untranslated_properties_are_dropped() {
        let table = MappingTable::builtin();
        let rule = table.lookup(&WidgetKind::Image).unwrap();
        let value = PropValue::Int(3);
        let props = translate_properties(std::iter::once(("taborder", &value)), rule);
        assert!(props.is_empty());
    }

    #[test]
    fn test_component_name_falls_back_to_id() {
        let form = SourceForm::new("FORM_7", "");
        assert_eq!(component_name(&form).unwrap(), "Form7");

        let form = SourceForm::new("x", "user_profile-edit");
        assert_eq!(component_name(&form).unwrap(), "UserProfileEdit");
    }

    #[test]
    fn test_invalid_component_name_is_an_error() {
        let form = SourceForm::new("", "");
        assert!(matches!(
            component_name(&form),
            Err(ConvertError::InvalidComponentName { .. })
        ));

        let form = SourceForm::new("7", "7days");
        assert!(component_name(&form).is_err());
    }

    #[test]
    fn test_non_primitive_components_are_imported() {
        let element = SourceElement::new("grid", WidgetKind::Grid);
        let outcome = convert(&project_with(vec![single_element_form(element)]));
        let unit = &outcome.units[0];

        assert_eq!(unit.imports, vec!["React".to_string(), "DataGrid".to_string()]);
        assert_eq!(unit.dependencies, vec!["datagrid".to_string()]);
        assert!(unit.code.contains("import DataGrid from 'datagrid';"));
        assert!(unit.code.contains(r#"<DataGrid id="grid" data={[]} />"#));
    }

    #[test]
    fn test_missing_handler_is_referenced_by_name() {
        let element =
            SourceElement::new("btn", WidgetKind::Button).with_event("onclick", "Go_click");
        let outcome = convert(&project_with(vec![single_element_form(element)]));

        assert!(outcome.units[0].code.contains("onClick={handleGoClick}"));
        assert!(outcome.warnings.iter().any(|w| w.contains("Go_click")));
    }

    #[test]
    fn test_event_without_translation_is_dropped_with_warning() {
        let element =
            SourceElement::new("img", WidgetKind::Image).with_event("onclick", "Img_click");
        let outcome = convert(&project_with(vec![single_element_form(element)]));

        assert!(!outcome.units[0].code.contains("onclick"));
        assert!(outcome.warnings.iter().any(|w| w.contains("'onclick'")));
    }

    #[test]
    fn test_every_handler_is_emitted_in_every_unit() {
        let mut project = project_with(vec![
            SourceForm::new("a", "First"),
            SourceForm::new("b", "Second"),
        ]);
        project
            .handlers
            .insert("Save_click".to_string(), "save();".to_string());

        let outcome = convert(&project);
        for unit in &outcome.units {
            assert!(unit.code.contains("const handleSaveClick = (e: React.SyntheticEvent) => {"));
        }
    }

    #[test]
    fn test_too_deep_nesting_is_an_error() {
        let mut element = SourceElement::new("leaf", WidgetKind::Div);
        for i in 0..MAX_DEPTH {
            element = SourceElement::new(&format!("d{}", i), WidgetKind::Div).with_child(element);
        }

        let outcome = convert(&project_with(vec![single_element_form(element)]));
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].message.contains("nested deeper"));
    }

    #[test]
    fn test_unit_path_and_jsx_format() {
        let table = MappingTable::builtin();
        let options = ConvertOptions {
            format: OutputFormat::Jsx,
            components_dir: "app/forms/".to_string(),
        };
        let project = project_with(vec![SourceForm::new("f", "order_entry")]);
        let outcome = Converter::new(&table, &options).convert(&project);

        let unit = &outcome.units[0];
        assert_eq!(unit.path, "app/forms/OrderEntry.jsx");
        assert!(unit.code.contains("const OrderEntry = () => {"));
        assert!(!unit.code.contains("interface"));
    }

    #[test]
    fn test_skipped_inputs_surface_as_warnings() {
        let project = Project {
            skipped: vec![SkippedInput {
                file: "bad.xfdl".to_string(),
                message: "malformed markup: boom".to_string(),
            }],
            ..Project::default()
        };

        let outcome = convert(&project);
        assert!(outcome.success);
        assert_eq!(outcome.warnings, vec!["skipped bad.xfdl: malformed markup: boom".to_string()]);
    }

    #[test]
    fn test_outcome_serializes_camel_case_and_omits_empty_lists() {
        let outcome = ConversionOutcome {
            success: false,
            units: Vec::new(),
            errors: vec![ConversionError {
                component_id: Some("frm".to_string()),
                message: "boom".to_string(),
            }],
            warnings: Vec::new(),
        };

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["errors"][0]["componentId"], "frm");
        assert!(json.get("warnings").is_none());
    }
}
