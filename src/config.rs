use anyhow::Result;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;

use crate::converter::ast::{PropValue, WidgetKind};
use crate::converter::mappings::{MappingRule, MappingTable, TargetValue};
use crate::converter::{ConvertOptions, OutputFormat};

pub const MANIFEST_FILE: &str = "formshift.toml";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub project: ProjectConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub mappings: Vec<MappingConfig>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    #[serde(default = "default_input_dir")]
    pub dir: String,
    #[serde(default = "default_markup_extensions")]
    pub markup_extensions: Vec<String>,
    #[serde(default = "default_script_extensions")]
    pub script_extensions: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: default_input_dir(),
            markup_extensions: default_markup_extensions(),
            script_extensions: default_script_extensions(),
        }
    }
}

fn default_input_dir() -> String {
    "legacy".to_string()
}

fn default_markup_extensions() -> Vec<String> {
    vec!["xfdl".to_string(), "xadl".to_string(), "xml".to_string()]
}

fn default_script_extensions() -> Vec<String> {
    vec!["xjs".to_string(), "js".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
    #[serde(default = "default_components_dir")]
    pub components_dir: String,
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            components_dir: default_components_dir(),
            format: OutputFormat::default(),
        }
    }
}

fn default_output_dir() -> String {
    "generated".to_string()
}

fn default_components_dir() -> String {
    "src/components".to_string()
}

/// A `[[mappings]]` entry: a project-specific rule that overrides or
/// extends the built-in table
#[derive(Debug, Deserialize, Clone)]
pub struct MappingConfig {
    pub kind: String,
    pub component: String,
    #[serde(default)]
    pub properties: IndexMap<String, String>,
    #[serde(default)]
    pub defaults: IndexMap<String, toml::Value>,
    #[serde(default)]
    pub events: IndexMap<String, String>,
}

impl MappingConfig {
    pub fn to_rule(&self) -> MappingRule {
        let mut rule = MappingRule::new(WidgetKind::parse(&self.kind), &self.component);
        for (source, target) in &self.properties {
            rule = rule.property(source, target);
        }
        for (name, value) in &self.defaults {
            rule = rule.default_value(name, toml_to_target(value));
        }
        for (source, target) in &self.events {
            rule = rule.event(source, target);
        }
        rule
    }
}

impl Config {
    /// Built-in rules plus this project's custom rules
    pub fn mapping_table(&self) -> MappingTable {
        if self.mappings.is_empty() {
            MappingTable::builtin()
        } else {
            MappingTable::with_custom(self.mappings.iter().map(MappingConfig::to_rule).collect())
        }
    }

    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            format: self.output.format,
            components_dir: self.output.components_dir.clone(),
        }
    }
}

fn toml_to_target(value: &toml::Value) -> TargetValue {
    match value {
        toml::Value::String(s) => TargetValue::Scalar(PropValue::Str(s.clone())),
        toml::Value::Integer(i) => TargetValue::Scalar(PropValue::Int(*i)),
        toml::Value::Float(x) => TargetValue::Scalar(PropValue::Float(*x)),
        toml::Value::Boolean(b) => TargetValue::Scalar(PropValue::Bool(*b)),
        toml::Value::Datetime(dt) => TargetValue::Scalar(PropValue::Str(dt.to_string())),
        toml::Value::Array(items) => TargetValue::Array(items.iter().map(toml_to_target).collect()),
        toml::Value::Table(table) => TargetValue::Object(
            table
                .iter()
                .map(|(k, v)| (k.clone(), toml_to_target(v)))
                .collect(),
        ),
    }
}

/// Load and parse formshift.toml configuration file
pub fn load_config(path: &str) -> Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!(
                    "could not find `{}`. Run `formshift init` to create a project",
                    path
                )
            } else {
                anyhow::anyhow!("failed to read `{}`: {}", path, e)
            }
        })?;

    parse_config(&content).map_err(|e| anyhow::anyhow!("failed to parse `{}`: {}", path, e))
}

/// Parse and validate configuration text
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.project.name.trim().is_empty() {
        anyhow::bail!("[project] name must not be empty");
    }

    if config.input.markup_extensions.is_empty() {
        anyhow::bail!("[input] markup_extensions must list at least one extension");
    }

    if config.input.script_extensions.is_empty() {
        anyhow::bail!("[input] script_extensions must list at least one extension");
    }

    for ext in &config.input.markup_extensions {
        if config
            .input
            .script_extensions
            .iter()
            .any(|s| s.eq_ignore_ascii_case(ext))
        {
            anyhow::bail!(
                "Extension '{}' is listed as both a markup and a script extension",
                ext
            );
        }
    }

    for (i, mapping) in config.mappings.iter().enumerate() {
        if mapping.kind.trim().is_empty() {
            anyhow::bail!("[[mappings]] entry {} has an empty kind", i + 1);
        }
        if mapping.component.trim().is_empty() {
            anyhow::bail!(
                "[[mappings]] entry {} ('{}') has an empty component",
                i + 1,
                mapping.kind
            );
        }
    }

    Ok(())
}
