/// Legacy form markup to React converter
pub mod assembler;
pub mod ast;
pub mod codegen;
pub mod error;
pub mod mappings;
pub mod naming;
pub mod parser;
pub mod script;

pub use assembler::assemble;
pub use ast::{Project, PropValue, SkippedInput, SourceElement, SourceForm, WidgetKind};
pub use codegen::{
    ConversionError, ConversionOutcome, ConvertOptions, Converter, GeneratedUnit, OutputFormat,
};
pub use error::{ConvertError, ParseError};
pub use mappings::{MappingRule, MappingTable, TargetValue};

use indexmap::IndexMap;

/// Assemble markup documents and scripts (both keyed by file name) and
/// convert every form found in them
pub fn convert_sources(
    documents: &IndexMap<String, String>,
    scripts: &IndexMap<String, String>,
    table: &MappingTable,
    options: &ConvertOptions,
) -> ConversionOutcome {
    let project = assemble(documents, scripts);
    Converter::new(table, options).convert(&project)
}
