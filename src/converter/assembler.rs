/// Merges parsed documents and extracted handlers into one project
use crate::converter::ast::{Project, SkippedInput};
use crate::converter::{parser, script};
use indexmap::IndexMap;

/// Build a project from markup documents and scripts, both keyed by file name.
///
/// A document that fails to parse is recorded in `Project::skipped` and
/// contributes nothing; the remaining inputs are still assembled.
pub fn assemble(
    documents: &IndexMap<String, String>,
    scripts: &IndexMap<String, String>,
) -> Project {
    let mut project = Project::new();

    for (file, content) in documents {
        match parser::parse(content) {
            Ok(forms) => {
                tracing::debug!(file = %file, forms = forms.len(), "parsed markup document");
                project.forms.extend(forms);
            }
            Err(e) => {
                tracing::warn!(file = %file, "skipping document: {}", e);
                project.skipped.push(SkippedInput {
                    file: file.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    for (file, content) in scripts {
        for (name, body) in script::extract(content) {
            if project.handlers.contains_key(&name) {
                tracing::debug!(
                    file = %file,
                    handler = %name,
                    "handler redefined, keeping the later body"
                );
            }
            project.handlers.insert(name, body);
        }
    }

    project
}
