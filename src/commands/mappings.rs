use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::commands::load_project;
use crate::config::MANIFEST_FILE;
use crate::converter::codegen::jsx;
use crate::converter::{MappingRule, MappingTable, WidgetKind};

/// Print the effective mapping table. Custom rules from a formshift.toml in
/// the current directory are included.
pub fn execute(kind: Option<&str>) -> Result<()> {
    let table = if Path::new(MANIFEST_FILE).exists() {
        load_project(Path::new("."))?.mapping_table()
    } else {
        MappingTable::builtin()
    };

    match kind {
        Some(kind) => {
            let kind = WidgetKind::parse(kind);
            let rule = table
                .lookup(&kind)
                .ok_or_else(|| anyhow::anyhow!("No mapping rule for kind '{}'", kind))?;
            print!("{}", describe(rule));
        }
        None => {
            // Custom rules shadow built-in ones of the same kind
            let effective = table
                .rules()
                .iter()
                .filter(|rule| {
                    table
                        .lookup(&rule.source_kind)
                        .map_or(false, |r| std::ptr::eq(r, *rule))
                });

            for rule in effective {
                println!(
                    "{} {} {}",
                    format!("{:<12}", rule.source_kind).bold(),
                    "→".dimmed(),
                    rule.target_component.cyan()
                );
            }
        }
    }

    Ok(())
}

/// Multi-line description of one rule
fn describe(rule: &MappingRule) -> String {
    let mut out = format!("{} → {}\n", rule.source_kind, rule.target_component);

    if !rule.property_translation.is_empty() {
        out.push_str("  properties:\n");
        for (source, target) in &rule.property_translation {
            out.push_str(&format!("    {} → {}\n", source, target));
        }
    }

    if !rule.default_properties.is_empty() {
        out.push_str("  defaults:\n");
        for (name, value) in &rule.default_properties {
            out.push_str(&format!("    {} = {}\n", name, jsx::expression(value)));
        }
    }

    if !rule.event_translation.is_empty() {
        out.push_str("  events:\n");
        for (source, target) in &rule.event_translation {
            out.push_str(&format!("    {} → {}\n", source, target));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_button_rule() {
        let table = MappingTable::builtin();
        let text = describe(table.lookup(&WidgetKind::Button).unwrap());

        assert!(text.starts_with("Button → button\n"));
        assert!(text.contains("    text → children\n"));
        assert!(text.contains("    visible → style.display\n"));
        assert!(text.contains("    type = \"button\"\n"));
        assert!(text.contains("    onclick → onClick\n"));
    }

    #[test]
    fn test_describe_omits_empty_sections() {
        let rule = MappingRule::new(WidgetKind::parse("Spacer"), "Spacer");
        assert_eq!(describe(&rule), "Spacer → Spacer\n");
    }
}
