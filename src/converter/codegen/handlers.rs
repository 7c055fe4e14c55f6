/// Textual rewriting of legacy handler bodies into React callbacks
use crate::converter::codegen::OutputFormat;
use crate::converter::naming::handler_identifier;
use regex::Regex;
use std::sync::LazyLock;

static CONTEXT_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bthis\.").unwrap());
static OBJ_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bobj\s*:\s*(?:nexacro\.)?[A-Za-z_$][\w$]*").unwrap());
static EVENT_INFO_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\be\s*:\s*nexacro\.\w*EventInfo\b").unwrap());

/// Best-effort cleanup of a legacy body. The body is never parsed.
pub fn rewrite_body(body: &str) -> String {
    let body = CONTEXT_PREFIX.replace_all(body, "");
    let body = OBJ_ANNOTATION.replace_all(&body, "obj");
    EVENT_INFO_ANNOTATION.replace_all(&body, "e").into_owned()
}

/// Arrow function embedded directly in a JSX attribute
pub fn inline_callback(body: &str) -> String {
    let lines = dedent(&rewrite_body(body));

    match lines.len() {
        0 => "() => {}".to_string(),
        // A trailing line comment would swallow the closing brace
        1 if !lines[0].contains("//") => format!("(e) => {{ {} }}", lines[0]),
        _ => {
            let mut out = String::from("(e) => {\n");
            for line in &lines {
                push_indented(&mut out, "  ", line);
            }
            out.push('}');
            out
        }
    }
}

/// `const handleX = (e) => { ... };` lines, unindented
pub fn handler_declaration(name: &str, body: &str, format: OutputFormat) -> Vec<String> {
    let param = match format {
        OutputFormat::Tsx => "e: React.SyntheticEvent",
        OutputFormat::Jsx => "e",
    };
    let head = format!("const {} = ({}) => {{", handler_identifier(name), param);
    let lines = dedent(&rewrite_body(body));

    if lines.is_empty() {
        return vec![format!("{}}};", head)];
    }

    let mut out = vec![head];
    out.extend(lines.into_iter().map(|line| {
        if line.is_empty() {
            line
        } else {
            format!("  {}", line)
        }
    }));
    out.push("};".to_string());
    out
}

/// Strip the indentation shared by every line after the first.
/// The first line is expected to be trimmed already.
fn dedent(body: &str) -> Vec<String> {
    let body = body.trim();
    if body.is_empty() {
        return Vec::new();
    }

    let lines: Vec<&str> = body.lines().map(str::trim_end).collect();
    let common = lines
        .iter()
        .skip(1)
        .filter(|l| !l.is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || line.is_empty() {
                line.to_string()
            } else {
                line.get(common..).unwrap_or(line.trim_start()).to_string()
            }
        })
        .collect()
}

fn push_indented(out: &mut String, prefix: &str, line: &str) {
    if !line.is_empty() {
        out.push_str(prefix);
        out.push_str(line);
    }
    out.push('\n');
}
