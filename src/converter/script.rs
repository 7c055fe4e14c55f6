/// Extraction of named event handlers from legacy form scripts
///
/// This is a scanner, not a JavaScript parser: it recognises handler
/// declarations bound to the implicit `this` context and slices out their
/// bodies as opaque text.
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

// this.btn_click = function(obj:nexacro.Button, e:nexacro.ClickEventInfo) {
// this.form.btn_click = function (obj, e) {
// function this.btn_click(obj:Button, e:nexacro.ClickEventInfo) {
static HANDLER_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:\bthis(?:\.[A-Za-z_$][\w$]*)*\.(?P<assigned>[A-Za-z_$][\w$]*)\s*=\s*function\b\s*[\w$]*\s*|\bfunction\s+this\.(?P<legacy>[A-Za-z_$][\w$]*)\s*)\([^)]*\)\s*\{",
    )
    .unwrap()
});

/// Collect handler name → body text from one script
pub fn extract(script: &str) -> IndexMap<String, String> {
    let mut handlers = IndexMap::new();

    for caps in HANDLER_DECLARATION.captures_iter(script) {
        let Some(name) = caps.name("assigned").or_else(|| caps.name("legacy")) else {
            continue;
        };
        let Some(whole) = caps.get(0) else {
            continue;
        };

        match find_block_end(script, whole.end()) {
            Some(end) => {
                let body = script[whole.end()..end].trim();
                handlers.insert(name.as_str().to_string(), body.to_string());
            }
            None => {
                tracing::debug!(handler = name.as_str(), "handler body never closes, skipping");
            }
        }
    }

    handlers
}

/// Byte offset of the `}` closing the block whose body starts at `start`.
/// Quoted strings and comments are skipped while counting braces.
fn find_block_end(source: &str, start: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut depth = 1usize;
    let mut i = start;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            quote @ (b'"' | b'\'' | b'`') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }

    None
}
