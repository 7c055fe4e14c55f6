/// Identifier derivation for generated components and handlers
use regex::Regex;
use std::sync::LazyLock;

static CASE_TRANSITION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").unwrap());

/// `user_profile-edit` → `UserProfileEdit`, `LoginForm` → `LoginForm`.
///
/// Lower→upper case transitions and every non-alphanumeric character mark
/// word boundaries. Each word keeps its first letter upper-cased and the
/// rest lower-cased.
pub fn to_pascal_case(s: &str) -> String {
    let separated = CASE_TRANSITION.replace_all(s, "${1}_${2}");

    separated
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
            }
        })
        .collect()
}

/// Name of the generated callable for a legacy handler
pub fn handler_identifier(handler: &str) -> String {
    format!("handle{}", to_pascal_case(handler))
}
