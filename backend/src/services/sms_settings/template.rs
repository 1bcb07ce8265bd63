use common::model::settings::PLACEHOLDER_TOKENS;
use regex::Regex;

/// Lists `{token}` markers in `template` that the device will not substitute,
/// in order of first appearance and without repeats.
pub fn unknown_placeholders(template: &str) -> Result<Vec<String>, regex::Error> {
    let re = Regex::new(r"\{([A-Za-z0-9_]+)\}")?;

    let mut unknown: Vec<String> = Vec::new();
    for caps in re.captures_iter(template) {
        let token = &caps[1];
        if !PLACEHOLDER_TOKENS.contains(&token) && !unknown.iter().any(|t| t == token) {
            unknown.push(token.to_string());
        }
    }
    Ok(unknown)
}
