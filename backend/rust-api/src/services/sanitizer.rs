const FENCE: &str = "```";
const LANGUAGE_TAG: &str = "json";

/// Strips markdown fences, a leading `json` tag and `+` concatenation artifacts
/// from a model reply. Never fails; the result may still be invalid JSON.
pub fn sanitize(content: &str) -> String {
    let mut cleaned = content.replace('`', "");
    cleaned = cleaned.trim().replace('+', "");
    cleaned = cleaned.trim().to_string();

    while let Some(rest) = cleaned.strip_prefix(LANGUAGE_TAG) {
        cleaned = rest.trim().to_string();
    }
    if let Some(rest) = cleaned.strip_prefix(FENCE) {
        cleaned = rest.trim().to_string();
    }
    if let Some(rest) = cleaned.strip_suffix(FENCE) {
        cleaned = rest.trim().to_string();
    }

    cleaned
}
