// Shared prompt constants and prompt-building utilities.
// Each engine that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Common instruction appended to every prompt that reads a CV.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: Only use information present in the provided text. \
    Do NOT infer, interpolate, or invent names, clients, dates or skills. \
    If the text does not contain a value, leave the field empty (empty string or empty list) \
    rather than guessing.";

/// Fills `{name}` placeholders in a prompt template in a single pass.
/// Substituted values are never rescanned; unknown braces are kept as written.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let known = tail.find('}').and_then(|close| {
            let key = &tail[..close];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });
        match known {
            Some((value, close)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_replaces_every_placeholder() {
        let out = fill("{a} and {b} and {a}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x and y and x");
    }

    #[test]
    fn test_fill_does_not_rescan_substituted_values() {
        let out = fill("{a} | {b}", &[("a", "{b}"), ("b", "x")]);
        assert_eq!(out, "{b} | x");
    }

    #[test]
    fn test_fill_keeps_unknown_braces() {
        let out = fill("{\n  \"results\": []\n} {a} {", &[("a", "x")]);
        assert_eq!(out, "{\n  \"results\": []\n} x {");
    }
}
