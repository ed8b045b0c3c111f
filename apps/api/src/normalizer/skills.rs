use std::collections::HashSet;

/// Word-initial letters upper-cased, the rest lower-cased. A "word" starts
/// after any non-letter, so `"node.js"` becomes `"Node.Js"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Trims, title-cases and case-insensitively deduplicates, keeping first occurrences.
pub fn clean_skill_list(skills: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(title_case)
        .filter(|s| seen.insert(s.to_lowercase()))
        .collect()
}
