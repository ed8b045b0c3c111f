//! Mechanical repair of a dossier payload that failed validation.
//!
//! Only reshapes types the model is known to get wrong: lists where a string
//! belongs, strings where a list belongs, a lone object where a list belongs,
//! nulls where a value belongs. Never invents a value. Idempotent.

use serde_json::{Map, Value};

use crate::models::dossier::TechnicalSkills;

const HEADER_FIELDS: [&str; 5] = [
    "job_title",
    "years_of_experience",
    "first_name",
    "last_name",
    "profile_summary",
];

const RECORD_LISTS: [&str; 5] = [
    "recent_key_experiences",
    "education",
    "certifications",
    "languages",
    "detailed_experiences",
];

const FLAGS: [&str; 3] = ["code_review", "pair_programming", "deliverable_quality"];

pub fn repair_payload(mut payload: Value) -> Value {
    let Some(root) = payload.as_object_mut() else {
        return payload;
    };

    if let Some(Value::Object(header)) = root.get_mut("header") {
        drop_nulls(header);
        for field in HEADER_FIELDS {
            if let Some(value) = header.get_mut(field) {
                to_single_string(value, " ");
            }
        }
    }

    for list in RECORD_LISTS {
        let entry = root.entry(list).or_insert(Value::Null);
        match entry {
            Value::Null => *entry = Value::Array(Vec::new()),
            Value::Object(_) => *entry = Value::Array(vec![entry.take()]),
            _ => {}
        }
        if let Value::Array(items) = entry {
            for item in items.iter_mut().filter_map(Value::as_object_mut) {
                drop_nulls(item);
                for field in ["responsibilities", "deliverables"] {
                    if let Some(value) = item.get_mut(field) {
                        to_lines(value);
                    }
                }
                if let Some(Value::Object(env)) = item.get_mut("technical_environment") {
                    repair_categories(env);
                }
            }
        }
    }

    if let Some(Value::Object(skills)) = root.get_mut("technical_skills") {
        repair_categories(skills);
    }

    if let Some(Value::Object(functional)) = root.get_mut("functional_skills") {
        drop_nulls(functional);
        for field in ["encadrement", "mentoring"] {
            if let Some(value) = functional.get_mut(field) {
                to_single_string(value, ", ");
            }
        }
        merge_mentoring(functional);
        for field in ["project_management", "scrum_methodology"] {
            if let Some(value) = functional.get_mut(field) {
                to_items(value);
            }
        }
        for flag in FLAGS {
            if let Some(value) = functional.get_mut(flag) {
                to_flag(value);
            }
        }
    }

    payload
}

/// `mentoring` is an accepted spelling of `encadrement`; both at once is a duplicate field.
fn merge_mentoring(functional: &mut Map<String, Value>) {
    let Some(extra) = functional.remove("mentoring") else {
        return;
    };
    if !functional.contains_key("encadrement") {
        functional.insert("encadrement".to_string(), extra);
    } else if let (Some(Value::String(current)), Value::String(extra)) =
        (functional.get_mut("encadrement"), extra)
    {
        if current.trim().is_empty() {
            *current = extra;
        } else if !extra.trim().is_empty() && *current != extra {
            current.push_str(", ");
            current.push_str(&extra);
        }
    }
}

fn drop_nulls(object: &mut Map<String, Value>) {
    object.retain(|_, v| !v.is_null());
}

fn repair_categories(skills: &mut Map<String, Value>) {
    drop_nulls(skills);
    for category in TechnicalSkills::CATEGORIES {
        if let Some(value) = skills.get_mut(category) {
            to_items(value);
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `["a", "b"]` → `"a<sep>b"`; numbers and booleans become their text.
fn to_single_string(value: &mut Value, separator: &str) {
    match value {
        Value::Array(parts) => {
            let joined = parts
                .iter()
                .filter_map(scalar_text)
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>()
                .join(separator);
            *value = Value::String(joined);
        }
        Value::Number(_) | Value::Bool(_) => {
            if let Some(text) = scalar_text(value) {
                *value = Value::String(text);
            }
        }
        _ => {}
    }
}

/// A newline-delimited string → one entry per non-blank line.
fn to_lines(value: &mut Value) {
    if let Value::String(text) = value {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| Value::String(l.to_string()))
            .collect();
        *value = Value::Array(lines);
    }
}

/// `"Rust, Go"` → `["Rust", "Go"]`; stray numbers inside a list become strings.
fn to_items(value: &mut Value) {
    match value {
        Value::String(text) => {
            let items = text
                .split([',', ';', '\n'])
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
                .collect();
            *value = Value::Array(items);
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                if let Value::Number(_) | Value::Bool(_) = item {
                    if let Some(text) = scalar_text(item) {
                        *item = Value::String(text);
                    }
                }
            }
        }
        _ => {}
    }
}

fn to_flag(value: &mut Value) {
    if let Value::String(text) = value {
        match text.trim().to_lowercase().as_str() {
            "true" | "yes" | "oui" => *value = Value::Bool(true),
            "false" | "no" | "non" | "" => *value = Value::Bool(false),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn malformed() -> Value {
        json!({
            "header": {
                "job_title": ["Lead", "Backend"],
                "years_of_experience": 8,
                "first_name": "Jeanne",
                "last_name": null,
            },
            "recent_key_experiences": null,
            "technical_skills": {"language_framework": "Rust, Go", "tools": null},
            "functional_skills": {
                "encadrement": ["2 juniors", "revue de code"],
                "code_review": "oui",
            },
            "detailed_experiences": {
                "client": "Acme",
                "responsibilities": "Conception de l'API\n\n  Mise en place CI  \n",
                "deliverables": ["API v2"],
            },
        })
    }

    #[test]
    fn test_repairs_known_mismatches() {
        let repaired = repair_payload(malformed());
        assert_eq!(repaired["header"]["job_title"], "Lead Backend");
        assert_eq!(repaired["header"]["years_of_experience"], "8");
        assert!(repaired["header"].get("last_name").is_none());
        assert_eq!(repaired["recent_key_experiences"], json!([]));
        assert_eq!(repaired["education"], json!([]));
        assert_eq!(
            repaired["technical_skills"]["language_framework"],
            json!(["Rust", "Go"])
        );
        assert_eq!(
            repaired["functional_skills"]["encadrement"],
            "2 juniors, revue de code"
        );
        assert_eq!(repaired["functional_skills"]["code_review"], true);

        let detailed = &repaired["detailed_experiences"];
        assert_eq!(detailed.as_array().map(Vec::len), Some(1));
        assert_eq!(
            detailed[0]["responsibilities"],
            json!(["Conception de l'API", "Mise en place CI"])
        );
    }

    #[test]
    fn test_repair_is_idempotent() {
        let once = repair_payload(malformed());
        let twice = repair_payload(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_repair_never_invents_required_objects() {
        let repaired = repair_payload(json!({"technical_skills": {}}));
        assert!(repaired.get("header").is_none());
        assert!(repaired.get("functional_skills").is_none());
    }

    #[test]
    fn test_repaired_payload_validates() {
        let mut payload = malformed();
        payload["functional_skills"]["project_management"] = json!("Jira");
        let dossier: crate::models::dossier::Dossier =
            serde_json::from_value(repair_payload(payload)).unwrap();
        assert_eq!(dossier.functional_skills.mentoring, "2 juniors, revue de code");
        assert_eq!(dossier.functional_skills.project_management, vec!["Jira"]);
        assert_eq!(dossier.detailed_experiences[0].client, "Acme");
    }

    #[test]
    fn test_mentoring_is_folded_into_encadrement() {
        let both = repair_payload(json!({
            "functional_skills": {"encadrement": "Lead of 3", "mentoring": ["2 juniors"]}
        }));
        assert_eq!(
            both["functional_skills"],
            json!({"encadrement": "Lead of 3, 2 juniors"})
        );

        let alias_only = repair_payload(json!({"functional_skills": {"mentoring": "2 juniors"}}));
        assert_eq!(alias_only["functional_skills"], json!({"encadrement": "2 juniors"}));
        assert_eq!(repair_payload(both.clone()), both);
    }

    #[test]
    fn test_non_object_payload_is_returned_as_is() {
        assert_eq!(repair_payload(json!("nope")), json!("nope"));
    }
}
