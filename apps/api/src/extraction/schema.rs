//! JSON schema of the dossier, attached to the extraction tool as its `input_schema`.

use std::sync::LazyLock;

use serde_json::{json, Map, Value};

use crate::models::dossier::TechnicalSkills;

static DOSSIER_SCHEMA: LazyLock<Value> = LazyLock::new(build);

pub fn dossier_schema() -> &'static Value {
    &DOSSIER_SCHEMA
}

fn strings() -> Value {
    json!({"type": "array", "items": {"type": "string"}})
}

fn object(fields: &[&str]) -> Value {
    let properties: Map<String, Value> = fields
        .iter()
        .map(|f| (f.to_string(), json!({"type": "string"})))
        .collect();
    json!({"type": "object", "properties": properties})
}

fn technical_skills() -> Value {
    let properties: Map<String, Value> = TechnicalSkills::CATEGORIES
        .iter()
        .map(|c| (c.to_string(), strings()))
        .collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": TechnicalSkills::CATEGORIES,
    })
}

fn build() -> Value {
    let mut key_experience = object(&["client", "role", "duration", "description"]);
    key_experience["properties"]["responsibilities"] = strings();

    json!({
        "type": "object",
        "properties": {
            "header": object(&[
                "job_title",
                "years_of_experience",
                "first_name",
                "last_name",
                "profile_summary",
            ]),
            "recent_key_experiences": {
                "type": "array",
                "items": key_experience,
                "maxItems": 5,
            },
            "education": {
                "type": "array",
                "items": object(&["degree", "institution", "year"]),
            },
            "certifications": {
                "type": "array",
                "items": object(&["title", "issuer", "year"]),
            },
            "languages": {
                "type": "array",
                "items": object(&["language", "level"]),
            },
            "technical_skills": technical_skills(),
            "functional_skills": {
                "type": "object",
                "properties": {
                    "project_management": strings(),
                    "code_review": {"type": "boolean"},
                    "pair_programming": {"type": "boolean"},
                    "deliverable_quality": {"type": "boolean"},
                    "scrum_methodology": strings(),
                    "encadrement": {"type": "string"},
                },
            },
            "detailed_experiences": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "client": {"type": "string"},
                        "role": {"type": "string"},
                        "start_date": {"type": "string"},
                        "end_date": {"type": "string"},
                        "context": {"type": "string"},
                        "responsibilities": strings(),
                        "deliverables": strings(),
                        "technical_environment": technical_skills(),
                    },
                },
            },
        },
        "required": [
            "header",
            "recent_key_experiences",
            "education",
            "certifications",
            "languages",
            "technical_skills",
            "functional_skills",
            "detailed_experiences",
        ],
    })
}
