//! Structured extraction engine: CV text → validated `Dossier`.
//!
//! The completion service is asked to answer through a tool whose input
//! schema is the dossier schema. Its reply is parsed, validated, and on a
//! validation failure mechanically repaired and validated exactly once more.

pub mod engine;
pub mod handlers;
pub mod prompts;
pub mod repair;
pub mod schema;

pub use engine::DossierExtractor;

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub fn cv_text() -> String {
        "Jeanne Martin, Lead développeuse backend\n\
         8 ans d'expérience. Acme (2021-2024) : API Rust, Kafka, PostgreSQL.\n\
         Globex (2018-2021) : microservices Go, Kubernetes, encadrement de 2 juniors."
            .to_string()
    }

    /// A schema-valid dossier payload as the model would send it.
    pub fn dossier_payload(first_name: &str) -> Value {
        json!({
            "header": {
                "job_title": "Lead Backend Developer",
                "years_of_experience": "8",
                "first_name": first_name,
                "last_name": "Martin",
                "profile_summary": format!("{first_name} builds reliable distributed systems in Rust."),
            },
            "recent_key_experiences": [
                {
                    "client": "Acme",
                    "role": "Lead developer",
                    "duration": "2021-01 → 2024-01",
                    "description": "Event-driven payments platform.",
                    "responsibilities": ["Designed the Kafka topology"],
                }
            ],
            "education": [{"degree": "MSc Computer Science", "institution": "INSA Lyon", "year": "2016"}],
            "certifications": [],
            "languages": [{"language": "English", "level": "C1"}],
            "technical_skills": {
                "language_framework": ["Rust", "Go"],
                "ci_cd": ["GitLab CI"],
                "state_management": [],
                "tests": ["cargo test"],
                "tools": ["Docker", "Kubernetes"],
                "database_bigdata": ["PostgreSQL", "Kafka"],
                "data_analytics_visualisation": [],
                "collaboration": ["Jira"],
                "ux_ui": [],
            },
            "functional_skills": {
                "project_management": ["Agile"],
                "code_review": true,
                "pair_programming": true,
                "deliverable_quality": true,
                "scrum_methodology": ["Scrum"],
                "encadrement": "Mentored 2 junior developers",
            },
            "detailed_experiences": [
                {
                    "client": "Acme",
                    "role": "Lead developer",
                    "start_date": "2021-01",
                    "end_date": "2024-01",
                    "context": "Acme is a payments company rebuilding its settlement platform.",
                    "responsibilities": ["Designed the Kafka topology"],
                    "deliverables": ["Settlement service in production"],
                    "technical_environment": {"language_framework": ["Rust"]},
                }
            ],
        })
    }
}
