use serde::{Deserialize, Serialize};

use crate::models::dossier::{Dossier, KeyExperience};

/// Lightweight projection of one CV sent to the ranking call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvSummary {
    pub filename: String,
    pub profile: String,
    #[serde(default)]
    pub recent_key_experiences: Vec<KeyExperience>,
}

impl CvSummary {
    pub fn from_dossier(filename: impl Into<String>, dossier: &Dossier) -> Self {
        Self {
            filename: filename.into(),
            profile: dossier.header.profile_summary.clone(),
            recent_key_experiences: dossier.recent_key_experiences.clone(),
        }
    }

    /// Stand-in for a CV that could not be read or extracted, so it still
    /// appears in the ranking. `profile` may carry a raw text excerpt.
    pub fn placeholder(filename: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            profile: profile.into(),
            recent_key_experiences: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCv {
    pub filename: String,
    /// 0–100.
    pub score: u8,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub summary: String,
    pub matched_skills: Vec<String>,
    pub reasoning: String,
}

/// Ranked most-to-least relevant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub results: Vec<RankedCv>,
}
