// Comparison engine LLM prompt templates.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// System prompt for ranking CVs against a mission. Enforces JSON-only output.
pub fn comparison_system() -> String {
    format!(
        "You are a senior IT recruiter. For every CV provided, assess how well it fits \
        the given mission. {JSON_ONLY_SYSTEM}"
    )
}

/// Ranking prompt template. Replace `{cvs}` and `{mission}` before sending.
pub const COMPARISON_PROMPT_TEMPLATE: &str = r#"Rank the candidate CVs below against the mission.

MISSION:
{mission}

CVS (JSON array; each entry has a filename, a profile and recent key experiences;
an entry with an empty profile is a CV that could not be read and must still be ranked):
{cvs}

Return ONE JSON object with this EXACT schema (no extra fields):
{
  "results": [
    {
      "filename": "<string, copied verbatim from the CV entry>",
      "score": <integer 0-100>,
      "strengths": ["<string>"],
      "weaknesses": ["<string>"],
      "summary": "<one short sentence on the fit>",
      "matched_skills": ["<skill present in both the CV and the mission>"],
      "reasoning": "<string>"
    }
  ]
}

Rules:
- Exactly one result per CV entry, none added, none omitted.
- "results" is sorted from most to least relevant.
- 1 to 5 strengths and 0 to 5 weaknesses per CV.
- Base every judgment on the CV entry only."#;
