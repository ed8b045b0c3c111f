use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::comparison::prompts::{comparison_system, COMPARISON_PROMPT_TEMPLATE};
use crate::errors::LlmExtractionError;
use crate::llm_client::prompts::fill;
use crate::llm_client::retry::RetryPolicy;
use crate::llm_client::{parse_json_lenient, CompletionRequest, CompletionService, RawReply};
use crate::models::comparison::{ComparisonResult, CvSummary, RankedCv};
use crate::reader::PlainText;

const MAX_STRENGTHS: usize = 5;
const MAX_WEAKNESSES: usize = 5;

/// Ranks CV summaries against a mission through the completion service.
pub struct MissionComparer {
    llm: Arc<dyn CompletionService>,
    retry: RetryPolicy,
}

impl MissionComparer {
    pub fn new(llm: Arc<dyn CompletionService>, retry: RetryPolicy) -> Self {
        Self { llm, retry }
    }

    /// One ranked entry per summary, most relevant first. Only transport
    /// failures are retried: a malformed ranking has no safe fix.
    pub async fn compare(
        &self,
        mission: &PlainText,
        cvs: &[CvSummary],
    ) -> Result<ComparisonResult, LlmExtractionError> {
        if cvs.is_empty() {
            return Ok(ComparisonResult::default());
        }
        info!("Comparing {} CVs against mission", cvs.len());

        let cvs_json = serde_json::to_string_pretty(cvs)?;
        let prompt = fill(
            COMPARISON_PROMPT_TEMPLATE,
            &[("cvs", cvs_json.as_str()), ("mission", mission.as_str())],
        );
        let system = comparison_system();
        let request = CompletionRequest {
            system: &system,
            prompt: &prompt,
            tool: None,
        };

        let llm = &self.llm;
        let request = &request;
        let reply = self
            .retry
            .run("mission comparison", move || async move {
                llm.generate_structured(request).await
            })
            .await?;

        let value = match reply {
            RawReply::Text(text) => parse_json_lenient(&text).map_err(|e| {
                debug!("Unparseable ranking reply: {text}");
                LlmExtractionError::InvalidJson(e.to_string())
            })?,
            RawReply::ToolCall { input, .. } => input,
        };

        let result = validate_ranking(value, cvs)?;
        info!("Ranking complete: {} results", result.results.len());
        Ok(result)
    }
}

#[derive(Debug, Deserialize)]
struct RawRanking {
    results: Vec<RawRankedCv>,
}

#[derive(Debug, Deserialize)]
struct RawRankedCv {
    filename: String,
    score: f64,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    matched_skills: Vec<String>,
    #[serde(default)]
    reasoning: Option<String>,
}

impl RawRankedCv {
    fn validate(self) -> Result<RankedCv, String> {
        if !self.score.is_finite() || !(0.0..=100.0).contains(&self.score) {
            return Err(format!(
                "score {} for '{}' is outside 0-100",
                self.score, self.filename
            ));
        }
        if self.strengths.is_empty() || self.strengths.len() > MAX_STRENGTHS {
            return Err(format!(
                "'{}' has {} strengths, expected 1-{MAX_STRENGTHS}",
                self.filename,
                self.strengths.len()
            ));
        }
        if self.weaknesses.len() > MAX_WEAKNESSES {
            return Err(format!(
                "'{}' has {} weaknesses, expected at most {MAX_WEAKNESSES}",
                self.filename,
                self.weaknesses.len()
            ));
        }
        Ok(RankedCv {
            filename: self.filename,
            score: self.score.round() as u8,
            strengths: self.strengths,
            weaknesses: self.weaknesses,
            summary: self.summary.unwrap_or_default(),
            matched_skills: self.matched_skills,
            reasoning: self.reasoning.unwrap_or_default(),
        })
    }
}

/// Checks shape, ranges and that every submitted filename is ranked exactly
/// once, then stable-sorts by descending score.
pub fn validate_ranking(value: Value, cvs: &[CvSummary]) -> Result<ComparisonResult, LlmExtractionError> {
    let raw = RawRanking::deserialize(&value)
        .map_err(|e| LlmExtractionError::InvalidRanking(e.to_string()))?;

    let mut results = raw
        .results
        .into_iter()
        .map(RawRankedCv::validate)
        .collect::<Result<Vec<_>, _>>()
        .map_err(LlmExtractionError::InvalidRanking)?;

    let mut expected: HashMap<&str, i64> = HashMap::new();
    for cv in cvs {
        *expected.entry(cv.filename.as_str()).or_default() += 1;
    }
    for ranked in &results {
        *expected.entry(ranked.filename.as_str()).or_default() -= 1;
    }
    let mut mismatched: Vec<String> = expected
        .into_iter()
        .filter(|(_, count)| *count != 0)
        .map(|(name, count)| {
            if count > 0 {
                format!("'{name}' missing")
            } else {
                format!("'{name}' unexpected or repeated")
            }
        })
        .collect();
    if !mismatched.is_empty() {
        mismatched.sort();
        return Err(LlmExtractionError::InvalidRanking(format!(
            "results do not cover the submitted CVs: {}",
            mismatched.join(", ")
        )));
    }

    let in_model_order: Vec<u8> = results.iter().map(|r| r.score).collect();
    results.sort_by(|a, b| b.score.cmp(&a.score));
    if results.iter().map(|r| r.score).ne(in_model_order) {
        debug!("Ranking re-sorted by score");
    }

    Ok(ComparisonResult { results })
}
