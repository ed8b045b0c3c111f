use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::{AppError, LlmExtractionError};
use crate::extraction::prompts::{
    EXTRACTION_PROMPT_TEMPLATE, EXTRACTION_SYSTEM, EXTRACTION_TOOL_DESCRIPTION,
    EXTRACTION_TOOL_NAME,
};
use crate::extraction::repair::repair_payload;
use crate::extraction::schema::dossier_schema;
use crate::llm_client::prompts::{fill, NO_FABRICATION_INSTRUCTION};
use crate::llm_client::retry::RetryPolicy;
use crate::llm_client::{parse_json_lenient, CompletionRequest, CompletionService, RawReply, ToolSpec};
use crate::models::dossier::Dossier;
use crate::reader::PlainText;

/// Turns CV text into a validated `Dossier` through the completion service.
pub struct DossierExtractor {
    llm: Arc<dyn CompletionService>,
    retry: RetryPolicy,
}

impl DossierExtractor {
    pub fn new(llm: Arc<dyn CompletionService>, retry: RetryPolicy) -> Self {
        Self { llm, retry }
    }

    /// Gates raw caller text, then extracts. Short text never reaches the service.
    pub async fn extract_str(&self, raw: &str) -> Result<Dossier, AppError> {
        let text = PlainText::new("CV text", raw)?;
        Ok(self.extract(&text).await?)
    }

    pub async fn extract(&self, text: &PlainText) -> Result<Dossier, LlmExtractionError> {
        info!(
            "Extracting dossier from CV text ({} chars)",
            text.as_str().chars().count()
        );

        let prompt = fill(
            EXTRACTION_PROMPT_TEMPLATE,
            &[
                ("no_fabrication", NO_FABRICATION_INSTRUCTION),
                ("cv_text", text.as_str()),
            ],
        );
        let request = CompletionRequest {
            system: EXTRACTION_SYSTEM,
            prompt: &prompt,
            tool: Some(ToolSpec {
                name: EXTRACTION_TOOL_NAME,
                description: EXTRACTION_TOOL_DESCRIPTION,
                input_schema: dossier_schema(),
            }),
        };

        let llm = &self.llm;
        let request = &request;
        let payload = self
            .retry
            .run("dossier extraction", move || async move {
                let reply = llm.generate_structured(request).await?;
                parse_payload(reply)
            })
            .await?;

        let dossier = validate_with_repair(payload)?;
        info!(
            "Extracted dossier: {} key experiences, {} detailed experiences",
            dossier.recent_key_experiences.len(),
            dossier.detailed_experiences.len()
        );
        Ok(dossier)
    }
}

/// Reduces a reply to a JSON object. Failures here are worth another attempt.
fn parse_payload(reply: RawReply) -> Result<Value, LlmExtractionError> {
    let value = match reply {
        RawReply::ToolCall { name, .. } if name != EXTRACTION_TOOL_NAME => {
            return Err(LlmExtractionError::Unstructured(format!(
                "unexpected tool call `{name}`"
            )))
        }
        // Some models hand back the arguments as a JSON string.
        RawReply::ToolCall {
            input: Value::String(args),
            ..
        } => parse_json_lenient(&args).map_err(|e| LlmExtractionError::InvalidJson(e.to_string()))?,
        RawReply::ToolCall { input, .. } => input,
        RawReply::Text(text) => {
            parse_json_lenient(&text).map_err(|e| LlmExtractionError::InvalidJson(e.to_string()))?
        }
    };

    if value.is_object() {
        Ok(value)
    } else {
        Err(LlmExtractionError::Unstructured(
            "reply is not a JSON object".to_string(),
        ))
    }
}

/// Validates once, repairs once, validates once more.
pub fn validate_with_repair(payload: Value) -> Result<Dossier, LlmExtractionError> {
    match Dossier::deserialize(&payload) {
        Ok(dossier) => Ok(dossier),
        Err(first) => {
            warn!("Dossier validation failed, attempting mechanical repair: {first}");
            let repaired = repair_payload(payload);
            match Dossier::deserialize(&repaired) {
                Ok(dossier) => {
                    info!("Dossier validated after repair");
                    Ok(dossier)
                }
                Err(e) => {
                    warn!("Dossier still invalid after repair: {e}");
                    Err(LlmExtractionError::Schema(e.to_string()))
                }
            }
        }
    }
}
