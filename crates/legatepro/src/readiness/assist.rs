//! Optional LLM refinement of the heuristic plan.
//!
//! A single best-effort chat-completion call; any failure (transport,
//! unexpected shape, unparsable content) surfaces as an [`AssistError`] and
//! the caller falls back to the heuristic step list.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::plan::{PlanStep, ReadinessSignal};

/// Context handed to the assistant alongside the heuristic draft.
#[derive(Debug, Clone, Serialize)]
pub struct AssistContext {
    pub decedent_name: String,
    pub score: u8,
    pub signals: Vec<ReadinessSignal>,
    pub draft_steps: Vec<PlanStep>,
}

/// Plan-refinement seam.
#[async_trait]
pub trait PlanAssistant: Send + Sync {
    async fn refine(&self, context: &AssistContext) -> Result<Vec<PlanStep>, AssistError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    #[error("assist request failed: {0}")]
    Transport(String),
    #[error("assist response was not usable: {0}")]
    Protocol(String),
}

const SYSTEM_PROMPT: &str = "You are helping an estate administrator prioritize next steps. \
Respond with only a JSON array of objects shaped {\"priority\": 1, \"title\": \"...\", \
\"rationale\": \"...\"}; priority 1 is most urgent.";

/// Chat-completion backed assistant.
pub struct HttpPlanAssistant {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl HttpPlanAssistant {
    pub fn new(endpoint: String, api_key: Option<String>, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key,
            model,
        }
    }

    fn parse_steps(content: &str) -> Result<Vec<PlanStep>, AssistError> {
        #[derive(Deserialize)]
        struct RawStep {
            priority: u8,
            title: String,
            rationale: Option<String>,
        }

        // Models sometimes wrap the array in a code fence.
        let trimmed = content
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim();

        let raw: Vec<RawStep> = serde_json::from_str(trimmed)
            .map_err(|err| AssistError::Protocol(err.to_string()))?;
        if raw.is_empty() {
            return Err(AssistError::Protocol("empty step list".to_string()));
        }

        let mut steps: Vec<PlanStep> = raw
            .into_iter()
            .map(|step| PlanStep {
                priority: step.priority.clamp(1, 9),
                title: step.title,
                rationale: step.rationale.unwrap_or_default(),
            })
            .collect();
        steps.sort_by_key(|step| step.priority);
        Ok(steps)
    }
}

#[async_trait]
impl PlanAssistant for HttpPlanAssistant {
    async fn refine(&self, context: &AssistContext) -> Result<Vec<PlanStep>, AssistError> {
        let user_prompt = serde_json::to_string(context)
            .map_err(|err| AssistError::Protocol(err.to_string()))?;

        let mut request = self.http.post(&self.endpoint).json(&json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_prompt },
            ],
            "temperature": 0.2,
        }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| AssistError::Transport(err.to_string()))?;
        if !response.status().is_success() {
            return Err(AssistError::Transport(format!(
                "status {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| AssistError::Protocol(err.to_string()))?;
        let content = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| AssistError::Protocol("missing completion content".to_string()))?;

        Self::parse_steps(content)
    }
}
