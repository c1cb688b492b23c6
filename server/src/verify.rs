//! # AI License Verification
//!
//! Forwards a free-text query to a hosted chat-completion model and parses
//! the single-shot JSON reply. The model credential never leaves this
//! process: it is read from the environment per request and upstream error
//! bodies are logged here, never relayed to the client.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{config::Config, error::AppError};

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Returned when the model reply is not the JSON we asked for.
pub const SUGGESTION_FALLBACK: &str = "Unable to parse license data";

// near-deterministic sampling, bounded reply
const TEMPERATURE: f32 = 0.1;
const MAX_TOKENS: u32 = 500;

/// Outcome of one AI-assisted lookup, also the wire shape of the `/verify`
/// response. `found` must be present in the model reply; everything else
/// is optional and defaulted.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub found: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_holder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl VerificationResult {
    pub fn not_found(suggestion: &str) -> Self {
        Self {
            found: false,
            suggestion: Some(suggestion.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

/// The credential is resolved per request so a rotation never requires a
/// restart; absence is a server misconfiguration, not a client error.
pub fn api_key() -> Result<String, AppError> {
    env::var(API_KEY_VAR)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or(AppError::MissingApiKey)
}

fn build_prompt(query: &str) -> String {
    format!(
        r#"You are a New York State cannabis license verification assistant. A user is asking about the following license or business: "{query}"

Recognized license number prefixes:
- AUCC: adult-use conditional cultivator
- AUCP: adult-use conditional processor
- AUCD: adult-use distributor
- AUMB: adult-use conditional microbusiness
- OCM: general Office of Cannabis Management license

Reply with ONLY a JSON object, no prose and no code fences, in exactly one of these two shapes:
{{"found": true, "licenseNumber": "...", "companyName": "...", "licenseHolder": "...", "licenseType": "...", "city": "...", "state": "...", "address": "..."}}
{{"found": false, "suggestion": "..."}}"#
    )
}

/// Parses the model's free-text answer. Anything that is not the expected
/// JSON degrades to a well-formed not-found result so the client contract
/// stays uniform even when the model misbehaves.
pub fn parse_model_reply(content: &str) -> VerificationResult {
    serde_json::from_str(content.trim())
        .unwrap_or_else(|_| VerificationResult::not_found(SUGGESTION_FALLBACK))
}

/// One round trip to the chat-completion API.
pub async fn lookup_license(
    http: &reqwest::Client,
    config: &Config,
    api_key: &str,
    query: &str,
) -> Result<VerificationResult, AppError> {
    let request = ChatRequest {
        model: &config.model,
        messages: vec![ChatMessage {
            role: "user",
            content: build_prompt(query),
        }],
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    };

    let response = http
        .post(format!("{}/v1/chat/completions", config.model_url))
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .await
        .map_err(|e| {
            error!("model call failed to send: {e}");
            AppError::Upstream
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        error!(%status, "model call rejected: {body}");

        return Err(AppError::Upstream);
    }

    let completion: ChatResponse = response.json().await.map_err(|e| {
        error!("model response body unreadable: {e}");
        AppError::Upstream
    })?;

    let content = completion
        .choices
        .first()
        .map(|choice| choice.message.content.as_str())
        .unwrap_or_default();

    Ok(parse_model_reply(content))
}

// tests that touch the process environment serialize on this
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
