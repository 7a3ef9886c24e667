//! Chat completion wire types.

use serde::{Deserialize, Serialize};
use whys_engine::prompts::STYLE_GUIDANCE;
use whys_engine::{GenerationPurpose, GenerationRequest};

use crate::error::LlmError;

/// System message for root-cause requests; the user prompt carries the format rules.
const ANALYST_ROLE: &str = "You are a root cause analyst. Reply with a single JSON object.";

#[derive(Debug, Serialize, PartialEq)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Build the request body for a generation request.
#[must_use]
pub fn build_request<'a>(
    model: &'a str,
    temperature: f32,
    top_p: f32,
    request: &GenerationRequest,
) -> ChatRequest<'a> {
    let (system, response_format) = match request.purpose {
        GenerationPurpose::Question => (STYLE_GUIDANCE, None),
        GenerationPurpose::RootCause => (
            ANALYST_ROLE,
            Some(ResponseFormat {
                kind: "json_object",
            }),
        ),
    };
    ChatRequest {
        model,
        messages: vec![
            ChatMessage::new("system", system),
            ChatMessage::new("user", request.full_prompt()),
        ],
        temperature,
        top_p,
        response_format,
    }
}

/// Text of the first choice.
///
/// # Errors
///
/// Returns `LlmError::Parse` when the response has no choices or no content.
pub fn first_content(response: ChatResponse) -> Result<String, LlmError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| LlmError::Parse("response contained no message content".into()))
}
