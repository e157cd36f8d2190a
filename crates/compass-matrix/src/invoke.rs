use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::InvocationError;

pub const ANTHROPIC_BEDROCK_VERSION: &str = "bedrock-2023-05-31";

/// Content block of a request message.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MessageContent {
    #[serde(rename = "type")]
    pub content_type: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Message {
    pub role: &'static str,
    pub content: Vec<MessageContent>,
}

/// Native Anthropic request body for Bedrock `InvokeModel`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InvokeRequest {
    pub anthropic_version: &'static str,
    pub max_tokens: u32,
    pub temperature: f64,
    pub messages: Vec<Message>,
}

impl InvokeRequest {
    #[must_use]
    pub fn new(prompt: &str, config: &ModelConfig) -> Self {
        Self {
            anthropic_version: ANTHROPIC_BEDROCK_VERSION,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            messages: vec![Message {
                role: "user",
                content: vec![MessageContent {
                    content_type: "text",
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InvokeResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct EndpointError {
    #[serde(alias = "Message")]
    message: String,
}

/// What came back from the endpoint, timed by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
    pub elapsed: Duration,
}

/// Moves a serialized request envelope to the model endpoint.
#[allow(async_fn_in_trait)]
pub trait ModelTransport {
    async fn send(&self, model_id: &str, body: String)
    -> Result<TransportResponse, InvocationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAnswer {
    pub text: String,
    pub elapsed: Duration,
}

/// Returns the text of the first content block. The text itself is not
/// checked to be JSON.
pub fn extract_answer_text(body: &str) -> Result<String, InvocationError> {
    let response: InvokeResponse = serde_json::from_str(body)
        .map_err(|error| InvocationError::MalformedResponse(error.to_string()))?;
    response
        .content
        .into_iter()
        .next()
        .and_then(|block| block.text)
        .ok_or(InvocationError::EmptyContent)
}

fn endpoint_error_message(body: &str) -> String {
    serde_json::from_str::<EndpointError>(body)
        .map(|error| error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Sends the prompt once. No retry.
pub async fn invoke_model<T: ModelTransport>(
    transport: &T,
    prompt: &str,
    config: &ModelConfig,
) -> Result<ModelAnswer, InvocationError> {
    let body = serde_json::to_string(&InvokeRequest::new(prompt, config))?;
    let response = transport.send(config.model.id(), body).await?;
    tracing::debug!(
        status = response.status,
        elapsed_ms = response.elapsed.as_millis(),
        "model endpoint responded"
    );

    if !(200..300).contains(&response.status) {
        return Err(InvocationError::Status {
            status: response.status,
            message: endpoint_error_message(&response.body),
        });
    }

    Ok(ModelAnswer {
        text: extract_answer_text(&response.body)?,
        elapsed: response.elapsed,
    })
}
