use std::time::Duration;

use compass_matrix::{InvocationError, ModelTransport, TransportResponse};
use url::Url;
use worker::wasm_bindgen::JsValue;
use worker::{Date, Env, Fetch, Headers, Method, Request, RequestInit};

use crate::error::ApiError;
use crate::models::DEFAULT_BEDROCK_REGION;

/// Where and how to reach the Bedrock runtime.
#[derive(Debug, Clone)]
pub struct BedrockSettings {
    pub endpoint: Url,
    pub api_key: String,
}

pub fn default_endpoint(region: &str) -> String {
    format!("https://bedrock-runtime.{region}.amazonaws.com/")
}

/// `POST {endpoint}/model/{model id}/invoke`, with the id percent-encoded.
pub fn invoke_url(endpoint: &Url, model_id: &str) -> Result<Url, url::ParseError> {
    let mut base = endpoint.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(&format!("model/{}/invoke", urlencoding::encode(model_id)))
}

impl BedrockSettings {
    pub fn from_env(env: &Env) -> Result<Self, ApiError> {
        let region = env
            .var("BEDROCK_REGION")
            .map(|value| value.to_string())
            .unwrap_or_else(|_| DEFAULT_BEDROCK_REGION.to_string());
        let endpoint = env
            .var("BEDROCK_ENDPOINT")
            .map(|value| value.to_string())
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| default_endpoint(&region));
        let api_key = env
            .secret("BEDROCK_API_KEY")
            .map(|value| value.to_string())
            .map_err(|_| ApiError::Unavailable("BEDROCK_API_KEY is not configured".to_string()))?;

        Ok(Self {
            endpoint: Url::parse(&endpoint)?,
            api_key,
        })
    }
}

pub struct BedrockTransport {
    settings: BedrockSettings,
}

impl BedrockTransport {
    pub fn new(settings: BedrockSettings) -> Self {
        Self { settings }
    }

    async fn post(&self, url: &Url, body: String) -> worker::Result<(u16, String)> {
        let headers = Headers::new();
        headers.set("Content-Type", "application/json")?;
        headers.set("Accept", "application/json")?;
        headers.set("Authorization", &format!("Bearer {}", self.settings.api_key))?;

        let mut init = RequestInit::new();
        init.with_method(Method::Post)
            .with_headers(headers)
            .with_body(Some(JsValue::from(body)));

        let request = Request::new_with_init(url.as_str(), &init)?;
        let mut response = Fetch::Request(request).send().await?;
        let status = response.status_code();
        let text = response.text().await?;
        Ok((status, text))
    }
}

impl ModelTransport for BedrockTransport {
    async fn send(
        &self,
        model_id: &str,
        body: String,
    ) -> Result<TransportResponse, InvocationError> {
        let url = invoke_url(&self.settings.endpoint, model_id)
            .map_err(|error| InvocationError::Transport(error.to_string()))?;

        let started = Date::now().as_millis();
        let (status, body) = self
            .post(&url, body)
            .await
            .map_err(|error| InvocationError::Transport(error.to_string()))?;
        let elapsed = Duration::from_millis(Date::now().as_millis().saturating_sub(started));

        worker::console_log!(
            "bedrock invoke model={model_id} status={status} elapsed_ms={}",
            elapsed.as_millis()
        );

        Ok(TransportResponse {
            status,
            body,
            elapsed,
        })
    }
}
