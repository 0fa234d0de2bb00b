//! Client for the hosted model (OpenAI-compatible chat completions).
//!
//! One request per user action. There is no retry; a failed request is
//! reported and the user runs the command again.

use anyhow::{Context, Result, anyhow};
use log::debug;
use reqwest::Client;
use serde_json::{Value, json};
use snapcal_core::snapcal_config::ModelConfig;

use crate::image::ImageInput;

pub struct ModelClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: String,
    max_tokens: u32,
}

impl ModelClient {
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| anyhow!("{} environment variable not set", config.api_key_env))?;

        Ok(ModelClient {
            http: Client::new(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            max_tokens: config.max_tokens,
        })
    }

    /// Send an image with instructions, return the reply text.
    pub async fn describe_image(&self, prompt: &str, image: &ImageInput) -> Result<String> {
        let messages = json!([
            {
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": image.data_url() } }
                ]
            }
        ]);
        self.complete(messages).await
    }

    /// Send a system prompt and a user message, return the reply text.
    pub async fn ask(&self, system: &str, user: &str) -> Result<String> {
        let messages = json!([
            { "role": "system", "content": system },
            { "role": "user", "content": user }
        ]);
        self.complete(messages).await
    }

    async fn complete(&self, messages: Value) -> Result<String> {
        let body = request_body(&self.model, self.max_tokens, messages);

        debug!("Sending request to {} (model {})", self.endpoint, self.model);
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Could not reach the model API")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!("Model API error: {} {}", status, api_error_message(&detail)));
        }

        let response_json: Value = response
            .json()
            .await
            .context("Model API returned invalid JSON")?;
        let content = message_content(&response_json)?;

        debug!("Model reply ({} chars)", content.len());
        Ok(content)
    }
}

fn request_body(model: &str, max_tokens: u32, messages: Value) -> Value {
    json!({
        "model": model,
        "messages": messages,
        "temperature": 0.2,
        "max_tokens": max_tokens
    })
}

/// Text of the first choice.
fn message_content(response: &Value) -> Result<String> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("Model reply had no message content"))
}

/// Pull `error.message` out of an API error body, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
