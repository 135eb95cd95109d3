//! OpenRouter-compatible chat-completion client.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};

use crate::error::ExternalServiceError;
use crate::storage::CoachConfig;

const SERVICE: &str = "openrouter";

/// Instruction markers some models echo back.
const MODEL_TAGS: [&str; 10] = [
    "[B_INST]", "[/B_INST]", "[INST]", "[/INST]", "[OUT]", "[/OUT]", "<s>", "</s>", "<<SYS>>",
    "<</SYS>>",
];

/// Blocking wrapper around an async reqwest client.
///
/// Owns a current-thread runtime so callers stay synchronous.
pub struct OpenRouterClient {
    http: Client,
    runtime: tokio::runtime::Runtime,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
    timeout_secs: u64,
}

impl fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl OpenRouterClient {
    pub fn new(config: &CoachConfig, api_key: impl Into<String>) -> Result<Self, ExternalServiceError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ExternalServiceError::NotConfigured {
                service: SERVICE.into(),
            });
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ExternalServiceError::BadResponse {
                service: SERVICE.into(),
                message: format!("cannot start runtime: {e}"),
            })?;
        Ok(Self {
            http: Client::new(),
            runtime,
            api_key,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Send one user prompt and return the cleaned reply.
    pub fn complete(&self, prompt: &str) -> Result<String, ExternalServiceError> {
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });
        let http_err = |source: reqwest::Error| ExternalServiceError::Http {
            service: SERVICE.into(),
            source,
        };

        let request = async {
            let resp = self
                .http
                .post(&self.base_url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(http_err)?;

            let status = resp.status();
            if !status.is_success() {
                return Err(ExternalServiceError::Status {
                    service: SERVICE.into(),
                    status: status.as_u16(),
                });
            }
            resp.json::<Value>().await.map_err(http_err)
        };

        let timeout = Duration::from_secs(self.timeout_secs);
        let value = self
            .runtime
            .block_on(async { tokio::time::timeout(timeout, request).await })
            .map_err(|_| ExternalServiceError::Timeout {
                service: SERVICE.into(),
                timeout_secs: self.timeout_secs,
            })??;

        let content = value["choices"][0]["message"]["content"]
            .as_str()
            .map(clean_reply)
            .unwrap_or_default();
        if content.is_empty() {
            return Err(ExternalServiceError::BadResponse {
                service: SERVICE.into(),
                message: "empty completion".into(),
            });
        }
        tracing::debug!(chars = content.len(), "coach completion received");
        Ok(content)
    }
}

/// Strip instruction markers and collapse whitespace.
pub fn clean_reply(raw: &str) -> String {
    let mut text = raw.to_string();
    for tag in MODEL_TAGS {
        text = text.replace(tag, "");
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_reply_strips_tags_and_whitespace() {
        assert_eq!(
            clean_reply("  <s>[INST] Keep\n\n going!  [/INST]</s> "),
            "Keep going!"
        );
        assert_eq!(clean_reply("<<SYS>><</SYS>>"), "");
    }

    #[test]
    fn empty_key_is_not_configured() {
        let err = OpenRouterClient::new(&CoachConfig::default(), "  ").unwrap_err();
        assert!(matches!(err, ExternalServiceError::NotConfigured { .. }));
    }
}
