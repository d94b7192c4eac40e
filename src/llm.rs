use anyhow::Result;
use serde::Serialize;
use serde_json::json;

use crate::config::ReviewConfig;
use crate::error::ServiceError;

pub struct LlmClient {
    client: reqwest::Client,
    config: ReviewConfig,
}

impl LlmClient {
    pub fn new(config: ReviewConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// One chat-completion call at temperature 0 with the configured
    /// max_tokens cap. Returns the first choice's message text untouched.
    pub async fn chat_completion(&self, messages: Vec<Message>) -> Result<String> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let body = json!({
            "model": self.config.model,
            "messages": messages,
            "max_tokens": self.config.max_tokens,
            "temperature": 0,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ServiceError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                service: "review",
                status,
                body,
            }
            .into());
        }

        let response_json: serde_json::Value =
            response.json().await.map_err(ServiceError::Transport)?;
        let content = response_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(ServiceError::MissingField("choices[0].message.content"))?
            .to_string();

        Ok(content)
    }
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Needs a live OpenAI-compatible endpoint; run explicitly.
    async fn test_local_chat_completion() {
        let config = ReviewConfig {
            base_url: "http://localhost:11434".to_string(),
            api_key: "unused".to_string(),
            model: "llama3".to_string(),
            max_tokens: 64,
        };
        let client = LlmClient::new(config);
        let messages = vec![Message {
            role: "user".to_string(),
            content: "Say hello.".to_string(),
        }];

        let result = client.chat_completion(messages).await;
        match result {
            Ok(res) => println!("Success: {}", res),
            Err(e) => println!("Error: {}", e),
        }
    }
}
