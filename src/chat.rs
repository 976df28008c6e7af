//! Football assistant backed by a generative-language API
//!
//! One request per question, the answer is passed through as-is.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ApiConfig, BrokoliError, Result};

const PREAMBLE: &str = "You are the AI assistant of the Brokoli Football website. \
Answer questions about football, match predictions, league standings and fixtures. \
Be friendly and informative.";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Option<Content>,
}

/// Build the full prompt sent for a user question
pub fn build_prompt(message: &str) -> String {
    format!("{}\n\nUser question: {}", PREAMBLE, message.trim())
}

fn answer_text(response: GenerateResponse) -> Result<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(BrokoliError::Chat("provider returned no answer".to_string()))
    } else {
        Ok(text)
    }
}

/// Client for the chat provider
pub struct ChatClient {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl ChatClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("brokoli/0.1")
            .timeout(timeout)
            .build()?;
        Ok(ChatClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        Self::new(
            api.gemini_url.clone(),
            api.gemini_model.clone(),
            api.gemini_key.clone(),
            Duration::from_secs(api.timeout_secs),
        )
    }

    /// Ask the assistant a question
    pub fn ask(&self, message: &str) -> Result<String> {
        if message.trim().is_empty() {
            return Err(BrokoliError::EmptyMessage);
        }
        let key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(BrokoliError::MissingApiKey("GEMINI_API_KEY"))?;

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        log::debug!("POST {}", url);

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(build_prompt(message)),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", key)])
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(BrokoliError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        answer_text(response.json()?)
    }
}
