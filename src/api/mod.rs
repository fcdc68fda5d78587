// Gemini generateContent client

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::models::AppConfig;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} is not set")]
    MissingApiKey(&'static str),
    #[error("API request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    Portrait,
    Widescreen,
}

impl AspectRatio {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Portrait => "3:4",
            Self::Widescreen => "16:9",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    pub system_instruction: String,
    pub prompt: String,
    pub thinking_budget: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub mime_type: String,
    /// Base64 payload exactly as returned by the service.
    pub data: String,
}

impl InlineImage {
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// The hosted text and image generation capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate_text(&self, request: TextRequest) -> Result<String>;

    /// `Ok(None)` means the call succeeded but carried no image.
    async fn generate_image(
        &self,
        prompt: String,
        aspect_ratio: AspectRatio,
    ) -> Result<Option<InlineImage>>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

impl Content {
    fn user(text: String) -> Self {
        Self {
            role: Some("user"),
            parts: vec![Part { text }],
        }
    }

    fn system(text: String) -> Self {
        Self {
            role: None,
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub thought: bool,
    #[serde(default)]
    pub inline_data: Option<InlineImage>,
}

impl GenerateContentResponse {
    fn parts(&self) -> &[ResponsePart] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| content.parts.as_slice())
            .unwrap_or_default()
    }

    /// Answer text of the first candidate, with thought summaries left out.
    pub fn text(&self) -> String {
        self.parts()
            .iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text.as_deref())
            .collect()
    }

    pub fn into_first_image(self) -> Option<InlineImage> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|content| content.parts.into_iter().find_map(|part| part.inline_data))
    }

    fn finish_reason(&self) -> &str {
        self.candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .unwrap_or("UNKNOWN")
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    text_model: String,
    image_model: String,
    client: Client,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Build a client with the key from `GEMINI_API_KEY`.
    pub fn from_env(config: &AppConfig) -> Result<Self> {
        Self::with_api_key(config, std::env::var(API_KEY_ENV).ok())
    }

    pub fn with_api_key(config: &AppConfig, api_key: Option<String>) -> Result<Self> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(ApiError::MissingApiKey(API_KEY_ENV))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key,
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
            client,
        })
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = format!("{}/v1beta/models/{model}:generateContent", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .context("Failed to send generateContent request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body }.into());
        }

        let result = response
            .json::<GenerateContentResponse>()
            .await
            .context("Failed to parse generateContent response")?;

        Ok(result)
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    async fn generate_text(&self, request: TextRequest) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content::user(request.prompt)],
            system_instruction: Some(Content::system(request.system_instruction)),
            generation_config: GenerationConfig {
                temperature: Some(request.temperature),
                thinking_config: Some(ThinkingConfig {
                    thinking_budget: request.thinking_budget,
                }),
                ..Default::default()
            },
        };

        tracing::info!(model = %self.text_model, "Requesting ebook text");
        let response = self.generate_content(&self.text_model, &body).await?;
        let text = response.text();
        if text.is_empty() {
            tracing::warn!(
                finish_reason = response.finish_reason(),
                "Text response carried no content"
            );
        }
        Ok(text)
    }

    async fn generate_image(
        &self,
        prompt: String,
        aspect_ratio: AspectRatio,
    ) -> Result<Option<InlineImage>> {
        let body = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            system_instruction: None,
            generation_config: GenerationConfig {
                image_config: Some(ImageConfig {
                    aspect_ratio: aspect_ratio.as_str(),
                }),
                ..Default::default()
            },
        };

        tracing::info!(
            model = %self.image_model,
            aspect_ratio = aspect_ratio.as_str(),
            "Requesting image"
        );
        let response = self.generate_content(&self.image_model, &body).await?;
        Ok(response.into_first_image())
    }
}
