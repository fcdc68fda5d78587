// Ebook generation: prompt assembly and orchestration over a GenerationService

pub mod illustrations;
pub mod prompts;

use anyhow::{Context, Result};

use crate::api::{AspectRatio, GenerationService, TextRequest};
use crate::models::{AppConfig, FormData, GeneratedEbook};

/// Stands in for an empty text response.
pub const FALLBACK_TEXT: &str = "Não foi possível gerar o conteúdo. Tente novamente.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub thinking_budget: u32,
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for GenerationSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            thinking_budget: config.thinking_budget,
            temperature: config.temperature,
        }
    }
}

/// Generate the ebook markdown with chapter illustrations stitched in.
/// Errors from the text call propagate; illustration failures never do.
pub async fn generate_text<S>(
    service: &S,
    form: &FormData,
    settings: GenerationSettings,
) -> Result<String>
where
    S: GenerationService + ?Sized,
{
    let request = TextRequest {
        system_instruction: prompts::system_instruction(form),
        prompt: prompts::user_prompt(form),
        thinking_budget: settings.thinking_budget,
        temperature: settings.temperature,
    };
    tracing::debug!(prompt = %request.prompt, "Built ebook prompt");

    let text = service
        .generate_text(request)
        .await
        .context("Text generation failed")?;

    let text = if text.is_empty() {
        FALLBACK_TEXT.to_string()
    } else {
        text
    };

    Ok(illustrations::stitch(service, &text).await)
}

/// Best-effort image call: every failure becomes `None`.
pub async fn generate_image<S>(service: &S, prompt: String, aspect_ratio: AspectRatio) -> Option<String>
where
    S: GenerationService + ?Sized,
{
    match service.generate_image(prompt, aspect_ratio).await {
        Ok(Some(image)) => Some(image.to_data_uri()),
        Ok(None) => {
            tracing::warn!(
                aspect_ratio = aspect_ratio.as_str(),
                "Image response carried no inline data"
            );
            None
        }
        Err(e) => {
            tracing::warn!(
                aspect_ratio = aspect_ratio.as_str(),
                "Image generation failed: {e:#}"
            );
            None
        }
    }
}

pub async fn generate_cover<S>(service: &S, form: &FormData) -> Option<String>
where
    S: GenerationService + ?Sized,
{
    generate_image(service, prompts::cover_prompt(form), AspectRatio::Portrait).await
}

/// Run text and cover generation concurrently. Succeeds iff the text does.
pub async fn generate_ebook<S>(
    service: &S,
    form: &FormData,
    settings: GenerationSettings,
) -> Result<GeneratedEbook>
where
    S: GenerationService + ?Sized,
{
    let (content, cover) = tokio::join!(
        generate_text(service, form, settings),
        generate_cover(service, form)
    );

    let content = content?;
    tracing::info!(
        chars = content.len(),
        has_cover = cover.is_some(),
        "Ebook generated"
    );

    Ok(GeneratedEbook { content, cover })
}
