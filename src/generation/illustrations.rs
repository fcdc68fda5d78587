// Chapter illustration placeholders
//
// The text model marks illustration spots with `[ILLUSTRATION_PROMPT: <text>]`.
// The prompt ends at the first `]` on the same line: a `]` inside the prompt
// truncates it and leaves the rest of the prompt in the document.

use futures::future::join_all;
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

use crate::api::{AspectRatio, GenerationService};

pub const ILLUSTRATION_ALT: &str = "Ilustração do Capítulo";

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[ILLUSTRATION_PROMPT:\s*(.*?)\]").expect("placeholder pattern is valid")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Byte range of the whole tag in the source text.
    pub range: Range<usize>,
    pub prompt: String,
}

pub fn find_placeholders(text: &str) -> Vec<Placeholder> {
    placeholder_pattern()
        .captures_iter(text)
        .filter_map(|caps| {
            let tag = caps.get(0)?;
            Some(Placeholder {
                range: tag.range(),
                prompt: caps.get(1).map_or("", |m| m.as_str()).trim().to_string(),
            })
        })
        .collect()
}

pub fn image_markdown(uri: &str) -> String {
    format!("\n\n![{ILLUSTRATION_ALT}]({uri})\n\n")
}

/// Swap each placeholder for its image reference, or drop it when `images`
/// holds `None` at the same index.
pub fn replace_placeholders(
    text: &str,
    placeholders: &[Placeholder],
    images: &[Option<String>],
) -> String {
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;

    for (placeholder, image) in placeholders.iter().zip(images) {
        output.push_str(&text[cursor..placeholder.range.start]);
        if let Some(uri) = image {
            output.push_str(&image_markdown(uri));
        }
        cursor = placeholder.range.end;
    }

    output.push_str(&text[cursor..]);
    output
}

/// Request one widescreen image per placeholder, all at once, and stitch the
/// results into the text. Image failures only remove their tag.
pub async fn stitch<S>(service: &S, text: &str) -> String
where
    S: GenerationService + ?Sized,
{
    let placeholders = find_placeholders(text);
    if placeholders.is_empty() {
        return text.to_string();
    }

    tracing::info!(count = placeholders.len(), "Generating chapter illustrations");

    let images = join_all(placeholders.iter().map(|placeholder| {
        super::generate_image(service, placeholder.prompt.clone(), AspectRatio::Widescreen)
    }))
    .await;

    replace_placeholders(text, &placeholders, &images)
}
