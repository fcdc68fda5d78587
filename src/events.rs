// Event types for async communication

use crate::models::GeneratedEbook;

#[allow(clippy::enum_variant_names)]
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Text (and possibly a cover) came back from the service
    GenerationFinished(GeneratedEbook),
    /// Text generation failed; carries the detailed cause for logging
    GenerationFailed(String),
}
