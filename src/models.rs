use serde::{Deserialize, Serialize};

/// Field values collected by the wizard, one per step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    pub topic: String,
    pub audience: String,
    pub goal: String,
    pub tone: String,
    pub differentiators: String,
    /// Target page count, kept as text like every other field.
    pub depth: String,
    pub cover_style: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Topic,
    Audience,
    Goal,
    Tone,
    Differentiators,
    Depth,
    CoverStyle,
}

impl FormData {
    pub fn get(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::Topic => &self.topic,
            FieldKey::Audience => &self.audience,
            FieldKey::Goal => &self.goal,
            FieldKey::Tone => &self.tone,
            FieldKey::Differentiators => &self.differentiators,
            FieldKey::Depth => &self.depth,
            FieldKey::CoverStyle => &self.cover_style,
        }
    }

    pub fn get_mut(&mut self, key: FieldKey) -> &mut String {
        match key {
            FieldKey::Topic => &mut self.topic,
            FieldKey::Audience => &mut self.audience,
            FieldKey::Goal => &mut self.goal,
            FieldKey::Tone => &mut self.tone,
            FieldKey::Differentiators => &mut self.differentiators,
            FieldKey::Depth => &mut self.depth,
            FieldKey::CoverStyle => &mut self.cover_style,
        }
    }

    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        *self.get_mut(key) = value.into();
    }

    /// A field counts as filled once it has non-whitespace content.
    pub fn is_filled(&self, key: FieldKey) -> bool {
        !self.get(key).trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    FreeText {
        placeholder: &'static str,
    },
    SingleSelect {
        options: &'static [&'static str],
    },
    Slider {
        min: u32,
        max: u32,
        step: u32,
        initial: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    pub key: FieldKey,
    pub title: &'static str,
    pub description: &'static str,
    pub input: InputKind,
}

pub const DEPTH_MIN: u32 = 10;
pub const DEPTH_MAX: u32 = 200;

/// Cover style names paired with the English phrase sent to the models.
pub const COVER_STYLES: &[(&str, &str)] = &[
    ("Minimalista", "minimalist, clean lines, negative space, modern"),
    (
        "Fotorealista",
        "photorealistic, cinematic lighting, high detailed photography",
    ),
    ("Abstrato", "abstract art, shapes, conceptual, artistic"),
    ("Geométrico", "geometric patterns, bauhaus style, structured"),
    (
        "Ilustração Digital",
        "digital illustration, vibrant colors, flat design",
    ),
    (
        "Corporativo",
        "corporate, professional, sleek, business-oriented",
    ),
    (
        "Vintage",
        "vintage style, retro aesthetics, 70s or 80s design, textured paper effect",
    ),
    (
        "Aquarela",
        "watercolor painting, soft artistic strokes, pastel colors, artistic",
    ),
    (
        "Cyberpunk",
        "cyberpunk, neon lights, futuristic, dark background with bright accents",
    ),
    (
        "3D Render",
        "3D render, claymorphism, high quality 3d icons, soft lighting",
    ),
    (
        "Fantasy Art",
        "epic fantasy art, magical, ethereal, highly detailed, digital painting, rpg style",
    ),
    (
        "Sci-Fi",
        "sci-fi concept art, futuristic, technological, space age, neon, advanced",
    ),
    (
        "Art Deco",
        "art deco style, ornamental, geometric, vintage luxury, gold and black, 1920s aesthetic",
    ),
];

const COVER_STYLE_NAMES: &[&str] = &[
    "Minimalista",
    "Fotorealista",
    "Abstrato",
    "Geométrico",
    "Ilustração Digital",
    "Corporativo",
    "Vintage",
    "Aquarela",
    "Cyberpunk",
    "3D Render",
    "Fantasy Art",
    "Sci-Fi",
    "Art Deco",
];

const DEFAULT_STYLE_DESCRIPTION: &str = "minimalist, clean";

/// Resolve a style name to its prompt phrase. Unknown names pass through.
pub fn style_description(style: &str) -> &str {
    if style.trim().is_empty() {
        return DEFAULT_STYLE_DESCRIPTION;
    }
    COVER_STYLES
        .iter()
        .find(|(name, _)| *name == style)
        .map_or(style, |(_, description)| description)
}

pub const STEPS: &[StepDefinition] = &[
    StepDefinition {
        key: FieldKey::Topic,
        title: "Tópico e Título",
        description: "Qual é o tema central do Ebook? Você já tem um título provisório ou ideia de gancho?",
        input: InputKind::FreeText {
            placeholder: "Ex: Produtividade para criativos. Título: 'A Arte de Fazer Menos'.",
        },
    },
    StepDefinition {
        key: FieldKey::Audience,
        title: "Público-Alvo e Dores",
        description: "Quem exatamente queremos atingir? Quais são os problemas específicos que eles enfrentam?",
        input: InputKind::FreeText {
            placeholder: "Ex: Designers freelancers que sofrem com burnout e prazos apertados.",
        },
    },
    StepDefinition {
        key: FieldKey::Goal,
        title: "Objetivo e CTA",
        description: "O objetivo é gerar leads, educar ou vender? Qual deve ser a Call to Action final?",
        input: InputKind::FreeText {
            placeholder: "Ex: Gerar leads qualificados. CTA: Convidar para uma consultoria gratuita.",
        },
    },
    StepDefinition {
        key: FieldKey::Tone,
        title: "Tom e Voz",
        description: "Como a sua marca se comunica? Autoritária, amiga, técnica, inspiradora?",
        input: InputKind::FreeText {
            placeholder: "Ex: Empático, mas direto. Como um mentor experiente conversando num café.",
        },
    },
    StepDefinition {
        key: FieldKey::Differentiators,
        title: "Diferenciais e Histórias",
        description: "Existem dados, estudos ou histórias específicas para aumentar a credibilidade?",
        input: InputKind::FreeText {
            placeholder: "Ex: Quero citar o Princípio de Pareto e contar como dobrei minha renda trabalhando metade do tempo.",
        },
    },
    StepDefinition {
        key: FieldKey::Depth,
        title: "Tamanho do Ebook",
        description: "Quantas páginas, aproximadamente, o Ebook final deve ter?",
        input: InputKind::Slider {
            min: DEPTH_MIN,
            max: DEPTH_MAX,
            step: 5,
            initial: 50,
        },
    },
    StepDefinition {
        key: FieldKey::CoverStyle,
        title: "Estilo Visual",
        description: "Qual estética deve guiar a capa e as ilustrações dos capítulos?",
        input: InputKind::SingleSelect {
            options: COVER_STYLE_NAMES,
        },
    },
];

/// Result of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedEbook {
    /// Markdown document with illustrations already stitched in.
    pub content: String,
    /// Cover image as a `data:` URI, absent when the cover call failed.
    pub cover: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_timeout")]
    pub request_timeout: u64,
    #[serde(default = "default_thinking_budget")]
    pub thinking_budget: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub export_dir: Option<String>,
}

fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_text_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

const fn default_timeout() -> u64 {
    600
}

const fn default_thinking_budget() -> u32 {
    4096
}

const fn default_temperature() -> f32 {
    0.7
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            request_timeout: default_timeout(),
            thinking_budget: default_thinking_budget(),
            temperature: default_temperature(),
            export_dir: None,
        }
    }
}
