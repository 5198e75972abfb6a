use async_trait::async_trait;

use crate::result::{AiError, AttributeGuess};

/// Base64 image payload (no `data:` prefix).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage(String);

impl EncodedImage {
    /// Accepts raw base64 or a `data:<mime>;base64,<payload>` URI.
    pub fn parse(input: &str) -> Result<Self, AiError> {
        let payload = match input.strip_prefix("data:") {
            Some(rest) => rest
                .split_once(',')
                .map(|(_, p)| p)
                .ok_or_else(|| AiError::InvalidInput("data URI without payload".into()))?,
            None => input,
        };
        if payload.trim().is_empty() {
            return Err(AiError::InvalidInput("empty image".into()));
        }
        Ok(Self(payload.to_string()))
    }

    pub fn as_base64(&self) -> &str {
        &self.0
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:image/jpeg;base64,{}", self.0)
    }
}

/// External image service.
#[async_trait]
pub trait ImageEnhancer: Send + Sync {
    /// Guess brand, size, condition and a resale price from a photo.
    async fn analyze(&self, image: &EncodedImage) -> Result<AttributeGuess, AiError>;

    /// Render the product into a staged scene described by `prompt`.
    async fn generate_scene(
        &self,
        image: &EncodedImage,
        prompt: &str,
    ) -> Result<EncodedImage, AiError>;
}

/// Attribute guesses, or `None` when no enhancer is configured or it fails.
pub async fn best_effort_analyze(
    enhancer: Option<&dyn ImageEnhancer>,
    image: &EncodedImage,
) -> Option<AttributeGuess> {
    let enhancer = enhancer?;
    match enhancer.analyze(image).await {
        Ok(guess) => Some(guess),
        Err(err) => {
            tracing::warn!(error = %err, "image analysis unavailable");
            None
        }
    }
}

/// A staged scene, or `None`; the caller keeps the original photo.
pub async fn best_effort_scene(
    enhancer: Option<&dyn ImageEnhancer>,
    image: &EncodedImage,
    prompt: &str,
) -> Option<EncodedImage> {
    let enhancer = enhancer?;
    match enhancer.generate_scene(image, prompt).await {
        Ok(scene) => Some(scene),
        Err(err) => {
            tracing::warn!(error = %err, "scene generation unavailable");
            None
        }
    }
}

const SCENE_STYLES: &[&str] = &[
    "a sunlit modern bedroom",
    "a luxury penthouse suite",
    "a cozy minimalist loft",
    "a boutique hotel room",
];

const FLOOR_TYPES: &[&str] = &[
    "light oak hardwood floors",
    "polished concrete floors",
    "plush cream carpet",
];

/// Scene prompt used when the service cannot describe the photo itself.
///
/// `seed` picks the style so repeated attempts can vary.
pub fn fallback_scene_prompt(seed: usize) -> String {
    let style = SCENE_STYLES[seed % SCENE_STYLES.len()];
    let floor = FLOOR_TYPES[seed % FLOOR_TYPES.len()];
    format!(
        "A realistic photo of the mattress placed in {style} with {floor}. \
         Photorealistic product photography, golden hour lighting."
    )
}
