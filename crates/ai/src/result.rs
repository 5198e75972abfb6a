use serde::{Deserialize, Serialize};
use thiserror::Error;

use resale_inventory::NewItem;

/// Attributes the image service believes it sees in a photo.
///
/// Every field is a guess and may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeGuess {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl AttributeGuess {
    /// Parse the service's JSON answer.
    pub fn from_json(raw: &str) -> Result<Self, AiError> {
        serde_json::from_str(raw).map_err(|e| AiError::MalformedResponse(e.to_string()))
    }

    /// Fill only the fields the operator has not typed yet.
    pub fn fill_draft(&self, draft: &mut NewItem) {
        fill(&mut draft.brand, &self.brand);
        fill(&mut draft.size, &self.size);
        fill(&mut draft.condition, &self.condition);
        if draft.price == 0.0 {
            if let Some(p) = self.price.filter(|p| p.is_finite() && *p >= 0.0) {
                draft.price = p;
            }
        }
    }
}

fn fill(slot: &mut String, guess: &Option<String>) {
    if slot.trim().is_empty() {
        if let Some(g) = guess.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
            *slot = g.to_string();
        }
    }
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("no API key configured")]
    NotConfigured,

    #[error("invalid image input: {0}")]
    InvalidInput(String),

    #[error("inference failed: {0}")]
    InferenceFailed(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
