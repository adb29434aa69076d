//! Client core for the visual mnemonic studio: scene generation, scene
//! editing, the model backend seam and the orchestrator state container.

use async_trait::async_trait;
use serde_json::Value;
use shared::{data_uri::InlineImage, error::ModelError};

pub mod editor;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod prompts;
pub mod session;
pub mod studio;

pub use editor::SceneEditor;
pub use gemini::{GeminiClient, GeminiConfig};
pub use generator::SceneGenerator;
pub use session::{Operation, SessionState};
pub use studio::Studio;

/// Schema-constrained request to the text model. The response is the raw
/// JSON text the model produced; callers validate it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReasoningRequest {
    pub system_instruction: String,
    pub content: String,
    pub response_schema: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    pub number_of_images: u32,
    pub output_mime_type: String,
    pub aspect_ratio: String,
}

impl ImageGenerationRequest {
    /// One 16:9 JPEG, the only shape the generator ever asks for.
    pub fn single_jpeg(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            number_of_images: 1,
            output_mime_type: "image/jpeg".to_string(),
            aspect_ratio: "16:9".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEditRequest {
    pub image: InlineImage,
    pub directive: String,
}

/// One part of an image-edit response, in model order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditPart {
    Image(InlineImage),
    Text(String),
}

#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn reason(&self, request: ReasoningRequest) -> Result<String, ModelError>;
    async fn generate_images(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<Vec<InlineImage>, ModelError>;
    async fn edit_image(&self, request: ImageEditRequest) -> Result<Vec<EditPart>, ModelError>;
}

#[cfg(test)]
mod testing;
