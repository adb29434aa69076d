use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;
use shared::{data_uri::InlineImage, error::ModelError};

use crate::{
    EditPart, ImageEditRequest, ImageGenerationRequest, ModelBackend, ReasoningRequest,
};

pub const JPEG_PAYLOAD: &str = "/9j/4AAQSkZJRgABAQ==";
pub const PNG_PAYLOAD: &str = "iVBORw0KGgoAAAANSUhEUg==";

pub fn listeria_plan_json() -> String {
    serde_json::json!({
        "title": "The Listeria Ice Cream Factory",
        "scene_prompt": "A chilly ice cream factory with General Lister rocketing upwards.",
        "explanation_points": [
            "General Lister in the cold factory: grows at refrigerator temperatures.",
            "Rocket-powered action figure: tumbling motility.",
            "Thick purple coat: Gram-positive."
        ]
    })
    .to_string()
}

pub fn nafcillin_plan_json() -> String {
    serde_json::json!({
        "edit_prompt": "Place a solid gold pencil in the pharaoh's hand.",
        "new_explanation_point": "Golden Pencil ('Pen'-cillin): nafcillin treats S. aureus."
    })
    .to_string()
}

/// In-memory backend that replays queued responses and records requests.
/// An exhausted queue answers with a transport error.
#[derive(Default)]
pub struct ScriptedBackend {
    reasoning: Mutex<VecDeque<Result<String, ModelError>>>,
    images: Mutex<VecDeque<Result<Vec<InlineImage>, ModelError>>>,
    edits: Mutex<VecDeque<Result<Vec<EditPart>, ModelError>>>,
    pub reasoning_requests: Mutex<Vec<ReasoningRequest>>,
    pub image_requests: Mutex<Vec<ImageGenerationRequest>>,
    pub edit_requests: Mutex<Vec<ImageEditRequest>>,
}

impl ScriptedBackend {
    pub fn with_reasoning(self, response: Result<String, ModelError>) -> Self {
        self.reasoning.lock().expect("lock").push_back(response);
        self
    }

    pub fn with_images(self, response: Result<Vec<InlineImage>, ModelError>) -> Self {
        self.images.lock().expect("lock").push_back(response);
        self
    }

    pub fn with_edit(self, response: Result<Vec<EditPart>, ModelError>) -> Self {
        self.edits.lock().expect("lock").push_back(response);
        self
    }

    /// Reasoning plan plus one JPEG, the happy path of a generation.
    pub fn generating_listeria() -> Self {
        Self::default()
            .with_reasoning(Ok(listeria_plan_json()))
            .with_images(Ok(vec![InlineImage::new("image/jpeg", JPEG_PAYLOAD)]))
    }

    pub fn reasoning_calls(&self) -> usize {
        self.reasoning_requests.lock().expect("lock").len()
    }

    pub fn image_calls(&self) -> usize {
        self.image_requests.lock().expect("lock").len()
    }

    pub fn edit_calls(&self) -> usize {
        self.edit_requests.lock().expect("lock").len()
    }

    pub fn total_calls(&self) -> usize {
        self.reasoning_calls() + self.image_calls() + self.edit_calls()
    }
}

fn exhausted() -> ModelError {
    ModelError::Transport("no scripted response left".to_string())
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    async fn reason(&self, request: ReasoningRequest) -> Result<String, ModelError> {
        self.reasoning_requests.lock().expect("lock").push(request);
        self.reasoning
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()))
    }

    async fn generate_images(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<Vec<InlineImage>, ModelError> {
        self.image_requests.lock().expect("lock").push(request);
        self.images
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()))
    }

    async fn edit_image(&self, request: ImageEditRequest) -> Result<Vec<EditPart>, ModelError> {
        self.edit_requests.lock().expect("lock").push(request);
        self.edits
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()))
    }
}
