use std::sync::Arc;

use serde::Deserialize;
use shared::{
    domain::{SceneRequest, SceneResult},
    error::GenerationError,
};
use tracing::{info, warn};

use crate::{
    prompts::{build_image_prompt, scene_response_schema, SCENE_SYSTEM_INSTRUCTION},
    ImageGenerationRequest, ModelBackend, ReasoningRequest,
};

/// Validated output of the scene reasoning call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenePlan {
    pub title: String,
    pub scene_prompt: String,
    pub explanation_points: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawScenePlan {
    title: Option<String>,
    scene_prompt: Option<String>,
    explanation_points: Option<Vec<String>>,
}

impl ScenePlan {
    /// Parses the model's JSON. Every field must be present and non-blank;
    /// blank bullets are dropped but at least one must remain.
    pub fn parse(raw: &str) -> Result<Self, GenerationError> {
        let parsed: RawScenePlan = serde_json::from_str(raw.trim())
            .map_err(|e| GenerationError::IncompleteScene(format!("malformed JSON: {e}")))?;

        let title = required_text(parsed.title, "title")?;
        let scene_prompt = required_text(parsed.scene_prompt, "scene_prompt")?;
        let explanation_points: Vec<String> = parsed
            .explanation_points
            .ok_or_else(|| missing("explanation_points"))?
            .into_iter()
            .map(|point| point.trim().to_string())
            .filter(|point| !point.is_empty())
            .collect();
        if explanation_points.is_empty() {
            return Err(missing("explanation_points"));
        }

        Ok(Self {
            title,
            scene_prompt,
            explanation_points,
        })
    }
}

fn required_text(value: Option<String>, field: &str) -> Result<String, GenerationError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(field))
}

fn missing(field: &str) -> GenerationError {
    GenerationError::IncompleteScene(format!("missing {field}"))
}

#[derive(Clone)]
pub struct SceneGenerator {
    backend: Arc<dyn ModelBackend>,
}

impl SceneGenerator {
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self { backend }
    }

    pub async fn generate(&self, request: &SceneRequest) -> Result<SceneResult, GenerationError> {
        if request.topic.trim().is_empty() {
            return Err(GenerationError::EmptyTopic);
        }

        info!(
            style = %request.style,
            topic_len = request.topic.len(),
            "requesting scene plan"
        );
        let raw = self
            .backend
            .reason(ReasoningRequest {
                system_instruction: SCENE_SYSTEM_INSTRUCTION.to_string(),
                content: request.topic.clone(),
                response_schema: scene_response_schema(),
            })
            .await?;
        let plan = ScenePlan::parse(&raw).inspect_err(|error| {
            warn!(%error, "rejected scene plan from text model");
        })?;

        let prompt = build_image_prompt(&plan.scene_prompt, request.style);
        info!(
            title = %plan.title,
            points = plan.explanation_points.len(),
            prompt_len = prompt.len(),
            "requesting scene image"
        );
        let image_request = ImageGenerationRequest::single_jpeg(prompt);
        let fallback_mime = image_request.output_mime_type.clone();
        let image = self
            .backend
            .generate_images(image_request)
            .await?
            .into_iter()
            .find_map(|image| image.into_interchange(&fallback_mime))
            .ok_or(GenerationError::NoImage)?;

        Ok(SceneResult {
            title: plan.title,
            explanation_points: plan.explanation_points,
            image: image.to_data_uri(),
        })
    }
}

#[cfg(test)]
#[path = "tests/generator_tests.rs"]
mod tests;
