use std::sync::Arc;

use serde::Deserialize;
use shared::{
    data_uri::InlineImage,
    domain::{EditRequest, EditResult, ExplanationContext},
    error::EditError,
};
use tracing::{info, warn};

use crate::{
    prompts::{
        build_edit_directive, build_integration_prompt, integration_response_schema,
        INTEGRATION_SYSTEM_INSTRUCTION,
    },
    EditPart, ImageEditRequest, ModelBackend, ReasoningRequest,
};

/// Validated output of the context-aware integration call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationPlan {
    pub edit_prompt: String,
    pub new_explanation_point: String,
}

#[derive(Debug, Deserialize)]
struct RawIntegrationPlan {
    edit_prompt: Option<String>,
    new_explanation_point: Option<String>,
}

impl IntegrationPlan {
    pub fn parse(raw: &str) -> Result<Self, EditError> {
        let parsed: RawIntegrationPlan = serde_json::from_str(raw.trim()).map_err(|e| {
            EditError::IncompleteIntegration(format!("malformed JSON: {e}"))
        })?;
        Ok(Self {
            edit_prompt: required_text(parsed.edit_prompt, "edit_prompt")?,
            new_explanation_point: required_text(
                parsed.new_explanation_point,
                "new_explanation_point",
            )?,
        })
    }
}

fn required_text(value: Option<String>, field: &str) -> Result<String, EditError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| EditError::IncompleteIntegration(format!("missing {field}")))
}

#[derive(Clone)]
pub struct SceneEditor {
    backend: Arc<dyn ModelBackend>,
}

impl SceneEditor {
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self { backend }
    }

    /// Edits the image in `request`. With a context the instruction is first
    /// turned into a themed directive plus one new explanation bullet;
    /// without one it is sent to the image editor as is.
    pub async fn edit(&self, request: &EditRequest) -> Result<EditResult, EditError> {
        let instruction = request.instruction.trim();
        if instruction.is_empty() {
            return Err(EditError::EmptyInstruction);
        }
        let image = InlineImage::parse(&request.base_image).ok_or(EditError::InvalidImageData)?;

        let (directive, appended_explanation_point) = match &request.context {
            Some(context) => {
                let plan = self.integrate(context, instruction).await?;
                (plan.edit_prompt, Some(plan.new_explanation_point))
            }
            None => (instruction.to_string(), None),
        };

        info!(
            mode = request.mode().label(),
            mime_type = %image.mime_type,
            directive_len = directive.len(),
            "requesting image edit"
        );
        let fallback_mime = image.mime_type.clone();
        let parts = self
            .backend
            .edit_image(ImageEditRequest {
                image,
                directive: build_edit_directive(&directive),
            })
            .await?;

        let (image, model_note) = collect_edit_parts(parts, &fallback_mime);
        let image = image.ok_or(EditError::NoImage)?;
        if let Some(note) = &model_note {
            info!(note = %note, "image editor returned commentary");
        }

        Ok(EditResult {
            image: image.to_data_uri(),
            appended_explanation_point,
            model_note,
        })
    }

    async fn integrate(
        &self,
        context: &ExplanationContext,
        instruction: &str,
    ) -> Result<IntegrationPlan, EditError> {
        info!(
            title = %context.title,
            points = context.explanation_points.len(),
            "requesting integration plan"
        );
        let raw = self
            .backend
            .reason(ReasoningRequest {
                system_instruction: INTEGRATION_SYSTEM_INSTRUCTION.to_string(),
                content: build_integration_prompt(context, instruction),
                response_schema: integration_response_schema(),
            })
            .await?;
        IntegrationPlan::parse(&raw).inspect_err(|error| {
            warn!(%error, "rejected integration plan from text model");
        })
    }
}

/// First image part that survives the data-URI round trip wins; a blank
/// MIME type takes `fallback_mime`. Text parts are joined into the note.
fn collect_edit_parts(
    parts: Vec<EditPart>,
    fallback_mime: &str,
) -> (Option<InlineImage>, Option<String>) {
    let mut image = None;
    let mut notes: Vec<String> = Vec::new();
    for part in parts {
        match part {
            EditPart::Image(inline) if image.is_none() => {
                image = inline.into_interchange(fallback_mime);
            }
            EditPart::Image(_) => {}
            EditPart::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    notes.push(text.to_string());
                }
            }
        }
    }
    let note = (!notes.is_empty()).then(|| notes.join("\n"));
    (image, note)
}

#[cfg(test)]
#[path = "tests/editor_tests.rs"]
mod tests;
