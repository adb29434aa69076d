use std::sync::Arc;

use shared::{
    domain::{EditMode, SceneRequest, SceneResult, Style},
    error::SessionError,
};
use tracing::{error, info};

use crate::{
    error::StudioError, session::SessionState, ModelBackend, SceneEditor, SceneGenerator,
};

/// Orchestrator: runs generator and editor calls through the session
/// transitions and logs every failure at this boundary.
pub struct Studio {
    generator: SceneGenerator,
    editor: SceneEditor,
    state: SessionState,
}

impl Studio {
    pub fn new(backend: Arc<dyn ModelBackend>, edit_mode: EditMode) -> Self {
        Self {
            generator: SceneGenerator::new(backend.clone()),
            editor: SceneEditor::new(backend),
            state: SessionState::new(edit_mode),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn set_edit_mode(&mut self, mode: EditMode) {
        self.state.set_edit_mode(mode);
    }

    pub async fn generate(
        &mut self,
        topic: &str,
        style: Style,
    ) -> Result<&SceneResult, StudioError> {
        self.state.start_generate()?;
        let request = SceneRequest::new(topic, style);
        match self.generator.generate(&request).await {
            Ok(scene) => {
                info!(
                    title = %scene.title,
                    points = scene.explanation_points.len(),
                    "scene generated"
                );
                self.state.complete_generate(scene)?;
            }
            Err(err) => {
                error!(error = %err, "scene generation failed");
                self.state.fail_generate(err.to_string())?;
                return Err(err.into());
            }
        }
        self.state
            .scene()
            .ok_or(StudioError::Session(SessionError::NoScene))
    }

    pub async fn edit(&mut self, instruction: &str) -> Result<&SceneResult, StudioError> {
        let request = self.state.start_edit(instruction).inspect_err(|err| {
            error!(error = %err, "scene edit rejected");
        })?;
        match self.editor.edit(&request).await {
            Ok(result) => {
                info!(
                    appended = result.appended_explanation_point.is_some(),
                    "scene edited"
                );
                self.state.complete_edit(result)?;
            }
            Err(err) => {
                error!(error = %err, "scene edit failed");
                self.state.fail_edit(err.to_string())?;
                return Err(err.into());
            }
        }
        self.state
            .scene()
            .ok_or(StudioError::Session(SessionError::NoScene))
    }
}

#[cfg(test)]
#[path = "tests/studio_tests.rs"]
mod tests;
