//! Orchestrator state container. All scene mutations go through the six
//! transitions below; a second operation cannot start while one is in
//! flight.

use shared::{
    domain::{EditMode, EditRequest, EditResult, SceneResult},
    error::SessionError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Generate,
    Edit,
}

impl Operation {
    pub fn label(self) -> &'static str {
        match self {
            Operation::Generate => "generate",
            Operation::Edit => "edit",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    scene: Option<SceneResult>,
    in_flight: Option<Operation>,
    last_error: Option<String>,
    model_note: Option<String>,
    edit_mode: EditMode,
}

impl SessionState {
    pub fn new(edit_mode: EditMode) -> Self {
        Self {
            edit_mode,
            ..Self::default()
        }
    }

    pub fn scene(&self) -> Option<&SceneResult> {
        self.scene.as_ref()
    }

    pub fn in_flight(&self) -> Option<Operation> {
        self.in_flight
    }

    /// While set, generate and edit affordances must be disabled.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn model_note(&self) -> Option<&str> {
        self.model_note.as_deref()
    }

    pub fn edit_mode(&self) -> EditMode {
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, mode: EditMode) {
        self.edit_mode = mode;
    }

    /// Begins a generation. The previous scene is dropped immediately.
    pub fn start_generate(&mut self) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.in_flight = Some(Operation::Generate);
        self.scene = None;
        self.last_error = None;
        self.model_note = None;
        Ok(())
    }

    pub fn complete_generate(&mut self, scene: SceneResult) -> Result<(), SessionError> {
        self.finish(Operation::Generate)?;
        self.scene = Some(scene);
        Ok(())
    }

    pub fn fail_generate(&mut self, message: impl Into<String>) -> Result<(), SessionError> {
        self.finish(Operation::Generate)?;
        self.scene = None;
        self.last_error = Some(message.into());
        Ok(())
    }

    /// Begins an edit and snapshots the request from the current scene.
    /// The explanation context is attached only in context-aware mode.
    pub fn start_edit(&mut self, instruction: &str) -> Result<EditRequest, SessionError> {
        self.ensure_idle()?;
        let scene = self.scene.as_ref().ok_or(SessionError::NoScene)?;
        let context = match self.edit_mode {
            EditMode::ContextAware => Some(scene.context()),
            EditMode::ContextFree => None,
        };
        let request = EditRequest {
            base_image: scene.image.clone(),
            instruction: instruction.to_string(),
            context,
        };
        self.in_flight = Some(Operation::Edit);
        self.last_error = None;
        Ok(request)
    }

    /// Replaces the image and appends the new bullet, if any. The title and
    /// existing bullets are never touched.
    pub fn complete_edit(&mut self, result: EditResult) -> Result<(), SessionError> {
        self.finish(Operation::Edit)?;
        let scene = self.scene.as_mut().ok_or(SessionError::NoScene)?;
        scene.image = result.image;
        if let Some(point) = result.appended_explanation_point {
            scene.explanation_points.push(point);
        }
        self.model_note = result.model_note;
        Ok(())
    }

    pub fn fail_edit(&mut self, message: impl Into<String>) -> Result<(), SessionError> {
        self.finish(Operation::Edit)?;
        self.last_error = Some(message.into());
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        Ok(())
    }

    fn finish(&mut self, operation: Operation) -> Result<(), SessionError> {
        if self.in_flight != Some(operation) {
            return Err(SessionError::NotInFlight(operation.label()));
        }
        self.in_flight = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
