//! User-facing error modeling for studio operations.

use client_core::error::StudioError;
use shared::error::{EditError, GenerationError, ModelError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Upstream,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    Startup,
    Generate,
    Edit,
    Export,
}

impl UiErrorContext {
    fn headline(self) -> &'static str {
        match self {
            UiErrorContext::Startup => "Startup failed",
            UiErrorContext::Generate => "Generation failed",
            UiErrorContext::Edit => "Edit failed",
            UiErrorContext::Export => "Export failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_studio(context: UiErrorContext, error: &StudioError) -> Self {
        let category = match error {
            StudioError::Session(_) => UiErrorCategory::Validation,
            StudioError::Generation(GenerationError::EmptyTopic)
            | StudioError::Edit(EditError::EmptyInstruction)
            | StudioError::Edit(EditError::InvalidImageData) => UiErrorCategory::Validation,
            StudioError::Generation(GenerationError::IncompleteScene(_))
            | StudioError::Generation(GenerationError::NoImage)
            | StudioError::Edit(EditError::IncompleteIntegration(_))
            | StudioError::Edit(EditError::NoImage) => UiErrorCategory::Upstream,
            StudioError::Generation(GenerationError::Model(model))
            | StudioError::Edit(EditError::Model(model)) => classify_model_error(model),
        };
        Self {
            category,
            context,
            message: error.to_string(),
        }
    }

    /// Classifies free-form failures (config, file IO) by message text.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("api key")
            || lower.contains("unauthorized")
            || lower.contains("forbidden")
        {
            UiErrorCategory::Auth
        } else if lower.contains("invalid")
            || lower.contains("missing")
            || lower.contains("unknown")
            || lower.contains("failed to read")
        {
            UiErrorCategory::Validation
        } else if lower.contains("connection") || lower.contains("timed out") {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };
        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Single banner line: headline, message and a hint for the category.
    pub fn banner(&self) -> String {
        let hint = match self.category {
            UiErrorCategory::Auth => " Check the API key in GEMINI_API_KEY.",
            UiErrorCategory::Transport => {
                " The model service is unreachable; check the network and retry."
            }
            UiErrorCategory::Upstream => {
                " The model returned an unusable answer; try again or rephrase."
            }
            UiErrorCategory::Validation | UiErrorCategory::Unknown => "",
        };
        format!("{}: {}.{hint}", self.context.headline(), self.message)
    }
}

fn classify_model_error(error: &ModelError) -> UiErrorCategory {
    match error {
        ModelError::Transport(_) => UiErrorCategory::Transport,
        ModelError::Status {
            status: 401 | 403, ..
        } => UiErrorCategory::Auth,
        ModelError::Status { .. }
        | ModelError::InvalidResponse(_)
        | ModelError::EmptyCandidates => UiErrorCategory::Upstream,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::SessionError;

    #[test]
    fn local_input_problems_are_validation_errors() {
        for error in [
            StudioError::Generation(GenerationError::EmptyTopic),
            StudioError::Edit(EditError::EmptyInstruction),
            StudioError::Edit(EditError::InvalidImageData),
            StudioError::Session(SessionError::NoScene),
        ] {
            let ui = UiError::from_studio(UiErrorContext::Edit, &error);
            assert_eq!(ui.category(), UiErrorCategory::Validation, "{error}");
        }
    }

    #[test]
    fn rejected_credentials_are_auth_errors() {
        let error = StudioError::Generation(GenerationError::Model(ModelError::Status {
            status: 403,
            body: "API key not valid".into(),
        }));
        let ui = UiError::from_studio(UiErrorContext::Generate, &error);
        assert_eq!(ui.category(), UiErrorCategory::Auth);
        assert!(ui.banner().starts_with("Generation failed: "));
        assert!(ui.banner().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn missing_image_is_an_upstream_error() {
        let ui = UiError::from_studio(
            UiErrorContext::Edit,
            &StudioError::Edit(EditError::NoImage),
        );
        assert_eq!(ui.category(), UiErrorCategory::Upstream);
        assert_eq!(ui.context(), UiErrorContext::Edit);
        assert!(ui.message().contains("did not return an image"));
    }

    #[test]
    fn transport_failures_are_classified() {
        let ui = UiError::from_studio(
            UiErrorContext::Edit,
            &StudioError::Edit(EditError::Model(ModelError::Transport("reset".into()))),
        );
        assert_eq!(ui.category(), UiErrorCategory::Transport);
    }

    #[test]
    fn free_form_messages_are_classified_by_text() {
        let ui = UiError::from_message(
            UiErrorContext::Startup,
            "missing API key: set GEMINI_API_KEY or API_KEY in the environment",
        );
        assert_eq!(ui.category(), UiErrorCategory::Auth);

        let ui = UiError::from_message(UiErrorContext::Export, "disk on fire");
        assert_eq!(ui.category(), UiErrorCategory::Unknown);
        assert_eq!(ui.banner(), "Export failed: disk on fire.");
    }
}
