use std::fmt;

use serde::{Deserialize, Serialize};

/// Visual style applied to a generated scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    #[default]
    Cartoon,
    Realistic,
    Minimalist,
    Sketchy,
}

impl Style {
    pub const ALL: [Style; 4] = [
        Style::Cartoon,
        Style::Realistic,
        Style::Minimalist,
        Style::Sketchy,
    ];

    /// Used whenever a tag does not name a known style.
    pub const FALLBACK: Style = Style::Sketchy;

    /// Resolves a user-facing style tag. Unknown tags resolve to
    /// [`Style::FALLBACK`] instead of failing.
    pub fn from_tag(tag: &str) -> Self {
        Self::parse_known(tag).unwrap_or(Self::FALLBACK)
    }

    /// Strict variant of [`Style::from_tag`] for callers that want to warn
    /// about an unknown tag before falling back.
    pub fn parse_known(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("scene sketch") {
            return Some(Style::Sketchy);
        }
        Self::ALL
            .into_iter()
            .find(|style| style.label().eq_ignore_ascii_case(tag))
    }

    pub fn label(self) -> &'static str {
        match self {
            Style::Cartoon => "Cartoon",
            Style::Realistic => "Realistic",
            Style::Minimalist => "Minimalist",
            Style::Sketchy => "Sketchy",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    /// Edits see the current title and explanation points and extend the key.
    #[default]
    ContextAware,
    /// The raw instruction goes straight to the image editor.
    ContextFree,
}

impl EditMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "context-aware" | "context_aware" | "aware" => Some(EditMode::ContextAware),
            "context-free" | "context_free" | "free" => Some(EditMode::ContextFree),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EditMode::ContextAware => "context-aware",
            EditMode::ContextFree => "context-free",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneRequest {
    pub topic: String,
    pub style: Style,
}

impl SceneRequest {
    pub fn new(topic: impl Into<String>, style: Style) -> Self {
        Self {
            topic: topic.into(),
            style,
        }
    }
}

/// Title plus ordered explanation bullets of a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationContext {
    pub title: String,
    pub explanation_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneResult {
    pub title: String,
    pub explanation_points: Vec<String>,
    /// `data:<mime>;base64,<payload>`
    pub image: String,
}

impl SceneResult {
    pub fn context(&self) -> ExplanationContext {
        ExplanationContext {
            title: self.title.clone(),
            explanation_points: self.explanation_points.clone(),
        }
    }

    /// Renders the mnemonic key as a title line followed by `* ` bullets.
    pub fn explanation_key(&self) -> String {
        let mut key = self.title.clone();
        for point in &self.explanation_points {
            key.push_str("\n* ");
            key.push_str(point);
        }
        key
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRequest {
    pub base_image: String,
    pub instruction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ExplanationContext>,
}

impl EditRequest {
    pub fn mode(&self) -> EditMode {
        if self.context.is_some() {
            EditMode::ContextAware
        } else {
            EditMode::ContextFree
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditResult {
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appended_explanation_point: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_note: Option<String>,
}
