//! Gemini REST backend (`v1beta`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    data_uri::InlineImage,
    error::ModelError,
    protocol::{
        Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Modality,
        OutputOptions, Part, PredictInstance, PredictParameters, PredictRequest, PredictResponse,
    },
};
use tracing::{debug, warn};
use url::Url;

use crate::{
    error::ClientBuildError, EditPart, ImageEditRequest, ImageGenerationRequest, ModelBackend,
    ReasoningRequest,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_EDIT_MODEL: &str = "gemini-2.5-flash-image-preview";

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
    pub text_model: String,
    pub image_model: String,
    pub edit_model: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            edit_model: DEFAULT_EDIT_MODEL.to_string(),
        }
    }
}

/// No request timeout is configured: a call waits for the upstream model.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    text_model: String,
    image_model: String,
    edit_model: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ClientBuildError> {
        if config.api_key.trim().is_empty() {
            return Err(ClientBuildError::MissingApiKey);
        }
        Url::parse(&config.base_url).map_err(|source| ClientBuildError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source,
        })?;

        Ok(Self {
            http: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            text_model: config.text_model,
            image_model: config.image_model,
            edit_model: config.edit_model,
        })
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/v1beta/models/{model}:{method}", self.base_url)
    }

    async fn post<Req, Resp>(&self, url: String, body: &Req) -> Result<Resp, ModelError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        debug!(%url, "posting model request");
        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| ModelError::Transport(e.to_string()))?;
            warn!(%url, status = status.as_u16(), "model endpoint rejected request");
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ModelBackend for GeminiClient {
    async fn reason(&self, request: ReasoningRequest) -> Result<String, ModelError> {
        let body = GenerateContentRequest {
            system_instruction: Some(Content::system(request.system_instruction)),
            contents: vec![Content::user(vec![Part::text(request.content)])],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(request.response_schema),
                ..GenerationConfig::default()
            }),
        };
        let response: GenerateContentResponse = self
            .post(self.endpoint(&self.text_model, "generateContent"), &body)
            .await?;
        response.text().ok_or(ModelError::EmptyCandidates)
    }

    async fn generate_images(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<Vec<InlineImage>, ModelError> {
        let body = PredictRequest {
            instances: vec![PredictInstance {
                prompt: request.prompt,
            }],
            parameters: PredictParameters {
                sample_count: request.number_of_images,
                aspect_ratio: request.aspect_ratio,
                output_options: OutputOptions {
                    mime_type: request.output_mime_type.clone(),
                },
            },
        };
        let response: PredictResponse = self
            .post(self.endpoint(&self.image_model, "predict"), &body)
            .await?;

        Ok(response
            .predictions
            .into_iter()
            .filter_map(|prediction| {
                let data = prediction.bytes_base64_encoded?;
                let mime_type = prediction
                    .mime_type
                    .unwrap_or_else(|| request.output_mime_type.clone());
                Some(InlineImage::new(mime_type, data))
            })
            .collect())
    }

    async fn edit_image(&self, request: ImageEditRequest) -> Result<Vec<EditPart>, ModelError> {
        let body = GenerateContentRequest {
            system_instruction: None,
            contents: vec![Content::user(vec![
                Part::inline(request.image),
                Part::text(request.directive),
            ])],
            generation_config: Some(GenerationConfig {
                response_modalities: vec![Modality::Image, Modality::Text],
                ..GenerationConfig::default()
            }),
        };
        let response: GenerateContentResponse = self
            .post(self.endpoint(&self.edit_model, "generateContent"), &body)
            .await?;

        let parts = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts)
            .unwrap_or_default();

        Ok(parts
            .into_iter()
            .filter_map(|part| match (part.inline_data, part.text) {
                (Some(blob), _) => Some(EditPart::Image(blob.into())),
                (None, Some(text)) => Some(EditPart::Text(text)),
                (None, None) => None,
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "tests/gemini_tests.rs"]
mod tests;
