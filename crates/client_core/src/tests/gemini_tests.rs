use super::*;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

use crate::prompts::scene_response_schema;

#[derive(Debug, Clone)]
struct RecordedCall {
    call: String,
    api_key: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct MockState {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    status: StatusCode,
    response: Value,
}

async fn handle_model_call(
    State(state): State<MockState>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.calls.lock().await.push(RecordedCall {
        call,
        api_key,
        body,
    });
    (state.status, Json(state.response.clone())).into_response()
}

async fn spawn_model_server(
    status: StatusCode,
    response: Value,
) -> (String, Arc<Mutex<Vec<RecordedCall>>>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let calls = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        calls: calls.clone(),
        status,
        response,
    };
    let app = Router::new()
        .route("/v1beta/models/:call", post(handle_model_call))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/"), calls)
}

fn client_for(base_url: String) -> GeminiClient {
    let mut config = GeminiConfig::new("test-key");
    config.base_url = base_url;
    GeminiClient::new(config).expect("client")
}

#[tokio::test]
async fn reason_posts_schema_constrained_request_and_returns_text() {
    let (base_url, calls) = spawn_model_server(
        StatusCode::OK,
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "{\"title\":\"T\"}" }] },
                "finishReason": "STOP"
            }]
        }),
    )
    .await;
    let client = client_for(base_url);

    let text = client
        .reason(ReasoningRequest {
            system_instruction: "be helpful".to_string(),
            content: "Listeria monocytogenes".to_string(),
            response_schema: scene_response_schema(),
        })
        .await
        .expect("reason");
    assert_eq!(text, "{\"title\":\"T\"}");

    let calls = calls.lock().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].call, "gemini-2.5-flash:generateContent");
    assert_eq!(calls[0].api_key.as_deref(), Some("test-key"));
    let body = &calls[0].body;
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be helpful");
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "Listeria monocytogenes");
    assert_eq!(
        body["generationConfig"]["responseMimeType"],
        "application/json"
    );
    assert_eq!(
        body["generationConfig"]["responseSchema"],
        scene_response_schema()
    );
}

#[tokio::test]
async fn reason_without_candidates_is_an_error() {
    let (base_url, _calls) = spawn_model_server(StatusCode::OK, json!({ "candidates": [] })).await;
    let err = client_for(base_url)
        .reason(ReasoningRequest {
            system_instruction: String::new(),
            content: "x".to_string(),
            response_schema: json!({}),
        })
        .await
        .expect_err("must fail");
    assert!(matches!(err, ModelError::EmptyCandidates));
}

#[tokio::test]
async fn generate_images_uses_predict_parameters() {
    let (base_url, calls) = spawn_model_server(
        StatusCode::OK,
        json!({
            "predictions": [
                { "bytesBase64Encoded": "/9j/AAAA", "mimeType": "image/jpeg" },
                { "mimeType": "image/jpeg" }
            ]
        }),
    )
    .await;

    let images = client_for(base_url)
        .generate_images(ImageGenerationRequest::single_jpeg("a chilly factory"))
        .await
        .expect("images");
    assert_eq!(images, vec![InlineImage::new("image/jpeg", "/9j/AAAA")]);

    let calls = calls.lock().await;
    assert_eq!(calls[0].call, "imagen-4.0-generate-001:predict");
    assert_eq!(
        calls[0].body,
        json!({
            "instances": [{ "prompt": "a chilly factory" }],
            "parameters": {
                "sampleCount": 1,
                "aspectRatio": "16:9",
                "outputOptions": { "mimeType": "image/jpeg" }
            }
        })
    );
}

#[tokio::test]
async fn edit_image_sends_inline_image_and_maps_parts_in_order() {
    let (base_url, calls) = spawn_model_server(
        StatusCode::OK,
        json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here is the edit." },
                        { "inlineData": { "mimeType": "image/png", "data": "iVBOR" } }
                    ]
                }
            }]
        }),
    )
    .await;

    let parts = client_for(base_url)
        .edit_image(ImageEditRequest {
            image: InlineImage::new("image/jpeg", "/9j/AAAA"),
            directive: "add a pencil. no text".to_string(),
        })
        .await
        .expect("edit");
    assert_eq!(
        parts,
        vec![
            EditPart::Text("Here is the edit.".to_string()),
            EditPart::Image(InlineImage::new("image/png", "iVBOR")),
        ]
    );

    let calls = calls.lock().await;
    assert_eq!(calls[0].call, "gemini-2.5-flash-image-preview:generateContent");
    let body = &calls[0].body;
    assert_eq!(
        body["contents"][0]["parts"],
        json!([
            { "inlineData": { "mimeType": "image/jpeg", "data": "/9j/AAAA" } },
            { "text": "add a pencil. no text" }
        ])
    );
    assert_eq!(
        body["generationConfig"]["responseModalities"],
        json!(["IMAGE", "TEXT"])
    );
    assert!(body.get("systemInstruction").is_none());
}

#[tokio::test]
async fn non_success_status_carries_body() {
    let (base_url, _calls) = spawn_model_server(
        StatusCode::FORBIDDEN,
        json!({ "error": { "message": "API key not valid" } }),
    )
    .await;

    let err = client_for(base_url)
        .generate_images(ImageGenerationRequest::single_jpeg("x"))
        .await
        .expect_err("must fail");
    match err {
        ModelError::Status { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("API key not valid"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = client_for(format!("http://{addr}"))
        .reason(ReasoningRequest {
            system_instruction: String::new(),
            content: "x".to_string(),
            response_schema: json!({}),
        })
        .await
        .expect_err("must fail");
    assert!(matches!(err, ModelError::Transport(_)));
}

#[test]
fn client_rejects_missing_key_and_bad_url() {
    assert!(matches!(
        GeminiClient::new(GeminiConfig::new("  ")),
        Err(ClientBuildError::MissingApiKey)
    ));

    let mut config = GeminiConfig::new("key");
    config.base_url = "not a url".to_string();
    assert!(matches!(
        GeminiClient::new(config),
        Err(ClientBuildError::InvalidBaseUrl { .. })
    ));
}

#[test]
fn endpoint_trims_trailing_slash() {
    let mut config = GeminiConfig::new("key");
    config.base_url = "http://localhost:8080/".to_string();
    let client = GeminiClient::new(config).expect("client");
    assert_eq!(
        client.endpoint("gemini-2.5-flash", "generateContent"),
        "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
    );
}
