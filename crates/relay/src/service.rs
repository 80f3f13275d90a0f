//! The `POST /generate-code` surface.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use codepane_model::{CompletionProvider, CompletionRequest};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

/// Instruction template wrapped around every prompt before it reaches
/// the completion service.
const INSTRUCTION_TEMPLATE: &str = "Generate code for the following \
request. Only provide the code without any explanations: ";

#[derive(Clone, Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct GenerateResponse {
    pub code: String,
}

/// The failure payload. `error` carries a fixed human-readable message,
/// `details` the underlying error text.
#[derive(Clone, Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}

/// A failed generation, rendered as `500 { error, details }`.
#[derive(Debug)]
pub struct RelayError {
    details: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: "Failed to generate code".to_owned(),
                details: self.details,
            }),
        )
            .into_response()
    }
}

#[inline]
fn full_prompt(prompt: &str) -> String {
    format!("{INSTRUCTION_TEMPLATE}{prompt}")
}

/// Relays one prompt to the completion service.
///
/// Every provider failure is caught here and normalized into the JSON
/// failure shape; nothing propagates past this boundary. There are no
/// retries and no timeout handling.
pub async fn generate_code<P: CompletionProvider>(
    State(provider): State<Arc<P>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, RelayError> {
    let completion_req = CompletionRequest::new(full_prompt(&req.prompt));
    match provider.generate(&completion_req).await {
        Ok(completion) => Ok(Json(GenerateResponse {
            code: completion.text,
        })),
        Err(err) => {
            error!("generation failed: {err}");
            Err(RelayError {
                details: err.to_string(),
            })
        }
    }
}

/// Builds the relay router around the given provider.
///
/// All origins are permitted; the endpoint itself carries no
/// authentication.
pub fn router<P: CompletionProvider + 'static>(provider: P) -> Router {
    Router::new()
        .route("/generate-code", post(generate_code::<P>))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(provider))
}
