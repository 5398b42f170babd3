use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use tracing::{debug, error, info_span, Instrument};
use uuid::Uuid;

use crate::{
    api::{
        error::ApiError,
        types::{GenerateStoryResponse, HealthResponse},
        AppState,
    },
    story::validate,
};

pub async fn generate_story(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GenerateStoryResponse>, ApiError> {
    let body = match payload {
        Ok(Json(body)) => body,
        // no JSON content type: treat as an empty body
        Err(JsonRejection::MissingJsonContentType(_)) => Value::Null,
        Err(rejection) => {
            debug!(error = %rejection, "rejected story request body");
            return Err(ApiError::MalformedBody);
        }
    };

    let request = validate(&body).map_err(|err| {
        debug!(reason = %err, "story request failed validation");
        ApiError::from(err)
    })?;

    let request_id = Uuid::new_v4();
    let span = info_span!(
        "generate_story",
        %request_id,
        model = state.stories.model_name(),
        length = request.length(),
    );

    let result = state
        .stories
        .generate(&request)
        .instrument(span)
        .await
        .map_err(|err| {
            error!(%request_id, error = %err, "story generation failed");
            ApiError::GenerationFailed
        })?;

    Ok(Json(GenerateStoryResponse {
        story: result.story,
    }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "Backend is running",
    })
}
