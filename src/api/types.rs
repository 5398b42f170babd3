use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct GenerateStoryResponse {
    pub story: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
