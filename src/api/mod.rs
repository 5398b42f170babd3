use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::story::StoryService;

pub mod error;
pub mod handlers;
pub mod types;

use handlers::{generate_story, health};

#[derive(Clone)]
pub struct AppState {
    pub stories: Arc<StoryService>,
}

impl AppState {
    pub fn new(stories: Arc<StoryService>) -> Self {
        Self { stories }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/generate-story", post(generate_story))
        .route("/api/health", get(health))
}
