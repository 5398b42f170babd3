pub mod prompt;
pub mod validation;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::inference::{InferenceError, TextGenerator};

pub use validation::{validate, ValidationError};

/// Sampling temperature sent with every story request.
pub const STORY_TEMPERATURE: f32 = 0.9;

/// A story request that passed validation.
///
/// Only [`validate`] builds one, so holding a `GenerationRequest` means the
/// topic is trimmed and non-trivial and the length is within bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    topic: String,
    length: u32,
}

impl GenerationRequest {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Target word count. Advisory only; the model is asked, not forced.
    pub fn length(&self) -> u32 {
        self.length
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub story: String,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to render story prompt: {0}")]
    Prompt(#[from] minijinja::Error),
    #[error("text generation failed: {0}")]
    Inference(#[from] InferenceError),
}

/// Turns validated requests into stories through a [`TextGenerator`].
pub struct StoryService {
    generator: Arc<dyn TextGenerator>,
}

impl StoryService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }

    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        let prompt = prompt::build_story_prompt(request)?;
        debug!(prompt_chars = prompt.chars().count(), "story prompt rendered");

        let story = self.generator.generate(&prompt).await?;

        info!(
            model = self.generator.model_name(),
            requested_words = request.length(),
            returned_words = story.split_whitespace().count(),
            "story generated"
        );

        Ok(GenerationResult { story })
    }
}
