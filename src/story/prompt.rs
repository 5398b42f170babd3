use std::sync::OnceLock;

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

use super::GenerationRequest;

const STORY_TEMPLATE_NAME: &str = "story-generator";
const STORY_TEMPLATE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/story-generator.jinja"
));

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

#[derive(Serialize)]
struct StoryPromptContext<'a> {
    topic: &'a str,
    length: u32,
}

fn template_env() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env
    })
}

/// Render the storyteller instruction for a validated request.
///
/// Topic and length are substituted verbatim; the rest of the text is fixed.
pub fn build_story_prompt(request: &GenerationRequest) -> Result<String, minijinja::Error> {
    let ctx = StoryPromptContext {
        topic: request.topic(),
        length: request.length(),
    };
    template_env()
        .template_from_named_str(STORY_TEMPLATE_NAME, STORY_TEMPLATE)?
        .render(ctx)
}
