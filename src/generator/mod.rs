//! Text generation collaborator.

mod openai;

pub use openai::OpenAiGenerator;

use async_trait::async_trait;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a response to `user_text` under `system_prompt`.
    ///
    /// Implementations must keep the two as separate roles. Any backend
    /// failure (transport, quota, malformed response) is an error.
    async fn generate(
        &self,
        system_prompt: &str,
        user_text: &str,
        temperature: f32,
    ) -> anyhow::Result<String>;
}
