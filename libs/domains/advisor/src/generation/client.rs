use async_trait::async_trait;

use crate::error::AdvisorResult;

/// Prompt in, answer text out.
///
/// One call per request; implementations do not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> AdvisorResult<String>;
}
