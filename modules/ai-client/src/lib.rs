pub mod claude;
pub mod openai;
pub mod util;

pub use claude::Claude;
pub use openai::OpenAi;

use anyhow::Result;
use async_trait::async_trait;

/// A single-shot text completion model. One prompt in, one response out;
/// no streaming, no tool use, no conversation state.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, system: &str, user: &str, max_tokens: u32) -> Result<String>;
    fn name(&self) -> &str;
}
