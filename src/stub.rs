use async_trait::async_trait;

use crate::llm::ModelClient;

pub const STUB_RESPONSE: &str = "This is a placeholder response.";

/// Offline backend, useful when no provider is reachable.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stub;

#[async_trait]
impl ModelClient for Stub {
    async fn generate(&self, _system_prompt: &str, _user_prompt: &str) -> String {
        STUB_RESPONSE.to_string()
    }
}
