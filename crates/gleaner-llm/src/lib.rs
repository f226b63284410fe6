//! Gleaner Model Provider Layer
//!
//! Pluggable language-model backends behind one capability surface.
//!
//! # Providers
//!
//! - [`LocalProvider`]: a locally hosted inference engine (Ollama), spawned
//!   and health-checked by the client itself
//! - [`RemoteProvider`]: a credentialed chat-completions HTTP API
//! - [`MockProvider`]: deterministic scripted replies for tests
//!
//! All providers return the model's *raw* reply; the conservative
//! normalization that turns a reply into an accepted value or `"null"`
//! lives in [`clean`] and is applied by the orchestrator, identically for
//! every backend.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clean;
pub mod local;
pub mod remote;

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use clean::{CleanRules, Cleaner};
pub use local::LocalProvider;
pub use remote::RemoteProvider;

/// Single-shot query timeout shared by both production providers.
///
/// There is no internal retry; a timed-out query degrades to `"null"` for
/// the item being processed.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(300);

/// Errors from model providers.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The remote provider was constructed without a usable credential
    #[error("API credential is missing or empty")]
    ApiKeyMissing,

    /// The credential file could not be read
    #[error("failed to read API key file {path}: {source}")]
    KeyFile {
        /// Path of the key file
        path: PathBuf,
        /// Underlying read failure
        source: std::io::Error,
    },

    /// The inference engine process could not be spawned
    #[error("failed to spawn inference engine: {0}")]
    Spawn(#[source] std::io::Error),

    /// The health probe never succeeded within the startup budget
    #[error("inference engine did not become healthy within the startup budget")]
    StartupTimeout,

    /// Transport-level request failure (including timeout)
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from the provider
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code returned by the provider
        status: u16,
        /// Response body, truncated for logging
        body: String,
    },

    /// The provider replied with an unexpected body shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The configured cleaning rules do not compile
    #[error("invalid cleaning rules: {0}")]
    InvalidRules(#[from] regex::Error),

    /// Scripted failure from the mock provider
    #[error("mock provider error")]
    Mock,
}

/// Capability surface shared by every model backend.
///
/// Variants are selected at construction time and driven identically by
/// the orchestrator: `start` once before any item, `generate` once per
/// item with keywords, `stop` on every exit path.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Name of the model this provider queries.
    fn model(&self) -> &str;

    /// Bring the backend up. A failure here is fatal to the run; no item
    /// is queried afterwards.
    async fn start(&mut self) -> Result<(), LlmError>;

    /// Issue one generation request and return the raw reply.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Tear the backend down, releasing any owned process. Termination
    /// problems are swallowed; `stop` must always succeed.
    async fn stop(&mut self);
}

#[async_trait]
impl<P: Provider + ?Sized> Provider for Box<P> {
    fn model(&self) -> &str {
        (**self).model()
    }

    async fn start(&mut self) -> Result<(), LlmError> {
        (**self).start().await
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).generate(prompt).await
    }

    async fn stop(&mut self) {
        (**self).stop().await
    }
}

/// Scripted action for the mock provider.
#[derive(Debug, Clone)]
enum MockReply {
    Reply(String),
    Fail,
}

/// Deterministic provider for tests.
///
/// Replies are served from a FIFO script; once the script is exhausted the
/// default reply is returned for every further prompt.
///
/// # Examples
///
/// ```
/// use gleaner_llm::{MockProvider, Provider};
///
/// # tokio_test::block_on(async {
/// let provider = MockProvider::new("45/ЦБ-2024");
/// let reply = provider.generate("any prompt").await.unwrap();
/// assert_eq!(reply, "45/ЦБ-2024");
/// assert_eq!(provider.call_count(), 1);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: String,
    script: Arc<Mutex<VecDeque<MockReply>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockProvider {
    /// Create a mock returning `reply` for every prompt.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            default_reply: reply.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Queue a reply to be served before the default kicks in.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(MockReply::Reply(reply.into()));
    }

    /// Queue a transport-style failure.
    pub fn push_failure(&self) {
        self.script.lock().unwrap().push_back(MockReply::Fail);
    }

    /// Number of generate calls made so far.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("null")
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn model(&self) -> &str {
        "mock"
    }

    async fn start(&mut self) -> Result<(), LlmError> {
        Ok(())
    }

    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        *self.call_count.lock().unwrap() += 1;
        match self.script.lock().unwrap().pop_front() {
            Some(MockReply::Reply(reply)) => Ok(reply),
            Some(MockReply::Fail) => Err(LlmError::Mock),
            None => Ok(self.default_reply.clone()),
        }
    }

    async fn stop(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_serves_default_reply() {
        let provider = MockProvider::new("value");
        assert_eq!(provider.generate("prompt").await.unwrap(), "value");
        assert_eq!(provider.generate("other").await.unwrap(), "value");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn mock_script_runs_before_default() {
        let provider = MockProvider::new("default");
        provider.push_reply("first");
        provider.push_reply("second");

        assert_eq!(provider.generate("p").await.unwrap(), "first");
        assert_eq!(provider.generate("p").await.unwrap(), "second");
        assert_eq!(provider.generate("p").await.unwrap(), "default");
    }

    #[tokio::test]
    async fn mock_scripted_failure() {
        let provider = MockProvider::new("default");
        provider.push_failure();

        assert!(matches!(provider.generate("p").await, Err(LlmError::Mock)));
        assert_eq!(provider.generate("p").await.unwrap(), "default");
    }

    #[tokio::test]
    async fn mock_clones_share_state() {
        let a = MockProvider::new("x");
        let b = a.clone();
        a.generate("p").await.unwrap();
        assert_eq!(b.call_count(), 1);
    }
}
