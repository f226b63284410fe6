//! Local inference engine provider
//!
//! Talks to an Ollama-compatible server on loopback. If nothing is serving
//! when the run starts, the provider spawns the engine itself and polls the
//! health endpoint until it answers or the startup budget is exhausted. A
//! spawned engine is exclusively owned by this provider and is terminated
//! on `stop`, whatever the run outcome was.

use crate::{LlmError, Provider, QUERY_TIMEOUT};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Default local endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default model served locally.
pub const DEFAULT_MODEL: &str = "qwen3:14b";

/// Health-probe timeout for the initial "is anything already serving" check.
const INITIAL_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Health-probe timeout for each startup poll.
const POLL_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Interval between startup polls.
const STARTUP_PROBE_INTERVAL: Duration = Duration::from_secs(2);

/// Maximum startup polls before giving up.
const STARTUP_MAX_ATTEMPTS: u32 = 30;

/// Bounded wait for the spawned engine to exit on stop.
const SHUTDOWN_WAIT: Duration = Duration::from_secs(10);

/// Provider backed by a locally hosted inference engine.
pub struct LocalProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    engine_program: String,
    engine_args: Vec<String>,
    probe_interval: Duration,
    max_attempts: u32,
    child: Option<Child>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

/// Low-temperature, high-top-p sampling; reasoning disabled so replies stay
/// close to bare values.
#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    think: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl LocalProvider {
    /// Create a provider for the given endpoint and model.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client: reqwest::Client::new(),
            engine_program: "ollama".to_string(),
            engine_args: vec!["serve".to_string()],
            probe_interval: STARTUP_PROBE_INTERVAL,
            max_attempts: STARTUP_MAX_ATTEMPTS,
            child: None,
        }
    }

    /// Provider for the default loopback endpoint.
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Override the command spawned when nothing is serving.
    pub fn with_engine_command(
        mut self,
        program: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        self.engine_program = program.into();
        self.engine_args = args;
        self
    }

    /// Override the startup polling budget.
    pub fn with_startup_budget(mut self, interval: Duration, max_attempts: u32) -> Self {
        self.probe_interval = interval;
        self.max_attempts = max_attempts;
        self
    }

    /// `GET /api/tags` with a short timeout; healthy means 2xx.
    async fn probe(&self, timeout: Duration) -> bool {
        let url = format!("{}/api/tags", self.endpoint);
        match self.client.get(&url).timeout(timeout).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("health probe failed: {e}");
                false
            }
        }
    }
}

#[async_trait]
impl Provider for LocalProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn start(&mut self) -> Result<(), LlmError> {
        if self.probe(INITIAL_PROBE_TIMEOUT).await {
            info!("inference engine already serving at {}", self.endpoint);
            return Ok(());
        }

        info!(
            "spawning inference engine: {} {}",
            self.engine_program,
            self.engine_args.join(" ")
        );
        // kill_on_drop keeps the engine from outliving a dropped worker task.
        let child = Command::new(&self.engine_program)
            .args(&self.engine_args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(LlmError::Spawn)?;
        self.child = Some(child);

        for attempt in 1..=self.max_attempts {
            if self.probe(POLL_PROBE_TIMEOUT).await {
                info!("inference engine became healthy (attempt {attempt})");
                return Ok(());
            }
            debug!(
                "waiting for inference engine, attempt {attempt}/{}",
                self.max_attempts
            );
            tokio::time::sleep(self.probe_interval).await;
        }

        warn!(
            "inference engine never became healthy after {} attempts",
            self.max_attempts
        );
        Err(LlmError::StartupTimeout)
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: 0.1,
                top_p: 0.9,
                think: false,
            },
        };

        let response = self
            .client
            .post(&url)
            .timeout(QUERY_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(300)
                .collect();
            return Err(LlmError::Status { status, body });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        Ok(parsed.response)
    }

    async fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            debug!("terminating spawned inference engine");
            request_exit(&mut child);
            if tokio::time::timeout(SHUTDOWN_WAIT, child.wait())
                .await
                .is_err()
            {
                warn!("inference engine ignored the termination request, killing it");
                if let Err(e) = child.start_kill() {
                    warn!("failed to kill inference engine: {e}");
                }
                let _ = child.wait().await;
            }
        }
    }
}

/// Ask the engine to exit cleanly; the caller escalates to a kill if it
/// does not comply within the shutdown wait.
fn request_exit(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        // SAFETY: signalling a child this provider spawned and still owns.
        unsafe {
            libc::kill(pid as libc::pid_t, libc::SIGTERM);
        }
        return;
    }
    if let Err(e) = child.start_kill() {
        warn!("failed to signal inference engine: {e}");
    }
}
