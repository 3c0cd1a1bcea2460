use reqwest::{Client, Method, Response};
use std::time::Duration;
use tracing::{debug, warn};
use twinplay_core::{RetryConfig, StatusEvent, StatusSender};

use crate::protocol::{CommandResult, ControlReply};
use crate::SyncError;

/// Bounded retry around a single outbound request.
///
/// Only network-layer failures (timeout, refused connection, DNS) are
/// retried. Any HTTP response ends the loop: a non-2xx answer is a
/// deliberate refusal by the partner and resending a state-changing
/// command would not change its mind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    timeout: Duration,
    pause: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.attempts, config.timeout(), config.pause())
    }
}

enum Attempt {
    Answered(CommandResult),
    Transport(reqwest::Error),
}

impl RetryPolicy {
    /// Create a policy. `attempts` is raised to at least one.
    pub fn new(attempts: u32, timeout: Duration, pause: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            timeout,
            pause,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn pause(&self) -> Duration {
        self.pause
    }

    /// Upper bound on the time one `send` can take
    pub fn worst_case(&self) -> Duration {
        self.timeout
            .saturating_mul(self.attempts)
            .saturating_add(self.pause.saturating_mul(self.attempts - 1))
    }

    /// Deliver a request, retrying network failures.
    ///
    /// Returns `Failure(Unreachable)` once every attempt failed at the
    /// network layer. There is no pause after the final attempt.
    pub async fn send(
        &self,
        client: &Client,
        method: Method,
        url: &str,
        status: &StatusSender,
    ) -> CommandResult {
        status.publish(StatusEvent::Connecting);

        for attempt in 1..=self.attempts {
            match self.attempt(client, method.clone(), url).await {
                Attempt::Answered(result) => {
                    status.publish(StatusEvent::Connected);
                    return result;
                }
                Attempt::Transport(err) => {
                    warn!(
                        attempt,
                        of = self.attempts,
                        url,
                        "Failed to send command to partner: {}",
                        err
                    );
                    if attempt < self.attempts {
                        status.publish(StatusEvent::Retrying {
                            attempt,
                            of: self.attempts,
                        });
                        tokio::time::sleep(self.pause).await;
                    }
                }
            }
        }

        status.publish(StatusEvent::Unreachable);
        CommandResult::Failure(SyncError::Unreachable)
    }

    async fn attempt(&self, client: &Client, method: Method, url: &str) -> Attempt {
        let response = match client
            .request(method, url)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return Attempt::Transport(err),
        };

        match classify(response).await {
            Ok(result) => Attempt::Answered(result),
            Err(err) => Attempt::Transport(err),
        }
    }
}

/// Turn an HTTP response into a command result.
///
/// A non-2xx answer is always a rejection, even when its body cannot be
/// read. Only a 2xx body that fails to arrive counts as a network failure.
async fn classify(response: Response) -> Result<CommandResult, reqwest::Error> {
    let code = response.status();

    if !code.is_success() {
        let reason = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<ControlReply>(&body).ok())
            .and_then(|reply| reply.message)
            .unwrap_or_else(|| format!("HTTP {}", code));
        debug!(
            status = code.as_u16(),
            "Partner refused command: {}",
            reason
        );
        return Ok(CommandResult::Failure(SyncError::RemoteRejected(reason)));
    }

    let body = response.text().await?;
    let result = match serde_json::from_str::<ControlReply>(&body) {
        Ok(reply) if reply.is_success() => CommandResult::Success(reply),
        Ok(reply) => {
            let reason = reply
                .message
                .unwrap_or_else(|| "unspecified error".to_string());
            CommandResult::Failure(SyncError::RemoteRejected(reason))
        }
        Err(_) => CommandResult::Failure(SyncError::RemoteRejected("malformed reply".to_string())),
    };
    Ok(result)
}
