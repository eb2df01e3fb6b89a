//! Settle contract for eventually visible administrative changes.
//!
//! A successful create/drop/quota command only guarantees the change was committed.
//! Reads catch up within the propagation window; `until` polls a probe with
//! exponential backoff until it reports the expected state.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::config::ClusterConfig;
use crate::error::{AdminError, AdminResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlePolicy {
    pub max_wait: Duration,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self { max_wait: Duration::from_secs(5), initial_backoff: Duration::from_millis(10), max_backoff: Duration::from_millis(250) }
    }
}

impl SettlePolicy {
    /// Twice the propagation delay plus one second of slack.
    pub fn for_config(cfg: &ClusterConfig) -> Self {
        Self { max_wait: cfg.propagation_delay() * 2 + Duration::from_secs(1), ..Self::default() }
    }
}

/// Poll `probe` until it yields `Some`. Gives up with `Timeout` after `max_wait`.
pub async fn until<T, F, Fut>(policy: &SettlePolicy, mut probe: F) -> AdminResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + policy.max_wait;
    let mut backoff = policy.initial_backoff;
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        if let Some(v) = probe().await {
            debug!(target: "rolegate::settle", "settled after {} attempt(s)", attempts);
            return Ok(v);
        }
        let now = Instant::now();
        if now >= deadline {
            return Err(AdminError::timeout(format!("state did not settle within {:?}", policy.max_wait)));
        }
        sleep(backoff.min(deadline - now)).await;
        backoff = (backoff * 2).min(policy.max_backoff);
    }
}
