//! Cluster-wide settings and per-command policy.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AdminError, AdminResult};

pub const DEFAULT_MAX_ROLE_NAME_LEN: usize = 63;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClusterConfig {
    /// Quota enforcement switch. When off, any non-zero quota is rejected.
    pub quotas_enabled: bool,
    /// Window after a successful mutation before reads are guaranteed to observe it.
    pub propagation_delay_ms: u64,
    /// Time for a mutation to reach the coordinating node.
    pub commit_latency_ms: u64,
    pub default_timeout_ms: u64,
    /// Upper bound in bytes for role and user names.
    pub max_role_name_len: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            quotas_enabled: false,
            propagation_delay_ms: 1000,
            commit_latency_ms: 0,
            default_timeout_ms: 1000,
            max_role_name_len: DEFAULT_MAX_ROLE_NAME_LEN,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok()).unwrap_or(default)
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key).map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")).unwrap_or(default)
}

impl ClusterConfig {
    /// Defaults overlaid with `ROLEGATE_*` environment variables. Unparsable values keep the default.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            quotas_enabled: env_flag("ROLEGATE_QUOTAS_ENABLED", d.quotas_enabled),
            propagation_delay_ms: env_or("ROLEGATE_PROPAGATION_DELAY_MS", d.propagation_delay_ms),
            commit_latency_ms: env_or("ROLEGATE_COMMIT_LATENCY_MS", d.commit_latency_ms),
            default_timeout_ms: env_or("ROLEGATE_DEFAULT_TIMEOUT_MS", d.default_timeout_ms),
            max_role_name_len: env_or("ROLEGATE_MAX_ROLE_NAME_LEN", d.max_role_name_len),
        }
    }

    pub fn propagation_delay(&self) -> Duration { Duration::from_millis(self.propagation_delay_ms) }
    pub fn commit_latency(&self) -> Duration { Duration::from_millis(self.commit_latency_ms) }
    pub fn default_timeout(&self) -> Duration { Duration::from_millis(self.default_timeout_ms) }
}

/// Per-command options. Only `timeout` is recognised; it is handed to the transport as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminPolicy {
    pub timeout: Option<Duration>,
}

impl AdminPolicy {
    pub fn with_timeout(timeout: Duration) -> Self { Self { timeout: Some(timeout) } }

    /// Decode a `{"timeout": ms}` map. `null` or a zero timeout means no overrides; unknown keys are ignored.
    pub fn from_value(v: &Value) -> AdminResult<Self> {
        match v {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => match map.get("timeout") {
                None | Some(Value::Null) => Ok(Self::default()),
                Some(t) => match t.as_u64() {
                    Some(0) => Ok(Self::default()),
                    Some(ms) => Ok(Self::with_timeout(Duration::from_millis(ms))),
                    None => Err(AdminError::param("timeout must be an integer.")),
                },
            },
            _ => Err(AdminError::param("Policy should be a dict")),
        }
    }

    pub fn effective_timeout(&self, cfg: &ClusterConfig) -> Duration {
        self.timeout.unwrap_or_else(|| cfg.default_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        let c = ClusterConfig::default();
        assert!(!c.quotas_enabled);
        assert_eq!(c.max_role_name_len, 63);
        assert_eq!(c.propagation_delay(), Duration::from_secs(1));
    }

    #[test]
    fn deserialize_partial_config() {
        let c: ClusterConfig = serde_json::from_value(json!({"quotas_enabled": true, "propagation_delay_ms": 5})).unwrap();
        assert!(c.quotas_enabled);
        assert_eq!(c.propagation_delay_ms, 5);
        assert_eq!(c.default_timeout_ms, 1000);
    }

    #[test]
    fn env_overlay_keeps_defaults_for_bad_values() {
        std::env::set_var("ROLEGATE_QUOTAS_ENABLED", "on");
        std::env::set_var("ROLEGATE_MAX_ROLE_NAME_LEN", "not-a-number");
        std::env::set_var("ROLEGATE_PROPAGATION_DELAY_MS", " 25 ");
        let c = ClusterConfig::from_env();
        std::env::remove_var("ROLEGATE_QUOTAS_ENABLED");
        std::env::remove_var("ROLEGATE_MAX_ROLE_NAME_LEN");
        std::env::remove_var("ROLEGATE_PROPAGATION_DELAY_MS");
        assert!(c.quotas_enabled);
        assert_eq!(c.max_role_name_len, DEFAULT_MAX_ROLE_NAME_LEN);
        assert_eq!(c.propagation_delay_ms, 25);
    }

    #[test]
    fn policy_decoding() {
        assert_eq!(AdminPolicy::from_value(&json!(null)).unwrap(), AdminPolicy::default());
        assert_eq!(AdminPolicy::from_value(&json!({})).unwrap(), AdminPolicy::default());
        assert_eq!(
            AdminPolicy::from_value(&json!({"timeout": 180000, "extra": 1})).unwrap().timeout,
            Some(Duration::from_millis(180000))
        );
        assert_eq!(AdminPolicy::from_value(&json!({"timeout": 0})).unwrap(), AdminPolicy::default());
        let e = AdminPolicy::from_value(&json!({"timeout": "soon"})).unwrap_err();
        assert_eq!(e.code(), -2);
        let e = AdminPolicy::from_value(&json!([1])).unwrap_err();
        assert_eq!(e.message(), "Policy should be a dict");
    }

    #[test]
    fn effective_timeout_falls_back_to_cluster_default() {
        let cfg = ClusterConfig { default_timeout_ms: 42, ..Default::default() };
        assert_eq!(AdminPolicy::default().effective_timeout(&cfg), Duration::from_millis(42));
        assert_eq!(AdminPolicy::with_timeout(Duration::from_millis(7)).effective_timeout(&cfg), Duration::from_millis(7));
    }
}
