#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use rolegate::{settle, AdminClient, AdminError, AdminResult, ClusterConfig, RoleStore, RoleView, SettlePolicy};

/// Propagation delay used by the integration suites. Short, but non-zero so every test
/// has to wait for visibility instead of assuming it.
pub const PROPAGATION_MS: u64 = 40;

pub fn config(quotas_enabled: bool) -> ClusterConfig {
    ClusterConfig { quotas_enabled, propagation_delay_ms: PROPAGATION_MS, ..Default::default() }
}

pub fn connect(cfg: ClusterConfig) -> (Arc<RoleStore>, AdminClient) {
    rolegate::logging::init_for_tests();
    let store = Arc::new(RoleStore::new(cfg));
    let client = AdminClient::connect(Arc::clone(&store));
    (store, client)
}

pub fn settle_policy() -> SettlePolicy {
    SettlePolicy { max_wait: Duration::from_secs(3), initial_backoff: Duration::from_millis(5), max_backoff: Duration::from_millis(50) }
}

/// Poll `get_role` until it returns `expected`.
pub async fn settle_role(client: &AdminClient, name: &str, expected: &RoleView) -> AdminResult<()> {
    settle::until(&settle_policy(), move || async move {
        client.get_role(name).await.ok().filter(|v| v == expected).map(|_| ())
    })
    .await
}

/// Poll `query_user` until it returns `expected`.
pub async fn settle_user_roles(client: &AdminClient, user: &str, expected: &[&str]) -> AdminResult<()> {
    settle::until(&settle_policy(), move || async move {
        client.query_user(user).await.ok().filter(|roles| roles.iter().map(String::as_str).eq(expected.iter().copied())).map(|_| ())
    })
    .await
}

/// Give a rejected command the full propagation window before asserting that nothing happened.
pub async fn past_settle_window() { tokio::time::sleep(Duration::from_millis(PROPAGATION_MS * 3)).await; }

pub fn expect_code<T: std::fmt::Debug>(res: AdminResult<T>, code: i32) -> AdminError {
    match res {
        Ok(v) => panic!("expected error code {}, got Ok({:?})", code, v),
        Err(e) => {
            assert_eq!(e.code(), code, "unexpected error: {:?}", e);
            e
        }
    }
}
