//!
//! rolegate admin facade
//! ---------------------
//! `AdminClient` is the caller-facing surface over a `RoleStore`. The store is injected at
//! `connect` and released by `close`; after that every call fails with `ClientClosed`.
//!
//! Ordering for every command: argument shape (JSON surface only), then existence, then
//! semantic checks, then the mutation. Mutations are sent through the commit path under
//! the command's timeout. A command that times out was never applied; the timeout is
//! surfaced as-is and never retried here.
//!
//! Success means committed, not visible. Use `wait_for_role`/`wait_for_role_absent` or
//! `crate::settle::until` before asserting on reads.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::AdminPolicy;
use crate::error::{AdminError, AdminResult};
use crate::quota::QuotaUpdate;
use crate::role::{RoleSpec, RoleView};
use crate::settle::{self, SettlePolicy};
use crate::store::RoleStore;

mod command;

pub use command::AdminCommand;

pub struct AdminClient {
    store: RwLock<Option<Arc<RoleStore>>>,
}

impl AdminClient {
    pub fn connect(store: Arc<RoleStore>) -> Self {
        info!(target: "rolegate::admin", "admin client connected (quotas_enabled={})", store.config().quotas_enabled);
        Self { store: RwLock::new(Some(store)) }
    }

    pub fn is_connected(&self) -> bool { self.store.read().is_some() }

    pub fn close(&self) {
        if self.store.write().take().is_some() {
            info!(target: "rolegate::admin", "admin client closed");
        }
    }

    fn store(&self) -> AdminResult<Arc<RoleStore>> { self.store.read().clone().ok_or_else(AdminError::closed) }

    async fn dispatch<T, F>(&self, op: &'static str, policy: &AdminPolicy, f: F) -> AdminResult<T>
    where
        F: FnOnce(&RoleStore) -> AdminResult<T>,
    {
        let store = self.store()?;
        let timeout = policy.effective_timeout(store.config());
        let latency = store.config().commit_latency();
        let commit = async {
            if !latency.is_zero() { tokio::time::sleep(latency).await; }
            f(&store)
        };
        match tokio::time::timeout(timeout, commit).await {
            Ok(Ok(v)) => {
                info!(target: "rolegate::admin", "{} ok", op);
                Ok(v)
            }
            Ok(Err(e)) => {
                debug!(target: "rolegate::admin", "{} rejected: {} ({})", op, e.symbol(), e.code());
                Err(e)
            }
            Err(_) => {
                warn!(target: "rolegate::admin", "{} timed out after {:?}", op, timeout);
                Err(AdminError::timeout(format!("{} timed out after {:?}", op, timeout)))
            }
        }
    }

    pub async fn create_role(&self, spec: RoleSpec, policy: &AdminPolicy) -> AdminResult<()> {
        self.dispatch("create_role", policy, move |s| s.create(&spec)).await
    }

    pub async fn get_role(&self, name: &str) -> AdminResult<RoleView> { self.store()?.get(name).map(|r| r.view()) }

    /// Existence probe that does not go through error handling.
    pub async fn role_exists(&self, name: &str) -> AdminResult<bool> { Ok(self.store()?.exists(name)) }

    pub async fn drop_role(&self, name: &str, policy: &AdminPolicy) -> AdminResult<()> {
        self.dispatch("drop_role", policy, |s| s.drop(name)).await
    }

    pub async fn set_quotas(&self, name: &str, update: QuotaUpdate, policy: &AdminPolicy) -> AdminResult<()> {
        self.dispatch("set_quotas", policy, |s| s.set_quotas(name, &update)).await
    }

    pub async fn set_whitelist(&self, name: &str, whitelist: Vec<String>, policy: &AdminPolicy) -> AdminResult<()> {
        self.dispatch("set_whitelist", policy, |s| s.set_whitelist(name, &whitelist)).await
    }

    pub async fn query_roles(&self) -> AdminResult<BTreeMap<String, RoleView>> {
        Ok(self.store()?.list_roles().into_iter().map(|r| (r.name.clone(), r.view())).collect())
    }

    pub async fn query_users_by_role(&self, role: &str) -> AdminResult<Vec<String>> { Ok(self.store()?.users_with_role(role)) }

    pub async fn create_user(&self, user: &str, roles: Vec<String>, policy: &AdminPolicy) -> AdminResult<()> {
        self.dispatch("create_user", policy, |s| s.create_user(user, &roles)).await
    }

    pub async fn drop_user(&self, user: &str, policy: &AdminPolicy) -> AdminResult<()> {
        self.dispatch("drop_user", policy, |s| s.drop_user(user)).await
    }

    pub async fn grant_roles(&self, user: &str, roles: Vec<String>, policy: &AdminPolicy) -> AdminResult<()> {
        self.dispatch("grant_roles", policy, |s| s.grant_roles(user, &roles)).await
    }

    pub async fn revoke_roles(&self, user: &str, roles: Vec<String>, policy: &AdminPolicy) -> AdminResult<()> {
        self.dispatch("revoke_roles", policy, |s| s.revoke_roles(user, &roles)).await
    }

    pub async fn query_user(&self, user: &str) -> AdminResult<Vec<String>> { self.store()?.roles_of_user(user) }

    pub async fn wait_for_role(&self, name: &str, policy: &SettlePolicy) -> AdminResult<RoleView> {
        let store = self.store()?;
        let s = &*store;
        settle::until(policy, move || async move { s.get(name).ok().map(|r| r.view()) }).await
    }

    pub async fn wait_for_role_absent(&self, name: &str, policy: &SettlePolicy) -> AdminResult<()> {
        let store = self.store()?;
        let s = &*store;
        settle::until(policy, move || async move { (!s.exists(name)).then_some(()) }).await
    }

    /// Force every committed mutation to become visible. Test hook.
    pub fn sync(&self) -> AdminResult<()> {
        self.store()?.sync();
        Ok(())
    }

    /// Run one JSON command and return its JSON result. Mutations answer `{"status": 0}`.
    pub async fn execute(&self, cmd: &Value) -> AdminResult<Value> {
        let (cmd, policy) = AdminCommand::parse(cmd)?;
        let ok = json!({"status": 0});
        match cmd {
            AdminCommand::CreateRole(spec) => self.create_role(spec, &policy).await.map(|_| ok),
            AdminCommand::GetRole(name) => self.get_role(&name).await.map(|v| json!(v)),
            AdminCommand::DropRole(name) => self.drop_role(&name, &policy).await.map(|_| ok),
            AdminCommand::SetQuotas { role, update } => self.set_quotas(&role, update, &policy).await.map(|_| ok),
            AdminCommand::SetWhitelist { role, whitelist } => self.set_whitelist(&role, whitelist, &policy).await.map(|_| ok),
            AdminCommand::QueryRoles => self.query_roles().await.map(|m| json!(m)),
            AdminCommand::QueryUsersByRole(role) => self.query_users_by_role(&role).await.map(|u| json!(u)),
            AdminCommand::CreateUser { user, roles } => self.create_user(&user, roles, &policy).await.map(|_| ok),
            AdminCommand::DropUser(user) => self.drop_user(&user, &policy).await.map(|_| ok),
            AdminCommand::GrantRoles { user, roles } => self.grant_roles(&user, roles, &policy).await.map(|_| ok),
            AdminCommand::RevokeRoles { user, roles } => self.revoke_roles(&user, roles, &policy).await.map(|_| ok),
            AdminCommand::QueryUser(user) => self.query_user(&user).await.map(|r| json!(r)),
        }
    }
}
