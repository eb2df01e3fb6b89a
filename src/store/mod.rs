//!
//! rolegate role store
//! -------------------
//! Authoritative mapping of role name -> role record, together with the user bindings
//! that reference roles.
//!
//! The store models a cluster: every mutation is validated and committed against the
//! authoritative catalog under a single lock, which makes create/drop serializable per
//! name (two concurrent creates of one name yield exactly one success). Reads are served
//! from a visible catalog that trails the authoritative one by the configured
//! propagation delay. A successful mutation is therefore NOT immediately readable;
//! callers poll (see `crate::settle`) rather than assume read-after-write.
//!
//! During the propagation window a role may already be gone while a user listing still
//! names it (or the reverse, across different mutations). That is an accepted
//! intermediate state, not an error.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::config::ClusterConfig;
use crate::error::{AdminError, AdminResult};
use crate::privilege;
use crate::quota::{self, QuotaUpdate};
use crate::role::{self, Role, RoleSpec};

mod bindings;
mod catalog;

pub use bindings::UserBindings;
pub use catalog::{Catalog, Mutation};

#[derive(Debug)]
struct Pending {
    visible_at: Instant,
    mutation: Mutation,
}

#[derive(Debug, Default)]
struct StoreState {
    authoritative: Catalog,
    visible: Catalog,
    pending: VecDeque<Pending>,
}

impl StoreState {
    /// Apply every pending mutation whose window has elapsed, in commit order.
    fn catch_up(&mut self, now: Instant) {
        while self.pending.front().is_some_and(|p| p.visible_at <= now) {
            if let Some(p) = self.pending.pop_front() {
                debug!(target: "rolegate::store", "propagated {}", p.mutation.kind());
                self.visible.apply(&p.mutation);
            }
        }
    }

    fn commit(&mut self, mutation: Mutation, delay: Duration) {
        self.authoritative.apply(&mutation);
        let now = Instant::now();
        self.pending.push_back(Pending { visible_at: now + delay, mutation });
        self.catch_up(now);
    }

    fn require_role(&self, name: &str) -> AdminResult<&Role> {
        self.authoritative.role(name).ok_or_else(AdminError::invalid_role)
    }

    fn require_roles(&self, roles: &[String]) -> AdminResult<()> {
        roles.iter().try_for_each(|r| self.require_role(r).map(|_| ()))
    }

    fn require_user(&self, user: &str) -> AdminResult<()> {
        if self.authoritative.bindings().contains_user(user) { Ok(()) } else { Err(AdminError::invalid_user()) }
    }
}

pub struct RoleStore {
    cfg: ClusterConfig,
    state: Mutex<StoreState>,
}

impl RoleStore {
    pub fn new(cfg: ClusterConfig) -> Self { Self { cfg, state: Mutex::new(StoreState::default()) } }

    pub fn config(&self) -> &ClusterConfig { &self.cfg }

    fn commit(&self, st: &mut StoreState, mutation: Mutation) {
        info!(target: "rolegate::store", "committed {}", mutation.kind());
        st.commit(mutation, self.cfg.propagation_delay());
    }

    /// Create a role. Checks run in order: name bounds, existence, privileges,
    /// whitelist, quota enablement. Nothing is written unless all pass.
    pub fn create(&self, spec: &RoleSpec) -> AdminResult<()> {
        role::validate_role_name(&spec.name, self.cfg.max_role_name_len)?;
        let mut st = self.state.lock();
        if st.authoritative.role(&spec.name).is_some() {
            return Err(AdminError::role_exists());
        }
        let privileges = privilege::validate_all(&spec.privileges)?;
        role::validate_whitelist(&spec.whitelist)?;
        quota::check_enabled(&QuotaUpdate::both(spec.read_quota, spec.write_quota), self.cfg.quotas_enabled)?;
        let role = Role {
            name: spec.name.clone(),
            privileges,
            whitelist: spec.whitelist.clone(),
            read_quota: spec.read_quota,
            write_quota: spec.write_quota,
        };
        self.commit(&mut st, Mutation::CreateRole(role));
        Ok(())
    }

    /// Exact lookup against the visible view. Unknown names are `InvalidRole`.
    pub fn get(&self, name: &str) -> AdminResult<Role> {
        let mut st = self.state.lock();
        st.catch_up(Instant::now());
        st.visible.role(name).cloned().ok_or_else(AdminError::invalid_role)
    }

    pub fn exists(&self, name: &str) -> bool {
        let mut st = self.state.lock();
        st.catch_up(Instant::now());
        st.visible.role(name).is_some()
    }

    /// Remove a role and, in the same mutation, every user binding to it.
    pub fn drop(&self, name: &str) -> AdminResult<()> {
        let mut st = self.state.lock();
        st.require_role(name)?;
        self.commit(&mut st, Mutation::DropRole(name.to_string()));
        Ok(())
    }

    /// Visible roles sorted by name.
    pub fn list_roles(&self) -> Vec<Role> {
        let mut st = self.state.lock();
        st.catch_up(Instant::now());
        st.visible.roles().cloned().collect()
    }

    pub fn set_quotas(&self, name: &str, update: &QuotaUpdate) -> AdminResult<()> {
        let mut st = self.state.lock();
        st.require_role(name)?;
        quota::check_enabled(update, self.cfg.quotas_enabled)?;
        self.commit(&mut st, Mutation::SetQuotas { role: name.to_string(), update: *update });
        Ok(())
    }

    pub fn set_whitelist(&self, name: &str, whitelist: &[String]) -> AdminResult<()> {
        let mut st = self.state.lock();
        st.require_role(name)?;
        role::validate_whitelist(whitelist)?;
        self.commit(&mut st, Mutation::SetWhitelist { role: name.to_string(), whitelist: whitelist.to_vec() });
        Ok(())
    }

    pub fn create_user(&self, user: &str, roles: &[String]) -> AdminResult<()> {
        if !role::name_within_bounds(user, self.cfg.max_role_name_len) {
            return Err(AdminError::invalid_user());
        }
        let mut st = self.state.lock();
        if st.authoritative.bindings().contains_user(user) {
            return Err(AdminError::user_exists());
        }
        st.require_roles(roles)?;
        self.commit(&mut st, Mutation::CreateUser { user: user.to_string(), roles: roles.to_vec() });
        Ok(())
    }

    pub fn drop_user(&self, user: &str) -> AdminResult<()> {
        let mut st = self.state.lock();
        st.require_user(user)?;
        self.commit(&mut st, Mutation::DropUser(user.to_string()));
        Ok(())
    }

    pub fn grant_roles(&self, user: &str, roles: &[String]) -> AdminResult<()> {
        let mut st = self.state.lock();
        st.require_user(user)?;
        st.require_roles(roles)?;
        self.commit(&mut st, Mutation::GrantRoles { user: user.to_string(), roles: roles.to_vec() });
        Ok(())
    }

    pub fn revoke_roles(&self, user: &str, roles: &[String]) -> AdminResult<()> {
        let mut st = self.state.lock();
        st.require_user(user)?;
        self.commit(&mut st, Mutation::RevokeRoles { user: user.to_string(), roles: roles.to_vec() });
        Ok(())
    }

    /// Roles bound to `user` in the visible view.
    pub fn roles_of_user(&self, user: &str) -> AdminResult<Vec<String>> {
        let mut st = self.state.lock();
        st.catch_up(Instant::now());
        st.visible.bindings().roles_of(user).map(<[String]>::to_vec).ok_or_else(AdminError::invalid_user)
    }

    /// Users bound to `role` in the visible view. A dropped or unknown role yields none.
    pub fn users_with_role(&self, role: &str) -> Vec<String> {
        let mut st = self.state.lock();
        st.catch_up(Instant::now());
        st.visible.bindings().users_with(role)
    }

    pub fn pending(&self) -> usize { self.state.lock().pending.len() }

    /// Make every committed mutation visible now.
    pub fn sync(&self) {
        let mut st = self.state.lock();
        let StoreState { visible, pending, .. } = &mut *st;
        for p in pending.drain(..) { visible.apply(&p.mutation); }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
