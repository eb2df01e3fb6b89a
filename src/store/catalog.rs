use std::collections::BTreeMap;

use crate::quota::{self, QuotaUpdate};
use crate::role::Role;

use super::bindings::UserBindings;

/// A committed administrative change. Mutations are validated before they are built,
/// so applying one never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateRole(Role),
    DropRole(String),
    SetQuotas { role: String, update: QuotaUpdate },
    SetWhitelist { role: String, whitelist: Vec<String> },
    CreateUser { user: String, roles: Vec<String> },
    DropUser(String),
    GrantRoles { user: String, roles: Vec<String> },
    RevokeRoles { user: String, roles: Vec<String> },
}

impl Mutation {
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::CreateRole(_) => "create_role",
            Mutation::DropRole(_) => "drop_role",
            Mutation::SetQuotas { .. } => "set_quotas",
            Mutation::SetWhitelist { .. } => "set_whitelist",
            Mutation::CreateUser { .. } => "create_user",
            Mutation::DropUser(_) => "drop_user",
            Mutation::GrantRoles { .. } => "grant_roles",
            Mutation::RevokeRoles { .. } => "revoke_roles",
        }
    }
}

/// Roles plus the user bindings that reference them. Both live in one value so a role
/// drop and its binding cleanup are a single step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    roles: BTreeMap<String, Role>,
    bindings: UserBindings,
}

impl Catalog {
    pub fn role(&self, name: &str) -> Option<&Role> { self.roles.get(name) }

    pub fn roles(&self) -> impl Iterator<Item = &Role> { self.roles.values() }

    pub fn bindings(&self) -> &UserBindings { &self.bindings }

    pub fn apply(&mut self, m: &Mutation) {
        match m {
            Mutation::CreateRole(role) => { self.roles.insert(role.name.clone(), role.clone()); }
            Mutation::DropRole(name) => {
                self.roles.remove(name);
                self.bindings.scrub_role(name);
            }
            Mutation::SetQuotas { role, update } => {
                if let Some(r) = self.roles.get_mut(role) { quota::apply(r, update); }
            }
            Mutation::SetWhitelist { role, whitelist } => {
                if let Some(r) = self.roles.get_mut(role) { r.whitelist = whitelist.clone(); }
            }
            Mutation::CreateUser { user, roles } => self.bindings.insert_user(user, roles),
            Mutation::DropUser(user) => { self.bindings.remove_user(user); }
            Mutation::GrantRoles { user, roles } => self.bindings.grant(user, roles),
            Mutation::RevokeRoles { user, roles } => self.bindings.revoke(user, roles),
        }
    }
}
