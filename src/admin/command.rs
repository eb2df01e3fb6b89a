//! Decoding of JSON admin commands.
//!
//! Only argument shape is checked here; every failure is a `ParamError` raised before the
//! store is reached. Name bounds, existence, privilege legality and quota enablement are
//! left to the store.

use serde_json::{Map, Value};

use crate::config::AdminPolicy;
use crate::error::{AdminError, AdminResult};
use crate::privilege;
use crate::quota::{quota_from_value, QuotaUpdate};
use crate::role::{name_from_value, whitelist_from_value, RoleSpec};

const ROLE_NAME_MSG: &str = "Role name should be a string.";
const USER_NAME_MSG: &str = "User name should be a string.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    CreateRole(RoleSpec),
    GetRole(String),
    DropRole(String),
    SetQuotas { role: String, update: QuotaUpdate },
    SetWhitelist { role: String, whitelist: Vec<String> },
    QueryRoles,
    QueryUsersByRole(String),
    CreateUser { user: String, roles: Vec<String> },
    DropUser(String),
    GrantRoles { user: String, roles: Vec<String> },
    RevokeRoles { user: String, roles: Vec<String> },
    QueryUser(String),
}

impl AdminCommand {
    /// Decode `{"op": "...", ...args, "policy": {...}}`.
    pub fn parse(v: &Value) -> AdminResult<(AdminCommand, AdminPolicy)> {
        let Value::Object(args) = v else { return Err(AdminError::param("Command should be a dict")); };
        let op = args.get("op").and_then(Value::as_str).ok_or_else(|| AdminError::param("Command op should be a string"))?;
        let cmd = match op {
            "create_role" => AdminCommand::CreateRole(RoleSpec {
                name: role_arg(args)?,
                privileges: privilege::specs_from_value(arg(args, "privileges"))?,
                whitelist: whitelist_from_value(arg(args, "whitelist"))?,
                read_quota: optional_quota(args, "read_quota")?,
                write_quota: optional_quota(args, "write_quota")?,
            }),
            "get_role" => AdminCommand::GetRole(role_arg(args)?),
            "drop_role" => AdminCommand::DropRole(role_arg(args)?),
            "set_quotas" => AdminCommand::SetQuotas { role: role_arg(args)?, update: QuotaUpdate::from_args(args)? },
            "set_whitelist" => AdminCommand::SetWhitelist { role: role_arg(args)?, whitelist: whitelist_from_value(arg(args, "whitelist"))? },
            "query_roles" => AdminCommand::QueryRoles,
            "query_users_by_role" => AdminCommand::QueryUsersByRole(role_arg(args)?),
            "create_user" => AdminCommand::CreateUser { user: user_arg(args)?, roles: roles_arg(args)? },
            "drop_user" => AdminCommand::DropUser(user_arg(args)?),
            "grant_roles" => AdminCommand::GrantRoles { user: user_arg(args)?, roles: roles_arg(args)? },
            "revoke_roles" => AdminCommand::RevokeRoles { user: user_arg(args)?, roles: roles_arg(args)? },
            "query_user" => AdminCommand::QueryUser(user_arg(args)?),
            other => return Err(AdminError::param(format!("Unknown admin operation: {}", other))),
        };
        let policy = AdminPolicy::from_value(arg(args, "policy"))?;
        Ok((cmd, policy))
    }
}

fn arg<'a>(args: &'a Map<String, Value>, key: &str) -> &'a Value { args.get(key).unwrap_or(&Value::Null) }

fn role_arg(args: &Map<String, Value>) -> AdminResult<String> { name_from_value(arg(args, "role"), ROLE_NAME_MSG) }

fn user_arg(args: &Map<String, Value>) -> AdminResult<String> { name_from_value(arg(args, "user"), USER_NAME_MSG) }

fn roles_arg(args: &Map<String, Value>) -> AdminResult<Vec<String>> {
    let Value::Array(items) = arg(args, "roles") else { return Err(AdminError::param("Roles should be a list")); };
    items.iter().map(|r| name_from_value(r, ROLE_NAME_MSG)).collect()
}

// Creation defaults an absent quota to zero.
fn optional_quota(args: &Map<String, Value>, field: &str) -> AdminResult<u32> {
    args.get(field).map(|v| quota_from_value(v, field)).transpose().map(|q| q.unwrap_or(0))
}
