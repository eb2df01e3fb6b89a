use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AdminError, AdminResult};
use crate::privilege::{Privilege, PrivilegeSpec};

/// Authoritative role record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    /// Insertion order is kept; duplicates are not collapsed.
    pub privileges: Vec<Privilege>,
    pub whitelist: Vec<String>,
    /// Zero disables enforcement for the dimension.
    pub read_quota: u32,
    pub write_quota: u32,
}

impl Role {
    pub fn view(&self) -> RoleView {
        RoleView {
            privileges: self.privileges.clone(),
            whitelist: self.whitelist.clone(),
            read_quota: self.read_quota,
            write_quota: self.write_quota,
        }
    }
}

/// What `get_role` returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleView {
    pub privileges: Vec<Privilege>,
    pub whitelist: Vec<String>,
    pub read_quota: u32,
    pub write_quota: u32,
}

/// Everything needed to create a role, before semantic validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSpec {
    pub name: String,
    pub privileges: Vec<PrivilegeSpec>,
    pub whitelist: Vec<String>,
    pub read_quota: u32,
    pub write_quota: u32,
}

impl RoleSpec {
    pub fn new(name: &str, privileges: Vec<PrivilegeSpec>) -> Self {
        Self { name: name.to_string(), privileges, ..Default::default() }
    }

    pub fn whitelist<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.whitelist = entries.into_iter().map(Into::into).collect();
        self
    }

    pub fn quotas(mut self, read_quota: u32, write_quota: u32) -> Self {
        self.read_quota = read_quota;
        self.write_quota = write_quota;
        self
    }
}

/// Names are opaque byte strings: only emptiness and length are checked.
pub fn name_within_bounds(name: &str, max_len: usize) -> bool { !name.is_empty() && name.len() <= max_len }

pub fn validate_role_name(name: &str, max_len: usize) -> AdminResult<()> {
    if name_within_bounds(name, max_len) { Ok(()) } else { Err(AdminError::invalid_role()) }
}

pub fn name_from_value(v: &Value, msg: &str) -> AdminResult<String> {
    v.as_str().map(str::to_string).ok_or_else(|| AdminError::param(msg))
}

pub fn whitelist_from_value(v: &Value) -> AdminResult<Vec<String>> {
    match v {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|i| i.as_str().map(str::to_string).ok_or_else(|| AdminError::param("Whitelist entries should be strings")))
            .collect(),
        _ => Err(AdminError::param("Whitelist should be a list")),
    }
}

fn valid_whitelist_entry(entry: &str) -> bool {
    match entry.split_once('/') {
        None => entry.parse::<IpAddr>().is_ok(),
        Some((addr, prefix)) => {
            let Ok(addr) = addr.parse::<IpAddr>() else { return false; };
            if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) { return false; }
            let Ok(prefix) = prefix.parse::<u8>() else { return false; };
            match addr {
                IpAddr::V4(_) => prefix <= 32,
                IpAddr::V6(_) => prefix <= 128,
            }
        }
    }
}

/// Every entry must be an IP address or an `addr/prefix` CIDR block.
pub fn validate_whitelist(entries: &[String]) -> AdminResult<()> {
    if entries.iter().all(|e| valid_whitelist_entry(e)) { Ok(()) } else { Err(AdminError::invalid_whitelist()) }
}
