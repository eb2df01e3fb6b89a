//! Per-role read/write rate quotas.
//!
//! Quota updates are partial: a field left as `None` keeps the stored value, while an
//! explicit zero turns enforcement off for that dimension.

use serde_json::{Map, Value};

use crate::error::{AdminError, AdminResult};
use crate::role::Role;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuotaUpdate {
    pub read_quota: Option<u32>,
    pub write_quota: Option<u32>,
}

impl QuotaUpdate {
    pub fn read(q: u32) -> Self { Self { read_quota: Some(q), write_quota: None } }
    pub fn write(q: u32) -> Self { Self { read_quota: None, write_quota: Some(q) } }
    pub fn both(read: u32, write: u32) -> Self { Self { read_quota: Some(read), write_quota: Some(write) } }

    /// Decode the quota fields of an argument map. Absent keys stay `None`.
    pub fn from_args(args: &Map<String, Value>) -> AdminResult<Self> {
        Ok(Self {
            read_quota: args.get("read_quota").map(|v| quota_from_value(v, "read_quota")).transpose()?,
            write_quota: args.get("write_quota").map(|v| quota_from_value(v, "write_quota")).transpose()?,
        })
    }

    fn sets_nonzero(&self) -> bool {
        self.read_quota.is_some_and(|q| q != 0) || self.write_quota.is_some_and(|q| q != 0)
    }
}

/// A supplied quota must be an integer in `0..=u32::MAX`. Negative values are a
/// parameter error, never a stored value.
pub fn quota_from_value(v: &Value, field: &str) -> AdminResult<u32> {
    if let Some(q) = v.as_u64() {
        return u32::try_from(q).map_err(|_| AdminError::param(format!("{} is out of range.", field)));
    }
    if v.as_i64().is_some() {
        return Err(AdminError::param(format!("{} must be a non-negative integer.", field)));
    }
    Err(AdminError::param(format!("{} must be an integer.", field)))
}

/// Fail closed when the cluster has quotas switched off and the caller asks for a limit.
pub fn check_enabled(update: &QuotaUpdate, quotas_enabled: bool) -> AdminResult<()> {
    if !quotas_enabled && update.sets_nonzero() {
        return Err(AdminError::quotas_not_enabled());
    }
    Ok(())
}

pub fn apply(role: &mut Role, update: &QuotaUpdate) {
    if let Some(q) = update.read_quota { role.read_quota = q; }
    if let Some(q) = update.write_quota { role.write_quota = q; }
}
