//! Privilege table and validation.
//!
//! A privilege pairs a permission code with an optional namespace/set scope. Global
//! administrative codes never carry a scope; data codes may be narrowed to a namespace
//! and, within it, to a set. An empty string means "everywhere".
//!
//! Validation is pure: nothing here touches the role store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AdminError, AdminResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "i64")]
pub enum PrivilegeCode {
    UserAdmin,
    SysAdmin,
    DataAdmin,
    UdfAdmin,
    SindexAdmin,
    Read,
    ReadWrite,
    ReadWriteUdf,
    Write,
    Truncate,
}

impl PrivilegeCode {
    pub const ALL: [PrivilegeCode; 10] = [
        PrivilegeCode::UserAdmin,
        PrivilegeCode::SysAdmin,
        PrivilegeCode::DataAdmin,
        PrivilegeCode::UdfAdmin,
        PrivilegeCode::SindexAdmin,
        PrivilegeCode::Read,
        PrivilegeCode::ReadWrite,
        PrivilegeCode::ReadWriteUdf,
        PrivilegeCode::Write,
        PrivilegeCode::Truncate,
    ];

    pub fn code(self) -> u8 {
        match self {
            PrivilegeCode::UserAdmin => 0,
            PrivilegeCode::SysAdmin => 1,
            PrivilegeCode::DataAdmin => 2,
            PrivilegeCode::UdfAdmin => 3,
            PrivilegeCode::SindexAdmin => 4,
            PrivilegeCode::Read => 10,
            PrivilegeCode::ReadWrite => 11,
            PrivilegeCode::ReadWriteUdf => 12,
            PrivilegeCode::Write => 13,
            PrivilegeCode::Truncate => 14,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| i64::from(p.code()) == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            PrivilegeCode::UserAdmin => "USER_ADMIN",
            PrivilegeCode::SysAdmin => "SYS_ADMIN",
            PrivilegeCode::DataAdmin => "DATA_ADMIN",
            PrivilegeCode::UdfAdmin => "UDF_ADMIN",
            PrivilegeCode::SindexAdmin => "SINDEX_ADMIN",
            PrivilegeCode::Read => "READ",
            PrivilegeCode::ReadWrite => "READ_WRITE",
            PrivilegeCode::ReadWriteUdf => "READ_WRITE_UDF",
            PrivilegeCode::Write => "WRITE",
            PrivilegeCode::Truncate => "TRUNCATE",
        }
    }

    /// Global codes apply cluster-wide and reject namespace/set qualifiers.
    pub fn is_global(self) -> bool { self.code() < 10 }
}

impl From<PrivilegeCode> for u8 {
    fn from(p: PrivilegeCode) -> u8 { p.code() }
}

impl TryFrom<i64> for PrivilegeCode {
    type Error = AdminError;
    fn try_from(code: i64) -> Result<Self, Self::Error> {
        PrivilegeCode::from_code(code).ok_or_else(AdminError::invalid_privilege)
    }
}

/// A validated privilege as stored on a role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Privilege {
    pub code: PrivilegeCode,
    pub ns: String,
    pub set: String,
}

impl Privilege {
    pub fn global(code: PrivilegeCode) -> Self { Self { code, ns: String::new(), set: String::new() } }

    pub fn scoped(code: PrivilegeCode, ns: &str, set: &str) -> Self {
        Self { code, ns: ns.to_string(), set: set.to_string() }
    }
}

/// Caller-supplied privilege that has passed shape checks but not the privilege table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivilegeSpec {
    pub code: i64,
    pub ns: String,
    pub set: String,
}

impl PrivilegeSpec {
    pub fn new(code: i64) -> Self { Self { code, ns: String::new(), set: String::new() } }

    pub fn scoped(code: i64, ns: &str, set: &str) -> Self {
        Self { code, ns: ns.to_string(), set: set.to_string() }
    }

    pub fn from_value(v: &Value) -> AdminResult<Self> {
        let Value::Object(map) = v else { return Err(AdminError::param("Privilege should be a dict")); };
        let code = match map.get("code") {
            None => return Err(AdminError::param("Privilege code is required")),
            Some(c) => c.as_i64().ok_or_else(|| AdminError::param("Privilege code should be an integer"))?,
        };
        Ok(Self { code, ns: scope_field(map.get("ns"), "ns")?, set: scope_field(map.get("set"), "set")? })
    }
}

impl From<&Privilege> for PrivilegeSpec {
    fn from(p: &Privilege) -> Self { Self { code: i64::from(p.code.code()), ns: p.ns.clone(), set: p.set.clone() } }
}

fn scope_field(v: Option<&Value>, field: &str) -> AdminResult<String> {
    match v {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(AdminError::param(format!("Privilege {} should be a string", field))),
    }
}

/// Decode the `privileges` argument. Only the shape is checked here.
pub fn specs_from_value(v: &Value) -> AdminResult<Vec<PrivilegeSpec>> {
    let Value::Array(items) = v else { return Err(AdminError::param("Privileges should be a list")); };
    items.iter().map(PrivilegeSpec::from_value).collect()
}

pub fn validate(spec: &PrivilegeSpec) -> AdminResult<Privilege> {
    let code = PrivilegeCode::from_code(spec.code).ok_or_else(AdminError::invalid_privilege)?;
    if code.is_global() && (!spec.ns.is_empty() || !spec.set.is_empty()) {
        return Err(AdminError::invalid_privilege());
    }
    if spec.ns.is_empty() && !spec.set.is_empty() {
        return Err(AdminError::invalid_privilege());
    }
    Ok(Privilege { code, ns: spec.ns.clone(), set: spec.set.clone() })
}

/// Validate a whole list, preserving order. The first invalid entry aborts.
pub fn validate_all(specs: &[PrivilegeSpec]) -> AdminResult<Vec<Privilege>> {
    specs.iter().map(validate).collect()
}
