//! Administrative error model.
//! Every failure surfaced by the admin core carries a stable numeric code, a symbolic
//! name and a human-readable message. Codes are part of the caller contract and must
//! not be renumbered.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminError {
    /// Malformed argument shape or type. Always raised before the store is touched.
    #[error("{0}")]
    Param(String),
    #[error("{0}")]
    ClientClosed(String),
    #[error("{0}")]
    Timeout(String),
    #[error("{0}")]
    InvalidUser(String),
    #[error("{0}")]
    UserExists(String),
    #[error("{0}")]
    InvalidRole(String),
    #[error("{0}")]
    RoleExists(String),
    #[error("{0}")]
    InvalidPrivilege(String),
    #[error("{0}")]
    InvalidWhitelist(String),
    #[error("{0}")]
    QuotasNotEnabled(String),
}

impl AdminError {
    pub fn code(&self) -> i32 {
        match self {
            AdminError::Param(_) => -2,
            AdminError::ClientClosed(_) => -1,
            AdminError::Timeout(_) => 9,
            AdminError::InvalidUser(_) => 60,
            AdminError::UserExists(_) => 61,
            AdminError::InvalidRole(_) => 70,
            AdminError::RoleExists(_) => 71,
            AdminError::InvalidPrivilege(_) => 72,
            AdminError::InvalidWhitelist(_) => 73,
            AdminError::QuotasNotEnabled(_) => 74,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            AdminError::Param(_) => "ERR_PARAM",
            AdminError::ClientClosed(_) => "ERR_CLIENT",
            AdminError::Timeout(_) => "ERR_TIMEOUT",
            AdminError::InvalidUser(_) => "INVALID_USER",
            AdminError::UserExists(_) => "USER_ALREADY_EXISTS",
            AdminError::InvalidRole(_) => "INVALID_ROLE",
            AdminError::RoleExists(_) => "ROLE_ALREADY_EXISTS",
            AdminError::InvalidPrivilege(_) => "INVALID_PRIVILEGE",
            AdminError::InvalidWhitelist(_) => "INVALID_WHITELIST",
            AdminError::QuotasNotEnabled(_) => "QUOTAS_NOT_ENABLED",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AdminError::Param(m)
            | AdminError::ClientClosed(m)
            | AdminError::Timeout(m)
            | AdminError::InvalidUser(m)
            | AdminError::UserExists(m)
            | AdminError::InvalidRole(m)
            | AdminError::RoleExists(m)
            | AdminError::InvalidPrivilege(m)
            | AdminError::InvalidWhitelist(m)
            | AdminError::QuotasNotEnabled(m) => m.as_str(),
        }
    }

    /// Errors that originate in the transport rather than in the administrative rules.
    /// These are never retried here.
    pub fn is_transport(&self) -> bool {
        matches!(self, AdminError::Timeout(_) | AdminError::ClientClosed(_))
    }

    pub fn param<S: Into<String>>(msg: S) -> Self { AdminError::Param(msg.into()) }
    pub fn timeout<S: Into<String>>(msg: S) -> Self { AdminError::Timeout(msg.into()) }
    pub fn closed() -> Self { AdminError::ClientClosed("client is not connected".into()) }

    // Server-side rejections report the symbolic name as their message.
    pub fn invalid_user() -> Self { AdminError::InvalidUser("INVALID_USER".into()) }
    pub fn user_exists() -> Self { AdminError::UserExists("USER_ALREADY_EXISTS".into()) }
    pub fn invalid_role() -> Self { AdminError::InvalidRole("INVALID_ROLE".into()) }
    pub fn role_exists() -> Self { AdminError::RoleExists("ROLE_ALREADY_EXISTS".into()) }
    pub fn invalid_privilege() -> Self { AdminError::InvalidPrivilege("INVALID_PRIVILEGE".into()) }
    pub fn invalid_whitelist() -> Self { AdminError::InvalidWhitelist("INVALID_WHITELIST".into()) }
    pub fn quotas_not_enabled() -> Self { AdminError::QuotasNotEnabled("QUOTAS_NOT_ENABLED".into()) }
}

impl Serialize for AdminError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("AdminError", 3)?;
        st.serialize_field("code", &self.code())?;
        st.serialize_field("symbol", self.symbol())?;
        st.serialize_field("message", self.message())?;
        st.end()
    }
}

pub type AdminResult<T> = Result<T, AdminError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
