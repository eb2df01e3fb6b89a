//! Role, privilege and quota administration for a clustered multi-tenant data store.
//!
//! `store::RoleStore` owns role records and user bindings, `admin::AdminClient` is the
//! caller-facing facade, and `settle` documents and implements the eventual-visibility
//! contract between them.

pub mod admin;
pub mod config;
pub mod error;
pub mod logging;
pub mod privilege;
pub mod quota;
pub mod role;
pub mod settle;
pub mod store;

pub use admin::{AdminClient, AdminCommand};
pub use config::{AdminPolicy, ClusterConfig};
pub use error::{AdminError, AdminResult};
pub use privilege::{Privilege, PrivilegeCode, PrivilegeSpec};
pub use quota::QuotaUpdate;
pub use role::{Role, RoleSpec, RoleView};
pub use settle::SettlePolicy;
pub use store::RoleStore;
