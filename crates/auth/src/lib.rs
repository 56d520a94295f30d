//! `stockroom-auth`: pure privilege model and query operations.
//!
//! This crate is intentionally decoupled from HTTP and storage: the backend
//! owns role/privilege persistence, this crate only merges and queries.

pub mod authorize;
pub mod mapping;
pub mod menu;
pub mod permissions;
pub mod privilege_set;
pub mod roles;

pub use authorize::{
    authorize_action, can_perform_action, explain_action, has_privilege, ActionExplanation,
    AuthzError, DenialKind,
};
pub use mapping::{resource_key_for, Action, Module};
pub use menu::{merge_menus, MenuEntry, MenuId, RoleMenu};
pub use permissions::{Privilege, PrivilegeStatus};
pub use privilege_set::PrivilegeSet;
pub use roles::{is_super_admin, map_role_code, map_role_codes};
