//! Session-scoped authorization context.
//!
//! Built at login, passed explicitly to every call site that gates an action,
//! and dropped on logout. A role change goes through [`Session::refresh`],
//! which recomputes everything wholesale; nothing is updated incrementally and
//! nothing is persisted outside the running session.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use stockroom_auth::{
    authorize_action, can_perform_action, explain_action, has_privilege, Action,
    ActionExplanation, AuthzError, MenuEntry, PrivilegeSet,
};
use stockroom_core::RoleCode;

use crate::backend::{MenuSource, PrivilegeSource};
use crate::resolver::PrivilegeResolver;

#[derive(Debug, Clone)]
pub struct Session {
    role_codes: Vec<RoleCode>,
    privileges: Arc<PrivilegeSet>,
    menus: Arc<[MenuEntry]>,
    resolved_at: DateTime<Utc>,
}

impl Session {
    /// Resolve privileges and menus for `role_codes` concurrently.
    pub async fn login<S>(resolver: &PrivilegeResolver<S>, role_codes: Vec<RoleCode>) -> Self
    where
        S: PrivilegeSource + MenuSource,
    {
        let (privileges, menus) = futures::join!(
            resolver.resolve_for_roles(&role_codes),
            resolver.resolve_menus(&role_codes),
        );

        tracing::info!(
            roles = role_codes.len(),
            unrestricted = privileges.is_unrestricted(),
            menus = menus.len(),
            "session resolved"
        );

        Self {
            role_codes,
            privileges: Arc::new(privileges),
            menus: menus.into(),
            resolved_at: Utc::now(),
        }
    }

    /// Recompute the whole context for a (possibly changed) role set.
    ///
    /// Handles returned earlier by [`Session::privileges`] keep seeing the old
    /// set; they are never mutated.
    pub async fn refresh<S>(&mut self, resolver: &PrivilegeResolver<S>, role_codes: Vec<RoleCode>)
    where
        S: PrivilegeSource + MenuSource,
    {
        *self = Self::login(resolver, role_codes).await;
    }

    /// End the session, discarding the resolved context.
    pub fn logout(self) {
        tracing::info!(roles = self.role_codes.len(), "session ended");
    }

    pub fn role_codes(&self) -> &[RoleCode] {
        &self.role_codes
    }

    /// Shared, immutable handle to the resolved privileges.
    pub fn privileges(&self) -> Arc<PrivilegeSet> {
        Arc::clone(&self.privileges)
    }

    pub fn menus(&self) -> &[MenuEntry] {
        &self.menus
    }

    pub fn resolved_at(&self) -> DateTime<Utc> {
        self.resolved_at
    }

    pub fn has_privilege(&self, text: &str, module: Option<&str>) -> bool {
        has_privilege(&self.privileges, text, module)
    }

    pub fn can_perform_action(&self, module: &str, action: Action) -> bool {
        can_perform_action(&self.privileges, module, action)
    }

    /// String-verb variant for call sites that carry the action as text.
    /// Unknown verbs are denied.
    pub fn can(&self, module: &str, action: &str) -> bool {
        match action.parse::<Action>() {
            Ok(action) => self.can_perform_action(module, action),
            Err(err) => {
                tracing::warn!(module, action, error = %err, "unknown action verb; denying");
                false
            }
        }
    }

    pub fn authorize(&self, module: &str, action: Action) -> Result<(), AuthzError> {
        authorize_action(&self.privileges, module, action)
    }

    pub fn explain(&self, module: &str, action: Action) -> ActionExplanation {
        explain_action(&self.privileges, module, action)
    }
}
