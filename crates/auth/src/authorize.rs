//! Query operations over a resolved [`PrivilegeSet`].
//!
//! - No IO
//! - No panics
//! - Synchronous; safe to call from any UI action gate

use serde::Serialize;
use thiserror::Error;

use stockroom_core::ResourceKey;

use crate::mapping::{resource_key_for, Action};
use crate::permissions::Privilege;
use crate::privilege_set::PrivilegeSet;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("no privileges loaded for module '{0}'")]
    UnknownModule(String),

    #[error("forbidden: cannot {action} on '{module}'")]
    Forbidden { module: String, action: Action },
}

/// Case-insensitive substring search for an active privilege.
///
/// With `module`, only that module's resource is searched; otherwise every
/// resource is. The unrestricted sentinel always matches.
pub fn has_privilege(set: &PrivilegeSet, text: &str, module: Option<&str>) -> bool {
    if set.is_unrestricted() {
        return true;
    }

    let needle = text.to_lowercase();
    let matches =
        |p: &Privilege| p.is_active() && p.description.to_lowercase().contains(&needle);

    match module {
        Some(module) => set.entries(&resource_key_for(module)).iter().any(matches),
        None => set.iter().flat_map(|(_, entries)| entries).any(matches),
    }
}

/// Whether `action` is permitted on `module`.
///
/// Fails closed when the module has no loaded privileges at all.
pub fn can_perform_action(set: &PrivilegeSet, module: &str, action: Action) -> bool {
    if set.is_unrestricted() {
        return true;
    }

    let resource = resource_key_for(module);
    let entries = set.entries(&resource);
    if entries.is_empty() {
        tracing::warn!(module, resource_key = %resource, %action, "no privileges loaded for module");
        return false;
    }

    entries
        .iter()
        .any(|p| p.is_active() && action.matches(&p.description))
}

/// Like [`can_perform_action`], but with a typed denial for call sites that
/// propagate errors.
pub fn authorize_action(set: &PrivilegeSet, module: &str, action: Action) -> Result<(), AuthzError> {
    if set.is_unrestricted() {
        return Ok(());
    }
    if set.entries(&resource_key_for(module)).is_empty() {
        return Err(AuthzError::UnknownModule(module.to_string()));
    }
    if can_perform_action(set, module, action) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            module: module.to_string(),
            action,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decision Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an action-gate decision.
///
/// Answers "why is this button hidden?" without re-deriving the merge.
#[derive(Debug, Clone, Serialize)]
pub struct ActionExplanation {
    pub module: String,
    pub resource_key: ResourceKey,
    pub action: Action,
    pub granted: bool,
    pub reason: String,
    /// Description that granted the action, if any.
    pub matched_description: Option<String>,
    pub denial: Option<DenialKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// The module has no loaded privileges.
    UnknownModule,
    /// A description with a matching prefix exists but no role activates it.
    Inactive,
    /// No description carries any of the action's prefixes.
    NoMatchingPrivilege,
}

pub fn explain_action(set: &PrivilegeSet, module: &str, action: Action) -> ActionExplanation {
    let resource_key = resource_key_for(module);
    let explanation = |granted, reason: String, matched, denial| ActionExplanation {
        module: module.to_string(),
        resource_key: resource_key.clone(),
        action,
        granted,
        reason,
        matched_description: matched,
        denial,
    };

    if set.is_unrestricted() {
        return explanation(true, "unrestricted (super-admin) access".to_string(), None, None);
    }

    let entries = set.entries(&resource_key);
    if entries.is_empty() {
        return explanation(
            false,
            format!("no privileges loaded for resource '{resource_key}'"),
            None,
            Some(DenialKind::UnknownModule),
        );
    }

    let candidates: Vec<&Privilege> = entries
        .iter()
        .filter(|p| action.matches(&p.description))
        .collect();

    match candidates.iter().find(|p| p.is_active()) {
        Some(p) => explanation(
            true,
            format!("granted by active privilege '{}'", p.description),
            Some(p.description.clone()),
            None,
        ),
        None if !candidates.is_empty() => explanation(
            false,
            format!(
                "matching privileges are inactive for every role: {:?}",
                candidates.iter().map(|p| &p.description).collect::<Vec<_>>()
            ),
            None,
            Some(DenialKind::Inactive),
        ),
        None => explanation(
            false,
            format!(
                "no privilege on '{resource_key}' starts with any of {:?}",
                action.prefixes()
            ),
            None,
            Some(DenialKind::NoMatchingPrivilege),
        ),
    }
}
