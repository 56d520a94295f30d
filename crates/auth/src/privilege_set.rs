//! The merged, queryable authorization model for one session.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stockroom_core::ResourceKey;

use crate::permissions::Privilege;

/// Privileges grouped by resource key.
///
/// Invariants:
/// - within one resource, descriptions are unique (merge deduplicates);
/// - if the `"*"` key is present the set is unrestricted and no other key is
///   consulted by any query.
///
/// A resolved set is treated as an immutable value; a role change produces a
/// new set rather than mutating the old one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<ResourceKey, Vec<Privilege>>",
    into = "BTreeMap<ResourceKey, Vec<Privilege>>"
)]
pub struct PrivilegeSet {
    resources: BTreeMap<ResourceKey, Vec<Privilege>>,
}

impl PrivilegeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The super-admin sentinel set.
    pub fn unrestricted() -> Self {
        let mut set = Self::new();
        set.grant(ResourceKey::UNRESTRICTED, Privilege::active("*"));
        set
    }

    pub fn is_unrestricted(&self) -> bool {
        self.resources.contains_key(&ResourceKey::UNRESTRICTED)
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Fold one `(description, status)` pair into a resource.
    ///
    /// An existing entry with the same description keeps its position and its
    /// status becomes the OR of both; otherwise the pair is appended.
    pub fn grant(&mut self, resource: ResourceKey, privilege: Privilege) {
        let entries = self.resources.entry(resource).or_default();
        match entries
            .iter_mut()
            .find(|p| p.description == privilege.description)
        {
            Some(existing) => existing.status = existing.status.or(privilege.status),
            None => entries.push(privilege),
        }
    }

    /// Merge another set into this one (commutative and idempotent).
    pub fn merge(&mut self, other: &PrivilegeSet) {
        for (resource, privileges) in &other.resources {
            for privilege in privileges {
                self.grant(resource.clone(), privilege.clone());
            }
        }
    }

    /// Merge any number of per-role sets into one.
    pub fn merge_all<'a>(sets: impl IntoIterator<Item = &'a PrivilegeSet>) -> PrivilegeSet {
        let mut merged = PrivilegeSet::new();
        for set in sets {
            merged.merge(set);
        }
        merged
    }

    /// Entries for one resource, in merge order. Empty if the resource is
    /// unknown.
    pub fn entries(&self, resource: &ResourceKey) -> &[Privilege] {
        self.resources
            .get(resource)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn resources(&self) -> impl Iterator<Item = &ResourceKey> {
        self.resources.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceKey, &[Privilege])> {
        self.resources.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Active descriptions for one resource.
    pub fn granted_descriptions(&self, resource: &ResourceKey) -> Vec<&str> {
        self.entries(resource)
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.description.as_str())
            .collect()
    }
}

impl From<BTreeMap<ResourceKey, Vec<Privilege>>> for PrivilegeSet {
    fn from(value: BTreeMap<ResourceKey, Vec<Privilege>>) -> Self {
        let mut set = PrivilegeSet::new();
        for (resource, privileges) in value {
            for privilege in privileges {
                set.grant(resource.clone(), privilege);
            }
        }
        set
    }
}

impl From<PrivilegeSet> for BTreeMap<ResourceKey, Vec<Privilege>> {
    fn from(value: PrivilegeSet) -> Self {
        value.resources
    }
}

impl FromIterator<(ResourceKey, Privilege)> for PrivilegeSet {
    fn from_iter<T: IntoIterator<Item = (ResourceKey, Privilege)>>(iter: T) -> Self {
        let mut set = PrivilegeSet::new();
        for (resource, privilege) in iter {
            set.grant(resource, privilege);
        }
        set
    }
}

/// Equality ignores entry order within a resource: descriptions are unique,
/// so two sets are equal when they grant the same statuses to the same
/// descriptions.
impl PartialEq for PrivilegeSet {
    fn eq(&self, other: &Self) -> bool {
        if self.resources.len() != other.resources.len() {
            return false;
        }
        self.resources.iter().all(|(resource, mine)| {
            let theirs = other.entries(resource);
            mine.len() == theirs.len()
                && mine.iter().all(|p| {
                    theirs
                        .iter()
                        .any(|q| q.description == p.description && q.status == p.status)
                })
        })
    }
}

impl Eq for PrivilegeSet {}
