//! Strongly-typed identifiers used across the authorization boundary.

use core::str::FromStr;
use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Identifier of a role (a named permission bundle assigned to a user).
///
/// Role codes are opaque, but compare case-insensitively: construction trims
/// and upper-cases the input, so `"students"` and `" STUDENTS "` are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleCode(String);

impl RoleCode {
    pub fn new(code: impl AsRef<str>) -> DomainResult<Self> {
        let normalized = code.as_ref().trim().to_uppercase();
        if normalized.is_empty() {
            return Err(DomainError::invalid_id("RoleCode: empty role code"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RoleCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoleCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RoleCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleCode> for String {
    fn from(value: RoleCode) -> Self {
        value.0
    }
}

/// Key grouping privileges by backend resource (e.g. `"brands"`).
///
/// The distinguished key [`ResourceKey::UNRESTRICTED`] (`"*"`) marks
/// super-admin access.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKey(Cow<'static, str>);

impl ResourceKey {
    pub const UNRESTRICTED: ResourceKey = ResourceKey(Cow::Borrowed("*"));

    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self(key.into())
    }

    /// Deterministic key for a module name with no explicit mapping:
    /// trimmed, lower-cased, with spaces and hyphens turned into underscores.
    pub fn derive_from(name: &str) -> Self {
        let key: String = name
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        Self(Cow::Owned(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unrestricted(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_codes_compare_case_insensitively() {
        let a = RoleCode::new("students").unwrap();
        let b: RoleCode = " STUDENTS ".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "STUDENTS");
    }

    #[test]
    fn blank_role_code_is_rejected() {
        assert!(matches!(RoleCode::new("   "), Err(DomainError::InvalidId(_))));
    }

    #[test]
    fn role_code_deserializes_through_normalization() {
        let code: RoleCode = serde_json::from_str("\"teachers\"").unwrap();
        assert_eq!(code.as_str(), "TEACHERS");
        assert!(serde_json::from_str::<RoleCode>("\"\"").is_err());
    }

    #[test]
    fn derived_resource_keys_are_snake_case() {
        assert_eq!(ResourceKey::derive_from("Stock Items").as_str(), "stock_items");
        assert_eq!(ResourceKey::derive_from(" Lab-Equipment ").as_str(), "lab_equipment");
    }

    #[test]
    fn unrestricted_key_is_the_star_sentinel() {
        assert!(ResourceKey::UNRESTRICTED.is_unrestricted());
        assert!(ResourceKey::new("*").is_unrestricted());
        assert!(!ResourceKey::new("brands").is_unrestricted());
    }
}
