use serde::{Deserialize, Serialize};

/// Whether a privilege is currently granted.
///
/// Unknown status strings from the backend deserialize as `Inactive`, so a
/// wording change on the backend can only ever revoke, never grant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivilegeStatus {
    Active,
    #[serde(other)]
    Inactive,
}

impl PrivilegeStatus {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Logical OR: once any role grants an action, it stays granted.
    pub fn or(self, other: Self) -> Self {
        if self.is_active() || other.is_active() {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

/// A single grant: a human-readable action label plus its status.
///
/// The description (e.g. "Create a new brand") is the unit of authorization;
/// it is free text owned by the backend, not a structured action code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Privilege {
    pub description: String,
    pub status: PrivilegeStatus,
}

impl Privilege {
    pub fn new(description: impl Into<String>, status: PrivilegeStatus) -> Self {
        Self {
            description: description.into(),
            status,
        }
    }

    pub fn active(description: impl Into<String>) -> Self {
        Self::new(description, PrivilegeStatus::Active)
    }

    pub fn inactive(description: impl Into<String>) -> Self {
        Self::new(description, PrivilegeStatus::Inactive)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_or_is_active_when_either_side_is() {
        use PrivilegeStatus::*;
        assert_eq!(Active.or(Inactive), Active);
        assert_eq!(Inactive.or(Active), Active);
        assert_eq!(Inactive.or(Inactive), Inactive);
    }

    #[test]
    fn unknown_status_strings_are_inactive() {
        let p: Privilege =
            serde_json::from_str(r#"{"description":"Get all brands","status":"pending"}"#).unwrap();
        assert_eq!(p.status, PrivilegeStatus::Inactive);

        let p: Privilege =
            serde_json::from_str(r#"{"description":"Get all brands","status":"active"}"#).unwrap();
        assert!(p.is_active());
    }
}
