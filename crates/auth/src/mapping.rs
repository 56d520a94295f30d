//! Static lookup tables: UI module names → resource keys, and action verbs →
//! accepted description prefixes.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use stockroom_core::{DomainError, ResourceKey};

/// UI-facing modules with a known backend resource key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Brands,
    Categories,
    Items,
    Suppliers,
    Schools,
    Locations,
    Departments,
    Stock,
    Requisitions,
    Issuances,
    Users,
    Roles,
    Privileges,
    Menus,
    Reports,
}

impl Module {
    pub const ALL: [Module; 15] = [
        Module::Brands,
        Module::Categories,
        Module::Items,
        Module::Suppliers,
        Module::Schools,
        Module::Locations,
        Module::Departments,
        Module::Stock,
        Module::Requisitions,
        Module::Issuances,
        Module::Users,
        Module::Roles,
        Module::Privileges,
        Module::Menus,
        Module::Reports,
    ];

    /// Name shown in the dashboard.
    pub fn display_name(self) -> &'static str {
        match self {
            Module::Brands => "Brands",
            Module::Categories => "Categories",
            Module::Items => "Items",
            Module::Suppliers => "Suppliers",
            Module::Schools => "Schools",
            Module::Locations => "Locations",
            Module::Departments => "Departments",
            Module::Stock => "Stock",
            Module::Requisitions => "Requisitions",
            Module::Issuances => "Issuances",
            Module::Users => "Users",
            Module::Roles => "Roles",
            Module::Privileges => "Privileges",
            Module::Menus => "Menus",
            Module::Reports => "Reports",
        }
    }

    pub fn resource_key(self) -> ResourceKey {
        ResourceKey::new(match self {
            Module::Brands => "brands",
            Module::Categories => "categories",
            Module::Items => "items",
            Module::Suppliers => "suppliers",
            Module::Schools => "schools",
            Module::Locations => "locations",
            Module::Departments => "departments",
            Module::Stock => "stock_levels",
            Module::Requisitions => "requisitions",
            Module::Issuances => "issuances",
            Module::Users => "users",
            Module::Roles => "roles",
            Module::Privileges => "role_privileges",
            Module::Menus => "role_menus",
            Module::Reports => "reports",
        })
    }

    /// Case-insensitive match against either the display name or the
    /// resource key.
    pub fn parse(name: &str) -> Option<Module> {
        let name = name.trim();
        Module::ALL.into_iter().find(|m| {
            m.display_name().eq_ignore_ascii_case(name)
                || m.resource_key().as_str().eq_ignore_ascii_case(name)
        })
    }
}

/// Resolve a module name to its resource key.
///
/// Unknown names fall back to [`ResourceKey::derive_from`].
pub fn resource_key_for(module: &str) -> ResourceKey {
    match Module::parse(module) {
        Some(m) => m.resource_key(),
        None => {
            let key = ResourceKey::derive_from(module);
            tracing::debug!(module, resource_key = %key, "module has no mapping; using derived key");
            key
        }
    }
}

/// Action verbs the UI gates on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Get,
}

impl Action {
    /// Description prefixes that satisfy this action. Matching is
    /// case-sensitive against the backend's wording.
    pub fn prefixes(self) -> &'static [&'static str] {
        match self {
            Action::Create => &["Create a new"],
            Action::Read => &["Get all", "View", "List"],
            Action::Update => &["Update", "Edit"],
            Action::Delete => &["Delete", "Remove"],
            Action::Get => &["Get a ", "Get an ", "Get one", "Get single", "Get by"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Get => "get",
        }
    }

    pub fn matches(self, description: &str) -> bool {
        self.prefixes().iter().any(|p| description.starts_with(p))
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "create" => Ok(Action::Create),
            "read" => Ok(Action::Read),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            "get" => Ok(Action::Get),
            other => Err(DomainError::validation(format!(
                "unknown action '{other}' (expected create, read, update, delete or get)"
            ))),
        }
    }
}
