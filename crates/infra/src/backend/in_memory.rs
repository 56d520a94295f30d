use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use stockroom_auth::{MenuEntry, PrivilegeSet};
use stockroom_core::RoleCode;

use super::{FetchError, MenuSource, PrivilegeSource};

#[derive(Debug, Default)]
struct Inner {
    privileges: HashMap<RoleCode, PrivilegeSet>,
    menus: HashMap<RoleCode, Vec<MenuEntry>>,
    failing: HashSet<RoleCode>,
    privilege_calls: Vec<RoleCode>,
    menu_calls: Vec<RoleCode>,
}

/// In-memory backend.
///
/// Intended for tests/dev. Records every fetch so callers can assert on
/// fan-out behavior. Unknown roles answer like the real backend does: 404.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    inner: RwLock<Inner>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role_privileges(self, role_code: RoleCode, privileges: PrivilegeSet) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.privileges.insert(role_code, privileges);
        }
        self
    }

    pub fn with_role_menus(self, role_code: RoleCode, menus: Vec<MenuEntry>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.menus.insert(role_code, menus);
        }
        self
    }

    /// Make every fetch for `role_code` fail with a 503.
    pub fn with_failing_role(self, role_code: RoleCode) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing.insert(role_code);
        }
        self
    }

    pub fn privilege_calls(&self) -> Vec<RoleCode> {
        self.inner
            .read()
            .map(|i| i.privilege_calls.clone())
            .unwrap_or_default()
    }

    pub fn menu_calls(&self) -> Vec<RoleCode> {
        self.inner
            .read()
            .map(|i| i.menu_calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl PrivilegeSource for InMemoryBackend {
    async fn fetch_role_privileges(&self, role_code: &RoleCode) -> Result<PrivilegeSet, FetchError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| FetchError::Unavailable("lock poisoned".to_string()))?;
        inner.privilege_calls.push(role_code.clone());

        if inner.failing.contains(role_code) {
            return Err(FetchError::Status(503));
        }
        inner
            .privileges
            .get(role_code)
            .cloned()
            .ok_or(FetchError::Status(404))
    }
}

#[async_trait::async_trait]
impl MenuSource for InMemoryBackend {
    async fn fetch_role_menus(&self, role_code: &RoleCode) -> Result<Vec<MenuEntry>, FetchError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| FetchError::Unavailable("lock poisoned".to_string()))?;
        inner.menu_calls.push(role_code.clone());

        if inner.failing.contains(role_code) {
            return Err(FetchError::Status(503));
        }
        inner
            .menus
            .get(role_code)
            .cloned()
            .ok_or(FetchError::Status(404))
    }
}
