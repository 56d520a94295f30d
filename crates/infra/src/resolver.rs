//! Fan-out privilege resolution.
//!
//! One fetch per mapped role code, all in flight at once, joined with
//! `join_all` (never fail-fast): a slow or failing role does not cancel its
//! siblings, it simply contributes nothing. Completion order is irrelevant
//! because the merge is commutative.

use futures::future::join_all;

use stockroom_auth::{
    is_super_admin, map_role_codes, merge_menus, MenuEntry, PrivilegeSet,
};
use stockroom_core::RoleCode;

use crate::backend::{MenuSource, PrivilegeSource};

#[derive(Debug, Clone)]
pub struct PrivilegeResolver<S> {
    source: S,
}

impl<S> PrivilegeResolver<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: PrivilegeSource> PrivilegeResolver<S> {
    /// Resolve a user's role codes into one merged [`PrivilegeSet`].
    ///
    /// Any super-admin role short-circuits to the unrestricted set without a
    /// single backend call.
    pub async fn resolve_for_roles(&self, role_codes: &[RoleCode]) -> PrivilegeSet {
        let mapped = map_role_codes(role_codes);

        if let Some(admin) = mapped.iter().find(|code| is_super_admin(code)) {
            tracing::info!(role_code = %admin, "super-admin role present; granting unrestricted access");
            return PrivilegeSet::unrestricted();
        }

        let fetches = mapped.iter().map(|code| async move {
            match self.source.fetch_role_privileges(code).await {
                Ok(set) => set,
                Err(err) => {
                    tracing::warn!(
                        role_code = %code,
                        error = %err,
                        "privilege fetch failed; role contributes no privileges"
                    );
                    PrivilegeSet::new()
                }
            }
        });

        let per_role = join_all(fetches).await;
        let merged = PrivilegeSet::merge_all(&per_role);

        tracing::debug!(
            roles = mapped.len(),
            resources = merged.resources().count(),
            "resolved privileges"
        );
        merged
    }
}

impl<S: MenuSource> PrivilegeResolver<S> {
    /// Resolve the navigation menus for a user's role codes.
    ///
    /// Same fan-out and failure policy as privileges; there is no super-admin
    /// shortcut because menus are always enumerated per role.
    pub async fn resolve_menus(&self, role_codes: &[RoleCode]) -> Vec<MenuEntry> {
        let mapped = map_role_codes(role_codes);

        let fetches = mapped.iter().map(|code| async move {
            match self.source.fetch_role_menus(code).await {
                Ok(menus) => menus,
                Err(err) => {
                    tracing::warn!(
                        role_code = %code,
                        error = %err,
                        "menu fetch failed; role contributes no menus"
                    );
                    Vec::new()
                }
            }
        });

        merge_menus(join_all(fetches).await)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use tokio::time::Instant;

    use stockroom_auth::{can_perform_action, has_privilege, Action, MenuId, Privilege};
    use stockroom_core::ResourceKey;

    use super::*;
    use crate::backend::{FetchError, InMemoryBackend};

    fn code(s: &str) -> RoleCode {
        RoleCode::new(s).unwrap()
    }

    fn grants(resource: &'static str, privileges: Vec<Privilege>) -> PrivilegeSet {
        privileges
            .into_iter()
            .map(|p| (ResourceKey::new(resource), p))
            .collect()
    }

    #[tokio::test]
    async fn super_admin_short_circuits_without_backend_calls() {
        let backend = Arc::new(InMemoryBackend::new());
        let resolver = PrivilegeResolver::new(backend.clone());

        let set = resolver
            .resolve_for_roles(&[code("students"), code("admin")])
            .await;

        assert!(set.is_unrestricted());
        assert!(has_privilege(&set, "launch the rockets", None));
        assert!(can_perform_action(&set, "Anything", Action::Delete));
        assert!(backend.privilege_calls().is_empty());
    }

    #[tokio::test]
    async fn students_scenario() {
        let backend = InMemoryBackend::new().with_role_privileges(
            code("STUDENTS"),
            grants(
                "brands",
                vec![
                    Privilege::active("Get all brands"),
                    Privilege::inactive("Create a new brand"),
                ],
            ),
        );
        let resolver = PrivilegeResolver::new(backend);

        let set = resolver.resolve_for_roles(&[code("STUDENTS")]).await;

        assert!(can_perform_action(&set, "Brands", Action::Read));
        assert!(!can_perform_action(&set, "Brands", Action::Create));
    }

    #[tokio::test]
    async fn roles_are_merged_with_or_semantics() {
        let backend = InMemoryBackend::new()
            .with_role_privileges(
                code("TEACHERS"),
                grants("brands", vec![Privilege::active("Create a new brand")]),
            )
            .with_role_privileges(
                code("STUDENTS"),
                grants("brands", vec![Privilege::inactive("Create a new brand")]),
            );
        let resolver = PrivilegeResolver::new(backend);

        let forward = resolver
            .resolve_for_roles(&[code("teacher"), code("student")])
            .await;
        let backward = resolver
            .resolve_for_roles(&[code("student"), code("teacher")])
            .await;

        assert_eq!(forward, backward);
        assert!(can_perform_action(&forward, "Brands", Action::Create));
    }

    #[tokio::test]
    async fn failing_role_degrades_without_blocking_others() {
        let backend = Arc::new(
            InMemoryBackend::new()
                .with_role_privileges(
                    code("STAFF"),
                    grants("items", vec![Privilege::active("Get all items")]),
                )
                .with_failing_role(code("TEACHERS")),
        );
        let resolver = PrivilegeResolver::new(backend.clone());

        let set = resolver
            .resolve_for_roles(&[code("teacher"), code("staff"), code("librarian")])
            .await;

        assert!(can_perform_action(&set, "Items", Action::Read));
        assert!(!can_perform_action(&set, "Brands", Action::Read));

        let mut calls: Vec<String> = backend
            .privilege_calls()
            .iter()
            .map(|c| c.to_string())
            .collect();
        calls.sort();
        assert_eq!(calls, ["LIBRARIAN", "STAFF", "TEACHERS"]);
    }

    #[tokio::test]
    async fn duplicate_role_codes_are_fetched_once() {
        let backend = Arc::new(InMemoryBackend::new());
        let resolver = PrivilegeResolver::new(backend.clone());

        resolver
            .resolve_for_roles(&[code("student"), code("STUDENTS"), code("Students")])
            .await;

        assert_eq!(backend.privilege_calls(), vec![code("STUDENTS")]);
    }

    #[tokio::test]
    async fn menus_are_merged_across_roles() {
        let menu = |id, route: &str| MenuEntry {
            id: MenuId::Number(id),
            route: route.to_string(),
            caption: route.to_string(),
        };
        let backend = InMemoryBackend::new()
            .with_role_menus(code("STAFF"), vec![menu(2, "/items"), menu(1, "/brands")])
            .with_role_menus(code("TEACHERS"), vec![menu(1, "/brands")])
            .with_failing_role(code("PRINCIPAL"));
        let resolver = PrivilegeResolver::new(backend);

        let menus = resolver
            .resolve_menus(&[code("staff"), code("teacher"), code("principal")])
            .await;

        let routes: Vec<_> = menus.iter().map(|m| m.route.as_str()).collect();
        assert_eq!(routes, ["/brands", "/items"]);

        let mut calls = resolver.source().menu_calls();
        calls.sort();
        assert_eq!(calls, vec![code("PRINCIPAL"), code("STAFF"), code("TEACHERS")]);
    }

    /// Answers after a per-role delay and records which fetches finished.
    struct SlowSource {
        delays: HashMap<RoleCode, Duration>,
        finished: Mutex<Vec<RoleCode>>,
    }

    impl SlowSource {
        fn new(delays: &[(&str, u64)]) -> Self {
            Self {
                delays: delays
                    .iter()
                    .map(|(role, secs)| (code(role), Duration::from_secs(*secs)))
                    .collect(),
                finished: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl PrivilegeSource for SlowSource {
        async fn fetch_role_privileges(&self, role_code: &RoleCode) -> Result<PrivilegeSet, FetchError> {
            let delay = self.delays.get(role_code).copied().unwrap_or_default();
            tokio::time::sleep(delay).await;
            self.finished.lock().unwrap().push(role_code.clone());

            let resource = role_code.as_str().to_lowercase();
            Ok([(ResourceKey::new(resource), Privilege::active(format!("Get all {}", role_code)))]
                .into_iter()
                .collect())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn role_fetches_run_concurrently() {
        let resolver = PrivilegeResolver::new(SlowSource::new(&[
            ("STAFF", 10),
            ("TEACHERS", 10),
            ("STUDENTS", 10),
        ]));

        let started = Instant::now();
        let set = resolver
            .resolve_for_roles(&[code("staff"), code("teacher"), code("student")])
            .await;
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_secs(10), "finished early: {elapsed:?}");
        assert!(elapsed < Duration::from_secs(11), "fetches ran in sequence: {elapsed:?}");
        assert_eq!(set.resources().count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_role_neither_cancels_nor_drops_siblings() {
        let resolver = PrivilegeResolver::new(SlowSource::new(&[
            ("PRINCIPAL", 300),
            ("STAFF", 1),
            ("STUDENTS", 2),
        ]));

        let started = Instant::now();
        let set = resolver
            .resolve_for_roles(&[code("principal"), code("staff"), code("student")])
            .await;

        assert!(started.elapsed() >= Duration::from_secs(300));
        assert!(started.elapsed() < Duration::from_secs(301));
        assert_eq!(
            *resolver.source().finished.lock().unwrap(),
            vec![code("STAFF"), code("STUDENTS"), code("PRINCIPAL")]
        );
        assert!(can_perform_action(&set, "staff", Action::Read));
        assert!(can_perform_action(&set, "students", Action::Read));
        assert!(can_perform_action(&set, "principal", Action::Read));
    }
}
