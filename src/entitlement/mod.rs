// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

//! # Entitlement resolver
//!
//! Computes the authorities (entitlement plus realm scope) of a principal
//! from the roles assigned to it and the groups it owns.
//!
//! - A principal that must change the password only gets
//!   `MUST_CHANGE_PASSWORD`, without any realm restriction.
//!
//! - Every entitlement of a role is granted on the role static realms. The
//!   role dynamic realms are added, except for the entitlements creating or
//!   deleting objects (`*_CREATE`, `*_DELETE`): dynamic membership is derived
//!   from attributes and must not be usable to create or delete objects.
//!
//! - Every entitlement of the `GROUP_OWNER` role is granted to the owner of a
//!   group on the synthetic realm `{group realm}@{group key}`.
//!
//! - The realm paths of every entitlement are normalized: a realm whose
//!   ancestor is also granted is dropped.
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

pub mod backend;
pub mod types;

pub use backend::RoleStore;
#[cfg(test)]
pub use backend::MockRoleStore;
pub use types::*;

use crate::config::Config;
use crate::domain::AuthContext;
use crate::error::StoreError;
use crate::identity::Principal;
use crate::realm::path::{ROOT_REALM, group_owner_realm, normalize};

/// Whether the entitlement creates or deletes objects.
fn creates_or_deletes(entitlement: &str) -> bool {
    entitlement.ends_with("_CREATE") || entitlement.ends_with("_DELETE")
}

#[derive(Clone, Debug)]
pub struct EntitlementResolver {
    entitlements: BTreeSet<String>,
}

impl EntitlementResolver {
    pub fn new(config: &Config) -> Self {
        Self {
            entitlements: BUILTIN_ENTITLEMENTS
                .iter()
                .map(|e| e.to_string())
                .chain(config.entitlement.extra.iter().cloned())
                .collect(),
        }
    }

    /// All known entitlements.
    pub fn entitlements(&self) -> &BTreeSet<String> {
        &self.entitlements
    }

    /// Every known entitlement on the root realm.
    pub fn admin_authorities(&self) -> AuthoritySet {
        self.entitlements
            .iter()
            .map(|entitlement| Authority::new(entitlement.as_str(), [ROOT_REALM]))
            .collect()
    }

    pub fn anonymous_authorities() -> AuthoritySet {
        AuthoritySet::from([Authority::unscoped(ANONYMOUS)])
    }

    pub fn must_change_password_authorities() -> AuthoritySet {
        AuthoritySet::from([Authority::unscoped(MUST_CHANGE_PASSWORD)])
    }

    /// Entitlements granted by the roles, with the realms they apply to.
    fn grant(roles: &[Role]) -> BTreeMap<&str, Vec<String>> {
        let mut granted: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for role in roles.iter().filter(|role| role.key != GROUP_OWNER_ROLE) {
            for entitlement in &role.entitlements {
                let realms = granted.entry(entitlement.as_str()).or_default();
                realms.extend(role.realms.iter().cloned());
                if !creates_or_deletes(entitlement) {
                    realms.extend(role.dynamic_realms.iter().cloned());
                }
            }
        }
        granted
    }

    fn authorities(granted: BTreeMap<&str, Vec<String>>) -> AuthoritySet {
        granted
            .into_iter()
            .map(|(entitlement, realms)| {
                let (mut paths, others) = normalize(realms);
                paths.extend(others);
                Authority {
                    entitlement: entitlement.to_string(),
                    realms: paths,
                }
            })
            .collect()
    }

    /// Compute the authorities out of the already fetched assignments.
    ///
    /// `group_owner_role` is the definition of the `GROUP_OWNER` role, it is
    /// only consulted when `owned_groups` is not empty. A `GROUP_OWNER` role
    /// present in `roles` is ignored.
    pub fn resolve(
        principal: &Principal,
        roles: &[Role],
        owned_groups: &[Group],
        group_owner_role: Option<&Role>,
    ) -> AuthoritySet {
        if principal.must_change_password {
            return Self::must_change_password_authorities();
        }

        let mut granted = Self::grant(roles);
        if !owned_groups.is_empty() {
            match group_owner_role {
                Some(owner_role) => {
                    for entitlement in &owner_role.entitlements {
                        granted.entry(entitlement.as_str()).or_default().extend(
                            owned_groups
                                .iter()
                                .map(|group| group_owner_realm(&group.realm, &group.key)),
                        );
                    }
                }
                None => {
                    warn!(
                        "Role {} not found, no group owner authorities granted to {}",
                        GROUP_OWNER_ROLE, principal.username
                    );
                }
            }
        }
        Self::authorities(granted)
    }

    /// Compute the authorities granted by the roles of a delegation.
    ///
    /// The realm rules are the ones of [`Self::resolve`]; group ownerships
    /// are never delegated.
    pub fn resolve_roles(roles: &[Role]) -> AuthoritySet {
        Self::authorities(Self::grant(roles))
    }

    /// Fetch the assignments of the principal and compute its authorities.
    #[tracing::instrument(level = "debug", skip(self, ctx, store, principal), fields(principal = %principal.username))]
    pub async fn authorities_for(
        &self,
        ctx: &AuthContext,
        store: &dyn RoleStore,
        principal: &Principal,
    ) -> Result<AuthoritySet, StoreError> {
        if principal.must_change_password {
            return Ok(Self::must_change_password_authorities());
        }
        let roles = store.find_roles(ctx, &principal.key).await?;
        let owned_groups = store.find_owned_groups(ctx, &principal.key).await?;
        let group_owner_role = if owned_groups.is_empty() {
            None
        } else {
            store.find_role(ctx, GROUP_OWNER_ROLE).await?
        };
        Ok(Self::resolve(
            principal,
            &roles,
            &owned_groups,
            group_owner_role.as_ref(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use tracing_test::traced_test;

    use super::*;

    fn alice() -> Principal {
        Principal::builder()
            .key("a1")
            .username("alice")
            .realm("/org")
            .build()
            .unwrap()
    }

    fn role(key: &str, entitlements: &[&str], realms: &[&str], dynamic: &[&str]) -> Role {
        Role::builder()
            .key(key)
            .entitlements(entitlements.iter().map(|s| s.to_string()).collect::<Vec<_>>())
            .realms(realms.iter().map(|s| s.to_string()).collect::<Vec<_>>())
            .dynamic_realms(dynamic.iter().map(|s| s.to_string()).collect::<Vec<_>>())
            .build()
            .unwrap()
    }

    #[test]
    fn test_static_and_dynamic_realms() {
        let roles = [role("R1", &["USER_READ"], &["/org"], &["/dyn"])];
        assert_eq!(
            AuthoritySet::from([Authority::new("USER_READ", ["/org", "/dyn"])]),
            EntitlementResolver::resolve(&alice(), &roles, &[], None)
        );
    }

    #[test]
    fn test_create_delete_ignore_dynamic_realms() {
        let roles = [role(
            "R1",
            &["USER_CREATE", "USER_DELETE", "USER_READ", "USER_UPDATE"],
            &["/org"],
            &["/dyn"],
        )];
        let authorities = EntitlementResolver::resolve(&alice(), &roles, &[], None);
        assert_eq!(
            AuthoritySet::from([
                Authority::new("USER_CREATE", ["/org"]),
                Authority::new("USER_DELETE", ["/org"]),
                Authority::new("USER_READ", ["/org", "/dyn"]),
                Authority::new("USER_UPDATE", ["/org", "/dyn"]),
            ]),
            authorities
        );
    }

    #[test]
    fn test_ancestor_absorption_across_roles() {
        let roles = [
            role("R1", &["USER_READ"], &["/a/b"], &[]),
            role("R2", &["USER_READ", "GROUP_READ"], &["/a"], &[]),
        ];
        assert_eq!(
            AuthoritySet::from([
                Authority::new("GROUP_READ", ["/a"]),
                Authority::new("USER_READ", ["/a"]),
            ]),
            EntitlementResolver::resolve(&alice(), &roles, &[], None)
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let roles = [
            role("R2", &["USER_READ"], &["/a", "/c"], &["/x/y"]),
            role("R1", &["USER_READ"], &["/a/b"], &["/x"]),
        ];
        let first = EntitlementResolver::resolve(&alice(), &roles, &[], None);
        let reversed: Vec<_> = roles.iter().rev().cloned().collect();
        assert_eq!(
            first,
            EntitlementResolver::resolve(&alice(), &reversed, &[], None)
        );
        assert_eq!(
            AuthoritySet::from([Authority::new("USER_READ", ["/a", "/c", "/x"])]),
            first
        );
    }

    #[test]
    fn test_resolve_roles() {
        let roles = [
            role("R1", &["USER_CREATE", "USER_READ"], &["/org/a"], &["/dyn"]),
            role("R2", &["USER_READ"], &["/org"], &[]),
            role(GROUP_OWNER_ROLE, &["GROUP_DELETE"], &["/"], &[]),
        ];
        assert_eq!(
            AuthoritySet::from([
                Authority::new("USER_CREATE", ["/org/a"]),
                Authority::new("USER_READ", ["/org", "/dyn"]),
            ]),
            EntitlementResolver::resolve_roles(&roles)
        );
        assert!(EntitlementResolver::resolve_roles(&[]).is_empty());
    }

    #[test]
    fn test_must_change_password_short_circuit() {
        let mut principal = alice();
        principal.must_change_password = true;
        let roles = [role("R1", &["USER_READ"], &["/org"], &[])];
        assert_eq!(
            AuthoritySet::from([Authority::unscoped(MUST_CHANGE_PASSWORD)]),
            EntitlementResolver::resolve(&principal, &roles, &[], None)
        );
    }

    #[test]
    fn test_group_owner() {
        let owner_role = role(GROUP_OWNER_ROLE, &["GROUP_READ", "GROUP_UPDATE"], &[], &[]);
        let groups = [
            Group::builder().key("g1").realm("/org").build().unwrap(),
            Group::builder().key("g2").realm("/org/sub").build().unwrap(),
        ];
        let roles = [
            role("R1", &["GROUP_READ"], &["/"], &[]),
            // assigned directly, must not grant anything on its own
            role(GROUP_OWNER_ROLE, &["GROUP_DELETE"], &["/"], &[]),
        ];
        assert_eq!(
            AuthoritySet::from([
                Authority::new("GROUP_READ", ["/", "/org/sub@g2", "/org@g1"]),
                Authority::new("GROUP_UPDATE", ["/org/sub@g2", "/org@g1"]),
            ]),
            EntitlementResolver::resolve(&alice(), &roles, &groups, Some(&owner_role))
        );
    }

    #[test]
    #[traced_test]
    fn test_group_owner_role_missing() {
        let groups = [Group::builder().key("g1").realm("/org").build().unwrap()];
        assert!(EntitlementResolver::resolve(&alice(), &[], &groups, None).is_empty());
        assert!(logs_contain("Role GROUP_OWNER not found"));
    }

    #[test]
    fn test_admin_and_anonymous() {
        let builder = config::Config::builder()
            .set_override("entitlement.extra", "REPORT_RUN")
            .unwrap();
        let sot = EntitlementResolver::new(&Config::try_from(builder).unwrap());
        let admin = sot.admin_authorities();
        assert_eq!(BUILTIN_ENTITLEMENTS.len() + 1, admin.len());
        assert!(admin.contains(&Authority::new("REPORT_RUN", ["/"])));
        assert!(admin.iter().all(|a| a.realms == BTreeSet::from(["/".to_string()])));
        assert_eq!(
            AuthoritySet::from([Authority::unscoped(ANONYMOUS)]),
            EntitlementResolver::anonymous_authorities()
        );
    }

    #[tokio::test]
    async fn test_authorities_for() {
        let mut store = MockRoleStore::default();
        store
            .expect_find_roles()
            .with(mockall::predicate::always(), eq("a1"))
            .returning(|_, _| Ok(vec![role("R1", &["USER_READ"], &["/org"], &["/dyn"])]));
        store
            .expect_find_owned_groups()
            .returning(|_, _| Ok(vec![Group::builder().key("g1").realm("/").build().unwrap()]));
        store
            .expect_find_role()
            .with(mockall::predicate::always(), eq(GROUP_OWNER_ROLE))
            .returning(|_, _| Ok(Some(role(GROUP_OWNER_ROLE, &["GROUP_READ"], &[], &[]))));
        let sot = EntitlementResolver::new(&Config::default());
        let authorities = sot
            .authorities_for(&AuthContext::new("Master"), &store, &alice())
            .await
            .unwrap();
        assert_eq!(
            AuthoritySet::from([
                Authority::new("GROUP_READ", ["/@g1"]),
                Authority::new("USER_READ", ["/org", "/dyn"]),
            ]),
            authorities
        );
    }

    #[tokio::test]
    async fn test_authorities_for_skips_owner_lookup() {
        let mut store = MockRoleStore::default();
        store.expect_find_roles().returning(|_, _| Ok(Vec::new()));
        store.expect_find_owned_groups().returning(|_, _| Ok(Vec::new()));
        store.expect_find_role().never();
        let sot = EntitlementResolver::new(&Config::default());
        assert!(
            sot.authorities_for(&AuthContext::new("Master"), &store, &alice())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_authorities_for_store_failure() {
        let mut store = MockRoleStore::default();
        store
            .expect_find_roles()
            .returning(|_, _| Err(StoreError::Unavailable("down".into())));
        let sot = EntitlementResolver::new(&Config::default());
        assert!(
            sot.authorities_for(&AuthContext::new("Master"), &store, &alice())
                .await
                .is_err()
        );
    }
}
