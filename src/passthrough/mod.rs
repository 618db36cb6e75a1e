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

//! # Pass-through authentication
//!
//! A password is first verified against the encoded value stored with the
//! principal. When that fails, the back-ends eligible by the account policies
//! of the principal resources and realms are tried in order until one of
//! them accepts the password.
//!
//! Every attempt that reaches the verification updates the login
//! bookkeeping of the principal with a single write.
use chrono::Utc;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, warn};

pub mod connector;
pub mod policy;

pub use connector::{BackendConnector, ConnectorError, verify_on_backends};
#[cfg(test)]
pub use connector::MockBackendConnector;
pub use policy::{intersect, passthrough_backends};

use crate::auth::AuthenticationError;
use crate::cipher::{CipherService, verify_blocking};
use crate::domain::{AuthContext, DomainSettings};
use crate::identity::{Principal, find_principal};
use crate::provider::Provider;

/// Outcome of a pass-through authentication.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PassthroughOutcome {
    /// The principal the name resolved to, as persisted after the attempt.
    pub principal: Option<Principal>,

    /// The principal as found, before the bookkeeping of the attempt.
    pub before: Option<Principal>,

    pub authenticated: bool,
}

/// Check the account status gates.
///
/// A principal without a status is not in any allow-list.
pub fn check_status(
    principal: &Principal,
    settings: &DomainSettings,
) -> Result<(), AuthenticationError> {
    if principal.suspended {
        return Err(AuthenticationError::Disabled(principal.username.clone()));
    }
    match &principal.status {
        Some(status) if settings.statuses.contains(status) => Ok(()),
        _ => Err(AuthenticationError::Disabled(principal.username.clone())),
    }
}

pub struct PassthroughAuthenticator {
    cipher: Arc<CipherService>,
}

impl PassthroughAuthenticator {
    pub fn new(cipher: Arc<CipherService>) -> Self {
        Self { cipher }
    }

    async fn verify_internal(&self, principal: &Principal, credential: &SecretString) -> bool {
        let (Some(encoded), Some(algorithm)) = (&principal.password, principal.cipher_algorithm)
        else {
            debug!("{} has no internal password", principal.username);
            return false;
        };
        verify_blocking(
            self.cipher.clone(),
            credential.clone(),
            algorithm,
            encoded.clone(),
        )
        .await
    }

    /// Authenticate the principal the name resolves to.
    ///
    /// Not finding a principal is a regular outcome. A suspended principal or
    /// one with a status not allowed by the domain fails with
    /// [`AuthenticationError::Disabled`] before any verification, its
    /// bookkeeping is left untouched.
    #[tracing::instrument(level = "info", skip(self, ctx, provider, credential))]
    pub async fn authenticate(
        &self,
        ctx: &AuthContext,
        provider: &Provider,
        name: &str,
        credential: &SecretString,
    ) -> Result<PassthroughOutcome, AuthenticationError> {
        let settings = provider.get_domain_settings().settings(ctx).await?;
        let Some(mut principal) = find_principal(
            provider.get_principal_store(),
            ctx,
            &settings.attributes,
            name,
        )
        .await?
        else {
            debug!("No principal found for {}", name);
            return Ok(PassthroughOutcome::default());
        };
        check_status(&principal, &settings)?;
        let before = principal.clone();

        let mut authenticated = self.verify_internal(&principal, credential).await;
        if !authenticated {
            let backends =
                match passthrough_backends(ctx, provider.get_realm_store(), &principal).await {
                    Ok(backends) => backends,
                    Err(err) => {
                        warn!(
                            "Could not select the pass-through back-ends of {}: {}",
                            principal.username, err
                        );
                        Vec::new()
                    }
                };
            if !backends.is_empty() {
                authenticated = verify_on_backends(
                    provider.get_connector(),
                    ctx,
                    &backends,
                    &principal,
                    credential,
                )
                .await;
            }
        }

        let modified = if authenticated {
            let mut modified = false;
            if principal.failed_logins != 0 {
                principal.failed_logins = 0;
                modified = true;
            }
            if settings.record_last_login {
                principal.last_login_date = Some(Utc::now());
                modified = true;
            }
            modified
        } else {
            principal.failed_logins = principal.failed_logins.saturating_add(1);
            true
        };
        if modified {
            provider
                .get_principal_store()
                .save(ctx, &principal)
                .await?;
        }

        Ok(PassthroughOutcome {
            principal: Some(principal),
            before: Some(before),
            authenticated,
        })
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use tracing_test::traced_test;

    use super::*;
    use crate::cipher::CipherAlgorithm;
    use crate::config::Config;
    use crate::domain::MockDomainSettingsApi;
    use crate::error::StoreError;
    use crate::identity::MockPrincipalStore;
    use crate::realm::{AccountPolicy, ExternalBackend, MockRealmStore, Realm};

    fn cipher() -> Arc<CipherService> {
        let builder = config::Config::builder()
            .set_override("security.secret_key", "0123456789abcdef")
            .unwrap();
        Arc::new(CipherService::new(&Config::try_from(builder).unwrap()))
    }

    fn settings(record_last_login: bool) -> MockDomainSettingsApi {
        let mut settings = MockDomainSettingsApi::default();
        settings.expect_settings().returning(move |_| {
            Ok(DomainSettings::builder()
                .attributes(vec!["username".to_string()])
                .statuses(vec!["active".to_string()])
                .record_last_login(record_last_login)
                .build()
                .unwrap())
        });
        settings
    }

    fn principal(cipher: &CipherService, password: &str, failed_logins: u32) -> Principal {
        Principal::builder()
            .key("u1")
            .username("alice")
            .password(cipher.encode(password, CipherAlgorithm::Sha256).unwrap())
            .cipher_algorithm(CipherAlgorithm::Sha256)
            .status("active")
            .failed_logins(failed_logins)
            .realm("/org")
            .build()
            .unwrap()
    }

    fn principal_store(found: Principal) -> MockPrincipalStore {
        let mut store = MockPrincipalStore::default();
        store
            .expect_find_by_username()
            .with(mockall::predicate::always(), eq("alice"))
            .returning(move |_, _| Ok(Some(found.clone())));
        store
    }

    fn realm_store(passthrough: &'static [&'static str]) -> MockRealmStore {
        let mut store = MockRealmStore::default();
        store.expect_find_ancestors().returning(move |_, _| {
            Ok(vec![
                Realm::builder().key("root").full_path("/").build().unwrap(),
                Realm::builder()
                    .key("org")
                    .full_path("/org")
                    .account_policy(
                        AccountPolicy::builder()
                            .key("ap")
                            .passthrough_resources(
                                passthrough.iter().map(|k| k.to_string()).collect::<Vec<_>>(),
                            )
                            .build()
                            .unwrap(),
                    )
                    .build()
                    .unwrap(),
            ])
        });
        store
            .expect_find_backend()
            .returning(|_, key| Ok(Some(ExternalBackend::builder().key(key).build().unwrap())));
        store
    }

    #[tokio::test]
    #[traced_test]
    async fn test_internal_success_resets_counter() {
        let cipher = cipher();
        let mut store = principal_store(principal(&cipher, "Sup3rS3cret!", 3u32));
        store
            .expect_save()
            .withf(|_, p: &Principal| p.failed_logins == 0 && p.last_login_date.is_some())
            .times(1)
            .returning(|_, _| Ok(()));
        let mut connector = MockBackendConnector::default();
        connector.expect_authenticate().never();
        let provider = Provider::mocked_builder()
            .domain_settings(Arc::new(settings(true)))
            .principal(Arc::new(store))
            .connector(Arc::new(connector))
            .build()
            .unwrap();

        let outcome = PassthroughAuthenticator::new(cipher)
            .authenticate(
                &AuthContext::new("Master"),
                &provider,
                "alice",
                &SecretString::from("Sup3rS3cret!"),
            )
            .await
            .unwrap();
        assert!(outcome.authenticated);
        assert_eq!(0, outcome.principal.unwrap().failed_logins);
        assert!(!logs_contain("Sup3rS3cret!"));
    }

    #[tokio::test]
    async fn test_no_write_when_unchanged() {
        let cipher = cipher();
        let mut store = principal_store(principal(&cipher, "password", 0u32));
        store.expect_save().never();
        let provider = Provider::mocked_builder()
            .domain_settings(Arc::new(settings(false)))
            .principal(Arc::new(store))
            .build()
            .unwrap();
        let outcome = PassthroughAuthenticator::new(cipher)
            .authenticate(
                &AuthContext::new("Master"),
                &provider,
                "alice",
                &SecretString::from("password"),
            )
            .await
            .unwrap();
        assert!(outcome.authenticated);
        assert!(outcome.principal.unwrap().last_login_date.is_none());
    }

    #[tokio::test]
    async fn test_backend_success_after_internal_mismatch() {
        let cipher = cipher();
        let mut store = principal_store(principal(&cipher, "password", 1u32));
        store
            .expect_save()
            .withf(|_, p: &Principal| p.failed_logins == 0)
            .times(1)
            .returning(|_, _| Ok(()));
        let mut connector = MockBackendConnector::default();
        connector
            .expect_object_key()
            .returning(|_, _, p| Ok(Some(format!("uid={}", p.username))));
        connector
            .expect_authenticate()
            .withf(|_, b, _, _| b.key == "ldap1")
            .times(1)
            .returning(|_, _, _, _| Ok(None));
        connector
            .expect_authenticate()
            .withf(|_, b, _, _| b.key == "ldap2")
            .times(1)
            .returning(|_, _, key, _| Ok(Some(key.to_string())));
        connector
            .expect_authenticate()
            .withf(|_, b, _, _| b.key == "ldap3")
            .never();
        let provider = Provider::mocked_builder()
            .domain_settings(Arc::new(settings(true)))
            .principal(Arc::new(store))
            .realm(Arc::new(realm_store(&["ldap1", "ldap2", "ldap3"])))
            .connector(Arc::new(connector))
            .build()
            .unwrap();

        let outcome = PassthroughAuthenticator::new(cipher)
            .authenticate(
                &AuthContext::new("Master"),
                &provider,
                "alice",
                &SecretString::from("external-password"),
            )
            .await
            .unwrap();
        assert!(outcome.authenticated);
    }

    #[tokio::test]
    async fn test_failure_increments_counter() {
        let cipher = cipher();
        let mut store = principal_store(principal(&cipher, "password", 2u32));
        store
            .expect_save()
            .withf(|_, p: &Principal| p.failed_logins == 3 && p.last_login_date.is_none())
            .times(1)
            .returning(|_, _| Ok(()));
        let mut connector = MockBackendConnector::default();
        connector.expect_object_key().never();
        let provider = Provider::mocked_builder()
            .domain_settings(Arc::new(settings(true)))
            .principal(Arc::new(store))
            .realm(Arc::new(realm_store(&[])))
            .connector(Arc::new(connector))
            .build()
            .unwrap();

        let outcome = PassthroughAuthenticator::new(cipher)
            .authenticate(
                &AuthContext::new("Master"),
                &provider,
                "alice",
                &SecretString::from("wrong"),
            )
            .await
            .unwrap();
        assert!(!outcome.authenticated);
        assert_eq!(3, outcome.principal.unwrap().failed_logins);
        assert_eq!(2, outcome.before.unwrap().failed_logins);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_backend_selection_failure_still_counts() {
        let cipher = cipher();
        let mut store = principal_store(principal(&cipher, "password", 0u32));
        store
            .expect_save()
            .withf(|_, p: &Principal| p.failed_logins == 1)
            .times(1)
            .returning(|_, _| Ok(()));
        let mut realms = MockRealmStore::default();
        realms
            .expect_find_ancestors()
            .returning(|_, _| Err(StoreError::Unavailable("down".into())));
        let provider = Provider::mocked_builder()
            .domain_settings(Arc::new(settings(true)))
            .principal(Arc::new(store))
            .realm(Arc::new(realms))
            .build()
            .unwrap();

        let outcome = PassthroughAuthenticator::new(cipher)
            .authenticate(
                &AuthContext::new("Master"),
                &provider,
                "alice",
                &SecretString::from("wrong"),
            )
            .await
            .unwrap();
        assert!(!outcome.authenticated);
        assert!(logs_contain("Could not select the pass-through back-ends of alice"));
    }

    #[tokio::test]
    async fn test_suspended_is_disabled() {
        let cipher = cipher();
        let mut bob = principal(&cipher, "password", 0u32);
        bob.username = "bob".into();
        bob.suspended = true;
        let mut store = MockPrincipalStore::default();
        store
            .expect_find_by_username()
            .returning(move |_, _| Ok(Some(bob.clone())));
        store.expect_save().never();
        let provider = Provider::mocked_builder()
            .domain_settings(Arc::new(settings(true)))
            .principal(Arc::new(store))
            .build()
            .unwrap();

        for password in ["password", "wrong"] {
            match PassthroughAuthenticator::new(cipher.clone())
                .authenticate(
                    &AuthContext::new("Master"),
                    &provider,
                    "bob",
                    &SecretString::from(password),
                )
                .await
            {
                Err(AuthenticationError::Disabled(user)) => assert_eq!("bob", user),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_status_not_allowed() {
        let cipher = cipher();
        let mut created = principal(&cipher, "password", 0u32);
        created.status = Some("created".into());
        let mut store = principal_store(created);
        store.expect_save().never();
        let provider = Provider::mocked_builder()
            .domain_settings(Arc::new(settings(true)))
            .principal(Arc::new(store))
            .build()
            .unwrap();
        assert!(matches!(
            PassthroughAuthenticator::new(cipher)
                .authenticate(
                    &AuthContext::new("Master"),
                    &provider,
                    "alice",
                    &SecretString::from("password"),
                )
                .await,
            Err(AuthenticationError::Disabled(_))
        ));
    }

    #[tokio::test]
    async fn test_not_found() {
        let mut store = MockPrincipalStore::default();
        store.expect_find_by_username().returning(|_, _| Ok(None));
        store.expect_save().never();
        let provider = Provider::mocked_builder()
            .domain_settings(Arc::new(settings(true)))
            .principal(Arc::new(store))
            .build()
            .unwrap();
        let outcome = PassthroughAuthenticator::new(cipher())
            .authenticate(
                &AuthContext::new("Master"),
                &provider,
                "nobody",
                &SecretString::from("password"),
            )
            .await
            .unwrap();
        assert_eq!(PassthroughOutcome::default(), outcome);
    }
}
