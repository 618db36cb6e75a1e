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

//! In-memory collaborators of the authentication core.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use secrecy::{ExposeSecret, SecretString};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

use idm_auth::audit::{AuditError, AuditEvent, AuditSink};
use idm_auth::config::Config;
use idm_auth::delegation::{Delegation, DelegationStore};
use idm_auth::domain::{AuthContext, ConfigDomainSettings};
use idm_auth::entitlement::{Group, Role, RoleStore};
use idm_auth::error::StoreError;
use idm_auth::identity::{Principal, PrincipalStore};
use idm_auth::passthrough::{BackendConnector, ConnectorError};
use idm_auth::provider::Provider;
use idm_auth::realm::{ExternalBackend, Realm, RealmStore};
use idm_auth::realm::path::ROOT_REALM;
use idm_auth::token::{AccessToken, TokenStore};

pub const JWS_KEY: &str = "ZW7pRmwW2THANeQFVMkpzR35DNHrOsy5";
pub const SECRET_KEY: &str = "1abcdefghilmnopqrstuvz2!";

/// Load the configuration from an INI file the way a deployment does.
pub fn config() -> Config {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[security]
admin_user = admin
# SHA1 of "password"
admin_password = 5BAA61E4C9B93F3F0682250B6CF8331B7EE68FD8
admin_password_algorithm = SHA1
anonymous_user = anonymous
anonymous_key = anonymousKey
jwt_issuer = idm-auth
jws_key = {JWS_KEY}
secret_key = {SECRET_KEY}

[digester]
salt_iterations = 3
salt_size_bytes = 8

[authentication]
attributes = username,email
statuses = active
record_last_login = true
"#
    )
    .unwrap();
    Config::new(file.path().to_path_buf()).unwrap()
}

pub fn ctx() -> AuthContext {
    AuthContext::new("Master")
}

#[derive(Default)]
pub struct MemoryPrincipals {
    principals: DashMap<String, Principal>,
    saves: AtomicUsize,
}

impl MemoryPrincipals {
    pub fn insert(&self, principal: Principal) {
        self.principals.insert(principal.key.clone(), principal);
    }

    pub fn get(&self, username: &str) -> Option<Principal> {
        self.principals
            .iter()
            .find(|p| p.username == username)
            .map(|p| p.value().clone())
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PrincipalStore for MemoryPrincipals {
    async fn find_by_key(
        &self,
        _ctx: &AuthContext,
        key: &str,
    ) -> Result<Option<Principal>, StoreError> {
        Ok(self.principals.get(key).map(|p| p.value().clone()))
    }

    async fn find_by_username(
        &self,
        _ctx: &AuthContext,
        username: &str,
    ) -> Result<Option<Principal>, StoreError> {
        Ok(self.get(username))
    }

    async fn search_by_attribute(
        &self,
        _ctx: &AuthContext,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Principal>, StoreError> {
        Ok(self
            .principals
            .iter()
            .filter(|p| p.attributes.get(attribute).is_some_and(|v| v == value))
            .map(|p| p.value().clone())
            .collect())
    }

    async fn save(&self, _ctx: &AuthContext, principal: &Principal) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.principals
            .insert(principal.key.clone(), principal.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryRealms {
    realms: DashMap<String, Realm>,
    backends: DashMap<String, ExternalBackend>,
}

impl MemoryRealms {
    pub fn insert_realm(&self, realm: Realm) {
        self.realms.insert(realm.full_path.clone(), realm);
    }

    pub fn insert_backend(&self, backend: ExternalBackend) {
        self.backends.insert(backend.key.clone(), backend);
    }
}

#[async_trait]
impl RealmStore for MemoryRealms {
    async fn find_ancestors(
        &self,
        _ctx: &AuthContext,
        full_path: &str,
    ) -> Result<Vec<Realm>, StoreError> {
        let mut paths = vec![ROOT_REALM.to_string()];
        let mut current = String::new();
        for segment in full_path.split('/').filter(|s| !s.is_empty()) {
            current.push('/');
            current.push_str(segment);
            paths.push(current.clone());
        }
        Ok(paths
            .iter()
            .filter_map(|path| self.realms.get(path).map(|r| r.value().clone()))
            .collect())
    }

    async fn find_backend(
        &self,
        _ctx: &AuthContext,
        key: &str,
    ) -> Result<Option<ExternalBackend>, StoreError> {
        Ok(self.backends.get(key).map(|b| b.value().clone()))
    }
}

#[derive(Default)]
pub struct MemoryRoles {
    roles: DashMap<String, Role>,
    memberships: DashMap<String, Vec<String>>,
    ownerships: DashMap<String, Vec<Group>>,
}

impl MemoryRoles {
    pub fn insert_role(&self, role: Role) {
        self.roles.insert(role.key.clone(), role);
    }

    pub fn assign(&self, principal_key: &str, role_key: &str) {
        self.memberships
            .entry(principal_key.to_string())
            .or_default()
            .push(role_key.to_string());
    }

    pub fn own(&self, principal_key: &str, group: Group) {
        self.ownerships
            .entry(principal_key.to_string())
            .or_default()
            .push(group);
    }
}

#[async_trait]
impl RoleStore for MemoryRoles {
    async fn find_roles(
        &self,
        _ctx: &AuthContext,
        principal_key: &str,
    ) -> Result<Vec<Role>, StoreError> {
        Ok(self
            .memberships
            .get(principal_key)
            .map(|keys| {
                keys.iter()
                    .filter_map(|key| self.roles.get(key).map(|r| r.value().clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_owned_groups(
        &self,
        _ctx: &AuthContext,
        principal_key: &str,
    ) -> Result<Vec<Group>, StoreError> {
        Ok(self
            .ownerships
            .get(principal_key)
            .map(|groups| groups.value().clone())
            .unwrap_or_default())
    }

    async fn find_role(&self, _ctx: &AuthContext, key: &str) -> Result<Option<Role>, StoreError> {
        Ok(self.roles.get(key).map(|r| r.value().clone()))
    }
}

#[derive(Default)]
pub struct MemoryTokens {
    tokens: DashMap<String, AccessToken>,
}

impl MemoryTokens {
    pub fn insert(&self, token: AccessToken) {
        self.tokens.insert(token.key.clone(), token);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.tokens.contains_key(key)
    }
}

#[async_trait]
impl TokenStore for MemoryTokens {
    async fn find(
        &self,
        _ctx: &AuthContext,
        key: &str,
    ) -> Result<Option<AccessToken>, StoreError> {
        Ok(self.tokens.get(key).map(|t| t.value().clone()))
    }

    async fn delete(&self, _ctx: &AuthContext, key: &str) -> Result<(), StoreError> {
        self.tokens.remove(key);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryDelegations {
    delegations: DashMap<String, Delegation>,
}

impl MemoryDelegations {
    pub fn insert(&self, delegation: Delegation) {
        self.delegations.insert(delegation.key.clone(), delegation);
    }
}

#[async_trait]
impl DelegationStore for MemoryDelegations {
    async fn find(
        &self,
        _ctx: &AuthContext,
        key: &str,
    ) -> Result<Option<Delegation>, StoreError> {
        Ok(self.delegations.get(key).map(|d| d.value().clone()))
    }

    async fn find_valid_for(
        &self,
        _ctx: &AuthContext,
        delegating: &str,
        delegated: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Delegation>, StoreError> {
        Ok(self
            .delegations
            .iter()
            .find(|d| d.delegating == delegating && d.delegated == delegated && d.is_valid_at(at))
            .map(|d| d.value().clone()))
    }
}

/// Back-ends accepting a fixed password per object, or failing when down.
#[derive(Default)]
pub struct FakeConnector {
    passwords: DashMap<(String, String), String>,
    down: DashMap<String, ()>,
    calls: Mutex<Vec<String>>,
}

impl FakeConnector {
    pub fn accept(&self, backend: &str, username: &str, password: &str) {
        self.passwords.insert(
            (backend.to_string(), format!("uid={username}")),
            password.to_string(),
        );
    }

    pub fn set_down(&self, backend: &str) {
        self.down.insert(backend.to_string(), ());
    }

    /// Back-ends `authenticate` was invoked on, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackendConnector for FakeConnector {
    async fn object_key(
        &self,
        _ctx: &AuthContext,
        _backend: &ExternalBackend,
        principal: &Principal,
    ) -> Result<Option<String>, ConnectorError> {
        Ok(Some(format!("uid={}", principal.username)))
    }

    async fn authenticate(
        &self,
        _ctx: &AuthContext,
        backend: &ExternalBackend,
        object_key: &str,
        credential: &SecretString,
    ) -> Result<Option<String>, ConnectorError> {
        self.calls.lock().unwrap().push(backend.key.clone());
        if self.down.contains_key(&backend.key) {
            return Err(ConnectorError::Backend {
                backend: backend.key.clone(),
                message: "connection refused".into(),
            });
        }
        Ok(self
            .passwords
            .get(&(backend.key.clone(), object_key.to_string()))
            .filter(|password| password.value() == credential.expose_secret())
            .map(|_| object_key.to_string()))
    }
}

#[derive(Default)]
pub struct AuditRecorder {
    events: Mutex<Vec<AuditEvent>>,
}

impl AuditRecorder {
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditSink for AuditRecorder {
    async fn record(&self, event: AuditEvent) -> Result<(), AuditError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// Collaborators shared by a test and the provider under test.
pub struct Fixture {
    pub config: Config,
    pub principals: Arc<MemoryPrincipals>,
    pub realms: Arc<MemoryRealms>,
    pub roles: Arc<MemoryRoles>,
    pub tokens: Arc<MemoryTokens>,
    pub delegations: Arc<MemoryDelegations>,
    pub connector: Arc<FakeConnector>,
    pub audit: Arc<AuditRecorder>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            config: config(),
            principals: Arc::default(),
            realms: Arc::default(),
            roles: Arc::default(),
            tokens: Arc::default(),
            delegations: Arc::default(),
            connector: Arc::default(),
            audit: Arc::default(),
        }
    }

    pub fn provider(&self) -> Provider {
        Provider::builder()
            .audit(self.audit.clone())
            .connector(self.connector.clone())
            .delegation(self.delegations.clone())
            .domain_settings(Arc::new(ConfigDomainSettings::new(&self.config)))
            .principal(self.principals.clone())
            .realm(self.realms.clone())
            .role(self.roles.clone())
            .token(self.tokens.clone())
            .build()
            .unwrap()
    }
}
