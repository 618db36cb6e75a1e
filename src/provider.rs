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

//! # Provider manager
//!
//! Provider manager gives access to the collaborators the authentication core
//! consumes: persistence, connector invocation, delegations, per-domain
//! settings and auditing. Passing the manager down lets every provider reach the
//! collaborators it needs while keeping an easy injection of mocked ones.
use derive_builder::Builder;
use std::sync::Arc;

use crate::audit::AuditSink;
use crate::delegation::DelegationStore;
use crate::domain::DomainSettingsApi;
use crate::entitlement::RoleStore;
use crate::error::BuilderError;
use crate::identity::PrincipalStore;
use crate::passthrough::BackendConnector;
use crate::realm::RealmStore;
use crate::token::TokenStore;

/// Global provider manager.
#[derive(Builder, Clone)]
// It is necessary to use the owned pattern since otherwise builder invokes clone which immediately
// confuses mockall used in tests
#[builder(pattern = "owned")]
#[builder(build_fn(error = "BuilderError"))]
pub struct Provider {
    /// Audit sink.
    audit: Arc<dyn AuditSink>,
    /// External back-end connector.
    connector: Arc<dyn BackendConnector>,
    /// Delegation store.
    delegation: Arc<dyn DelegationStore>,
    /// Per-domain settings.
    domain_settings: Arc<dyn DomainSettingsApi>,
    /// Principal store.
    principal: Arc<dyn PrincipalStore>,
    /// Realm and external resource store.
    realm: Arc<dyn RealmStore>,
    /// Role and group ownership store.
    role: Arc<dyn RoleStore>,
    /// Access token store.
    token: Arc<dyn TokenStore>,
}

impl Provider {
    pub fn builder() -> ProviderBuilder {
        ProviderBuilder::default()
    }

    /// Get the audit sink.
    pub fn get_audit_sink(&self) -> &dyn AuditSink {
        self.audit.as_ref()
    }

    /// Get the external back-end connector.
    pub fn get_connector(&self) -> &dyn BackendConnector {
        self.connector.as_ref()
    }

    /// Get the delegation store.
    pub fn get_delegation_store(&self) -> &dyn DelegationStore {
        self.delegation.as_ref()
    }

    /// Get the per-domain settings source.
    pub fn get_domain_settings(&self) -> &dyn DomainSettingsApi {
        self.domain_settings.as_ref()
    }

    /// Get the principal store.
    pub fn get_principal_store(&self) -> &dyn PrincipalStore {
        self.principal.as_ref()
    }

    /// Get the realm store.
    pub fn get_realm_store(&self) -> &dyn RealmStore {
        self.realm.as_ref()
    }

    /// Get the role store.
    pub fn get_role_store(&self) -> &dyn RoleStore {
        self.role.as_ref()
    }

    /// Get the token store.
    pub fn get_token_store(&self) -> &dyn TokenStore {
        self.token.as_ref()
    }
}

#[cfg(test)]
impl Provider {
    pub fn mocked_builder() -> ProviderBuilder {
        ProviderBuilder::default()
            .audit(Arc::new(crate::audit::MockAuditSink::default()))
            .connector(Arc::new(crate::passthrough::MockBackendConnector::default()))
            .delegation(Arc::new(crate::delegation::MockDelegationStore::default()))
            .domain_settings(Arc::new(crate::domain::MockDomainSettingsApi::default()))
            .principal(Arc::new(crate::identity::MockPrincipalStore::default()))
            .realm(Arc::new(crate::realm::MockRealmStore::default()))
            .role(Arc::new(crate::entitlement::MockRoleStore::default()))
            .token(Arc::new(crate::token::MockTokenStore::default()))
    }
}
