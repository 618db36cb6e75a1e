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

//! # Authentication provider
//!
//! Entry point of the authentication core. It verifies the two supported
//! credential kinds and turns the authenticated principal into its
//! authorities:
//!
//! - username and password: the configured super-administrator and
//!   anonymous principals are checked against the `[security]` section,
//!   every other principal goes through the
//!   [`PassthroughAuthenticator`](crate::passthrough::PassthroughAuthenticator).
//!   Every attempt is audited.
//!
//! - bearer token: the token is routed to the validator of its issuer, the
//!   signature and the time window are checked and the subject is resolved
//!   to a principal.
//!
//! When the context names a delegating principal, the authenticated
//! principal acts under the delegation found between the two: the
//! authorities are the ones of the delegation roles, or the ones of the
//! delegating principal when the delegation lists no role.
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

pub mod error;
pub mod types;

pub use error::AuthenticationError;
pub use types::{AuthenticationOutcome, AuthenticationOutcomeBuilder};

use crate::audit::{AuditEvent, AuditOutcome};
use crate::cipher::{CipherService, verify_blocking};
use crate::config::Config;
use crate::delegation::Delegation;
use crate::domain::AuthContext;
use crate::entitlement::{AuthoritySet, EntitlementResolver};
use crate::identity::{Principal, validated};
use crate::passthrough::{PassthroughAuthenticator, check_status};
use crate::provider::Provider;
use crate::token::{
    InternalTokenValidator, TokenClaims, TokenIssuerRegistry, TokenValidator, decode_claims,
};

pub struct AuthenticationProvider {
    config: Config,
    provider: Provider,
    cipher: Arc<CipherService>,
    resolver: Arc<EntitlementResolver>,
    passthrough: PassthroughAuthenticator,
    internal: Arc<InternalTokenValidator>,
    registry: TokenIssuerRegistry,
}

impl AuthenticationProvider {
    /// Build the provider.
    ///
    /// The internal token validator is registered ahead of `validators`, so
    /// it always serves the configured internal issuer.
    pub fn new(config: Config, provider: Provider, validators: Vec<Arc<dyn TokenValidator>>) -> Self {
        let cipher = Arc::new(CipherService::new(&config));
        let resolver = Arc::new(EntitlementResolver::new(&config));
        let internal = Arc::new(InternalTokenValidator::new(
            &config,
            cipher.clone(),
            resolver.clone(),
        ));
        let internal_validator: Arc<dyn TokenValidator> = internal.clone();
        let mut registered = vec![internal_validator];
        registered.extend(validators);
        Self {
            passthrough: PassthroughAuthenticator::new(cipher.clone()),
            registry: TokenIssuerRegistry::new(registered),
            config,
            provider,
            cipher,
            resolver,
            internal,
        }
    }

    /// Get the cipher service.
    pub fn get_cipher(&self) -> &Arc<CipherService> {
        &self.cipher
    }

    /// Get the entitlement resolver.
    pub fn get_resolver(&self) -> &Arc<EntitlementResolver> {
        &self.resolver
    }

    /// Get the validator of the internally issued tokens, also used to issue
    /// them.
    pub fn get_internal_token_validator(&self) -> &Arc<InternalTokenValidator> {
        &self.internal
    }

    /// Authenticate with a username and a password.
    #[tracing::instrument(level = "info", skip(self, ctx, credential), fields(domain = %ctx.domain))]
    pub async fn authenticate_with_password(
        &self,
        ctx: &AuthContext,
        name: &str,
        credential: &SecretString,
    ) -> Result<AuthenticationOutcome, AuthenticationError> {
        let mut before = None;
        let result = self.verify_password(ctx, name, credential, &mut before).await;
        self.audit(ctx, name, before, &result).await;
        result
    }

    /// `before` receives the principal as found, ahead of the bookkeeping.
    async fn verify_password(
        &self,
        ctx: &AuthContext,
        name: &str,
        credential: &SecretString,
        before: &mut Option<Principal>,
    ) -> Result<AuthenticationOutcome, AuthenticationError> {
        let security = &self.config.security;
        if name == security.admin_user {
            let encoded = security.admin_password.expose_secret();
            if encoded.is_empty()
                || !verify_blocking(
                    self.cipher.clone(),
                    credential.clone(),
                    security.admin_password_algorithm,
                    encoded.to_string(),
                )
                .await
            {
                return Err(AuthenticationError::BadCredentials);
            }
            return Ok(AuthenticationOutcome {
                principal: name.to_string(),
                authorities: self.resolver.admin_authorities(),
                delegation: None,
            });
        }

        if name == security.anonymous_user {
            let key = security.anonymous_key.expose_secret();
            if key.is_empty() || credential.expose_secret() != key {
                return Err(AuthenticationError::BadCredentials);
            }
            return Ok(AuthenticationOutcome {
                principal: name.to_string(),
                authorities: EntitlementResolver::anonymous_authorities(),
                delegation: None,
            });
        }

        let outcome = self
            .passthrough
            .authenticate(ctx, &self.provider, name, credential)
            .await?;
        *before = outcome.before;
        match outcome.principal {
            Some(principal) if outcome.authenticated => {
                let delegation = self.delegation_for(ctx, &principal, Utc::now()).await?;
                let authorities = match &delegation {
                    Some(delegation) => self.delegated_authorities(ctx, delegation).await?,
                    None => {
                        self.resolver
                            .authorities_for(ctx, self.provider.get_role_store(), &principal)
                            .await?
                    }
                };
                Ok(AuthenticationOutcome {
                    principal: principal.username,
                    authorities,
                    delegation: delegation.map(|delegation| delegation.key),
                })
            }
            _ => Err(AuthenticationError::BadCredentials),
        }
    }

    /// Find the delegation allowing the principal to act on behalf of the
    /// one named by the context, valid at the given time.
    async fn delegation_for(
        &self,
        ctx: &AuthContext,
        delegated: &Principal,
        at: DateTime<Utc>,
    ) -> Result<Option<Delegation>, AuthenticationError> {
        let Some(delegated_by) = ctx.delegated_by.as_deref() else {
            return Ok(None);
        };
        let delegating = if Uuid::parse_str(delegated_by).is_ok() {
            delegated_by.to_string()
        } else {
            match self
                .provider
                .get_principal_store()
                .find_by_username(ctx, delegated_by)
                .await?
            {
                Some(principal) => principal.key,
                None => {
                    return Err(AuthenticationError::Delegation(format!(
                        "delegating principal {delegated_by} cannot be found"
                    )));
                }
            }
        };
        debug!(
            "Delegation request: delegating {}, delegated {}",
            delegating, delegated.key
        );
        match self
            .provider
            .get_delegation_store()
            .find_valid_for(ctx, &delegating, &delegated.key, at)
            .await?
        {
            Some(delegation) => Ok(Some(delegation)),
            None => Err(AuthenticationError::Delegation(format!(
                "delegation by {delegating} was requested but none found"
            ))),
        }
    }

    /// Authorities of the roles of the delegation, or of the delegating
    /// principal when the delegation lists no role.
    async fn delegated_authorities(
        &self,
        ctx: &AuthContext,
        delegation: &Delegation,
    ) -> Result<AuthoritySet, AuthenticationError> {
        if !delegation.roles.is_empty() {
            return Ok(EntitlementResolver::resolve_roles(&delegation.roles));
        }
        let Some(delegating) = self
            .provider
            .get_principal_store()
            .find_by_key(ctx, &delegation.delegating)
            .await?
            .and_then(validated)
        else {
            return Err(AuthenticationError::CredentialsNotFound(format!(
                "no principal {} delegating {}",
                delegation.delegating, delegation.key
            )));
        };
        Ok(self
            .resolver
            .authorities_for(ctx, self.provider.get_role_store(), &delegating)
            .await?)
    }

    /// Report the attempt to the audit sink. A failing sink is only logged.
    async fn audit(
        &self,
        ctx: &AuthContext,
        name: &str,
        before: Option<Principal>,
        result: &Result<AuthenticationOutcome, AuthenticationError>,
    ) {
        let (outcome, after, who) = match result {
            Ok(success) => (
                AuditOutcome::Success,
                serde_json::to_value(success).unwrap_or(Value::Null),
                match &success.delegation {
                    Some(delegation) => format!("{name} [under delegation {delegation}]"),
                    None => name.to_string(),
                },
            ),
            Err(err) => (
                AuditOutcome::Failure,
                json!(err.to_string()),
                name.to_string(),
            ),
        };
        let mut builder = AuditEvent::builder();
        builder
            .domain(ctx.domain.as_str())
            .who(who)
            .outcome(outcome)
            .after(after)
            .inputs(vec![json!(name)]);
        if let Some(principal) = before {
            builder.before(
                serde_json::to_value(principal.without_password()).unwrap_or(Value::Null),
            );
        }
        let event = match builder.build() {
            Ok(event) => event,
            Err(err) => {
                warn!("Could not build the audit event of {}: {}", name, err);
                return;
            }
        };
        if let Err(err) = self.provider.get_audit_sink().record(event).await {
            warn!("Could not record the audit event of {}: {}", name, err);
        }
    }

    /// Authenticate with a bearer token, checked against the current time.
    pub async fn authenticate_with_token(
        &self,
        ctx: &AuthContext,
        raw: &SecretString,
    ) -> Result<AuthenticationOutcome, AuthenticationError> {
        self.authenticate_with_token_at(ctx, raw, Utc::now()).await
    }

    /// Authenticate with a bearer token, checked against the reference time.
    ///
    /// Both ends of the validity window are inclusive.
    #[tracing::instrument(level = "info", skip(self, ctx, raw), fields(domain = %ctx.domain))]
    pub async fn authenticate_with_token_at(
        &self,
        ctx: &AuthContext,
        raw: &SecretString,
        reference_time: DateTime<Utc>,
    ) -> Result<AuthenticationOutcome, AuthenticationError> {
        let raw = raw.expose_secret();
        let claims = decode_claims(raw).map_err(|err| {
            debug!("Could not read the token claims: {}", err);
            AuthenticationError::BadCredentials
        })?;

        let security = &self.config.security;
        let is_admin = claims.sub == security.admin_user;
        let validator: Arc<dyn TokenValidator> = if is_admin {
            self.internal.clone()
        } else {
            self.registry.validator_for(&claims.iss)?
        };
        if !validator.verify(raw) {
            return Err(AuthenticationError::BadCredentials);
        }
        let is_internal = validator.issuer() == security.jwt_issuer;
        if is_internal && claims.iss != security.jwt_issuer {
            debug!("Token issuer {} is not the internal issuer", claims.iss);
            return Err(AuthenticationError::BadCredentials);
        }

        self.check_time_window(ctx, &claims, is_internal, reference_time)
            .await?;

        if is_admin {
            let jti = claims.jti.as_deref().unwrap_or_default();
            if self
                .provider
                .get_token_store()
                .find(ctx, jti)
                .await?
                .is_none()
            {
                return Err(AuthenticationError::CredentialsNotFound(format!(
                    "no token {} found for {}",
                    jti, claims.sub
                )));
            }
            return Ok(AuthenticationOutcome {
                principal: claims.sub,
                authorities: self.resolver.admin_authorities(),
                delegation: None,
            });
        }

        let Some(resolved) = validator.resolve(ctx, &self.provider, &claims).await? else {
            return Err(AuthenticationError::CredentialsNotFound(format!(
                "no principal found for {}",
                claims.sub
            )));
        };
        let delegation = self
            .delegation_for(ctx, &resolved.principal, reference_time)
            .await?;
        let authorities = match &delegation {
            Some(delegation) => self.delegated_authorities(ctx, delegation).await?,
            None => resolved.authorities,
        };
        debug!(
            "Token of {} resolved to {} under delegation {:?}",
            claims.iss,
            resolved.principal.username,
            delegation.as_ref().map(|d| &d.key)
        );
        let settings = self.provider.get_domain_settings().settings(ctx).await?;
        check_status(&resolved.principal, &settings)?;
        let authorities = if resolved.principal.must_change_password {
            EntitlementResolver::must_change_password_authorities()
        } else {
            authorities
        };
        Ok(AuthenticationOutcome {
            principal: resolved.principal.username,
            authorities,
            delegation: delegation.map(|delegation| delegation.key),
        })
    }

    async fn check_time_window(
        &self,
        ctx: &AuthContext,
        claims: &TokenClaims,
        is_internal: bool,
        reference_time: DateTime<Utc>,
    ) -> Result<(), AuthenticationError> {
        let now = reference_time.timestamp();
        if !claims.exp.is_some_and(|exp| exp >= now) {
            if let (true, Some(jti)) = (is_internal, claims.jti.as_deref()) {
                if let Err(err) = self.provider.get_token_store().delete(ctx, jti).await {
                    warn!("Could not remove the expired token {}: {}", jti, err);
                }
            }
            return Err(AuthenticationError::Expired);
        }
        if !claims.nbf.is_some_and(|nbf| nbf <= now) {
            return Err(AuthenticationError::NotYetValid);
        }
        Ok(())
    }

    /// Compute the authorities of the principal, without any credential
    /// check.
    ///
    /// Under a delegation, the authorities are the delegated ones.
    #[tracing::instrument(level = "debug", skip(self, ctx))]
    pub async fn authorities_for(
        &self,
        ctx: &AuthContext,
        principal_id: &str,
        delegation: Option<&str>,
    ) -> Result<AuthoritySet, AuthenticationError> {
        let security = &self.config.security;
        if principal_id == security.anonymous_user {
            return Ok(EntitlementResolver::anonymous_authorities());
        }
        if principal_id == security.admin_user {
            return Ok(self.resolver.admin_authorities());
        }
        if let Some(key) = delegation {
            let Some(delegation) = self
                .provider
                .get_delegation_store()
                .find(ctx, key)
                .await?
            else {
                return Err(AuthenticationError::CredentialsNotFound(format!(
                    "no delegation {key}"
                )));
            };
            return self.delegated_authorities(ctx, &delegation).await;
        }
        let Some(principal) = self
            .provider
            .get_principal_store()
            .find_by_username(ctx, principal_id)
            .await?
            .and_then(validated)
        else {
            return Err(AuthenticationError::CredentialsNotFound(format!(
                "no principal {principal_id}"
            )));
        };
        Ok(self
            .resolver
            .authorities_for(ctx, self.provider.get_role_store(), &principal)
            .await?)
    }
}
