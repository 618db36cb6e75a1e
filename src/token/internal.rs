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

//! Tokens issued by this system.
//!
//! Internal tokens are HS512 signed JWTs. Every issued token has a persisted
//! [`AccessToken`] record found by the `jti` claim, holding the owner and the
//! AES encoded authorities granted at issuing time.
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cipher::{CipherAlgorithm, CipherService};
use crate::config::Config;
use crate::domain::AuthContext;
use crate::entitlement::{AuthoritySet, EntitlementResolver};
use crate::identity::validated;
use crate::provider::Provider;
use crate::token::error::TokenProviderError;
use crate::token::types::{AccessToken, ResolvedSubject, TokenClaims};
use crate::token::validator::TokenValidator;

pub struct InternalTokenValidator {
    issuer: String,
    /// Signing and verification keys, `None` when no `jws_key` is configured.
    keys: Option<(EncodingKey, DecodingKey)>,
    cipher: Arc<CipherService>,
    resolver: Arc<EntitlementResolver>,
}

impl InternalTokenValidator {
    pub fn new(
        config: &Config,
        cipher: Arc<CipherService>,
        resolver: Arc<EntitlementResolver>,
    ) -> Self {
        let key = config.security.jws_key.expose_secret().as_bytes();
        let keys = if key.is_empty() {
            warn!("No [security] jws_key is configured, internal tokens are refused");
            None
        } else {
            Some((EncodingKey::from_secret(key), DecodingKey::from_secret(key)))
        };
        Self {
            issuer: config.security.jwt_issuer.clone(),
            keys,
            cipher,
            resolver,
        }
    }

    /// Only the signature is checked here, the time window is enforced by the
    /// authentication provider against its reference time.
    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation
    }

    /// Issue a token to the owner.
    ///
    /// Returns the signed token and the record to persist.
    #[tracing::instrument(level = "info", skip(self, authorities))]
    pub fn issue(
        &self,
        owner: &str,
        authorities: &AuthoritySet,
        issued_at: DateTime<Utc>,
        ttl: TimeDelta,
    ) -> Result<(SecretString, AccessToken), TokenProviderError> {
        let Some((encoding_key, _)) = &self.keys else {
            return Err(TokenProviderError::SigningKeyMissing);
        };
        let expires_at = issued_at + ttl;
        let claims = TokenClaims {
            jti: Some(Uuid::new_v4().to_string()),
            sub: owner.to_string(),
            iss: self.issuer.clone(),
            iat: Some(issued_at.timestamp()),
            nbf: Some(issued_at.timestamp()),
            exp: Some(expires_at.timestamp()),
            ..Default::default()
        };
        let raw = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            encoding_key,
        )?;
        let record = AccessToken::builder()
            .key(claims.jti.clone().unwrap_or_default())
            .owner(owner)
            .expires_at(expires_at)
            .authorities(
                self.cipher
                    .encode(&serde_json::to_string(authorities)?, CipherAlgorithm::Aes)?,
            )
            .build()?;
        Ok((SecretString::from(raw), record))
    }

    fn decode_authorities(&self, token: &AccessToken, encoded: &str) -> AuthoritySet {
        match self
            .cipher
            .decode(encoded, CipherAlgorithm::Aes)
            .map_err(TokenProviderError::from)
            .and_then(|json| {
                serde_json::from_str::<AuthoritySet>(&json).map_err(TokenProviderError::from)
            })
        {
            Ok(authorities) => authorities,
            Err(err) => {
                warn!(
                    "Could not decode the authorities of token {}, granting none: {}",
                    token.key, err
                );
                AuthoritySet::new()
            }
        }
    }
}

#[async_trait]
impl TokenValidator for InternalTokenValidator {
    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn verify(&self, raw: &str) -> bool {
        let Some((_, decoding_key)) = &self.keys else {
            warn!("Refusing token of {}, no signing key is configured", self.issuer);
            return false;
        };
        match jsonwebtoken::decode::<TokenClaims>(raw, decoding_key, &Self::validation()) {
            Ok(_) => true,
            Err(err) => {
                debug!("Token signature verification failed: {}", err);
                false
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self, ctx, provider, claims), fields(sub = %claims.sub))]
    async fn resolve(
        &self,
        ctx: &AuthContext,
        provider: &Provider,
        claims: &TokenClaims,
    ) -> Result<Option<ResolvedSubject>, TokenProviderError> {
        let Some(jti) = claims.jti.as_deref() else {
            return Ok(None);
        };
        let Some(token) = provider.get_token_store().find(ctx, jti).await? else {
            debug!("Token {} not found", jti);
            return Ok(None);
        };
        if token.owner != claims.sub {
            debug!("Token {} is not owned by {}", jti, claims.sub);
            return Ok(None);
        }
        let Some(principal) = provider
            .get_principal_store()
            .find_by_username(ctx, &token.owner)
            .await?
            .and_then(validated)
        else {
            return Ok(None);
        };
        let authorities = match &token.authorities {
            Some(encoded) => self.decode_authorities(&token, encoded),
            None => {
                self.resolver
                    .authorities_for(ctx, provider.get_role_store(), &principal)
                    .await?
            }
        };
        Ok(Some(ResolvedSubject {
            principal,
            authorities,
        }))
    }
}
