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

//! Tokens issued by a third party.
//!
//! No record is persisted for these tokens. The subject (or the configured
//! claim) is matched against a principal attribute and the authorities are
//! computed from the principal roles.
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::domain::AuthContext;
use crate::entitlement::EntitlementResolver;
use crate::identity::{USERNAME_ATTRIBUTE, find_principal};
use crate::provider::Provider;
use crate::token::error::TokenProviderError;
use crate::token::types::{ResolvedSubject, TokenClaims};
use crate::token::validator::TokenValidator;

pub struct ExternalTokenValidator {
    issuer: String,
    decoding_key: DecodingKey,
    validation: Validation,
    claim: Option<String>,
    attribute: String,
    resolver: Arc<EntitlementResolver>,
}

impl ExternalTokenValidator {
    pub fn new<S: Into<String>>(
        issuer: S,
        decoding_key: DecodingKey,
        algorithm: Algorithm,
        resolver: Arc<EntitlementResolver>,
    ) -> Self {
        let issuer = issuer.into();
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation.set_issuer(&[issuer.as_str()]);
        Self {
            issuer,
            decoding_key,
            validation,
            claim: None,
            attribute: USERNAME_ATTRIBUTE.into(),
            resolver,
        }
    }

    /// Take the principal name from the claim instead of `sub`.
    pub fn with_claim<S: Into<String>>(mut self, claim: S) -> Self {
        self.claim = Some(claim.into());
        self
    }

    /// Match the principal name against the attribute instead of the
    /// username.
    pub fn with_attribute<S: Into<String>>(mut self, attribute: S) -> Self {
        self.attribute = attribute.into();
        self
    }

    fn principal_name<'a>(&self, claims: &'a TokenClaims) -> Option<&'a str> {
        match &self.claim {
            None => Some(claims.sub.as_str()),
            Some(claim) => claims.extra.get(claim).and_then(Value::as_str),
        }
        .filter(|name| !name.is_empty())
    }
}

#[async_trait]
impl TokenValidator for ExternalTokenValidator {
    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn verify(&self, raw: &str) -> bool {
        match jsonwebtoken::decode::<TokenClaims>(raw, &self.decoding_key, &self.validation) {
            Ok(_) => true,
            Err(err) => {
                debug!("Token of {} failed verification: {}", self.issuer, err);
                false
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self, ctx, provider, claims), fields(issuer = %self.issuer))]
    async fn resolve(
        &self,
        ctx: &AuthContext,
        provider: &Provider,
        claims: &TokenClaims,
    ) -> Result<Option<ResolvedSubject>, TokenProviderError> {
        let Some(name) = self.principal_name(claims) else {
            debug!("Token carries no principal name");
            return Ok(None);
        };
        let Some(principal) = find_principal(
            provider.get_principal_store(),
            ctx,
            std::slice::from_ref(&self.attribute),
            name,
        )
        .await?
        else {
            return Ok(None);
        };
        let authorities = self
            .resolver
            .authorities_for(ctx, provider.get_role_store(), &principal)
            .await?;
        Ok(Some(ResolvedSubject {
            principal,
            authorities,
        }))
    }
}
