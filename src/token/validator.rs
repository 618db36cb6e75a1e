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

//! Token validator interface.
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::domain::AuthContext;
use crate::provider::Provider;
use crate::token::error::TokenProviderError;
use crate::token::types::{ResolvedSubject, TokenClaims};

/// Validator of the tokens of a single issuer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Issuer the validator is responsible for.
    fn issuer(&self) -> String;

    /// Verify the token signature.
    fn verify(&self, raw: &str) -> bool;

    /// Resolve the token subject to a principal and its authorities.
    async fn resolve(
        &self,
        ctx: &AuthContext,
        provider: &Provider,
        claims: &TokenClaims,
    ) -> Result<Option<ResolvedSubject>, TokenProviderError>;
}

/// Read the claims of a JWT without verifying it.
///
/// Only used to route the token to the validator of its issuer, the claims
/// must not be trusted before the validator verified the signature.
pub fn decode_claims(raw: &str) -> Result<TokenClaims, TokenProviderError> {
    let mut segments = raw.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenProviderError::MalformedToken);
    };
    let payload = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    Ok(serde_json::from_slice(&payload)?)
}
