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

use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entitlement::AuthoritySet;
use crate::error::BuilderError;
use crate::identity::Principal;

/// Claims of a bearer token. Times are seconds since the epoch.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TokenClaims {
    /// Token ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Subject.
    #[serde(default)]
    pub sub: String,

    /// Issuer.
    #[serde(default)]
    pub iss: String,

    /// Issued at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not before.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Expiration time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Any other claim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Persisted record of an internally issued token.
#[derive(Builder, Clone, Debug, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct AccessToken {
    /// Token ID (the `jti` claim).
    pub key: String,

    /// Username of the principal the token was issued to.
    pub owner: String,

    pub expires_at: DateTime<Utc>,

    /// Authorities granted with the token, as AES encoded JSON.
    #[builder(default)]
    pub authorities: Option<String>,
}

impl AccessToken {
    pub fn builder() -> AccessTokenBuilder {
        AccessTokenBuilder::default()
    }
}

/// Principal and authorities a token resolves to.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSubject {
    pub principal: Principal,
    pub authorities: AuthoritySet,
}
