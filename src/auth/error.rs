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

//! Authentication errors.
//!
//! Every failing authentication is reported with one of these variants so
//! the caller can map it onto the matching response.
use thiserror::Error;

use crate::error::StoreError;
use crate::token::TokenProviderError;

#[derive(Error, Debug)]
pub enum AuthenticationError {
    /// The account is suspended or its status is not allowed to
    /// authenticate.
    #[error("the account is disabled for user: {0}")]
    Disabled(String),

    /// Wrong password, or a token with a bad signature or issuer.
    #[error("wrong username or password")]
    BadCredentials,

    /// The token cannot be tied to known credentials.
    #[error("credentials not found: {0}")]
    CredentialsNotFound(String),

    /// The token is past its expiration time.
    #[error("token expired")]
    Expired,

    /// The token is used before its not before time.
    #[error("token is not yet valid")]
    NotYetValid,

    /// Acting on behalf of another principal was requested, but no
    /// delegation allows it.
    #[error("delegation refused: {0}")]
    Delegation(String),

    /// A persistence collaborator failed.
    #[error(transparent)]
    Store {
        #[from]
        source: StoreError,
    },
}

impl From<TokenProviderError> for AuthenticationError {
    fn from(source: TokenProviderError) -> Self {
        match source {
            TokenProviderError::IssuerNotFound(issuer) => {
                Self::CredentialsNotFound(format!("no validator for issuer {issuer}"))
            }
            TokenProviderError::Store { source } => Self::Store { source },
            _ => Self::BadCredentials,
        }
    }
}
