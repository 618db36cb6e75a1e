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

//! # Token provider
//!
//! Bearer tokens are JWTs. The internal issuer signs its tokens with the
//! configured key and persists an [`AccessToken`] record per token. Tokens of
//! any other issuer are checked by the [`TokenValidator`] registered for it.
//!
//! The [`TokenIssuerRegistry`] is built once, at startup, out of the
//! validators known to the deployment. The first validator registered for an
//! issuer wins.
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

pub mod backend;
pub mod error;
pub mod external;
pub mod internal;
pub mod types;
pub mod validator;

pub use backend::TokenStore;
#[cfg(test)]
pub use backend::MockTokenStore;
pub use error::TokenProviderError;
pub use external::ExternalTokenValidator;
pub use internal::InternalTokenValidator;
pub use types::*;
#[cfg(test)]
pub use validator::MockTokenValidator;
pub use validator::{TokenValidator, decode_claims};

/// Lookup of the validator responsible for an issuer.
pub struct TokenIssuerRegistry {
    validators: Vec<Arc<dyn TokenValidator>>,
    by_issuer: OnceLock<HashMap<String, Arc<dyn TokenValidator>>>,
}

impl TokenIssuerRegistry {
    pub fn new(validators: Vec<Arc<dyn TokenValidator>>) -> Self {
        Self {
            validators,
            by_issuer: OnceLock::new(),
        }
    }

    fn table(&self) -> &HashMap<String, Arc<dyn TokenValidator>> {
        self.by_issuer.get_or_init(|| {
            let mut table: HashMap<String, Arc<dyn TokenValidator>> = HashMap::new();
            for validator in &self.validators {
                let issuer = validator.issuer();
                if table.contains_key(&issuer) {
                    warn!(
                        "A token validator is already registered for issuer {}, ignoring the next one",
                        issuer
                    );
                    continue;
                }
                debug!("Registering token validator for issuer {}", issuer);
                table.insert(issuer, validator.clone());
            }
            table
        })
    }

    /// Issuers a validator is registered for.
    pub fn issuers(&self) -> Vec<String> {
        let mut issuers: Vec<String> = self.table().keys().cloned().collect();
        issuers.sort();
        issuers
    }

    /// Get the validator registered for the issuer.
    pub fn validator_for(&self, issuer: &str) -> Result<Arc<dyn TokenValidator>, TokenProviderError> {
        self.table()
            .get(issuer)
            .cloned()
            .ok_or_else(|| TokenProviderError::IssuerNotFound(issuer.to_string()))
    }
}
