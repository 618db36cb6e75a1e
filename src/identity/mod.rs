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

//! # Identity
//!
//! The principal data model and the lookup of a principal by the login name.
//!
//! A login name is matched against the attributes configured for the domain,
//! in order. `username` matches the login name itself, any other attribute
//! must match exactly one principal. The first unique match wins: an
//! ambiguous attribute is skipped and the next one is tried.
use tracing::{error, warn};
use validator::Validate;

pub mod backend;
pub mod types;

pub use backend::PrincipalStore;
#[cfg(test)]
pub use backend::MockPrincipalStore;
pub use types::{Principal, PrincipalBuilder};

use crate::domain::AuthContext;
use crate::error::StoreError;

/// Attribute matching the login name against the principal username.
pub const USERNAME_ATTRIBUTE: &str = "username";

/// Find the principal the login name refers to.
///
/// Not finding a principal is a regular outcome. A failing attribute search
/// is logged and treated as no match.
/// Keep a stored principal only when it passes validation.
pub fn validated(principal: Principal) -> Option<Principal> {
    match principal.validate() {
        Ok(()) => Some(principal),
        Err(err) => {
            warn!("Principal {} is not valid, ignoring it: {}", principal.key, err);
            None
        }
    }
}

#[tracing::instrument(level = "debug", skip(store, ctx))]
pub async fn find_principal(
    store: &dyn PrincipalStore,
    ctx: &AuthContext,
    attributes: &[String],
    name: &str,
) -> Result<Option<Principal>, StoreError> {
    for attribute in attributes {
        if attribute == USERNAME_ATTRIBUTE {
            if let Some(principal) = store.find_by_username(ctx, name).await?.and_then(validated) {
                return Ok(Some(principal));
            }
            continue;
        }
        match store.search_by_attribute(ctx, attribute, name).await {
            Ok(mut found) => match found.len() {
                0 => {}
                1 => {
                    if let Some(principal) = found.pop().and_then(validated) {
                        return Ok(Some(principal));
                    }
                }
                count => {
                    warn!(
                        "Value of attribute {} matches {} principals, ignoring it",
                        attribute, count
                    );
                }
            },
            Err(err) => {
                error!("Could not search principals by {}: {}", attribute, err);
            }
        }
    }
    Ok(None)
}
