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

//! Verification of a password on the external back-ends.
use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;
use tracing::debug;

use crate::domain::AuthContext;
use crate::identity::Principal;
use crate::realm::ExternalBackend;

/// Error of a back-end call.
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// No connector is configured for the back-end.
    #[error("no connector available for {0}")]
    NotAvailable(String),

    /// The back-end refused or failed the operation.
    #[error("back-end {backend} failed: {message}")]
    Backend { backend: String, message: String },

    /// The back-end did not answer in time.
    #[error("back-end {0} timed out")]
    Timeout(String),
}

/// Access to the native capabilities of the external back-ends.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendConnector: Send + Sync {
    /// Compute the key of the principal on the back-end from the back-end
    /// mapping of the principal type. `None` when the back-end has no
    /// mapping for it.
    async fn object_key(
        &self,
        ctx: &AuthContext,
        backend: &ExternalBackend,
        principal: &Principal,
    ) -> Result<Option<String>, ConnectorError>;

    /// Authenticate the object on the back-end. Returns the back-end
    /// identifier of the matched object.
    async fn authenticate(
        &self,
        ctx: &AuthContext,
        backend: &ExternalBackend,
        object_key: &str,
        credential: &SecretString,
    ) -> Result<Option<String>, ConnectorError>;
}

/// Try the back-ends in order and stop at the first one accepting the
/// credential.
///
/// A failing back-end is logged and skipped.
pub async fn verify_on_backends(
    connector: &dyn BackendConnector,
    ctx: &AuthContext,
    backends: &[ExternalBackend],
    principal: &Principal,
    credential: &SecretString,
) -> bool {
    for backend in backends {
        let object_key = match connector.object_key(ctx, backend, principal).await {
            Ok(Some(object_key)) => object_key,
            Ok(None) => {
                debug!(
                    "No mapping for {} on {}, skipping",
                    principal.username, backend.key
                );
                continue;
            }
            Err(err) => {
                debug!(
                    "Could not compute the key of {} on {}: {}",
                    principal.username, backend.key, err
                );
                continue;
            }
        };
        match connector
            .authenticate(ctx, backend, &object_key, credential)
            .await
        {
            Ok(Some(uid)) => {
                debug!(
                    "{} authenticated on {} as {}",
                    principal.username, backend.key, uid
                );
                return true;
            }
            Ok(None) => {
                debug!("{} not authenticated on {}", principal.username, backend.key);
            }
            Err(err) => {
                debug!(
                    "Could not authenticate {} on {}: {}",
                    principal.username, backend.key, err
                );
            }
        }
    }
    false
}
