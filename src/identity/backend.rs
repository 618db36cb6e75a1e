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

//! Principal store interface.
use async_trait::async_trait;

use crate::domain::AuthContext;
use crate::error::StoreError;
use crate::identity::types::Principal;

/// Persistence of the principals.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    /// Get a principal by the ID.
    async fn find_by_key(
        &self,
        ctx: &AuthContext,
        key: &str,
    ) -> Result<Option<Principal>, StoreError>;

    /// Get a principal by the login name.
    async fn find_by_username(
        &self,
        ctx: &AuthContext,
        username: &str,
    ) -> Result<Option<Principal>, StoreError>;

    /// List all principals whose plain attribute equals the value.
    async fn search_by_attribute(
        &self,
        ctx: &AuthContext,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Principal>, StoreError>;

    /// Persist the principal.
    async fn save(&self, ctx: &AuthContext, principal: &Principal) -> Result<(), StoreError>;
}
