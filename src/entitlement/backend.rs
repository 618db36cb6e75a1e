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

//! Role store interface.
use async_trait::async_trait;

use crate::domain::AuthContext;
use crate::entitlement::types::{Group, Role};
use crate::error::StoreError;

/// Persistence of the roles and of the group ownerships.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// List the roles of the principal, static and dynamic memberships alike,
    /// with the dynamic realms already computed.
    async fn find_roles(
        &self,
        ctx: &AuthContext,
        principal_key: &str,
    ) -> Result<Vec<Role>, StoreError>;

    /// List the groups owned by the principal.
    async fn find_owned_groups(
        &self,
        ctx: &AuthContext,
        principal_key: &str,
    ) -> Result<Vec<Group>, StoreError>;

    /// Get a role by the ID.
    async fn find_role(&self, ctx: &AuthContext, key: &str) -> Result<Option<Role>, StoreError>;
}
