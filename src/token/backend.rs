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

//! Token store interface.
use async_trait::async_trait;

use crate::domain::AuthContext;
use crate::error::StoreError;
use crate::token::types::AccessToken;

/// Persistence of the internally issued tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Get a token record by the token ID.
    async fn find(&self, ctx: &AuthContext, key: &str) -> Result<Option<AccessToken>, StoreError>;

    /// Delete the token record. Deleting a missing record is not an error.
    async fn delete(&self, ctx: &AuthContext, key: &str) -> Result<(), StoreError>;
}
