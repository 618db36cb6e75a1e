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

//! # Delegation
//!
//! A principal may delegate to another one the right to act on its behalf,
//! for a time window and optionally restricted to a subset of roles. The
//! delegated principal authenticates with its own credentials and names the
//! delegating one in the [`AuthContext`](crate::domain::AuthContext).
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod types;

pub use types::{Delegation, DelegationBuilder};

use crate::domain::AuthContext;
use crate::error::StoreError;

/// Persistence of the delegations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DelegationStore: Send + Sync {
    /// Get a delegation by the ID.
    async fn find(&self, ctx: &AuthContext, key: &str) -> Result<Option<Delegation>, StoreError>;

    /// Get the delegation from `delegating` to `delegated` valid at the given
    /// time.
    async fn find_valid_for(
        &self,
        ctx: &AuthContext,
        delegating: &str,
        delegated: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Delegation>, StoreError>;
}
