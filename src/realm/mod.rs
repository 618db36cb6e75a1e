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

//! # Realm
//!
//! Realms form the tree of administrative scopes authorities are restricted
//! to. A realm, as well as an external resource, may carry an account policy
//! listing the back-ends eligible for pass-through authentication.
use async_trait::async_trait;

pub mod path;
pub mod types;

pub use types::{AccountPolicy, ExternalBackend, Realm};

use crate::domain::AuthContext;
use crate::error::StoreError;

/// Persistence of the realms and of the external resources.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RealmStore: Send + Sync {
    /// List the realm with the given full path and all its ancestors, root
    /// first.
    async fn find_ancestors(
        &self,
        ctx: &AuthContext,
        full_path: &str,
    ) -> Result<Vec<Realm>, StoreError>;

    /// Get an external resource by the ID.
    async fn find_backend(
        &self,
        ctx: &AuthContext,
        key: &str,
    ) -> Result<Option<ExternalBackend>, StoreError>;
}
