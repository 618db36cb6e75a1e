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

use crate::entitlement::Role;
use crate::error::BuilderError;

/// Right granted by a principal to another one to act on its behalf.
#[derive(Builder, Clone, Debug, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct Delegation {
    /// The delegation ID.
    pub key: String,

    /// Key of the principal granting the delegation.
    pub delegating: String,

    /// Key of the principal acting on behalf of the delegating one.
    pub delegated: String,

    pub start: DateTime<Utc>,

    /// Open ended when not set.
    #[builder(default)]
    pub end: Option<DateTime<Utc>>,

    /// Roles the delegated principal acts with. When empty it acts with all
    /// the authorities of the delegating principal.
    #[builder(default)]
    pub roles: Vec<Role>,
}

impl Delegation {
    pub fn builder() -> DelegationBuilder {
        DelegationBuilder::default()
    }

    /// Whether the delegation is in force at the given time, both ends
    /// included.
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && self.end.is_none_or(|end| at <= end)
    }
}
