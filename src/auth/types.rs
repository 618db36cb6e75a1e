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

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::entitlement::AuthoritySet;
use crate::error::BuilderError;

/// Successful authentication.
#[derive(Builder, Clone, Debug, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into))]
pub struct AuthenticationOutcome {
    /// Username of the authenticated principal.
    pub principal: String,

    /// Authorities granted to the principal.
    pub authorities: AuthoritySet,

    /// Key of the delegation the principal acts under.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegation: Option<String>,
}

impl AuthenticationOutcome {
    pub fn builder() -> AuthenticationOutcomeBuilder {
        AuthenticationOutcomeBuilder::default()
    }
}
