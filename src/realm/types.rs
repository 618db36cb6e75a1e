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

use crate::error::BuilderError;

/// Account policy of a realm or of an external resource.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into))]
pub struct AccountPolicy {
    /// The policy ID.
    pub key: String,

    /// Keys of the external back-ends a password may be verified on, in the
    /// order they are tried.
    #[builder(default)]
    pub passthrough_resources: Vec<String>,
}

/// Node of the realm tree.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct Realm {
    /// The realm ID.
    pub key: String,

    /// Full path of the realm, `/` being the root.
    pub full_path: String,

    /// Account policy of the realm.
    #[builder(default)]
    pub account_policy: Option<AccountPolicy>,
}

/// External resource (identity back-end) a password can be verified on.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct ExternalBackend {
    /// The resource ID.
    pub key: String,

    /// Account policy declared by the resource.
    #[builder(default)]
    pub account_policy: Option<AccountPolicy>,
}

impl AccountPolicy {
    pub fn builder() -> AccountPolicyBuilder {
        AccountPolicyBuilder::default()
    }
}

impl Realm {
    pub fn builder() -> RealmBuilder {
        RealmBuilder::default()
    }

    /// Pass-through resources of the realm account policy.
    pub fn passthrough_resources(&self) -> &[String] {
        self.account_policy
            .as_ref()
            .map(|policy| policy.passthrough_resources.as_slice())
            .unwrap_or_default()
    }
}

impl ExternalBackend {
    pub fn builder() -> ExternalBackendBuilder {
        ExternalBackendBuilder::default()
    }

    /// Pass-through resources of the resource account policy.
    pub fn passthrough_resources(&self) -> &[String] {
        self.account_policy
            .as_ref()
            .map(|policy| policy.passthrough_resources.as_slice())
            .unwrap_or_default()
    }
}
