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
use std::collections::BTreeSet;

use crate::error::BuilderError;

/// Granted to the anonymous principal.
pub const ANONYMOUS: &str = "ANONYMOUS";

/// The only entitlement of a principal that must change the password.
pub const MUST_CHANGE_PASSWORD: &str = "MUST_CHANGE_PASSWORD";

/// Key of the role whose entitlements group owners receive on the owned
/// groups.
pub const GROUP_OWNER_ROLE: &str = "GROUP_OWNER";

/// Entitlements known without any extension.
pub const BUILTIN_ENTITLEMENTS: &[&str] = &[
    ANONYMOUS,
    MUST_CHANGE_PASSWORD,
    "ACCESS_TOKEN_DELETE",
    "ACCESS_TOKEN_LIST",
    "ANYTYPE_CREATE",
    "ANYTYPE_DELETE",
    "ANYTYPE_LIST",
    "ANYTYPE_READ",
    "ANYTYPE_UPDATE",
    "AUDIT_LIST",
    "AUDIT_READ",
    "GROUP_CREATE",
    "GROUP_DELETE",
    "GROUP_READ",
    "GROUP_SEARCH",
    "GROUP_UPDATE",
    "POLICY_CREATE",
    "POLICY_DELETE",
    "POLICY_LIST",
    "POLICY_READ",
    "POLICY_UPDATE",
    "REALM_CREATE",
    "REALM_DELETE",
    "REALM_SEARCH",
    "REALM_UPDATE",
    "RESOURCE_CREATE",
    "RESOURCE_DELETE",
    "RESOURCE_LIST",
    "RESOURCE_READ",
    "RESOURCE_UPDATE",
    "ROLE_CREATE",
    "ROLE_DELETE",
    "ROLE_LIST",
    "ROLE_READ",
    "ROLE_UPDATE",
    "SCHEMA_CREATE",
    "SCHEMA_DELETE",
    "SCHEMA_READ",
    "SCHEMA_UPDATE",
    "USER_CREATE",
    "USER_DELETE",
    "USER_READ",
    "USER_SEARCH",
    "USER_UPDATE",
];

/// Role as assigned to a principal.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into))]
pub struct Role {
    /// The role ID.
    pub key: String,

    /// Entitlements granted by the role.
    #[builder(default)]
    pub entitlements: Vec<String>,

    /// Full paths of the statically assigned realms.
    #[builder(default)]
    pub realms: Vec<String>,

    /// Realms the role is dynamically bound to, as computed from the
    /// principal attributes.
    #[builder(default)]
    pub dynamic_realms: Vec<String>,
}

impl Role {
    pub fn builder() -> RoleBuilder {
        RoleBuilder::default()
    }
}

/// Group owned by a principal.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into))]
pub struct Group {
    /// The group ID.
    pub key: String,

    /// Full path of the group realm.
    pub realm: String,
}

impl Group {
    pub fn builder() -> GroupBuilder {
        GroupBuilder::default()
    }
}

/// Entitlement granted on a set of realms.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Authority {
    /// Entitlement name.
    pub entitlement: String,

    /// Realms the entitlement applies to. Empty means no realm restriction.
    pub realms: BTreeSet<String>,
}

impl Authority {
    pub fn new<E, I, S>(entitlement: E, realms: I) -> Self
    where
        E: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entitlement: entitlement.into(),
            realms: realms.into_iter().map(Into::into).collect(),
        }
    }

    /// Authority without realm restriction.
    pub fn unscoped<E: Into<String>>(entitlement: E) -> Self {
        Self {
            entitlement: entitlement.into(),
            realms: BTreeSet::new(),
        }
    }
}

/// Authorities of a principal.
pub type AuthoritySet = BTreeSet<Authority>;
