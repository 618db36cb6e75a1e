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
use std::collections::BTreeMap;
use validator::Validate;

use crate::cipher::CipherAlgorithm;
use crate::error::BuilderError;

/// Principal (user) as seen by the authentication core.
///
/// Only the bookkeeping fields (`failed_logins`, `last_login_date`) are
/// changed here, everything else is owned by the provisioning layer.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize, Validate)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct Principal {
    /// The principal ID.
    #[validate(length(min = 1, max = 64))]
    pub key: String,

    /// The login name. Unique within the domain.
    #[validate(length(min = 1, max = 255))]
    pub username: String,

    /// Encoded password.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Algorithm the password is encoded with.
    #[builder(default)]
    pub cipher_algorithm: Option<CipherAlgorithm>,

    /// Workflow status (`active`, `created`, `suspended`, ...).
    #[builder(default)]
    pub status: Option<String>,

    /// Suspended principals never authenticate.
    #[builder(default)]
    pub suspended: bool,

    /// Number of consecutive failed logins.
    #[builder(default)]
    pub failed_logins: u32,

    /// Time of the last successful login.
    #[builder(default)]
    pub last_login_date: Option<DateTime<Utc>>,

    /// The principal must change the password before doing anything else.
    #[builder(default)]
    pub must_change_password: bool,

    /// Full path of the owning realm.
    #[validate(length(min = 1))]
    pub realm: String,

    /// Keys of the external resources directly assigned to the principal.
    #[builder(default)]
    pub resources: Vec<String>,

    /// Plain attributes, used for attribute based login.
    #[builder(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Principal {
    pub fn builder() -> PrincipalBuilder {
        PrincipalBuilder::default()
    }

    /// Copy of the principal without the encoded password.
    pub fn without_password(&self) -> Self {
        Self {
            password: None,
            ..self.clone()
        }
    }
}
