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

use secrecy::SecretString;
use serde::Deserialize;

use super::common::empty_secret;
use crate::cipher::CipherAlgorithm;

/// Keys and well-known principals.
#[derive(Debug, Deserialize, Clone)]
pub struct SecuritySection {
    /// Name of the super-administrator principal.
    #[serde(default = "default_admin_user")]
    pub admin_user: String,

    /// Encoded password of the super-administrator.
    #[serde(default = "empty_secret")]
    pub admin_password: SecretString,

    /// Algorithm `admin_password` is encoded with.
    #[serde(default = "default_admin_password_algorithm")]
    pub admin_password_algorithm: CipherAlgorithm,

    /// Name of the anonymous principal.
    #[serde(default = "default_anonymous_user")]
    pub anonymous_user: String,

    /// Key the anonymous principal authenticates with.
    #[serde(default = "empty_secret")]
    pub anonymous_key: SecretString,

    /// Issuer of the internally produced bearer tokens.
    #[serde(default = "default_jwt_issuer")]
    pub jwt_issuer: String,

    /// HS512 signing key of the internal issuer.
    #[serde(default = "empty_secret")]
    pub jws_key: SecretString,

    /// Key of the reversible (AES) cipher.
    #[serde(default = "empty_secret")]
    pub secret_key: SecretString,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            admin_user: default_admin_user(),
            admin_password: empty_secret(),
            admin_password_algorithm: default_admin_password_algorithm(),
            anonymous_user: default_anonymous_user(),
            anonymous_key: empty_secret(),
            jwt_issuer: default_jwt_issuer(),
            jws_key: empty_secret(),
            secret_key: empty_secret(),
        }
    }
}

fn default_admin_user() -> String {
    "admin".into()
}

fn default_admin_password_algorithm() -> CipherAlgorithm {
    CipherAlgorithm::Sha1
}

fn default_anonymous_user() -> String {
    "anonymous".into()
}

fn default_jwt_issuer() -> String {
    "idm-auth".into()
}
