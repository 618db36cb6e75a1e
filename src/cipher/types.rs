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

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cipher::error::CipherError;

/// Algorithm a secret is encoded with.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum CipherAlgorithm {
    #[serde(rename = "SHA")]
    Sha,
    #[serde(rename = "SHA1")]
    Sha1,
    #[serde(rename = "SHA256")]
    Sha256,
    #[serde(rename = "SHA512")]
    Sha512,
    /// Reversible AES-128 cipher.
    #[serde(rename = "AES")]
    Aes,
    #[serde(rename = "SMD5")]
    Smd5,
    #[serde(rename = "SSHA")]
    Ssha,
    #[serde(rename = "SSHA1")]
    Ssha1,
    #[serde(rename = "SSHA256")]
    Ssha256,
    #[serde(rename = "SSHA512")]
    Ssha512,
    /// Adaptive bcrypt hash.
    #[serde(rename = "BCRYPT")]
    Bcrypt,
}

/// Prefix of the salted digest identifiers.
pub const SALTED_PREFIX: &str = "S-";

impl CipherAlgorithm {
    /// All supported algorithms.
    pub const ALL: [CipherAlgorithm; 11] = [
        Self::Sha,
        Self::Sha1,
        Self::Sha256,
        Self::Sha512,
        Self::Aes,
        Self::Smd5,
        Self::Ssha,
        Self::Ssha1,
        Self::Ssha256,
        Self::Ssha512,
        Self::Bcrypt,
    ];

    /// Tag the algorithm is stored and configured as.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Sha => "SHA",
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
            Self::Aes => "AES",
            Self::Smd5 => "SMD5",
            Self::Ssha => "SSHA",
            Self::Ssha1 => "SSHA1",
            Self::Ssha256 => "SSHA256",
            Self::Ssha512 => "SSHA512",
            Self::Bcrypt => "BCRYPT",
        }
    }

    /// Identifier of the underlying primitive.
    pub fn digest_id(&self) -> &'static str {
        match self {
            Self::Sha | Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
            Self::Sha512 => "SHA-512",
            Self::Aes => "AES",
            Self::Smd5 => "S-MD5",
            Self::Ssha | Self::Ssha1 => "S-SHA-1",
            Self::Ssha256 => "S-SHA-256",
            Self::Ssha512 => "S-SHA-512",
            Self::Bcrypt => "BCRYPT",
        }
    }

    /// Whether the algorithm is a salted digest.
    pub fn is_salted(&self) -> bool {
        self.digest_id().starts_with(SALTED_PREFIX)
    }

    /// Whether the algorithm belongs to the generic digest family.
    pub fn is_digest(&self) -> bool {
        !matches!(self, Self::Aes | Self::Bcrypt)
    }
}

impl fmt::Display for CipherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CipherAlgorithm {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.tag() == s)
            .ok_or_else(|| CipherError::UnknownAlgorithm(s.to_string()))
    }
}
