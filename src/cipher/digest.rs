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

//! Generic message digests.
//!
//! The encoded value is the upper-case hex form of `salt || digest` (or
//! `digest || salt` with
//! `invert_position_of_plain_salt_in_encryption_results`). The digest is
//! `H(salt || message)` (or `H(message || salt)`), hashed again
//! `salt_iterations - 1` times. Unsalted algorithms use a single iteration and
//! an empty salt, so their encoded value is the plain hex digest.
use md5::Md5;
use rand::RngCore;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use crate::cipher::{CipherAlgorithm, error::CipherError};
use crate::config::DigesterSection;

/// Hash primitive behind a digest algorithm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HashFunction {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

impl HashFunction {
    pub fn for_algorithm(algorithm: CipherAlgorithm) -> Option<Self> {
        match algorithm {
            CipherAlgorithm::Smd5 => Some(Self::Md5),
            CipherAlgorithm::Sha
            | CipherAlgorithm::Sha1
            | CipherAlgorithm::Ssha
            | CipherAlgorithm::Ssha1 => Some(Self::Sha1),
            CipherAlgorithm::Sha256 | CipherAlgorithm::Ssha256 => Some(Self::Sha256),
            CipherAlgorithm::Sha512 | CipherAlgorithm::Ssha512 => Some(Self::Sha512),
            CipherAlgorithm::Aes | CipherAlgorithm::Bcrypt => None,
        }
    }

    /// Digest length in bytes.
    pub fn output_size(&self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    fn hash(&self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            Self::Md5 => hash_with::<Md5>(parts),
            Self::Sha1 => hash_with::<Sha1>(parts),
            Self::Sha256 => hash_with::<Sha256>(parts),
            Self::Sha512 => hash_with::<Sha512>(parts),
        }
    }
}

fn hash_with<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().to_vec()
}

#[derive(Clone, Debug, PartialEq)]
pub struct Digester {
    function: HashFunction,
    iterations: u32,
    salt_size: usize,
    salt_after_digest: bool,
    salt_after_message: bool,
}

impl Digester {
    pub fn new(function: HashFunction, salted: bool, conf: &DigesterSection) -> Self {
        if salted {
            Self {
                function,
                iterations: conf.salt_iterations,
                salt_size: conf.salt_size_bytes,
                salt_after_digest: conf.invert_position_of_plain_salt_in_encryption_results,
                salt_after_message: conf.invert_position_of_salt_in_message_before_digesting,
            }
        } else {
            Self {
                function,
                iterations: 1,
                salt_size: 0,
                salt_after_digest: false,
                salt_after_message: false,
            }
        }
    }

    /// Digest the message with a fresh random salt.
    pub fn digest(&self, message: &str) -> String {
        let mut salt = vec![0u8; self.salt_size];
        rand::rng().fill_bytes(&mut salt);
        let digest = self.compute(message.as_bytes(), &salt);

        let mut out = Vec::with_capacity(salt.len() + digest.len());
        if self.salt_after_digest {
            out.extend_from_slice(&digest);
            out.extend_from_slice(&salt);
        } else {
            out.extend_from_slice(&salt);
            out.extend_from_slice(&digest);
        }
        hex::encode_upper(out)
    }

    /// Check whether the encoded value is a digest of the message.
    pub fn matches(&self, message: &str, encoded: &str) -> Result<bool, CipherError> {
        let raw = hex::decode(encoded)?;
        let digest_size = self.function.output_size();
        if raw.len() != self.salt_size + digest_size {
            return Ok(false);
        }
        let (salt, digest) = if self.salt_after_digest {
            let (digest, salt) = raw.split_at(digest_size);
            (salt, digest)
        } else {
            raw.split_at(self.salt_size)
        };
        Ok(self.compute(message.as_bytes(), salt) == digest)
    }

    fn compute(&self, message: &[u8], salt: &[u8]) -> Vec<u8> {
        let mut digest = if self.salt_after_message {
            self.function.hash(&[message, salt])
        } else {
            self.function.hash(&[salt, message])
        };
        for _ in 1..self.iterations {
            digest = self.function.hash(&[digest.as_slice()]);
        }
        digest
    }
}
