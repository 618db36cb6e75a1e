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

//! # Cipher service
//!
//! Encoding, verification and decoding of secrets (passwords, keys, the
//! persisted token authorities) with one of the [`CipherAlgorithm`]s:
//!
//! - `AES` is the only reversible algorithm.
//! - `BCRYPT` is an adaptive hash salted by the primitive itself.
//! - the remaining algorithms form the generic digest family. Algorithms whose
//!   digest identifier starts with `S-` are salted with the `[digester]`
//!   parameters.
use dashmap::DashMap;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::task;
use tracing::warn;

pub mod aes;
pub mod digest;
pub mod error;
pub mod types;

use crate::cipher::aes::AesCipher;
use crate::cipher::digest::{Digester, HashFunction};
use crate::config::{Config, DigesterSection};

pub use error::CipherError;
pub use types::CipherAlgorithm;

#[derive(Debug)]
pub struct CipherService {
    aes: AesCipher,
    digester_config: DigesterSection,
    digesters: DashMap<CipherAlgorithm, Arc<Digester>>,
}

impl CipherService {
    pub fn new(config: &Config) -> Self {
        Self {
            aes: AesCipher::new(&config.security.secret_key),
            digester_config: config.digester.clone(),
            digesters: DashMap::new(),
        }
    }

    /// Get the cached digester of the algorithm, creating it on first use.
    fn digester(&self, algorithm: CipherAlgorithm) -> Result<Arc<Digester>, CipherError> {
        if let Some(digester) = self.digesters.get(&algorithm) {
            return Ok(digester.clone());
        }
        let function = HashFunction::for_algorithm(algorithm)
            .ok_or_else(|| CipherError::UnknownAlgorithm(algorithm.digest_id().into()))?;
        Ok(self
            .digesters
            .entry(algorithm)
            .or_insert_with(|| {
                Arc::new(Digester::new(
                    function,
                    algorithm.is_salted(),
                    &self.digester_config,
                ))
            })
            .clone())
    }

    /// Encode the value.
    pub fn encode(&self, value: &str, algorithm: CipherAlgorithm) -> Result<String, CipherError> {
        match algorithm {
            CipherAlgorithm::Aes => self.aes.encrypt(value),
            CipherAlgorithm::Bcrypt => Ok(bcrypt::hash(value, bcrypt::DEFAULT_COST)?),
            other => Ok(self.digester(other)?.digest(value)),
        }
    }

    /// Check whether `encoded` is the encoded form of `value`.
    ///
    /// Never fails: a malformed encoded value or a failing primitive is logged
    /// and reported as not verified.
    pub fn verify(&self, value: &str, algorithm: CipherAlgorithm, encoded: &str) -> bool {
        let result = match algorithm {
            CipherAlgorithm::Aes => self
                .aes
                .encrypt(value)
                .map(|candidate| candidate == encoded),
            CipherAlgorithm::Bcrypt => bcrypt::verify(value, encoded).map_err(Into::into),
            other => self
                .digester(other)
                .and_then(|digester| digester.matches(value, encoded)),
        };
        result.unwrap_or_else(|err| {
            warn!("Could not verify encoded value with {}: {}", algorithm, err);
            false
        })
    }

    /// Decode a value encoded with the reversible algorithm.
    pub fn decode(&self, encoded: &str, algorithm: CipherAlgorithm) -> Result<String, CipherError> {
        match algorithm {
            CipherAlgorithm::Aes => self.aes.decrypt(encoded),
            other => Err(CipherError::NotReversible(other)),
        }
    }
}

/// Verify the secret on the blocking thread pool.
///
/// A failing verification task counts as not verified.
pub async fn verify_blocking(
    cipher: Arc<CipherService>,
    value: SecretString,
    algorithm: CipherAlgorithm,
    encoded: String,
) -> bool {
    // Do not block the main thread with a definitely long running call.
    task::spawn_blocking(move || cipher.verify(value.expose_secret(), algorithm, &encoded))
        .await
        .unwrap_or_else(|err| {
            warn!("Verification task failed: {}", err);
            false
        })
}

/// Encode the secret on the blocking thread pool.
pub async fn encode_blocking(
    cipher: Arc<CipherService>,
    value: SecretString,
    algorithm: CipherAlgorithm,
) -> Result<String, CipherError> {
    task::spawn_blocking(move || cipher.encode(value.expose_secret(), algorithm)).await?
}
