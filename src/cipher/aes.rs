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

//! Reversible AES-128 cipher.
//!
//! Values are encrypted with AES-128 in ECB mode with PKCS#7 padding and
//! encoded with the standard base64 alphabet.
use ::aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit, block_padding::Pkcs7};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::distr::{Alphanumeric, SampleString};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use tracing::warn;

use crate::cipher::error::CipherError;

type Aes128EcbEnc = ecb::Encryptor<::aes::Aes128>;
type Aes128EcbDec = ecb::Decryptor<::aes::Aes128>;

/// AES-128 key length in bytes.
pub const KEY_LENGTH: usize = 16;

#[derive(Clone)]
pub struct AesCipher {
    key: [u8; KEY_LENGTH],
}

impl fmt::Debug for AesCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesCipher").finish_non_exhaustive()
    }
}

impl AesCipher {
    /// Build the cipher with the configured key.
    ///
    /// A key shorter than [`KEY_LENGTH`] is padded with random alphanumeric
    /// characters, so values encoded by another process instance with the
    /// same short key cannot be decoded. A longer key is truncated.
    pub fn new(secret: &SecretString) -> Self {
        Self {
            key: normalize_key(secret.expose_secret().as_bytes()),
        }
    }

    pub fn encrypt(&self, value: &str) -> Result<String, CipherError> {
        let encryptor =
            Aes128EcbEnc::new_from_slice(&self.key).map_err(|_| CipherError::InvalidKey)?;
        Ok(STANDARD.encode(encryptor.encrypt_padded_vec_mut::<Pkcs7>(value.as_bytes())))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String, CipherError> {
        let payload = STANDARD.decode(encoded)?;
        let decryptor =
            Aes128EcbDec::new_from_slice(&self.key).map_err(|_| CipherError::InvalidKey)?;
        let plain = decryptor
            .decrypt_padded_vec_mut::<Pkcs7>(&payload)
            .map_err(|_| CipherError::Unpad)?;
        Ok(String::from_utf8(plain)?)
    }
}

fn normalize_key(raw: &[u8]) -> [u8; KEY_LENGTH] {
    let mut key = [0u8; KEY_LENGTH];
    if raw.len() < KEY_LENGTH {
        warn!(
            "The configured secret key is shorter than {} bytes, padding it with random characters. \
            Values encoded before a restart will not be decodable.",
            KEY_LENGTH
        );
        let padding = Alphanumeric.sample_string(&mut rand::rng(), KEY_LENGTH - raw.len());
        key[..raw.len()].copy_from_slice(raw);
        key[raw.len()..].copy_from_slice(padding.as_bytes());
    } else {
        key.copy_from_slice(&raw[..KEY_LENGTH]);
    }
    key
}
