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

//! Cipher errors.

use thiserror::Error;

use crate::cipher::CipherAlgorithm;

#[derive(Error, Debug)]
pub enum CipherError {
    /// Unsupported algorithm tag.
    #[error("unknown cipher algorithm {0}")]
    UnknownAlgorithm(String),

    /// Only the reversible algorithm can be decoded.
    #[error("values encoded with {0} cannot be decoded")]
    NotReversible(CipherAlgorithm),

    /// The AES key could not be initialized.
    #[error("invalid cipher key length")]
    InvalidKey,

    /// The AES payload is corrupted or was encoded with another key.
    #[error("cannot decrypt value: bad padding")]
    Unpad,

    /// The encoded value is not valid base64.
    #[error("b64 decoding error")]
    Base64Decode {
        #[from]
        source: base64::DecodeError,
    },

    /// The encoded value is not valid hex.
    #[error("hex decoding error")]
    HexDecode {
        #[from]
        source: hex::FromHexError,
    },

    /// The decoded value is not valid UTF-8.
    #[error("decoded value is not valid utf-8")]
    Utf8 {
        #[from]
        source: std::string::FromUtf8Error,
    },

    /// Bcrypt error.
    #[error(transparent)]
    BCrypt {
        #[from]
        source: bcrypt::BcryptError,
    },

    /// Async task join error.
    #[error(transparent)]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
}
