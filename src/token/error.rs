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

//! Token provider errors.

use thiserror::Error;

use crate::cipher::CipherError;
use crate::error::{BuilderError, StoreError};

/// Token provider error.
#[derive(Error, Debug)]
pub enum TokenProviderError {
    /// No validator is registered for the issuer.
    #[error("no token validator registered for issuer {0}")]
    IssuerNotFound(String),

    /// No key to sign or verify internal tokens with.
    #[error("no signing key configured for the internal issuer")]
    SigningKeyMissing,

    /// The token is not made of three dot separated segments.
    #[error("malformed token")]
    MalformedToken,

    #[error("b64 decoding error")]
    Base64Decode {
        #[from]
        source: base64::DecodeError,
    },

    /// Json serialization error.
    #[error("json serde error: {}", source)]
    Serde {
        /// The source of the error.
        #[from]
        source: serde_json::Error,
    },

    /// JWT encoding or verification error.
    #[error(transparent)]
    Jwt {
        #[from]
        source: jsonwebtoken::errors::Error,
    },

    #[error(transparent)]
    Cipher {
        #[from]
        source: CipherError,
    },

    #[error(transparent)]
    Builder {
        #[from]
        source: BuilderError,
    },

    #[error(transparent)]
    Store {
        #[from]
        source: StoreError,
    },
}
