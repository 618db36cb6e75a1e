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

//! # Error
//!
//! Errors shared by the individual providers.
use thiserror::Error;

/// Error produced by the `derive_builder` generated builders.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// A required field has not been set.
    #[error("field {0} must be initialized")]
    UninitializedField(String),

    /// Validation of the built value failed.
    #[error("{0}")]
    Validation(String),
}

impl From<derive_builder::UninitializedFieldError> for BuilderError {
    fn from(ufe: derive_builder::UninitializedFieldError) -> Self {
        Self::UninitializedField(ufe.field_name().to_string())
    }
}

impl From<String> for BuilderError {
    fn from(s: String) -> Self {
        Self::Validation(s)
    }
}

/// Error of a persistence collaborator (principal, role, realm or token
/// store, domain settings).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or refused the operation.
    #[error("store is unavailable: {0}")]
    Unavailable(String),

    /// The stored data could not be (de)serialized.
    #[error("data serialization error")]
    Serde {
        /// The source of the error.
        #[from]
        source: serde_json::Error,
    },

    /// Stored record violates a constraint of the store.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Building a domain object from the stored data failed.
    #[error(transparent)]
    Builder {
        /// The source of the error.
        #[from]
        source: BuilderError,
    },
}
