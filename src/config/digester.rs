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

use serde::Deserialize;

/// Parameters of the salted digest algorithms. Unsalted algorithms ignore
/// them.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DigesterSection {
    /// Number of times the digest is computed.
    #[serde(default = "default_salt_iterations")]
    pub salt_iterations: u32,

    /// Size of the random salt in bytes.
    #[serde(default = "default_salt_size_bytes")]
    pub salt_size_bytes: usize,

    /// Place the salt after the digest in the encoded value.
    #[serde(default)]
    pub invert_position_of_plain_salt_in_encryption_results: bool,

    /// Append the salt to the message instead of prepending it before
    /// digesting.
    #[serde(default)]
    pub invert_position_of_salt_in_message_before_digesting: bool,
}

impl Default for DigesterSection {
    fn default() -> Self {
        Self {
            salt_iterations: default_salt_iterations(),
            salt_size_bytes: default_salt_size_bytes(),
            invert_position_of_plain_salt_in_encryption_results: false,
            invert_position_of_salt_in_message_before_digesting: false,
        }
    }
}

fn default_salt_iterations() -> u32 {
    1
}

fn default_salt_size_bytes() -> usize {
    8
}
