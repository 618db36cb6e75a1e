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

use super::common::csv;

/// Authentication settings served to every domain.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AuthenticationSection {
    /// Principal attributes a login name is matched against, in order.
    #[serde(default = "default_attributes", deserialize_with = "csv")]
    pub attributes: Vec<String>,

    /// Account statuses allowed to authenticate.
    #[serde(default = "default_statuses", deserialize_with = "csv")]
    pub statuses: Vec<String>,

    /// Stamp the last login time on every successful authentication.
    #[serde(default = "default_record_last_login")]
    pub record_last_login: bool,
}

impl Default for AuthenticationSection {
    fn default() -> Self {
        Self {
            attributes: default_attributes(),
            statuses: default_statuses(),
            record_last_login: default_record_last_login(),
        }
    }
}

fn default_attributes() -> Vec<String> {
    vec!["username".into()]
}

fn default_statuses() -> Vec<String> {
    vec!["active".into()]
}

fn default_record_last_login() -> bool {
    true
}
