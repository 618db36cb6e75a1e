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

//! # Domain
//!
//! Authentication requests are always executed on behalf of a domain (a
//! tenant of the platform). The domain is carried by the [`AuthContext`]
//! passed to every operation, together with the per-domain settings source.
use async_trait::async_trait;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{BuilderError, StoreError};

/// Context of a single authentication request.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AuthContext {
    /// Domain the request is executed on.
    pub domain: String,

    /// Username or key of the principal the caller acts on behalf of.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegated_by: Option<String>,
}

impl AuthContext {
    pub fn new<S: Into<String>>(domain: S) -> Self {
        Self {
            domain: domain.into(),
            delegated_by: None,
        }
    }

    /// Act on behalf of the principal.
    pub fn with_delegated_by<S: Into<String>>(mut self, delegating: S) -> Self {
        self.delegated_by = Some(delegating.into());
        self
    }
}

/// Per-domain authentication settings.
#[derive(Builder, Clone, Debug, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into))]
pub struct DomainSettings {
    /// Attributes a login name is matched against, in order.
    pub attributes: Vec<String>,

    /// Account statuses allowed to authenticate.
    pub statuses: Vec<String>,

    /// Stamp the last login time on successful authentication.
    #[builder(default = "true")]
    pub record_last_login: bool,
}

impl DomainSettings {
    pub fn builder() -> DomainSettingsBuilder {
        DomainSettingsBuilder::default()
    }
}

/// Source of the per-domain settings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainSettingsApi: Send + Sync {
    /// Get the settings of the domain the request is executed on.
    async fn settings(&self, ctx: &AuthContext) -> Result<DomainSettings, StoreError>;
}

/// Settings served from the `[authentication]` configuration section for
/// every domain.
#[derive(Clone, Debug)]
pub struct ConfigDomainSettings {
    settings: DomainSettings,
}

impl ConfigDomainSettings {
    pub fn new(config: &Config) -> Self {
        Self {
            settings: DomainSettings {
                attributes: config.authentication.attributes.clone(),
                statuses: config.authentication.statuses.clone(),
                record_last_login: config.authentication.record_last_login,
            },
        }
    }
}

#[async_trait]
impl DomainSettingsApi for ConfigDomainSettings {
    async fn settings(&self, _ctx: &AuthContext) -> Result<DomainSettings, StoreError> {
        Ok(self.settings.clone())
    }
}
