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

//! # Audit
//!
//! Every authentication attempt is reported to the audit sink. Recording is
//! best effort: a failing sink never changes the authentication outcome.
use async_trait::async_trait;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::BuilderError;

/// Category of the authentication events.
pub const LOGIC_CATEGORY: &str = "LOGIC";
/// Subcategory of the authentication events.
pub const AUTHENTICATION_SUBCATEGORY: &str = "AUTHENTICATION";
/// Event name of an authentication attempt.
pub const LOGIN_EVENT: &str = "login";

#[derive(Error, Debug)]
pub enum AuditError {
    /// The sink rejected the event.
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),

    /// Json serialization error.
    #[error("json serde error: {}", source)]
    Serde {
        /// The source of the error.
        #[from]
        source: serde_json::Error,
    },
}

/// Result of the audited operation.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditOutcome {
    Success,
    Failure,
}

/// Audit record of an authentication attempt.
///
/// Credentials are never part of the record.
#[derive(Builder, Clone, Debug, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct AuditEvent {
    /// Domain the attempt was made on.
    pub domain: String,

    /// Who attempted to authenticate.
    pub who: String,

    #[builder(default = "LOGIC_CATEGORY.into()")]
    pub category: String,

    #[builder(default = "AUTHENTICATION_SUBCATEGORY.into()")]
    pub subcategory: String,

    #[builder(default = "LOGIN_EVENT.into()")]
    pub event: String,

    pub outcome: AuditOutcome,

    /// State before the operation.
    #[builder(default)]
    pub before: Option<Value>,

    /// State after the operation, or the failure.
    #[builder(default)]
    pub after: Option<Value>,

    /// Inputs of the operation.
    #[builder(default)]
    pub inputs: Vec<Value>,
}

impl AuditEvent {
    pub fn builder() -> AuditEventBuilder {
        AuditEventBuilder::default()
    }
}

/// Audit event recorder.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Record the event.
    async fn record(&self, event: AuditEvent) -> Result<(), AuditError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults() {
        let event = AuditEvent::builder()
            .domain("Master")
            .who("alice")
            .outcome(AuditOutcome::Success)
            .inputs(vec![json!("alice")])
            .build()
            .unwrap();
        assert_eq!("LOGIC", event.category);
        assert_eq!("AUTHENTICATION", event.subcategory);
        assert_eq!("login", event.event);
        assert_eq!(
            json!({
                "domain": "Master",
                "who": "alice",
                "category": "LOGIC",
                "subcategory": "AUTHENTICATION",
                "event": "login",
                "outcome": "SUCCESS",
                "before": null,
                "after": null,
                "inputs": ["alice"]
            }),
            serde_json::to_value(&event).unwrap()
        );
    }
}
