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

//! Selection of the back-ends eligible for pass-through authentication.
//!
//! Every account policy with a non-empty pass-through resource list
//! contributes: the policies of the resources assigned to the principal and
//! the policies of the principal realm and its ancestors. The eligible
//! back-ends are the intersection of the contributed lists.
use tracing::debug;

use crate::domain::AuthContext;
use crate::error::StoreError;
use crate::identity::Principal;
use crate::realm::{ExternalBackend, RealmStore};

/// Intersect the non-empty lists.
///
/// The order of the first contributing list is kept. Once the intersection is
/// empty it stays empty.
pub fn intersect<'a, I>(lists: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut result: Option<Vec<String>> = None;
    for list in lists.into_iter().filter(|list| !list.is_empty()) {
        result = Some(match result {
            None => {
                let mut first: Vec<String> = Vec::with_capacity(list.len());
                for key in list {
                    if !first.contains(key) {
                        first.push(key.clone());
                    }
                }
                first
            }
            Some(current) => current
                .into_iter()
                .filter(|key| list.contains(key))
                .collect(),
        });
    }
    result.unwrap_or_default()
}

/// Get the back-ends the password of the principal may be verified on.
#[tracing::instrument(level = "debug", skip_all, fields(principal = %principal.username))]
pub async fn passthrough_backends(
    ctx: &AuthContext,
    store: &dyn RealmStore,
    principal: &Principal,
) -> Result<Vec<ExternalBackend>, StoreError> {
    let mut lists: Vec<Vec<String>> = Vec::new();
    for key in &principal.resources {
        if let Some(resource) = store.find_backend(ctx, key).await? {
            lists.push(resource.passthrough_resources().to_vec());
        }
    }
    for realm in store.find_ancestors(ctx, &principal.realm).await? {
        lists.push(realm.passthrough_resources().to_vec());
    }

    let mut backends = Vec::new();
    for key in intersect(lists.iter().map(Vec::as_slice)) {
        match store.find_backend(ctx, &key).await? {
            Some(backend) => backends.push(backend),
            None => debug!("Pass-through resource {} does not exist", key),
        }
    }
    Ok(backends)
}
