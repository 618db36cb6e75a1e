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

//! Realm path arithmetic.
//!
//! Realm paths are `/` separated, the root realm being `/`. Ancestry is
//! decided segment-wise: `/a` is an ancestor of `/a/b` but not of `/ab`.
//!
//! Realm sets of an authority may also hold entries that are not paths: the
//! synthetic group owner realms (`{path}@{group}`) and dynamic realm keys.
//! Those never absorb and are never absorbed.
use std::collections::BTreeSet;

/// Path of the root realm.
pub const ROOT_REALM: &str = "/";

/// Separator between the realm path and the group key of a group owner realm.
pub const GROUP_OWNER_SEPARATOR: char = '@';

/// Whether the realm entry is a plain realm path.
pub fn is_path(realm: &str) -> bool {
    realm.starts_with('/') && !realm.contains(GROUP_OWNER_SEPARATOR)
}

fn trimmed(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { ROOT_REALM } else { trimmed }
}

/// Whether `ancestor` is a strict ancestor of `descendant`.
pub fn is_ancestor(ancestor: &str, descendant: &str) -> bool {
    if !is_path(ancestor) || !is_path(descendant) {
        return false;
    }
    let (ancestor, descendant) = (trimmed(ancestor), trimmed(descendant));
    if ancestor == descendant {
        return false;
    }
    ancestor == ROOT_REALM
        || descendant
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Synthetic realm scoping the group owner entitlements to a single group.
pub fn group_owner_realm(realm_path: &str, group_key: &str) -> String {
    format!("{realm_path}{GROUP_OWNER_SEPARATOR}{group_key}")
}

/// Add the realm to the set keeping it minimal.
///
/// A path already covered by itself or by an ancestor is not added. Adding a
/// path drops its descendants from the set. Returns whether the set changed.
pub fn normalizing_add(realms: &mut BTreeSet<String>, realm: &str) -> bool {
    if !is_path(realm) {
        return realms.insert(realm.to_string());
    }
    let realm = trimmed(realm);
    if realms
        .iter()
        .any(|existing| existing == realm || is_ancestor(existing, realm))
    {
        return false;
    }
    realms.retain(|existing| !is_ancestor(realm, existing));
    realms.insert(realm.to_string())
}

/// Split the realm entries into the normalized realm paths and the remaining
/// entries (group owner realms, dynamic realm keys).
pub fn normalize<I, S>(realms: I) -> (BTreeSet<String>, BTreeSet<String>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut paths = BTreeSet::new();
    let mut others = BTreeSet::new();
    for realm in realms {
        let realm = realm.as_ref();
        if is_path(realm) {
            normalizing_add(&mut paths, realm);
        } else {
            others.insert(realm.to_string());
        }
    }
    (paths, others)
}
