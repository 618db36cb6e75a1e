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

//! # Identity management: authentication and entitlement core
//!
//! This crate decides, for every incoming request, *who the caller is* and
//! *what they are allowed to touch*. It is the piece of an identity
//! management platform that sits between the request dispatch layer and the
//! persistence layer: everything else (administrative CRUD, provisioning,
//! the web console) talks to it only through the authenticated principal and
//! its authority set.
//!
//! The core is built from the following providers:
//!
//! - [`cipher::CipherService`] encodes, verifies and decodes secrets with a
//!   reversible cipher (AES), salted and unsalted digests, or BCRYPT.
//!
//! - [`entitlement::EntitlementResolver`] turns role assignments and group
//!   ownerships into the set of `(entitlement, realms)` authorities.
//!
//! - [`passthrough::PassthroughAuthenticator`] verifies a password against
//!   the internal store and then against the external back-ends eligible by
//!   the realm and resource account policies.
//!
//! - [`token::TokenIssuerRegistry`] routes a bearer token to the validator
//!   registered for its issuer.
//!
//! - [`auth::AuthenticationProvider`] orchestrates all of the above for the
//!   password and bearer token credential kinds.
//!
//! A principal may also act on behalf of another one through a
//! [`delegation::Delegation`], named in the request context.
//!
//! Persistence, connector invocation, per-domain configuration parameters and
//! auditing are collaborators consumed through the traits bundled by
//! [`provider::Provider`].

pub mod audit;
pub mod auth;
pub mod cipher;
pub mod config;
pub mod delegation;
pub mod domain;
pub mod entitlement;
pub mod error;
pub mod identity;
pub mod passthrough;
pub mod provider;
pub mod realm;
pub mod token;

