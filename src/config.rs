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

//! # Configuration
//!
//! Parsing of the INI configuration file.
use config::{File, FileFormat};
use eyre::{Report, WrapErr};
use serde::Deserialize;
use std::path::PathBuf;

mod authentication;
mod common;
mod digester;
mod entitlement;
mod security;

pub use authentication::AuthenticationSection;
pub use common::csv;
pub use digester::DigesterSection;
pub use entitlement::EntitlementSection;
pub use security::SecuritySection;

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    /// Default per-domain authentication settings.
    #[serde(default)]
    pub authentication: AuthenticationSection,

    /// Salted digest parameters.
    #[serde(default)]
    pub digester: DigesterSection,

    /// Entitlements declared in addition to the built-in catalogue.
    #[serde(default)]
    pub entitlement: EntitlementSection,

    /// Keys and well-known principals.
    #[serde(default)]
    pub security: SecuritySection,
}

impl Config {
    pub fn new(path: PathBuf) -> Result<Self, Report> {
        let mut builder = config::Config::builder();

        if std::path::Path::new(&path).is_file() {
            builder = builder.add_source(File::from(path).format(FileFormat::Ini));
        }

        builder.try_into()
    }
}

impl TryFrom<config::ConfigBuilder<config::builder::DefaultState>> for Config {
    type Error = Report;
    fn try_from(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, Self::Error> {
        let mut builder = builder;
        builder = builder
            .set_default("authentication.attributes", "username")?
            .set_default("authentication.statuses", "active")?
            .set_default("authentication.record_last_login", "true")?
            .set_default("digester.salt_iterations", "1")?
            .set_default("digester.salt_size_bytes", "8")?
            .set_default(
                "digester.invert_position_of_plain_salt_in_encryption_results",
                "false",
            )?
            .set_default(
                "digester.invert_position_of_salt_in_message_before_digesting",
                "false",
            )?
            .set_default("security.admin_user", "admin")?
            .set_default("security.admin_password_algorithm", "SHA1")?
            .set_default("security.anonymous_user", "anonymous")?
            .set_default("security.jwt_issuer", "idm-auth")?;

        builder
            .build()
            .wrap_err("Failed to read configuration file")?
            .try_deserialize()
            .wrap_err("Failed to parse configuration file")
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::cipher::CipherAlgorithm;

    #[test]
    fn test_defaults() {
        let conf = Config::try_from(config::Config::builder()).unwrap();
        assert_eq!("admin", conf.security.admin_user);
        assert_eq!("anonymous", conf.security.anonymous_user);
        assert_eq!("idm-auth", conf.security.jwt_issuer);
        assert_eq!(
            CipherAlgorithm::Sha1,
            conf.security.admin_password_algorithm
        );
        assert_eq!(vec!["username"], conf.authentication.attributes);
        assert_eq!(vec!["active"], conf.authentication.statuses);
        assert!(conf.authentication.record_last_login);
        assert_eq!(1, conf.digester.salt_iterations);
        assert_eq!(8, conf.digester.salt_size_bytes);
        assert!(conf.entitlement.extra.is_empty());
    }

    #[test]
    fn test_override() {
        let builder = config::Config::builder()
            .set_override("authentication.attributes", "email, username")
            .unwrap()
            .set_override("authentication.statuses", "active,created")
            .unwrap()
            .set_override("security.admin_password_algorithm", "SSHA256")
            .unwrap()
            .set_override("entitlement.extra", "REPORT_RUN")
            .unwrap();
        let conf = Config::try_from(builder).unwrap();
        assert_eq!(vec!["email", "username"], conf.authentication.attributes);
        assert_eq!(vec!["active", "created"], conf.authentication.statuses);
        assert_eq!(
            CipherAlgorithm::Ssha256,
            conf.security.admin_password_algorithm
        );
        assert_eq!(vec!["REPORT_RUN"], conf.entitlement.extra);
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let builder = config::Config::builder()
            .set_override("security.admin_password_algorithm", "ROT13")
            .unwrap();
        assert!(Config::try_from(builder).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[security]
admin_password = 5BAA61E4C9B93F3F0682250B6CF8331B7EE68FD8
secret_key = 1abcdefghilmnopqrstuvz2!
jws_key = ZW7pRmwW2THANeQFVMkpzR35DNHrOsy5

[digester]
salt_iterations = 3
salt_size_bytes = 16

[authentication]
record_last_login = false
"#
        )
        .unwrap();
        let conf = Config::new(file.path().to_path_buf()).unwrap();
        assert_eq!(
            "5BAA61E4C9B93F3F0682250B6CF8331B7EE68FD8",
            conf.security.admin_password.expose_secret()
        );
        assert_eq!(
            "1abcdefghilmnopqrstuvz2!",
            conf.security.secret_key.expose_secret()
        );
        assert_eq!(3, conf.digester.salt_iterations);
        assert_eq!(16, conf.digester.salt_size_bytes);
        assert!(!conf.authentication.record_last_login);
        assert_eq!(vec!["username"], conf.authentication.attributes);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let conf = Config::new(PathBuf::from("/nonexistent/idm-auth.conf")).unwrap();
        assert_eq!("admin", conf.security.admin_user);
        assert!(conf.security.jws_key.expose_secret().is_empty());
    }
}
