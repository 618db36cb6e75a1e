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

//! Operator tool of the cipher service.
//!
//! Produces and checks the encoded secrets stored in the configuration, such
//! as the `[security] admin_password` value. When the value is not given on
//! the command line it is read from the standard input.

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Report, Result};
use eyre::WrapErr;
use secrecy::{ExposeSecret, SecretString};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{
    Layer,
    filter::{LevelFilter, Targets},
    prelude::*,
};

use idm_auth::cipher::{CipherAlgorithm, CipherService};
use idm_auth::config::Config;

/// Encode, verify and decode secrets the way the authentication core does.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the config file.
    #[arg(short, long, default_value = "/etc/idm/idm-auth.conf")]
    config: PathBuf,

    /// Verbosity level. Repeat to increase level.
    #[arg(short, long, global=true, action = clap::ArgAction::Count, display_order = 920)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Encode the value.
    Encode {
        /// Algorithm (SHA1, SSHA256, AES, BCRYPT, ...).
        algorithm: CipherAlgorithm,
        /// Value to encode.
        value: Option<String>,
    },
    /// Check the value against the encoded one.
    ///
    /// The value comes last so it can be left out and read from stdin.
    Verify {
        /// Algorithm the value is encoded with.
        algorithm: CipherAlgorithm,
        /// Encoded value.
        encoded: String,
        /// Value to check.
        value: Option<String>,
    },
    /// Decode an AES encoded value.
    Decode {
        /// Encoded value.
        encoded: String,
    },
}

/// Take the value from the argument or the first line of stdin.
fn read_value(value: Option<String>) -> Result<SecretString, Report> {
    match value {
        Some(value) => Ok(SecretString::from(value)),
        None => {
            let mut line = String::new();
            io::stdin()
                .lock()
                .read_line(&mut line)
                .wrap_err("Could not read the value from stdin")?;
            Ok(SecretString::from(
                line.trim_end_matches(['\r', '\n']).to_string(),
            ))
        }
    }
}

fn main() -> Result<ExitCode, Report> {
    color_eyre::install()?;
    let args = Args::parse();

    let filter = Targets::new().with_default(match args.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    });

    let log_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(filter);

    // build the tracing registry
    tracing_subscriber::registry().with(log_layer).init();

    debug!("Loading the configuration from {}", args.config.display());
    let cfg = Config::new(args.config)?;
    let cipher = CipherService::new(&cfg);

    match args.command {
        Command::Encode { algorithm, value } => {
            let value = read_value(value)?;
            info!("Encoding with {}", algorithm);
            println!("{}", cipher.encode(value.expose_secret(), algorithm)?);
        }
        Command::Verify {
            algorithm,
            encoded,
            value,
        } => {
            let value = read_value(value)?;
            let verified = cipher.verify(value.expose_secret(), algorithm, &encoded);
            println!("{verified}");
            if !verified {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Decode { encoded } => {
            println!(
                "{}",
                cipher
                    .decode(&encoded, CipherAlgorithm::Aes)
                    .wrap_err("Could not decode the value")?
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}
