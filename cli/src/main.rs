//! SuAuth license checker
//!
//! Validates license keys against a SuAuth server from the terminal.
//!
//! Usage:
//!   suauth --owner-id <ID> --app-id <ID> --app-name <NAME>
//!   suauth validate ABCD-EFGH-IJKL-MNOP --json
//!   suauth hwid

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use suauth_client::{
    ClientConfig, HardwareFingerprint, ValidationClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS,
};
use suauth_cli::{render_report, run_interactive};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "suauth")]
#[command(about = "Validate SuAuth license keys")]
struct Args {
    /// Account that owns the application
    #[arg(long, env = "SUAUTH_OWNER_ID", default_value = "")]
    owner_id: String,

    /// Application ID
    #[arg(long, env = "SUAUTH_APP_ID", default_value = "")]
    app_id: String,

    /// Application name
    #[arg(long, env = "SUAUTH_APP_NAME", default_value = "")]
    app_name: String,

    /// Application version reported in the user agent
    #[arg(long, env = "SUAUTH_APP_VERSION", default_value = "1.0.0")]
    app_version: String,

    /// Server base URL
    #[arg(long, env = "SUAUTH_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(
        long,
        env = "SUAUTH_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// Enable verbose debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prompt for license keys until 'q' (the default)
    Interactive,

    /// Validate a single key and exit
    Validate {
        /// License key
        license_key: String,

        /// Device fingerprint to validate for, instead of this machine's
        #[arg(long)]
        hwid: Option<String>,

        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print this machine's hardware fingerprint
    Hwid,
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        ClientConfig::new(
            self.owner_id.clone(),
            self.app_id.clone(),
            self.app_name.clone(),
            self.app_version.clone(),
        )
        .with_base_url(self.base_url.clone())
        .with_timeout_secs(self.timeout_secs)
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let log_level = if args.verbose { "debug" } else { "info" };
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    if let Some(Command::Hwid) = args.command {
        println!("{}", HardwareFingerprint::compute());
        return Ok(ExitCode::SUCCESS);
    }

    let client = ValidationClient::new(args.client_config())
        .context("failed to build license client")?;
    debug!("Using server {}", client.config().base_url);

    match args.command {
        Some(Command::Validate {
            license_key,
            hwid,
            json,
        }) => {
            let result = client.validate_with_hwid(&license_key, hwid.as_deref());
            if json {
                let rendered = serde_json::to_string_pretty(&result)
                    .context("failed to render result")?;
                println!("{rendered}");
            } else {
                print!("{}", render_report(&result, Utc::now()));
            }
            Ok(if result.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        _ => {
            info!("SuAuth license checker ready");
            let stdin = io::stdin();
            run_interactive(stdin.lock(), io::stdout(), |key| client.validate(key))
                .context("terminal I/O failed")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
