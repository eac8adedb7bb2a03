use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use reqwest::Url;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use intake_core::FormSession;

mod report;
mod transport;

use report::{apply_override, load_form_data, render_status};
use transport::HttpTransport;

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Care assessment intake form CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show progress, missing fields and warnings for a saved form
    Status {
        /// Form data as JSON (submission payload shape)
        file: PathBuf,
        /// Override a value before evaluating, e.g. serviceUser.firstName=Jane
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,
    },
    /// Exit non-zero unless the form is ready to submit
    Check {
        /// Form data as JSON (submission payload shape)
        file: PathBuf,
        /// Override a value before evaluating
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,
    },
    /// Submit a completed form to the relay
    Submit {
        /// Form data as JSON (submission payload shape)
        file: PathBuf,
        /// Relay endpoint URL
        #[arg(long, env = "INTAKE_RELAY_URL")]
        relay_url: Url,
        /// Bearer token sent to the relay (optional)
        #[arg(long, env = "INTAKE_API_KEY")]
        api_key: Option<String>,
        /// Request timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
        /// Override a value before submitting
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,
    },
}

fn load_session(file: &Path, overrides: &[String]) -> anyhow::Result<FormSession> {
    let mut session = FormSession::from_data(load_form_data(file)?);
    for assignment in overrides {
        apply_override(&mut session, assignment)?;
    }
    Ok(session)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("intake_cli=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Status { file, overrides }) => {
            let session = load_session(&file, &overrides)?;
            print!("{}", render_status(&session));
        }
        Some(Commands::Check { file, overrides }) => {
            let session = load_session(&file, &overrides)?;
            let status = session.status();
            if status.is_submittable() {
                println!("Ready to submit.");
            } else {
                eprintln!(
                    "Not ready: {}/{} required fields complete.",
                    status.completed, status.total_required
                );
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Submit {
            file,
            relay_url,
            api_key,
            timeout_secs,
            overrides,
        }) => {
            let mut session = load_session(&file, &overrides)?;
            let transport =
                HttpTransport::new(relay_url, api_key, Duration::from_secs(timeout_secs))
                    .context("failed to build HTTP client")?;

            match session.submit(&transport).await {
                Ok(message) => println!("{}", message),
                Err(e) => {
                    eprintln!("{}", e);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(ExitCode::SUCCESS)
}
