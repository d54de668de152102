use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use client::net::gateway::{AuthError, AuthGateway};
use client::net::types::{Credentials, SignupData, VerifyRequest};
use client::net::verify::{VerifyClient, VerifyError};
use client::persist::{FileVault, SessionVault};
use client::state::auth::AuthSession;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Verify(#[from] VerifyError),
    #[error("not logged in; run `veritas login` first")]
    NotLoggedIn,
    #[error("invalid JSON output: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "veritas", about = "Veritas news-verification API CLI")]
struct Cli {
    #[arg(long, env = "VERITAS_BASE_URL", default_value = "http://127.0.0.1:5000")]
    base_url: String,

    /// Where the session record is stored between runs.
    #[arg(long, env = "VERITAS_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authenticate and persist the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "VERITAS_PASSWORD")]
        password: String,
    },
    /// Create an account; logs in when the backend returns an active user.
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long, env = "VERITAS_PASSWORD")]
        password: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
    },
    /// End the session and clear the persisted record.
    Logout,
    /// Show the current user after re-validating the cached session.
    Whoami,
    /// Submit an article or URL for verification.
    Verify {
        #[arg(long, conflicts_with = "url", required_unless_present = "url")]
        text: Option<String>,
        #[arg(long)]
        url: Option<String>,
    },
    /// List verification history for the current user.
    History {
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Read the public feed instead of the current user's.
        #[arg(long, default_value_t = false)]
        all: bool,
    },
}

fn session_path(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("veritas")
            .join("session.json")
    })
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let vault = FileVault::new(session_path(cli.session_file));
    let gateway = AuthGateway::new(&cli.base_url, Arc::new(vault) as Arc<dyn SessionVault>)?;
    let session = AuthSession::start(gateway).await;

    match cli.command {
        Command::Login { email, password } => {
            let user = session.login(&Credentials { email, password }).await?;
            print_json(&serde_json::to_value(&user)?)
        }
        Command::Signup {
            email,
            password,
            first_name,
            last_name,
        } => {
            let outcome = session
                .signup(&SignupData {
                    email,
                    password,
                    first_name,
                    last_name,
                })
                .await?;
            if outcome.user.is_none() {
                eprintln!("account created; confirm your email before logging in");
            }
            print_json(&json!({ "user": outcome.user, "session": outcome.session }))
        }
        Command::Logout => {
            session.logout().await;
            eprintln!("logged out");
            Ok(())
        }
        Command::Whoami => {
            let user = session.user().ok_or(CliError::NotLoggedIn)?;
            print_json(&serde_json::to_value(&user)?)
        }
        Command::Verify { text, url } => {
            let user_id = session.user().map(|user| user.id);
            let request = match (text, url) {
                (Some(text), _) => VerifyRequest::from_text(text, user_id),
                (None, Some(url)) => VerifyRequest::from_url(url, user_id),
                (None, None) => unreachable!("clap enforces one input"),
            };
            let verdict = VerifyClient::new(&cli.base_url)?.verify(&request).await?;
            print_json(&serde_json::to_value(&verdict)?)
        }
        Command::History { limit, all } => {
            let user = session.user();
            let user_id = if all {
                None
            } else {
                Some(user.ok_or(CliError::NotLoggedIn)?.id)
            };
            let records = VerifyClient::new(&cli.base_url)?
                .history(user_id.as_deref(), limit)
                .await?;
            print_json(&serde_json::to_value(&records)?)
        }
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
