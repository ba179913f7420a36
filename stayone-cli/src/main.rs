use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use stayone::{
    ApiResponse, Credentials, FileSessionStore, RequestOptions, SessionStore, StayClient,
    BASE_URL_ENV,
};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

mod hooks;

#[derive(Parser, Debug)]
#[command(version, about = "Talk to the Stay One Korea booking API.")]
struct Cli {
    /// API base URL
    #[arg(long, env = BASE_URL_ENV)]
    base_url: String,

    /// Maximum tracing verbosity to enable: error|warn|info|debug|trace
    #[arg(long, default_value_t = LevelFilter::WARN, value_parser = clap::value_parser!(LevelFilter))]
    level: LevelFilter,

    /// File recording the advisory "logged in" flag
    #[arg(long, env = "STAYONE_SESSION_FILE", default_value = ".stayone-session")]
    session_file: PathBuf,

    /// Sign in with this email before running the command
    #[arg(long, env = "STAYONE_EMAIL")]
    email: Option<String>,

    /// Password for --email; prompted for when absent
    #[arg(long, env = "STAYONE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether an email address is free for sign-up
    EmailCheck { email: String },
    /// GET an endpoint and print its data
    Get {
        path: String,
        /// Anonymous endpoint: no 401/403 interception
        #[arg(long)]
        public: bool,
    },
    /// POST a JSON body to an endpoint and print its data
    Post {
        path: String,
        /// JSON body
        body: String,
        /// Anonymous endpoint: no 401/403 interception
        #[arg(long)]
        public: bool,
    },
    /// DELETE an endpoint
    Delete { path: String },
    /// Sign out
    Logout,
    /// Print the advisory session flag
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.level);

    let store = Arc::new(FileSessionStore::new(&cli.session_file));
    let hooks = Arc::new(hooks::StderrHooks);

    let mut builder = StayClient::builder();
    builder
        .base_url(cli.base_url.as_str())
        .session_store(store.clone())
        .navigator(hooks.clone())
        .notifier(hooks)
        .user_agent_extra(concat!("stayone-cli/", env!("CARGO_PKG_VERSION")));
    if let Some(secs) = cli.timeout {
        builder.request_timeout(Duration::from_secs(secs));
    }
    let client = builder.build().context("failed to configure the API client")?;
    debug!(base_url = %client.base_url(), "client ready");

    if let Some(email) = &cli.email {
        let password = match &cli.password {
            Some(p) => p.clone(),
            None => rpassword::prompt_password(format!("Password for {email}: "))
                .context("failed to read password")?,
        };
        let resp: ApiResponse<Value> = client
            .login(&Credentials::new(email.as_str(), password))
            .await
            .context("sign-in failed")?;
        if !client.is_logged_in() {
            anyhow::bail!(
                "sign-in answered with code {} ({})",
                resp.code.map(|c| c.to_string()).unwrap_or_default(),
                resp.message
            );
        }
        info!(%email, "signed in");
    }

    match cli.command {
        Command::EmailCheck { email } => {
            print_data(client.email_check(&email).await?)?;
        }
        Command::Get { path, public } => {
            let opts = RequestOptions::default().skip_auth(public);
            print_data(client.get_with(&path, opts).await?)?;
        }
        Command::Post { path, body, public } => {
            let body: Value = serde_json::from_str(&body).context("body is not valid JSON")?;
            let opts = RequestOptions::default().skip_auth(public);
            print_data(client.post_with(&path, &body, opts).await?)?;
        }
        Command::Delete { path } => {
            print_data(client.delete(&path).await?)?;
        }
        Command::Logout => {
            client.logout().await?;
            println!("signed out");
        }
        Command::Status => {
            let state = if store.is_logged_in() {
                "signed in"
            } else {
                "signed out"
            };
            println!("{state} ({})", store.path().display());
        }
    }

    Ok(())
}

fn print_data(resp: ApiResponse<Value>) -> Result<()> {
    debug!(status = %resp.status, code = ?resp.code, message = %resp.message, "reply");
    println!("{}", serde_json::to_string_pretty(&resp.data)?);
    Ok(())
}

fn init_tracing(level: LevelFilter) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}
