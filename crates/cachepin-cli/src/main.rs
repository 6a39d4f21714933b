use anyhow::Result;
use cachepin_core::config::CachePinConfig;
use cachepin_core::request::RequestContext;
use cachepin_infrastructure::ConfigService;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cachepin")]
#[command(about = "cachepin - resolve and pin cache versions onto sessions", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the versions current at a point in time
    Resolve {
        /// Version history document (overrides `history_file`)
        #[arg(long)]
        history: Option<PathBuf>,
        /// Reference time, RFC 3339 (defaults to now)
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        /// Only collections locked upon this action
        #[arg(long)]
        action: Option<String>,
        /// Only collections of this cache type
        #[arg(long)]
        cache_type: Option<String>,
    },
    /// Inspect and freeze sessions in the directory store
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Create an empty session and print its id
    Create {
        /// Session id (a UUID is generated when omitted)
        #[arg(long)]
        id: Option<String>,
        /// Pin the session's reference time, RFC 3339
        #[arg(long)]
        fake_now: Option<DateTime<Utc>>,
    },
    /// Print a stored session record
    Show { id: String },
    /// Freeze current versions onto a session
    Freeze {
        id: String,
        /// Only freeze collections locked upon this action
        #[arg(long)]
        action: Option<String>,
        #[arg(long)]
        history: Option<PathBuf>,
    },
    /// Refresh every collection except the ones locked upon an action
    Unfreeze {
        id: String,
        #[arg(long)]
        action: String,
        #[arg(long)]
        history: Option<PathBuf>,
    },
    /// Print whether a session reference is obsolete
    Obsolete { id: String },
}

fn init_tracing(config: &CachePinConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// Request scope for one CLI invocation. Ctrl+C cancels in-flight store calls.
fn request_context() -> RequestContext {
    let token = CancellationToken::new();
    let on_signal = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl+C, cancelling request");
            on_signal.cancel();
        }
    });
    RequestContext::new().with_cancellation(token)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    };
    let config = config_service.get_config()?;
    init_tracing(&config);

    let ctx = request_context();

    match cli.command {
        Commands::Resolve {
            history,
            at,
            action,
            cache_type,
        } => {
            commands::resolve::run(&config, history, at, action, cache_type, &ctx).await?;
        }
        Commands::Session { action } => match action {
            SessionAction::Create { id, fake_now } => {
                commands::session::create(&config, id, fake_now, &ctx).await?
            }
            SessionAction::Show { id } => commands::session::show(&config, &id, &ctx).await?,
            SessionAction::Freeze {
                id,
                action,
                history,
            } => commands::session::freeze(&config, &id, action, history, &ctx).await?,
            SessionAction::Unfreeze {
                id,
                action,
                history,
            } => commands::session::unfreeze(&config, &id, &action, history, &ctx).await?,
            SessionAction::Obsolete { id } => {
                commands::session::obsolete(&config, &id, &ctx).await?
            }
        },
    }

    Ok(())
}
