//! `settingsd`: the account settings server binary.
//!
//! Usage:
//!   settingsd -c <context-name-or-path> [--listen <addr>]
//!   settingsd -c <context-name-or-path> issue-session --email <e> --name <n>
//!   settingsd -c <context-name-or-path> revoke-sessions --email <e>
//!
//! The context name resolves to `/etc/settingsd/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use account::service::AccountService;
use settingsd::bootstrap;
use settingsd::config::ServerConfig;

/// Account settings server.
#[derive(Parser, Debug)]
#[command(name = "settingsd", about = "Account settings server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true, global = true)]
    config: String,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Provision a user (if new) and print a session token for them.
    IssueSession {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
    },
    /// Sign a user out everywhere by revoking all of their sessions.
    RevokeSessions {
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    bootstrap::verify_config(&server_config)?;

    let stores = bootstrap::open_stores(&server_config, &cli.listen)?;

    if let Some(command) = cli.command {
        let svc = AccountService::new(stores.kv, stores.blob, server_config.account_config());
        return match command {
            Command::IssueSession { email, name } => issue_session(&svc, &email, &name),
            Command::RevokeSessions { email } => revoke_sessions(&svc, &email),
        };
    }

    let app = settingsd::build_app(&server_config, stores)?;

    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("settingsd listening on {}", cli.listen);
    axum::serve(listener, app.router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("settingsd stopped");
    Ok(())
}

fn issue_session(svc: &AccountService, email: &str, name: &str) -> anyhow::Result<()> {
    let user = svc.find_or_create_user(email, name)?;
    let issued = svc.issue_session(&user)?;
    info!(user_id = %user.id, session_id = %issued.session.id, "issued session");

    println!("{}", issued.token);
    eprintln!(
        "Send it as `Cookie: {}=<token>` or `Authorization: Bearer <token>`; expires in {}s.",
        svc.config().cookie_name,
        issued.expires_in
    );
    Ok(())
}

fn revoke_sessions(svc: &AccountService, email: &str) -> anyhow::Result<()> {
    let user = svc.find_user_by_email(email)?;
    let count = svc.revoke_user_sessions(&user.id)?;
    println!("revoked {} session(s) for {}", count, user.email);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
