//! VPortal entry point.
//!
//! This binary is the composition root for the whole workspace:
//!
//! 1. **Parse configuration** from `vportal.toml` and the environment.
//! 2. **Wire observability** with `tracing-subscriber` (env-filtered, JSON
//!    output for hosted runs).
//! 3. **Construct infrastructure** by instantiating the document-store and
//!    identity adapters and injecting them into [`actions::Deps`].
//! 4. **Run the selected command**: `serve` runs the HTTP server, `seed`
//!    writes the stock data through the hosted services and exits.
//!
//! Memory mode (`serve --memory`) swaps in the in-process adapters plus a
//! fixed development token, so the portal runs with no hosted services at all.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use actions::{ActionOutcome, Deps};
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use docstore::{MemoryStore, RestDocStore};
use identity::{RestIdentity, StaticIdentity};
use portal::{Claims, Email, NoopPageCache, Role, UserId};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// The development bearer token registered in memory mode.
const DEV_TOKEN: &str = "dev-token";

#[derive(Debug, Parser)]
#[command(name = "vportal", about = "Internal app portal server")]
struct Cli {
    /// Path to the config file.
    #[arg(long, default_value = "vportal.toml", global = true)]
    config: PathBuf,

    /// Emit logs as JSON lines instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve {
        /// Use in-process adapters instead of the hosted services.
        #[arg(long)]
        memory: bool,
        /// Write the stock seed data before serving (memory mode only).
        #[arg(long, requires = "memory")]
        seed: bool,
    },
    /// Write the stock seed data through the hosted services and exit.
    Seed {
        /// Admin bearer token to authorize the writes.
        #[arg(long)]
        token: String,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    let config = Config::load(&cli.config)?;

    match cli.command {
        Command::Serve { memory, seed } => serve(config, memory, seed).await,
        Command::Seed { token } => seed_hosted(config, &token).await,
    }
}

async fn serve(config: Config, memory: bool, seed: bool) -> Result<()> {
    let deps = if memory {
        let deps = memory_deps(&config).await?;
        if seed {
            expect_ok(actions::seed::seed_data(&deps, DEV_TOKEN).await)?;
        }
        deps
    } else {
        rest_deps(&config)?
    };

    server::serve(&config.listen_addr, Arc::new(deps)).await?;
    Ok(())
}

async fn seed_hosted(config: Config, token: &str) -> Result<()> {
    let deps = rest_deps(&config)?;
    expect_ok(actions::seed::seed_data(&deps, token).await)?;
    tracing::info!("seed complete");
    Ok(())
}

/// Adapters for the hosted document database and identity service.
fn rest_deps(config: &Config) -> Result<Deps> {
    let Some(docstore) = &config.docstore else {
        bail!("[docstore] is not configured; pass --memory for a local run");
    };
    let Some(identity) = &config.identity else {
        bail!("[identity] is not configured; pass --memory for a local run");
    };

    let store = Arc::new(RestDocStore::new(
        &docstore.base_url,
        config::service_key(config::DOCSTORE_KEY_VAR)?,
    ));
    let identity = Arc::new(RestIdentity::new(
        &identity.base_url,
        config::service_key(config::IDENTITY_KEY_VAR)?,
    ));

    Ok(Deps {
        apps: store.clone(),
        categories: store.clone(),
        settings: store.clone(),
        profiles: store,
        verifier: identity.clone(),
        directory: identity,
        pages: Arc::new(NoopPageCache),
        admin_email: config.admin_email()?,
    })
}

/// In-process adapters with one fixed admin token for development.
async fn memory_deps(config: &Config) -> Result<Deps> {
    let admin_email = config.admin_email()?;
    let dev_email = match &admin_email {
        Some(email) => email.clone(),
        None => match Email::new("dev@localhost") {
            Some(email) => email,
            None => bail!("building development email"),
        },
    };
    let Some(uid) = UserId::new("dev") else {
        bail!("building development uid");
    };

    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(
        StaticIdentity::new()
            .with_token(
                DEV_TOKEN,
                Claims {
                    uid,
                    email: dev_email,
                    role: Some(Role::Admin),
                },
            )
            .await,
    );
    tracing::warn!(token = DEV_TOKEN, "memory mode: fixed admin token active");

    Ok(Deps {
        apps: store.clone(),
        categories: store.clone(),
        settings: store.clone(),
        profiles: store,
        verifier: identity.clone(),
        directory: identity,
        pages: Arc::new(NoopPageCache),
        admin_email,
    })
}

fn expect_ok<T: std::fmt::Debug>(outcome: ActionOutcome<T>) -> Result<()> {
    match outcome {
        ActionOutcome::Ok { .. } => Ok(()),
        other => bail!("seed failed: {other:?}"),
    }
}
