//! # thinqd, the thinq-bridge daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (CLI args, env vars, config file)
//! - Install the tracing subscriber with a reloadable filter
//! - Construct the cloud client, the state file store and, when configured,
//!   the Jeedom client (adapters)
//! - Restore the saved session, or seed it from the Jeedom plugin settings
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve until SIGINT, or run one Jeedom sync with
//!   `thinqd sync`
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod cli;
mod config;
mod logging;

use std::sync::Arc;

use anyhow::Context;

use thinq_bridge_adapter_http_axum::state::AppState;
use thinq_bridge_adapter_jeedom::JeedomClient;
use thinq_bridge_adapter_state_file::StateFileStore;
use thinq_bridge_adapter_virtual::VirtualCloud;
use thinq_bridge_app::services::jeedom_sync::JeedomSync;
use thinq_bridge_app::services::monitor_service::MonitorService;
use thinq_bridge_app::services::session_service::SessionService;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::logging::ReloadLogControl;

type Session = SessionService<VirtualCloud, StateFileStore>;
type Bridge = JeedomSync<VirtualCloud, StateFileStore, JeedomClient>;
type State = AppState<VirtualCloud, StateFileStore, JeedomClient, ReloadLogControl>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse(std::env::args().skip(1))?;
    if cli.help {
        println!("{}", cli::USAGE);
        return Ok(());
    }

    let config = Config::load(&cli).context("loading config")?;
    let log = logging::init(config.log_filter()).context("installing tracing subscriber")?;

    // Adapters
    let cloud = VirtualCloud::default().with_warmup(config.cloud.warmup_polls);
    let store = StateFileStore::new(&config.state.dir);

    // Services
    let session: Arc<Session> = Arc::new(SessionService::new(cloud, store));
    let restored = session.restore().await.context("restoring session state")?;

    let jeedom = match config.jeedom() {
        Some((ip, key)) => {
            let client = JeedomClient::new(ip, key).context("building jeedom client")?;
            tracing::info!(url = %client.url(), "jeedom configured");
            let monitor = MonitorService::new(Arc::clone(&session));
            Some(Arc::new(JeedomSync::new(client, monitor)))
        }
        None => None,
    };

    if let Some(sync) = &jeedom {
        tracing::info!(name = %sync.health().await, "jeedom health");
        if !restored {
            seed(sync, &session).await;
        }
    }

    match cli.command {
        Command::Sync => {
            let sync = jeedom.context("sync needs --key (or a [jeedom] section)")?;
            run_sync(&sync, cli.id.as_deref()).await
        }
        Command::Serve => {
            let mut state: State = AppState::new(Arc::clone(&session), log)
                .with_debug(config.logging.verbose);
            if let Some(sync) = jeedom {
                state = state.with_jeedom(sync);
            }
            serve(state, &config.bind_addr()).await
        }
    }
}

async fn seed(sync: &Bridge, session: &Session) {
    match sync.seed_session(session).await {
        Ok(true) => tracing::info!("session seeded from jeedom configuration"),
        Ok(false) => tracing::info!("no LgAuthUrl in jeedom configuration, call /gateway then /token"),
        Err(err) => tracing::warn!(error = %err.message(), "unable to seed session from jeedom"),
    }
}

async fn run_sync(sync: &Bridge, logical_id: Option<&str>) -> anyhow::Result<()> {
    let outcomes = match logical_id {
        Some(logical_id) => vec![sync.update_one(logical_id).await],
        None => sync
            .update_all()
            .await
            .map_err(|err| anyhow::anyhow!(err.message()))?,
    };
    for outcome in &outcomes {
        match &outcome.error {
            None => tracing::info!(logical_id = %outcome.logical_id, pushed = outcome.pushed, "synced"),
            Some(error) => tracing::warn!(logical_id = %outcome.logical_id, %error, "not synced"),
        }
    }
    Ok(())
}

async fn serve(state: State, bind_addr: &str) -> anyhow::Result<()> {
    let app = thinq_bridge_adapter_http_axum::router::build(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!("thinqd listening on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown requested");
            }
        })
        .await?;
    Ok(())
}
