//! `webhook-relay run`: start the relay server.
//!
//! Loads the configuration file (fatal on any error), builds the shared
//! state, and serves until SIGTERM / Ctrl+C with graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::config::sources;
use crate::config::store::{ConfigStore, StoreOptions};
use crate::error::RelayError;
use crate::logging;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), RelayError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.effective_log_level(), log_format);

    tracing::info!(path = %args.config.display(), "using configuration file");

    let source = sources::open_file_source(&args.config)?;
    let options = StoreOptions {
        reload_on_read: args.debug,
        timeout_override: args.timeout,
    };
    let store = ConfigStore::open(source, options).await?;
    let services = store.status().await.services;

    let state = Arc::new(AppState::new(store));
    let router = server::build_router(state, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        services,
        debug = args.debug,
        "webhook-relay started"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(server::shutdown_signal())
    .await?;

    tracing::info!("webhook-relay stopped");
    Ok(())
}
