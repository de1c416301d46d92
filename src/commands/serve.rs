//! Serve command implementation

use crate::config::Config;
use crate::error::Result;
use crate::loader::run_startup_load;
use crate::server::{self, AppState};
use crate::store;
use tokio::net::TcpListener;
use tracing::info;

/// Connect, start the background load, and serve until a shutdown signal.
///
/// A store connection failure is returned before anything is loaded or bound.
pub async fn cmd_serve(config: &Config) -> Result<()> {
    let store = store::connect(&config.database).await?;

    if config.loader.load_on_start {
        let loader_store = store.clone();
        let data_path = config.loader.data_path.clone();
        tokio::spawn(async move {
            run_startup_load(loader_store, &data_path).await;
        });
    } else {
        info!("Startup load disabled");
    }

    let listener = TcpListener::bind(config.server.listen_addr()).await?;
    let state = AppState::with_config(store, &config.server);
    server::serve(listener, state, server::shutdown_signal()).await
}
