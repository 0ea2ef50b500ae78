//! Auto Redeem - redeems a channel reward whenever its cooldown expires
//!
//! This is the main entry point for the auto-redeem application.

use std::sync::Arc;

use anyhow::Context;
use tokio::{
    net::TcpListener,
    sync::{broadcast, watch},
};
use tracing::{info, warn};

use auto_redeem::{
    api::create_router,
    config::Config,
    page::{BridgePage, PageAdapter, SimulatedPage},
    redeem::{Clock, CycleTimings, RedeemController, Redeemer, SystemClock},
    state::{AppState, DisplayState, PersistedState, StateStore},
    tasks::countdown_ticker_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("auto_redeem={},tower_http=info", config.log_level()))
        .init();

    info!("Starting auto-redeem v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, reward={}, state_file={}",
        config.host,
        config.port,
        config.reward,
        config.state_file.display()
    );

    let page: Arc<dyn PageAdapter> = if config.simulate {
        info!("Using simulated page");
        Arc::new(SimulatedPage::ready().cooldown_after_redeem("9m 59s"))
    } else {
        info!("Using page bridge at {}", config.bridge_url);
        Arc::new(BridgePage::new(config.bridge_url.as_str())?.with_reward_label(config.reward.clone()))
    };

    let store = Arc::new(
        StateStore::open(&config.state_file)
            .with_context(|| format!("failed to open {}", config.state_file.display()))?,
    );
    let mut persisted = store.load();
    if persisted.auto_redeem_running && !config.resume {
        // Nothing is running now; don't let the display claim otherwise
        persisted = PersistedState::default();
        if let Err(e) = store
            .set_running(false)
            .and_then(|_| store.set_next_check_timestamp(0))
        {
            warn!("Failed to reset persisted state: {}", e);
        }
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let (bus, _) = broadcast::channel(256);
    let redeemer = Redeemer::new(
        page,
        Arc::clone(&clock),
        CycleTimings::default(),
        config.reward.clone(),
        bus.clone(),
    );
    let controller = Arc::new(RedeemController::new(redeemer, Arc::clone(&store), bus));

    // Display layer restores from the state file before any message arrives
    let (display_tx, display_rx) = watch::channel(DisplayState::restore(persisted, clock.now_ms()));
    tokio::spawn(countdown_ticker_task(
        controller.subscribe(),
        Arc::clone(&clock),
        display_tx,
    ));

    if persisted.auto_redeem_running {
        info!("Resuming auto-redeem from previous run");
        controller.start();
    }

    let state = Arc::new(AppState::new(
        Arc::clone(&controller),
        display_rx,
        config.port,
        config.host.clone(),
    ));
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /toggle   - Start or stop auto-redeem");
    info!("  POST /messages - Send a TOGGLE_REDEEM message");
    info!("  GET  /status   - Current status and countdown");
    info!("  GET  /events   - Stream of controller messages");
    info!("  GET  /health   - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    controller.halt().await;
    info!("Server shutdown complete");
    Ok(())
}
