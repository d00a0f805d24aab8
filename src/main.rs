use order_relay::bus::{LineBus, MessageBus};
use order_relay::config::RelayConfig;
use order_relay::lifecycle::RelaySystem;
use relay_runtime::tracing::setup_tracing;
use std::io::BufReader;
use std::sync::Arc;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = RelayConfig::from_env().map_err(|e| e.to_string())?;
    // Dropping the guard flushes the log file; hold it until main returns.
    let _log_guard = setup_tracing(config.log_file.as_deref()).map_err(|e| e.to_string())?;
    info!(
        broker = %config.broker_addr(),
        client_id = %config.client_id,
        log_file = ?config.log_file,
        "Starting order relay"
    );

    let bus = Arc::new(LineBus::stdout());
    let span = tracing::info_span!("bus_setup");
    async {
        bus.subscribe(&config.inbound_topic)
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    let system = RelaySystem::start(&config, bus.clone()).map_err(|e| e.to_string())?;

    let bridge = system.bridge.clone();
    let reader = bus
        .spawn_reader(BufReader::new(std::io::stdin()), move |topic, payload| {
            bridge.on_message(topic, payload)
        })
        .map_err(|e| e.to_string())?;
    info!(topic = %config.inbound_topic, "Listening for orders");

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Interrupt received"),
        Err(e) => error!(error = %e, "Could not listen for interrupt"),
    }

    system.shutdown().await.map_err(|e| e.to_string())?;

    // The reader thread is parked on stdin; it ends with the process.
    drop(reader);

    info!("Relay stopped");
    Ok(())
}
