#[macro_use]
mod logging;
mod alerts;
mod api;
mod cli;
mod error;
mod notify;
mod storage;

#[cfg(test)]
mod tests;

use alerts::{AlertEngine, AlertRelay};
use api::handlers::AppState;
use api::server::ApiServer;
use clap::Parser;
use cli::Cli;
use error::Result;
use log::LevelFilter;
use logging::init_logging;
use notify::discord::DiscordNotifier;
use notify::{Notifier, NullNotifier};
use std::sync::Arc;
use storage::{DurableStore, JsonFileStore};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = logging::parse_level(&cli.log_level).unwrap_or_else(|| {
        eprintln!(
            "Invalid log level '{}', defaulting to 'info'",
            cli.log_level
        );
        LevelFilter::Info
    });

    if let Err(e) = init_logging(log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let store = JsonFileStore::open(&cli.state_dir)?;
    log::info!("State directory: {}", store.dir().display());
    log::info!(
        "Ongoing attacks path: {}",
        store.path_for(storage::StoreKey::OngoingAttacks).display()
    );
    log::info!(
        "Blocked IPs path: {}",
        store.path_for(storage::StoreKey::BlockedIps).display()
    );

    let engine = AlertEngine::load(DurableStore::new(store));
    let destination = cli.destination().map(str::to_string);

    let notifier: Arc<dyn Notifier> = match cli.bot_token.as_deref().filter(|t| !t.is_empty()) {
        Some(token) => {
            let discord = Arc::new(DiscordNotifier::new(
                &cli.discord_api,
                token,
                destination.iter().cloned().collect(),
                cli.notify_timeout(),
            )?);
            if let Err(e) = discord.connect().await {
                log::error!("Could not connect to notification service: {}", e);
            }
            let _heartbeat = discord.clone().spawn_heartbeat(cli.heartbeat_interval());
            discord
        }
        None => {
            log::warn!("BOT_TOKEN not set; alerts will be rejected until it is configured");
            Arc::new(NullNotifier)
        }
    };

    let relay = AlertRelay::new(engine, notifier, destination, cli.notify_timeout());
    let app_state = Arc::new(AppState { relay });

    ApiServer::new(cli.listen_addr(), Some(cli.public_dir.clone()))
        .run(app_state)
        .await
}
