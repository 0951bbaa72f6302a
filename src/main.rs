use anyhow::Result;
use cell_finder::bot;
use cell_finder::config::AppConfig;
use cell_finder::dialogue::{CellDialogue, CellDialogueState};
use cell_finder::errors::error_logging;
use cell_finder::localization;
use cell_finder::observability;
use cell_finder::settings::ChatSettingsStore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let startup = Instant::now();

    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().inspect_err(|e| {
        error_logging::log_config_error(e, "TELEGRAM_BOT_TOKEN", "load_configuration");
    })?;

    observability::init_observability_with_config(config.observability.clone()).await?;

    let localization_manager = localization::create_localization_manager()?;
    let settings = ChatSettingsStore::shared();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.bot.http_timeout_secs))
        .build()?;

    let bot = Bot::with_client(config.bot.token.clone(), client);

    // Long polling does not work while a webhook is registered
    bot.delete_webhook().await?;

    info!(
        http_timeout_secs = config.bot.http_timeout_secs,
        "Bot initialized, starting dispatcher"
    );

    let dialogue_storage = InMemStorage::<CellDialogueState>::new();

    let handler = dptree::entry().branch(Update::filter_message().endpoint({
        let storage = dialogue_storage.clone();
        let localization = Arc::clone(&localization_manager);
        let settings = Arc::clone(&settings);
        move |bot: Bot, msg: Message| {
            let localization = Arc::clone(&localization);
            let settings = Arc::clone(&settings);
            let dialogue = CellDialogue::new(storage.clone(), msg.chat.id);
            async move { bot::message_handler(bot, msg, dialogue, settings, localization).await }
        }
    }));

    observability::record_startup_metrics(startup.elapsed());
    observability::mark_ready();

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped");
    Ok(())
}
