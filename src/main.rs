mod center;
mod commands;
mod config;
mod console;
mod custom_commands;
mod error;
mod lookup;
mod messenger;
mod reminder;

use crate::center::{CommandCenter, CommandCenterKey};
use crate::config::BotConfig;
use crate::custom_commands::JsonFileStore;
use crate::lookup::Endpoints;
use crate::messenger::{HttpMessenger, OutgoingMessage};
use serenity::{
    async_trait,
    client::{Client, Context, EventHandler},
    model::{application::interaction::Interaction, channel::Message, gateway::Ready},
    prelude::GatewayIntents,
};
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::signal;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

async fn command_center(ctx: &Context) -> Option<Arc<CommandCenter>> {
    let data = ctx.data.read().await;
    data.get::<CommandCenterKey>().cloned()
}

// Event handler implementation
struct Handler {
    register_commands: bool,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        log::info!("✅ Bot connected as {}! (ID: {})", ready.user.name, ready.user.id);
        log::info!("📊 Connected to {} guilds", ready.guilds.len());

        if !self.register_commands {
            log::info!("Slash command registration disabled in botconfig.txt");
            return;
        }
        match commands::register_slash_commands(&ctx.http).await {
            Ok(registered) => log::info!("✅ Registered {} slash commands", registered.len()),
            Err(e) => log::error!("❌ Failed to register slash commands: {:?}", e),
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(center) = command_center(&ctx).await else {
            log::error!("❌ Command center missing from client data");
            return;
        };

        let outgoing = OutgoingMessage::new(msg.channel_id, msg.content);
        center.relay_custom_command(&outgoing).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::ApplicationCommand(command) = interaction else {
            return;
        };
        let Some(center) = command_center(&ctx).await else {
            log::error!("❌ Command center missing from client data");
            return;
        };

        if let Err(e) = commands::handle_slash_command(&ctx, &command, &center).await {
            log::error!(
                "❌ Slash command '{}' failed for user {} ({}): {}",
                command.data.name,
                command.user.name,
                command.user.id,
                e
            );
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logger - must be done before any logging calls
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let config = match BotConfig::load() {
        Ok(config) => config,
        Err(error) => {
            log::error!("❌ Failed to load botconfig.txt: {}", error);
            eprintln!("❌ Failed to load botconfig.txt: {}", error);
            eprintln!("Create a botconfig.txt file in the project root with: DISCORD_TOKEN=your_token_here");
            return;
        }
    };

    // Configure bot intents
    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;

    let mut client = match Client::builder(&config.discord_token, intents)
        .event_handler(Handler {
            register_commands: config.register_commands,
        })
        .await
    {
        Ok(client) => client,
        Err(e) => {
            log::error!("❌ Error creating Discord client: {:?}", e);
            eprintln!("❌ Error creating Discord client: {:?}", e);
            eprintln!("Check your token in botconfig.txt file");
            return;
        }
    };

    let store = JsonFileStore::in_dir(&config.storage_dir);
    log::info!("📂 Custom commands stored in {}", store.path().display());

    let messenger = Arc::new(HttpMessenger::new(client.cache_and_http.http.clone()));
    let center = Arc::new(CommandCenter::new(Box::new(store), messenger, Endpoints::default()));
    if let Some(notice) = center.custom_commands.load().await {
        notice.log();
    }

    {
        let mut data = client.data.write().await;
        data.insert::<CommandCenterKey>(Arc::clone(&center));
    }

    // Set up command line interface for graceful shutdown
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<String>(1);
    let console_task = tokio::spawn(async move {
        // Let the connection messages print before the first prompt
        sleep(Duration::from_millis(1500)).await;
        println!("📝 Command line interface active. Type 'help' for available commands.");
        console::run(BufReader::new(tokio::io::stdin()), center, shutdown_tx).await;
    });

    log::info!("🚀 Bot is running...");
    println!("💡 Use 'quit' command to stop gracefully, or press Ctrl+C");
    tokio::select! {
        _ = signal::ctrl_c() => {
            println!("\n⏹️ Stopping bot gracefully...");
        }
        // A closed console disables this branch instead of stopping the bot
        Some(signal) = shutdown_rx.recv() => {
            log::info!("📡 Received '{}' command, stopping bot gracefully...", signal);
        }
        result = client.start() => {
            if let Err(why) = result {
                log::error!("❌ Client error: {:?}", why);
                eprintln!("❌ Client error: {:?}", why);
            }
        }
    }

    client.shard_manager.lock().await.shutdown_all().await;
    console_task.abort();

    log::info!("👋 Bot shutdown complete");
}
