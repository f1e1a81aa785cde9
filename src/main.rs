mod commands;
mod config;
mod db;
mod error;
mod handlers;
mod manager;
mod models;
mod voting;

use config::Config;
use db::{MemoryStore, PollStore, SqliteStore};
use log::{error, info};
use manager::PollManager;
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

/// Keeps polls in memory only; they are lost on restart.
const MEMORY_DATABASE_URL: &str = "memory";

struct Bot<S> {
    manager: Arc<PollManager<S>>,
    guild_id: Option<GuildId>,
}

#[async_trait]
impl<S: PollStore + 'static> EventHandler for Bot<S> {
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let manager = Arc::clone(&self.manager);

        tokio::spawn(async move {
            handlers::handle_interaction(&*manager, &ctx, interaction).await;
        });
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        match commands::register_commands(&ctx, self.guild_id).await {
            Ok(()) => match self.guild_id {
                Some(guild_id) => info!("Registered slash commands for guild {}.", guild_id),
                None => info!("Registered global slash commands."),
            },
            Err(why) => error!("Failed to register slash commands: {:?}", why),
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    if config.database_url == MEMORY_DATABASE_URL {
        info!("Using in-memory poll storage");
        run(config, MemoryStore::new()).await;
        return;
    }

    match SqliteStore::new(&config.database_url).await {
        Ok(store) => {
            info!("Using poll database at {}", config.database_url);
            run(config, store).await;
        }
        Err(e) => error!("Failed to initialize database: {}", e),
    }
}

async fn run<S: PollStore + 'static>(config: Config, store: S) {
    let bot = Bot {
        manager: Arc::new(PollManager::new(store)),
        guild_id: config.guild_id.map(GuildId),
    };

    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_INTEGRATIONS;

    let mut client = match Client::builder(&config.discord_token, intents)
        .event_handler(bot)
        .await
    {
        Ok(client) => client,
        Err(why) => {
            error!("Error creating client: {:?}", why);
            return;
        }
    };

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }
}
