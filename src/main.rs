mod commands;
mod constants;
mod error;
mod handlers;
mod lifecycle;
mod menu;
mod models;
mod registry;
mod roles;
mod utils;

use std::path::PathBuf;

use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};

use crate::{
    commands::{broadcast, setup},
    constants::LOG_DIRECTIVE,
    handlers::{
        handle_interaction, handle_modal_submit, handle_reaction_add, handle_voice_state_update,
    },
    menu::MenuStyle,
    models::{Data, Error},
    registry::RoleStore,
    utils::messages::format_error,
};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    initialize_logging();

    // Load configuration from environment
    let config = match load_configuration() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Open the per-guild role-config store
    let store = match RoleStore::new(&config.config_dir) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open role config store: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize bot data
    let data = Data::new(store, config.menu_style);

    // Create and start the bot
    if let Err(e) = start_bot(config.discord_token, data).await {
        error!("Bot error: {}", e);
        std::process::exit(1);
    }
}

/// Configuration loaded from environment variables
struct Config {
    discord_token: String,
    config_dir: PathBuf,
    menu_style: MenuStyle,
}

/// Initialize the logging system
fn initialize_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(LOG_DIRECTIVE.parse().expect("valid log directive")),
        )
        .init();
}

/// Load configuration from environment variables
fn load_configuration() -> Result<Config, Box<dyn std::error::Error>> {
    let discord_token = std::env::var("DISCORD_TOKEN")
        .map_err(|_| "DISCORD_TOKEN environment variable not set. Set it with: export DISCORD_TOKEN=your_bot_token")?;

    let config_dir = std::env::var("CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    let menu_style = match std::env::var("MENU_STYLE") {
        Ok(value) => match MenuStyle::parse(&value) {
            Some(style) => style,
            None => {
                warn!("Unknown MENU_STYLE '{}', falling back to buttons", value);
                MenuStyle::default()
            }
        },
        Err(_) => MenuStyle::default(),
    };
    if menu_style == MenuStyle::Reactions {
        info!("Legacy reaction-style menus enabled");
    }

    Ok(Config {
        discord_token,
        config_dir,
        menu_style,
    })
}

/// Create and start the Discord bot
async fn start_bot(
    token: String,
    data: Data,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Create framework
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![setup(), broadcast()],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some("!".to_string()),
                ..Default::default()
            },
            on_error: |error| Box::pin(handle_framework_error(error)),
            event_handler: |ctx, event, _framework, data| {
                Box::pin(async move {
                    match event {
                        serenity::FullEvent::VoiceStateUpdate { old, new } => {
                            handle_voice_state_update(ctx, old.clone(), new.clone(), data).await;
                        }
                        serenity::FullEvent::InteractionCreate { interaction } => {
                            match interaction {
                                serenity::Interaction::Component(component) => {
                                    handle_interaction(ctx, component.clone(), data).await;
                                }
                                serenity::Interaction::Modal(modal) => {
                                    handle_modal_submit(ctx, modal.clone(), data).await;
                                }
                                _ => {}
                            }
                        }
                        serenity::FullEvent::ReactionAdd { add_reaction } => {
                            handle_reaction_add(ctx, add_reaction.clone(), data).await;
                        }
                        _ => {}
                    }
                    Ok(())
                })
            },
            ..Default::default()
        })
        .setup(move |_ctx, _ready, _framework| {
            Box::pin(async move {
                info!("Bot is ready!");
                Ok(data)
            })
        })
        .build();

    // Create client with required intents; message content is needed for
    // the `!setup` prefix commands
    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::GUILD_VOICE_STATES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    // Start the bot
    info!("Starting bot...");
    client.start().await?;

    Ok(())
}

/// Route framework-level failures: administration commands invoked
/// without permission are dropped silently, command failures get a
/// generic reply, everything else falls through to the defaults.
async fn handle_framework_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::MissingUserPermissions { .. } => {}
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Command '{}' failed: {}", ctx.command().name, error);
            let _ = ctx
                .say(format_error("Something went wrong, please try again later."))
                .await;
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}
