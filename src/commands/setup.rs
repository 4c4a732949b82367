use poise::serenity_prelude::RoleId;
use tracing::info;

use crate::{
    error::BotError,
    menu::post_setup_menu,
    models::{Context, Error},
    utils::messages::{format_error, format_success},
};

/// Post the administrator setup menu in the current channel
#[poise::command(
    prefix_command,
    guild_only,
    subcommands("role"),
    required_permissions = "ADMINISTRATOR"
)]
pub async fn setup(ctx: Context<'_>) -> Result<(), Error> {
    post_setup_menu(ctx.serenity_context(), ctx.data(), ctx.channel_id()).await?;
    info!(
        "Posted setup menu in channel {} by user {}",
        ctx.channel_id(),
        ctx.author().id
    );
    Ok(())
}

/// Bind a button label to a role: `!setup role <label> <role id>`
#[poise::command(prefix_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn role(ctx: Context<'_>, label: String, role_id: String) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or_else(|| BotError::NotFound("guild context".to_string()))?;

    let Some(role_id) = role_id.parse::<u64>().ok().filter(|id| *id != 0).map(RoleId::new) else {
        ctx.say(format_error("Usage: !setup role <label> <role id>"))
            .await?;
        return Ok(());
    };

    // The role must exist right now, or nothing is saved
    let roles = guild_id.roles(ctx.http()).await?;
    let Some(guild_role) = roles.get(&role_id) else {
        ctx.say(format_error(
            "No role with that id exists in this server. Check the role id and try again.",
        ))
        .await?;
        return Ok(());
    };

    ctx.data().store.upsert(guild_id, &label, role_id)?;

    ctx.say(format_success(&format!(
        "Button \"{}\" now assigns the role \"{}\".",
        label, guild_role.name
    )))
    .await?;

    Ok(())
}

/// Send a one-shot message to the current channel: `!broadcast <text>`
#[poise::command(prefix_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn broadcast(ctx: Context<'_>, #[rest] message: String) -> Result<(), Error> {
    if message.trim().is_empty() {
        ctx.say(format_error("Usage: !broadcast <message>")).await?;
        return Ok(());
    }

    ctx.channel_id().say(ctx.http(), message).await?;
    info!(
        "Broadcast sent to channel {} by user {}",
        ctx.channel_id(),
        ctx.author().id
    );
    Ok(())
}
