use std::collections::HashSet;

use poise::serenity_prelude::{
    self as serenity, GuildId, Reaction, ReactionType, RoleId, UserId,
};
use tracing::{error, warn};

use crate::{
    constants::{JOIN_GRACE, TEMP_CATEGORY_NAME},
    error::BotError,
    lifecycle::create_temp_voice,
    menu::{
        self, MESSAGE_EMOJI, MenuKind, PHONE_EMOJI, PHONE_VERIFICATION_STEPS, ROLES_EMOJI,
        VOICE_EMOJI, index_for_digit,
    },
    models::Data,
    roles::{ToggleOutcome, toggle},
    utils::channel_utils::format_default_channel_name,
    utils::messages::{format_error, format_info, format_success},
    utils::permissions::holds_admin_role,
};

/// Route reaction-add events on bot-posted menu messages (the legacy
/// reaction-style presentation). Reactions on anything else are ignored.
pub async fn handle_reaction_add(ctx: &serenity::Context, reaction: Reaction, data: &Data) {
    let Some(kind) = data.menus.get(&reaction.message_id).map(|k| *k) else {
        return;
    };
    let Some(user_id) = reaction.user_id else {
        return;
    };
    if user_id == ctx.cache.current_user().id {
        return;
    }
    let Some(guild_id) = reaction.guild_id else {
        return;
    };
    let ReactionType::Unicode(emoji) = &reaction.emoji else {
        return;
    };
    let emoji = emoji.as_str();

    let result = match kind {
        MenuKind::SetupRoot => {
            handle_setup_reaction(ctx, &reaction, emoji, guild_id, user_id, data).await
        }
        MenuKind::PhoneGuide if emoji == PHONE_EMOJI => {
            dm_user(ctx, user_id, PHONE_VERIFICATION_STEPS.to_string()).await;
            Ok(())
        }
        MenuKind::RolePicker => handle_role_reaction(ctx, emoji, guild_id, user_id, data).await,
        MenuKind::VoicePanel if emoji == VOICE_EMOJI => {
            handle_voice_reaction(ctx, guild_id, user_id, data).await
        }
        _ => Ok(()),
    };

    if let Err(e) = result {
        error!("Failed to handle {:?} reaction '{}': {}", kind, emoji, e);
    }
}

/// Reactions on the root setup menu are administration actions; anyone
/// else's reactions are dropped without an answer.
async fn handle_setup_reaction(
    ctx: &serenity::Context,
    reaction: &Reaction,
    emoji: &str,
    guild_id: GuildId,
    user_id: UserId,
    data: &Data,
) -> Result<(), BotError> {
    if !member_is_admin(ctx, guild_id, user_id).await {
        return Ok(());
    }

    match emoji {
        PHONE_EMOJI => menu::post_phone_panel(ctx, data, reaction.channel_id).await,
        ROLES_EMOJI => match data.store.list_bindings(guild_id) {
            Ok(bindings) if bindings.is_empty() => {
                dm_user(
                    ctx,
                    user_id,
                    format_info("No roles configured yet. Use `!setup role <label> <role id>` first."),
                )
                .await;
                Ok(())
            }
            Ok(bindings) => {
                menu::post_role_picker(ctx, data, reaction.channel_id, &bindings).await
            }
            Err(e) => {
                error!("Failed to load role config for guild {}: {}", guild_id, e);
                dm_user(
                    ctx,
                    user_id,
                    format_error("The role configuration could not be read."),
                )
                .await;
                Ok(())
            }
        },
        MESSAGE_EMOJI => {
            dm_user(
                ctx,
                user_id,
                format_info("Use `!broadcast <message>` in the target channel to send a message."),
            )
            .await;
            Ok(())
        }
        VOICE_EMOJI => menu::post_voice_panel(ctx, data, reaction.channel_id).await,
        _ => Ok(()),
    }
}

/// A digit reaction on the role picker toggles the binding at that
/// position in the guild's current registry.
async fn handle_role_reaction(
    ctx: &serenity::Context,
    emoji: &str,
    guild_id: GuildId,
    user_id: UserId,
    data: &Data,
) -> Result<(), BotError> {
    let Some(index) = index_for_digit(emoji) else {
        return Ok(());
    };

    let bindings = match data.store.list_bindings(guild_id) {
        Ok(bindings) => bindings,
        Err(e) => {
            error!("Failed to load role config for guild {}: {}", guild_id, e);
            dm_user(
                ctx,
                user_id,
                format_error("The role configuration could not be read."),
            )
            .await;
            return Ok(());
        }
    };
    let Some(binding) = bindings.get(index) else {
        return Ok(());
    };

    let member = guild_id.member(ctx, user_id).await?;
    let message = match toggle(ctx, guild_id, &member, binding.role_id).await {
        Ok(ToggleOutcome::Granted) => {
            format_success(&format!("You now have \"{}\".", binding.label))
        }
        Ok(ToggleOutcome::Revoked) => {
            format_success(&format!("Removed \"{}\" from you.", binding.label))
        }
        Err(BotError::NotFound(_)) => {
            format_error("That role no longer exists. Ask an admin to update the role menu.")
        }
        Err(e) => {
            error!(
                "Failed to toggle role {} for user {}: {}",
                binding.role_id, user_id, e
            );
            format_error("Something went wrong, please try again later.")
        }
    };
    dm_user(ctx, user_id, message).await;
    Ok(())
}

/// The reaction flow has no modal, so the channel gets a default name
/// derived from the requesting member.
async fn handle_voice_reaction(
    ctx: &serenity::Context,
    guild_id: GuildId,
    user_id: UserId,
    data: &Data,
) -> Result<(), BotError> {
    let member = guild_id.member(ctx, user_id).await?;
    let name = format_default_channel_name(member.display_name());

    let message = match create_temp_voice(ctx, guild_id, &name, TEMP_CATEGORY_NAME, user_id, data)
        .await
    {
        Ok(channel_id) => format_success(&format!(
            "Created <#{}>. Join within {} seconds or it will be removed.",
            channel_id,
            JOIN_GRACE.as_secs()
        )),
        Err(e) => {
            error!("Failed to create temp voice channel: {}", e);
            format_error("The voice channel could not be created. Check the bot's permissions.")
        }
    };
    dm_user(ctx, user_id, message).await;
    Ok(())
}

/// Administrator check for reaction events, which carry no resolved
/// permissions: owner or any role granting administrator counts.
async fn member_is_admin(ctx: &serenity::Context, guild_id: GuildId, user_id: UserId) -> bool {
    let Ok(member) = guild_id.member(ctx, user_id).await else {
        return false;
    };
    let Ok(guild) = guild_id.to_partial_guild(ctx).await else {
        return false;
    };
    if guild.owner_id == user_id {
        return true;
    }

    let admin_roles: HashSet<RoleId> = guild
        .roles
        .iter()
        .filter(|(_, role)| role.permissions.administrator())
        .map(|(id, _)| *id)
        .collect();
    holds_admin_role(&member.roles, &admin_roles)
}

/// Reaction responses go to DMs since reactions cannot be answered
/// privately in-channel. A closed DM is the user's choice; failures are
/// logged and dropped.
async fn dm_user(ctx: &serenity::Context, user_id: UserId, content: String) {
    match user_id.create_dm_channel(ctx).await {
        Ok(channel) => {
            if let Err(e) = channel.id.say(ctx, content).await {
                warn!("Failed to DM user {}: {}", user_id, e);
            }
        }
        Err(e) => warn!("Failed to open DM with user {}: {}", user_id, e),
    }
}
