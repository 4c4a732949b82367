use poise::serenity_prelude::{
    self as serenity, CreateActionRow, CreateInputText, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateModal, EditInteractionResponse, InputTextStyle,
};
use tracing::{error, info};

use crate::{
    constants::{JOIN_GRACE, MAX_BROADCAST_LENGTH, MAX_CHANNEL_NAME_LENGTH, TEMP_CATEGORY_NAME},
    error::BotError,
    lifecycle::create_temp_voice,
    menu::{self, PHONE_VERIFICATION_STEPS, parse_role_custom_id},
    models::Data,
    roles::{ToggleOutcome, toggle},
    utils::channel_utils::is_valid_channel_name,
    utils::messages::{format_error, format_info, format_success},
};

/// Handle component interactions (button clicks)
pub async fn handle_interaction(
    ctx: &serenity::Context,
    interaction: serenity::ComponentInteraction,
    data: &Data,
) {
    match interaction.data.custom_id.as_str() {
        "setup_phone_verification" => {
            // Administration actions from non-admins are dropped, not answered
            if !invoker_is_admin(&interaction) {
                return;
            }
            if let Err(e) = handle_phone_panel(ctx, &interaction, data).await {
                error!("Failed to post phone verification panel: {}", e);
            }
        }
        "setup_role_selection" => {
            if !invoker_is_admin(&interaction) {
                return;
            }
            if let Err(e) = handle_role_panel(ctx, &interaction, data).await {
                error!("Failed to post role selection panel: {}", e);
            }
        }
        "setup_message_sender" => {
            if !invoker_is_admin(&interaction) {
                return;
            }
            if let Err(e) = show_message_modal(ctx, &interaction).await {
                error!("Failed to show message sender modal: {}", e);
            }
        }
        "setup_voice_channel" => {
            if !invoker_is_admin(&interaction) {
                return;
            }
            if let Err(e) = handle_voice_panel(ctx, &interaction, data).await {
                error!("Failed to post voice channel panel: {}", e);
            }
        }
        "verify_phone" => {
            if let Err(e) = handle_verify_phone(ctx, &interaction).await {
                error!("Failed to send verification instructions: {}", e);
            }
        }
        "create_voice_channel" => {
            if let Err(e) = show_voice_channel_modal(ctx, &interaction).await {
                error!("Failed to show voice channel modal: {}", e);
            }
        }
        id if id.starts_with("role_") => {
            if let Err(e) = handle_role_button(ctx, &interaction, data).await {
                error!("Failed to handle role button: {}", e);
            }
        }
        _ => {}
    }
}

/// Guild-administration buttons require the administrator permission,
/// delivered with the interaction payload.
fn invoker_is_admin(interaction: &serenity::ComponentInteraction) -> bool {
    interaction
        .member
        .as_ref()
        .and_then(|member| member.permissions)
        .is_some_and(|permissions| permissions.administrator())
}

/// Post the phone verification guide into the channel
async fn handle_phone_panel(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    data: &Data,
) -> Result<(), BotError> {
    interaction
        .create_response(
            ctx,
            CreateInteractionResponse::Defer(
                CreateInteractionResponseMessage::new().ephemeral(true),
            ),
        )
        .await?;

    menu::post_phone_panel(ctx, data, interaction.channel_id).await?;

    interaction
        .edit_response(
            ctx,
            EditInteractionResponse::new()
                .content(format_success("Phone verification panel posted.")),
        )
        .await?;
    Ok(())
}

/// Post the role picker built from the guild's saved bindings
async fn handle_role_panel(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    data: &Data,
) -> Result<(), BotError> {
    interaction
        .create_response(
            ctx,
            CreateInteractionResponse::Defer(
                CreateInteractionResponseMessage::new().ephemeral(true),
            ),
        )
        .await?;

    let guild_id = interaction
        .guild_id
        .ok_or_else(|| BotError::NotFound("guild context".to_string()))?;

    let reply = match data.store.list_bindings(guild_id) {
        Ok(bindings) if bindings.is_empty() => format_info(
            "No roles configured yet. Use `!setup role <label> <role id>` first.",
        ),
        Ok(bindings) => {
            menu::post_role_picker(ctx, data, interaction.channel_id, &bindings).await?;
            format_success("Role selection panel posted.")
        }
        Err(e) => {
            error!("Failed to load role config for guild {}: {}", guild_id, e);
            format_error("The role configuration could not be read.")
        }
    };

    interaction
        .edit_response(ctx, EditInteractionResponse::new().content(reply))
        .await?;
    Ok(())
}

/// Post the voice channel panel into the channel
async fn handle_voice_panel(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    data: &Data,
) -> Result<(), BotError> {
    interaction
        .create_response(
            ctx,
            CreateInteractionResponse::Defer(
                CreateInteractionResponseMessage::new().ephemeral(true),
            ),
        )
        .await?;

    menu::post_voice_panel(ctx, data, interaction.channel_id).await?;

    interaction
        .edit_response(
            ctx,
            EditInteractionResponse::new().content(format_success("Voice channel panel posted.")),
        )
        .await?;
    Ok(())
}

/// The modal must be the initial response, so no deferring here
async fn show_message_modal(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
) -> Result<(), BotError> {
    let modal = CreateModal::new("message_sender_modal", "Send a Message").components(vec![
        CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Paragraph, "Message", "message_content")
                .placeholder("Type the message to send here")
                .min_length(1)
                .max_length(MAX_BROADCAST_LENGTH)
                .required(true),
        ),
    ]);

    interaction
        .create_response(ctx, CreateInteractionResponse::Modal(modal))
        .await?;
    Ok(())
}

async fn show_voice_channel_modal(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
) -> Result<(), BotError> {
    let modal = CreateModal::new("voice_channel_modal", "Create a Voice Channel").components(vec![
        CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Short, "Channel Name", "channel_name")
                .placeholder("e.g. Game Room")
                .min_length(1)
                .max_length(MAX_CHANNEL_NAME_LENGTH)
                .required(true),
        ),
    ]);

    interaction
        .create_response(ctx, CreateInteractionResponse::Modal(modal))
        .await?;
    Ok(())
}

/// Send the verification walkthrough privately to whoever asked
async fn handle_verify_phone(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
) -> Result<(), BotError> {
    interaction
        .create_response(
            ctx,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(PHONE_VERIFICATION_STEPS)
                    .ephemeral(true),
            ),
        )
        .await?;
    Ok(())
}

/// Toggle the role a `role_<id>` button stands for
async fn handle_role_button(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    data: &Data,
) -> Result<(), BotError> {
    let Some(role_id) = parse_role_custom_id(&interaction.data.custom_id) else {
        return Ok(());
    };

    interaction
        .create_response(
            ctx,
            CreateInteractionResponse::Defer(
                CreateInteractionResponseMessage::new().ephemeral(true),
            ),
        )
        .await?;

    let guild_id = interaction
        .guild_id
        .ok_or_else(|| BotError::NotFound("guild context".to_string()))?;
    let member = interaction
        .member
        .as_ref()
        .ok_or_else(|| BotError::NotFound("guild member".to_string()))?;

    let reply = match toggle(ctx, guild_id, member, role_id).await {
        Ok(ToggleOutcome::Granted) => format_success(&format!("You now have <@&{}>.", role_id)),
        Ok(ToggleOutcome::Revoked) => format_success(&format!("Removed <@&{}> from you.", role_id)),
        Err(BotError::NotFound(_)) => format_error(
            "That role no longer exists. Ask an admin to update the role menu.",
        ),
        Err(e) => {
            error!(
                "Failed to toggle role {} for user {}: {}",
                role_id, interaction.user.id, e
            );
            format_error("Something went wrong, please try again later.")
        }
    };

    interaction
        .edit_response(ctx, EditInteractionResponse::new().content(reply))
        .await?;
    Ok(())
}

/// Handle modal submissions
pub async fn handle_modal_submit(
    ctx: &serenity::Context,
    interaction: serenity::ModalInteraction,
    data: &Data,
) {
    match interaction.data.custom_id.as_str() {
        "voice_channel_modal" => {
            if let Err(e) = handle_voice_channel_modal(ctx, &interaction, data).await {
                error!("Failed to handle voice channel modal: {}", e);
            }
        }
        "message_sender_modal" => {
            if let Err(e) = handle_message_sender_modal(ctx, &interaction).await {
                error!("Failed to handle message sender modal: {}", e);
            }
        }
        _ => {}
    }
}

/// Create the requested voice channel and report back privately
async fn handle_voice_channel_modal(
    ctx: &serenity::Context,
    interaction: &serenity::ModalInteraction,
    data: &Data,
) -> Result<(), BotError> {
    let name = first_input_value(interaction);
    if let Err(reason) = is_valid_channel_name(&name) {
        interaction
            .create_response(
                ctx,
                CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .content(format_error(reason))
                        .ephemeral(true),
                ),
            )
            .await?;
        return Ok(());
    }

    interaction
        .create_response(
            ctx,
            CreateInteractionResponse::Defer(
                CreateInteractionResponseMessage::new().ephemeral(true),
            ),
        )
        .await?;

    let guild_id = interaction
        .guild_id
        .ok_or_else(|| BotError::NotFound("guild context".to_string()))?;

    let reply = match create_temp_voice(
        ctx,
        guild_id,
        &name,
        TEMP_CATEGORY_NAME,
        interaction.user.id,
        data,
    )
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

    interaction
        .edit_response(ctx, EditInteractionResponse::new().content(reply))
        .await?;
    Ok(())
}

/// Post the submitted message to the channel the modal came from
async fn handle_message_sender_modal(
    ctx: &serenity::Context,
    interaction: &serenity::ModalInteraction,
) -> Result<(), BotError> {
    let content = first_input_value(interaction);
    if content.trim().is_empty() {
        interaction
            .create_response(
                ctx,
                CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .content(format_error("The message cannot be empty!"))
                        .ephemeral(true),
                ),
            )
            .await?;
        return Ok(());
    }

    interaction
        .create_response(
            ctx,
            CreateInteractionResponse::Defer(
                CreateInteractionResponseMessage::new().ephemeral(true),
            ),
        )
        .await?;

    let reply = match interaction.channel_id.say(ctx, content).await {
        Ok(_) => {
            info!(
                "Broadcast sent to channel {} by user {}",
                interaction.channel_id, interaction.user.id
            );
            format_success("Message sent.")
        }
        Err(e) => {
            error!(
                "Failed to send broadcast to channel {}: {}",
                interaction.channel_id, e
            );
            format_error("The message could not be sent.")
        }
    };

    interaction
        .edit_response(ctx, EditInteractionResponse::new().content(reply))
        .await?;
    Ok(())
}

/// Pull the single text input out of a one-field modal
fn first_input_value(interaction: &serenity::ModalInteraction) -> String {
    interaction
        .data
        .components
        .first()
        .and_then(|row| row.components.first())
        .and_then(|component| match component {
            serenity::ActionRowComponent::InputText(input) => input.value.clone(),
            _ => None,
        })
        .unwrap_or_default()
}
