use poise::serenity_prelude::{
    self as serenity, ChannelId, Colour, CreateActionRow, CreateButton, CreateEmbed, CreateMessage,
    ReactionType, RoleId,
};
use tracing::warn;

use crate::constants::{BUTTONS_PER_ROW, EMPTY_GRACE, JOIN_GRACE, MAX_COMPONENT_ROWS};
use crate::error::BotError;
use crate::models::Data;
use crate::registry::RoleBinding;

/// How menus are presented and how user actions come back in.
///
/// `Buttons` posts component rows and receives interactions; `Reactions`
/// seeds messages with emoji and receives reaction-add events. Registry,
/// toggle, and lifecycle logic are shared between the two.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MenuStyle {
    #[default]
    Buttons,
    Reactions,
}

impl MenuStyle {
    /// Parse a `MENU_STYLE` environment value, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "buttons" => Some(Self::Buttons),
            "reactions" => Some(Self::Reactions),
            _ => None,
        }
    }
}

/// Which menu a bot-posted message is, keyed by message id, so that
/// reaction-add events can be routed to the matching handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuKind {
    SetupRoot,
    PhoneGuide,
    RolePicker,
    VoicePanel,
}

pub const PHONE_EMOJI: &str = "🔒";
pub const ROLES_EMOJI: &str = "🎮";
pub const MESSAGE_EMOJI: &str = "✉️";
pub const VOICE_EMOJI: &str = "🔊";

/// Positional emoji for the reaction-style role picker; entry N toggles
/// the registry's Nth binding.
pub const DIGIT_EMOJI: [&str; 10] = ["1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣", "🔟"];

/// The step-by-step text shown privately when a member asks to verify.
/// The flow is Discord's own; the bot never sees a phone number.
pub const PHONE_VERIFICATION_STEPS: &str = "Follow Discord's phone verification flow:\n\
    1. Open your Discord settings\n\
    2. Under account settings, choose \"Phone\"\n\
    3. Register your phone number as prompted\n\
    4. Enter the confirmation code to finish\n\n\
    This uses Discord's official feature. The bot never collects or stores your number.";

pub fn index_for_digit(emoji: &str) -> Option<usize> {
    DIGIT_EMOJI.iter().position(|e| *e == emoji)
}

pub fn role_custom_id(role_id: RoleId) -> String {
    format!("role_{}", role_id)
}

/// Extract the role id out of a `role_<id>` component identifier.
pub fn parse_role_custom_id(custom_id: &str) -> Option<RoleId> {
    custom_id
        .strip_prefix("role_")?
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(RoleId::new)
}

/// Post the administrator setup menu in the active style.
pub async fn post_setup_menu(
    ctx: &serenity::Context,
    data: &Data,
    channel_id: ChannelId,
) -> Result<(), BotError> {
    match data.menu_style {
        MenuStyle::Buttons => {
            let row = CreateActionRow::Buttons(vec![
                CreateButton::new("setup_phone_verification")
                    .label("Phone Verification")
                    .style(serenity::ButtonStyle::Primary),
                CreateButton::new("setup_role_selection")
                    .label("Role Selection")
                    .style(serenity::ButtonStyle::Success),
                CreateButton::new("setup_message_sender")
                    .label("Message Sender")
                    .style(serenity::ButtonStyle::Secondary),
                CreateButton::new("setup_voice_channel")
                    .label("Voice Channels")
                    .style(serenity::ButtonStyle::Danger),
            ]);
            channel_id
                .send_message(
                    ctx,
                    CreateMessage::new()
                        .content("Select a system to set up:")
                        .components(vec![row]),
                )
                .await?;
        }
        MenuStyle::Reactions => {
            let content = format!(
                "Select a system to set up:\n\
                {} Phone Verification\n\
                {} Role Selection\n\
                {} Message Sender\n\
                {} Voice Channels",
                PHONE_EMOJI, ROLES_EMOJI, MESSAGE_EMOJI, VOICE_EMOJI
            );
            let message = channel_id.say(ctx, content).await?;
            for emoji in [PHONE_EMOJI, ROLES_EMOJI, MESSAGE_EMOJI, VOICE_EMOJI] {
                message
                    .react(ctx, ReactionType::Unicode(emoji.to_string()))
                    .await?;
            }
            data.menus.insert(message.id, MenuKind::SetupRoot);
        }
    }
    Ok(())
}

/// Post the phone verification guide with its verify affordance.
pub async fn post_phone_panel(
    ctx: &serenity::Context,
    data: &Data,
    channel_id: ChannelId,
) -> Result<(), BotError> {
    let embed = phone_guide_embed();
    match data.menu_style {
        MenuStyle::Buttons => {
            let row = CreateActionRow::Buttons(vec![
                CreateButton::new("verify_phone")
                    .label("Verify by phone")
                    .style(serenity::ButtonStyle::Primary),
            ]);
            channel_id
                .send_message(
                    ctx,
                    CreateMessage::new().embed(embed).components(vec![row]),
                )
                .await?;
        }
        MenuStyle::Reactions => {
            let message = channel_id
                .send_message(ctx, CreateMessage::new().embed(embed))
                .await?;
            message
                .react(ctx, ReactionType::Unicode(PHONE_EMOJI.to_string()))
                .await?;
            data.menus.insert(message.id, MenuKind::PhoneGuide);
        }
    }
    Ok(())
}

/// Post the role picker built from the guild's current bindings.
pub async fn post_role_picker(
    ctx: &serenity::Context,
    data: &Data,
    channel_id: ChannelId,
    bindings: &[RoleBinding],
) -> Result<(), BotError> {
    match data.menu_style {
        MenuStyle::Buttons => {
            let capacity = BUTTONS_PER_ROW * MAX_COMPONENT_ROWS;
            if bindings.len() > capacity {
                warn!(
                    "Role menu holds {} bindings, only the first {} get buttons",
                    bindings.len(),
                    capacity
                );
            }
            channel_id
                .send_message(
                    ctx,
                    CreateMessage::new()
                        .embed(role_picker_embed())
                        .components(role_button_rows(bindings)),
                )
                .await?;
        }
        MenuStyle::Reactions => {
            let shown = bindings.len().min(DIGIT_EMOJI.len());
            if bindings.len() > shown {
                warn!(
                    "Role menu holds {} bindings, only the first {} get reactions",
                    bindings.len(),
                    shown
                );
            }
            let listing = bindings[..shown]
                .iter()
                .enumerate()
                .map(|(i, binding)| format!("{} {}", DIGIT_EMOJI[i], binding.label))
                .collect::<Vec<_>>()
                .join("\n");
            let message = channel_id
                .send_message(
                    ctx,
                    CreateMessage::new().embed(role_picker_embed().field("Roles", listing, false)),
                )
                .await?;
            for emoji in DIGIT_EMOJI.iter().take(shown) {
                message
                    .react(ctx, ReactionType::Unicode((*emoji).to_string()))
                    .await?;
            }
            data.menus.insert(message.id, MenuKind::RolePicker);
        }
    }
    Ok(())
}

/// Post the voice channel panel with its create affordance.
pub async fn post_voice_panel(
    ctx: &serenity::Context,
    data: &Data,
    channel_id: ChannelId,
) -> Result<(), BotError> {
    let embed = voice_panel_embed();
    match data.menu_style {
        MenuStyle::Buttons => {
            let row = CreateActionRow::Buttons(vec![
                CreateButton::new("create_voice_channel")
                    .label("Create a voice channel")
                    .style(serenity::ButtonStyle::Success),
            ]);
            channel_id
                .send_message(
                    ctx,
                    CreateMessage::new().embed(embed).components(vec![row]),
                )
                .await?;
        }
        MenuStyle::Reactions => {
            let message = channel_id
                .send_message(ctx, CreateMessage::new().embed(embed))
                .await?;
            message
                .react(ctx, ReactionType::Unicode(VOICE_EMOJI.to_string()))
                .await?;
            data.menus.insert(message.id, MenuKind::VoicePanel);
        }
    }
    Ok(())
}

/// Chunk one button per binding, five per row, capped at the component
/// row limit.
pub fn role_button_rows(bindings: &[RoleBinding]) -> Vec<CreateActionRow> {
    bindings
        .chunks(BUTTONS_PER_ROW)
        .take(MAX_COMPONENT_ROWS)
        .map(|chunk| {
            CreateActionRow::Buttons(
                chunk
                    .iter()
                    .map(|binding| {
                        CreateButton::new(role_custom_id(binding.role_id))
                            .label(&binding.label)
                            .style(serenity::ButtonStyle::Secondary)
                    })
                    .collect(),
            )
        })
        .collect()
}

fn phone_guide_embed() -> CreateEmbed {
    CreateEmbed::new()
        .title("🔒 Phone Verification Guide 🔒")
        .description(
            "Welcome! To keep this server safe, members are asked to verify \
            a phone number. Follow the steps below to complete verification.",
        )
        .field(
            "⚠️ Note",
            "* Verification keeps the server safe and is required.\n\
            * Once verified you will not be asked again unless your number changes.",
            false,
        )
        .field("\u{200B}", "Contact the staff if anything is unclear.", false)
        .colour(Colour::new(0x0099FF))
}

fn role_picker_embed() -> CreateEmbed {
    CreateEmbed::new()
        .title("🎮 Role Selection 🎮")
        .description(
            "Pick the roles that fit you. Your roles decide what you can \
            see and do on this server.",
        )
        .field(
            "1. Pick a role",
            "Choose any entry below that suits you. You can hold several roles at once.",
            false,
        )
        .field(
            "2. Change your mind",
            "Roles can be changed later. Pick the same entry again to remove it.",
            false,
        )
        .field("\u{200B}", "Contact the staff if anything is unclear.", false)
        .colour(Colour::new(0x00FF00))
}

fn voice_panel_embed() -> CreateEmbed {
    CreateEmbed::new()
        .title("🔊 Voice Channels 🔊")
        .description("Create a temporary voice channel on demand.")
        .field(
            "How it works",
            format!(
                "1. Ask for a channel below\n\
                2. Give it a name\n\
                3. Join it within {} seconds or it is removed\n\
                4. Once everyone leaves, it is removed {} seconds later",
                JOIN_GRACE.as_secs(),
                EMPTY_GRACE.as_secs()
            ),
            false,
        )
        .colour(Colour::new(0xFF0000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_style_parses_case_insensitively() {
        assert_eq!(MenuStyle::parse("buttons"), Some(MenuStyle::Buttons));
        assert_eq!(MenuStyle::parse("Reactions"), Some(MenuStyle::Reactions));
        assert_eq!(MenuStyle::parse("REACTIONS"), Some(MenuStyle::Reactions));
        assert_eq!(MenuStyle::parse("modal"), None);
        assert_eq!(MenuStyle::parse(""), None);
    }

    #[test]
    fn role_custom_id_round_trips() {
        let role_id = RoleId::new(123456789);
        assert_eq!(parse_role_custom_id(&role_custom_id(role_id)), Some(role_id));
    }

    #[test]
    fn unrecognized_custom_ids_are_rejected() {
        assert_eq!(parse_role_custom_id("role_"), None);
        assert_eq!(parse_role_custom_id("role_abc"), None);
        assert_eq!(parse_role_custom_id("role_0"), None);
        assert_eq!(parse_role_custom_id("verify_phone"), None);
        assert_eq!(parse_role_custom_id("rolex_123"), None);
    }

    #[test]
    fn digit_emoji_map_positionally() {
        assert_eq!(index_for_digit("1️⃣"), Some(0));
        assert_eq!(index_for_digit("🔟"), Some(9));
        assert_eq!(index_for_digit("🎮"), None);
    }

    #[test]
    fn role_buttons_chunk_five_per_row_and_cap_at_the_row_limit() {
        let bindings: Vec<RoleBinding> = (1..=27)
            .map(|i| RoleBinding {
                label: format!("Role {}", i),
                role_id: RoleId::new(i),
            })
            .collect();

        let rows = role_button_rows(&bindings);
        assert_eq!(rows.len(), MAX_COMPONENT_ROWS);

        let rows = role_button_rows(&bindings[..7]);
        assert_eq!(rows.len(), 2);
    }
}
