use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use poise::serenity_prelude::{ChannelId, GuildId, MessageId};

use crate::error::BotError;
use crate::lifecycle::VoiceLifecycle;
use crate::menu::{MenuKind, MenuStyle};
use crate::registry::RoleStore;

/// A temporary voice channel tracked by the lifecycle component.
///
/// Records live only in memory; a restart loses in-flight grace timers
/// and leaves already-created channels uncleaned.
#[derive(Clone, Debug)]
pub struct TempVoice {
    pub guild_id: GuildId,
    pub created_at: DateTime<Utc>,
    pub state: VoiceLifecycle,
}

/// Bot state shared across all handlers.
///
/// Constructed once at startup and owned by the framework; clones share
/// the underlying tables.
#[derive(Clone)]
pub struct Data {
    /// Per-guild durable role configuration
    pub store: RoleStore,
    /// Maps temporary voice channel IDs to their lifecycle records
    pub temp_voice: Arc<DashMap<ChannelId, TempVoice>>,
    /// Maps bot-posted menu message IDs to their kind (reaction style)
    pub menus: Arc<DashMap<MessageId, MenuKind>>,
    /// How menus are rendered and actions received
    pub menu_style: MenuStyle,
}

impl Data {
    pub fn new(store: RoleStore, menu_style: MenuStyle) -> Self {
        Self {
            store,
            temp_voice: Arc::new(DashMap::new()),
            menus: Arc::new(DashMap::new()),
            menu_style,
        }
    }
}

pub type Error = BotError;
pub type Context<'a> = poise::Context<'a, Data, Error>;
