use std::sync::Arc;

use poise::serenity_prelude::{self as serenity, ChannelId, VoiceState};
use tracing::info;

use crate::{
    constants::EMPTY_GRACE,
    lifecycle::{VoiceLifecycle, arm_grace_timer, live_occupancy, should_arm_empty_timer},
    models::Data,
};

/// Handle voice state updates (user joins/leaves voice channels).
///
/// Joins need no handling here: an armed grace timer's fire-time check
/// picks up any members present. Only a vacated channel can start one.
pub async fn handle_voice_state_update(
    ctx: &serenity::Context,
    old_state: Option<VoiceState>,
    new_state: VoiceState,
    data: &Data,
) {
    if let Some(old) = &old_state
        && let Some(old_channel_id) = old.channel_id
        && new_state.channel_id != Some(old_channel_id)
    {
        handle_channel_vacated(ctx, old_channel_id, data).await;
    }
}

/// A member left `channel_id`; arm the empty-grace timer if this emptied
/// an occupied temporary channel.
async fn handle_channel_vacated(ctx: &serenity::Context, channel_id: ChannelId, data: &Data) {
    let Some(state) = data.temp_voice.get(&channel_id).map(|tv| tv.state) else {
        return;
    };

    let Some(occupancy) = live_occupancy(ctx, channel_id).await else {
        // Channel is already gone; drop the stale record
        data.temp_voice.remove(&channel_id);
        return;
    };

    if should_arm_empty_timer(state, occupancy) {
        if let Some(mut tv) = data.temp_voice.get_mut(&channel_id) {
            tv.state = VoiceLifecycle::Empty;
        }
        arm_grace_timer(ctx, channel_id, EMPTY_GRACE, Arc::clone(&data.temp_voice));
        info!(
            "Temp voice channel {} emptied, removal in {}s unless somebody rejoins",
            channel_id,
            EMPTY_GRACE.as_secs()
        );
    }
}
