use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use poise::serenity_prelude::{
    self as serenity, ChannelId, ChannelType, CreateChannel, GuildId, UserId,
};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::constants::JOIN_GRACE;
use crate::error::BotError;
use crate::models::{Data, TempVoice};

/// Lifecycle of a temporary voice channel. A channel starts in
/// `AwaitingJoin` as soon as it is created; `Deleted` is terminal and
/// is represented by removing the channel's record from the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceLifecycle {
    AwaitingJoin,
    Occupied,
    Empty,
    Deleted,
}

/// Outcome of a grace-period check against live occupancy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerVerdict {
    /// The channel no longer exists; nothing to do.
    Gone,
    /// Still empty at check time; delete it.
    Delete,
    /// Somebody is inside; keep it and mark it occupied.
    Occupy,
}

/// Decide what a firing grace timer should do. `occupancy` is `None`
/// when the channel could not be fetched (already deleted).
pub fn grace_verdict(occupancy: Option<usize>) -> TimerVerdict {
    match occupancy {
        None => TimerVerdict::Gone,
        Some(0) => TimerVerdict::Delete,
        Some(_) => TimerVerdict::Occupy,
    }
}

/// Whether an occupancy change should arm the empty-grace timer.
///
/// Only the transition out of `Occupied` arms a timer. A channel already
/// in `Empty` has one armed, and a rejoin is picked up by that timer's
/// own live re-check at fire time rather than by rearming here.
pub fn should_arm_empty_timer(state: VoiceLifecycle, occupancy: usize) -> bool {
    state == VoiceLifecycle::Occupied && occupancy == 0
}

/// Create a temporary voice channel under the named category, record it
/// as `AwaitingJoin`, and arm the one-shot join-grace timer.
///
/// If the requesting member is already connected to a voice channel they
/// are moved into the new one; a failed move does not abort creation.
pub async fn create_temp_voice(
    ctx: &serenity::Context,
    guild_id: GuildId,
    name: &str,
    category_name: &str,
    user_id: UserId,
    data: &Data,
) -> Result<ChannelId, BotError> {
    let category_id = resolve_category(ctx, guild_id, category_name).await?;

    let channel = guild_id
        .create_channel(
            ctx,
            CreateChannel::new(name)
                .kind(ChannelType::Voice)
                .category(category_id),
        )
        .await?;

    data.temp_voice.insert(
        channel.id,
        TempVoice {
            guild_id,
            created_at: Utc::now(),
            state: VoiceLifecycle::AwaitingJoin,
        },
    );

    let requester_in_voice = ctx.cache.guild(guild_id).is_some_and(|guild| {
        guild
            .voice_states
            .get(&user_id)
            .and_then(|vs| vs.channel_id)
            .is_some()
    });
    if requester_in_voice
        && let Err(e) = guild_id.move_member(ctx, user_id, channel.id).await
    {
        warn!(
            "Failed to move member {} into new channel {}: {}",
            user_id, channel.id, e
        );
    }

    arm_grace_timer(ctx, channel.id, JOIN_GRACE, Arc::clone(&data.temp_voice));

    info!(
        "Created temp voice channel {} for user {} in guild {}",
        channel.id, user_id, guild_id
    );
    Ok(channel.id)
}

/// Resolve a category by exact name, creating it when absent.
/// Name matching is case-sensitive; with duplicates the topmost wins.
async fn resolve_category(
    ctx: &serenity::Context,
    guild_id: GuildId,
    name: &str,
) -> Result<ChannelId, BotError> {
    let channels = guild_id.channels(ctx).await?;
    if let Some(existing) = channels
        .values()
        .filter(|c| c.kind == ChannelType::Category && c.name == name)
        .min_by_key(|c| (c.position, c.id))
    {
        return Ok(existing.id);
    }

    let category = guild_id
        .create_channel(ctx, CreateChannel::new(name).kind(ChannelType::Category))
        .await?;
    info!("Created category '{}' in guild {}", name, guild_id);
    Ok(category.id)
}

/// Spawn a one-shot timer that re-checks the channel after `delay`.
///
/// The timer captures only the channel id and the state table; current
/// state and live occupancy are re-read when it fires.
pub fn arm_grace_timer(
    ctx: &serenity::Context,
    channel_id: ChannelId,
    delay: Duration,
    table: Arc<DashMap<ChannelId, TempVoice>>,
) {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        sleep(delay).await;
        finish_grace_period(&ctx, channel_id, &table).await;
    });
}

/// Single wait-then-check: fetch live occupancy once and act on it.
async fn finish_grace_period(
    ctx: &serenity::Context,
    channel_id: ChannelId,
    table: &DashMap<ChannelId, TempVoice>,
) {
    // Another path may have deleted the channel while we slept
    let Some(record) = table.get(&channel_id).map(|tv| (tv.guild_id, tv.created_at)) else {
        return;
    };
    let (guild_id, created_at) = record;

    match grace_verdict(live_occupancy(ctx, channel_id).await) {
        TimerVerdict::Gone => {
            table.remove(&channel_id);
        }
        TimerVerdict::Occupy => {
            if let Some(mut tv) = table.get_mut(&channel_id) {
                tv.state = VoiceLifecycle::Occupied;
            }
        }
        TimerVerdict::Delete => {
            if let Some(mut tv) = table.get_mut(&channel_id) {
                tv.state = VoiceLifecycle::Deleted;
            }
            // Nobody is waiting on this path; failures are logged, not surfaced
            if let Err(e) = channel_id.delete(ctx).await {
                warn!("Failed to delete temp voice channel {}: {}", channel_id, e);
            } else {
                let lifetime = (Utc::now() - created_at).num_seconds();
                info!(
                    "Deleted empty temp voice channel {} in guild {} after {}s",
                    channel_id, guild_id, lifetime
                );
            }
            table.remove(&channel_id);
        }
    }
}

/// Live member count of a voice channel, or `None` if it is gone.
pub async fn live_occupancy(ctx: &serenity::Context, channel_id: ChannelId) -> Option<usize> {
    let channel = channel_id.to_channel(ctx).await.ok()?;
    let guild_channel = channel.guild()?;
    guild_channel.members(ctx).ok().map(|members| members.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unjoined_channel_is_deleted_at_join_grace() {
        // Created, nobody joined before the grace elapsed
        assert_eq!(grace_verdict(Some(0)), TimerVerdict::Delete);
    }

    #[test]
    fn joined_channel_survives_join_grace() {
        assert_eq!(grace_verdict(Some(1)), TimerVerdict::Occupy);
        assert_eq!(grace_verdict(Some(4)), TimerVerdict::Occupy);
    }

    #[test]
    fn vanished_channel_is_left_alone() {
        assert_eq!(grace_verdict(None), TimerVerdict::Gone);
    }

    #[test]
    fn empty_grace_arms_only_when_an_occupied_channel_empties() {
        assert!(should_arm_empty_timer(VoiceLifecycle::Occupied, 0));

        // The join-grace timer covers a channel nobody has joined yet
        assert!(!should_arm_empty_timer(VoiceLifecycle::AwaitingJoin, 0));
        // An Empty channel already has a timer armed; no double-arming
        assert!(!should_arm_empty_timer(VoiceLifecycle::Empty, 0));
        assert!(!should_arm_empty_timer(VoiceLifecycle::Deleted, 0));
        assert!(!should_arm_empty_timer(VoiceLifecycle::Occupied, 2));
    }

    #[test]
    fn rejoin_before_empty_grace_keeps_the_channel() {
        // Occupied channel empties: the timer is armed
        assert!(should_arm_empty_timer(VoiceLifecycle::Occupied, 0));
        // Somebody came back before it fired: the fire-time check keeps it
        assert_eq!(grace_verdict(Some(1)), TimerVerdict::Occupy);
    }

    #[test]
    fn nobody_rejoins_before_empty_grace_deletes_the_channel() {
        assert!(should_arm_empty_timer(VoiceLifecycle::Occupied, 0));
        assert_eq!(grace_verdict(Some(0)), TimerVerdict::Delete);
    }

    #[test]
    fn second_empty_event_while_already_empty_does_not_rearm() {
        // Occupied -> empty arms the timer and moves the state to Empty;
        // a join plus leave before the fire must not arm a second timer
        assert!(should_arm_empty_timer(VoiceLifecycle::Occupied, 0));
        assert!(!should_arm_empty_timer(VoiceLifecycle::Empty, 0));
    }
}
