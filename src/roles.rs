use poise::serenity_prelude::{self as serenity, GuildId, Member, RoleId};
use tracing::info;

use crate::error::BotError;

/// What a toggle did to the member's role membership.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Granted,
    Revoked,
}

/// Grant when absent, revoke when held. There is no "set" operation;
/// repeated toggles alternate outcomes.
pub fn decide_toggle(holds_role: bool) -> ToggleOutcome {
    if holds_role {
        ToggleOutcome::Revoked
    } else {
        ToggleOutcome::Granted
    }
}

/// Flip `member`'s membership of `role_id`.
///
/// The role must resolve in the guild's current role set; otherwise the
/// call fails with `NotFound` and performs no platform mutation.
pub async fn toggle(
    ctx: &serenity::Context,
    guild_id: GuildId,
    member: &Member,
    role_id: RoleId,
) -> Result<ToggleOutcome, BotError> {
    let roles = guild_id.roles(ctx).await?;
    if !roles.contains_key(&role_id) {
        return Err(BotError::role_not_found(role_id));
    }

    let outcome = decide_toggle(member.roles.contains(&role_id));
    match outcome {
        ToggleOutcome::Granted => member.add_role(ctx, role_id).await?,
        ToggleOutcome::Revoked => member.remove_role(ctx, role_id).await?,
    }

    info!(
        "{:?} role {} for user {} in guild {}",
        outcome, role_id, member.user.id, guild_id
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_grants_when_absent_and_revokes_when_held() {
        assert_eq!(decide_toggle(false), ToggleOutcome::Granted);
        assert_eq!(decide_toggle(true), ToggleOutcome::Revoked);
    }

    #[test]
    fn repeated_toggles_alternate() {
        let mut holds = false;
        let mut outcomes = Vec::new();
        for _ in 0..4 {
            let outcome = decide_toggle(holds);
            holds = !holds;
            outcomes.push(outcome);
        }
        assert_eq!(
            outcomes,
            vec![
                ToggleOutcome::Granted,
                ToggleOutcome::Revoked,
                ToggleOutcome::Granted,
                ToggleOutcome::Revoked,
            ]
        );
    }

    #[test]
    fn double_toggle_restores_the_original_state() {
        for initial in [false, true] {
            let mut holds = initial;
            decide_toggle(holds);
            holds = !holds;
            decide_toggle(holds);
            holds = !holds;
            assert_eq!(holds, initial);
        }
    }
}
