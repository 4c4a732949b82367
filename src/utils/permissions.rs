/// Pure functions for permission logic (Discord-agnostic)
use std::collections::HashSet;

use poise::serenity_prelude::RoleId;

/// Check whether any of a member's roles is in the set of roles that
/// grant administrator.
pub fn holds_admin_role(member_roles: &[RoleId], admin_roles: &HashSet<RoleId>) -> bool {
    member_roles.iter().any(|role| admin_roles.contains(role))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_set(ids: &[u64]) -> HashSet<RoleId> {
        ids.iter().map(|id| RoleId::new(*id)).collect()
    }

    #[test]
    fn test_holds_admin_role() {
        let member = vec![RoleId::new(10), RoleId::new(20)];

        assert!(holds_admin_role(&member, &admin_set(&[20, 40])));
        assert!(!holds_admin_role(&member, &admin_set(&[40, 50])));
    }

    #[test]
    fn test_holds_admin_role_empty_sets() {
        let member = vec![RoleId::new(10)];

        assert!(!holds_admin_role(&member, &admin_set(&[])));
        assert!(!holds_admin_role(&[], &admin_set(&[10])));
    }
}
