use std::fs;
use std::io;
use std::path::PathBuf;

use poise::serenity_prelude::{GuildId, RoleId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::BotError;

/// One label-to-role association shown as a button or reaction entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBinding {
    #[serde(rename = "buttonText")]
    pub label: String,
    #[serde(rename = "roleId")]
    pub role_id: RoleId,
}

/// The full role configuration of one guild.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoleRegistry {
    pub roles: Vec<RoleBinding>,
}

/// Per-guild role-config records, one JSON file per guild.
///
/// Every read re-parses the file and every write replaces the whole
/// document. Concurrent upserts for the same guild race and the last
/// write wins; write concurrency is expected to be negligible.
#[derive(Clone)]
pub struct RoleStore {
    dir: PathBuf,
}

impl RoleStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, BotError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| BotError::Storage(format!("create {}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    fn record_path(&self, guild_id: GuildId) -> PathBuf {
        self.dir.join(format!("{}_roles.json", guild_id))
    }

    /// Load a guild's registry. A guild with no record yet loads empty;
    /// a record that exists but does not parse is a storage error.
    pub fn load(&self, guild_id: GuildId) -> Result<RoleRegistry, BotError> {
        let path = self.record_path(guild_id);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(RoleRegistry::default()),
            Err(e) => return Err(BotError::Storage(format!("read {}: {}", path.display(), e))),
        };
        serde_json::from_str(&raw)
            .map_err(|e| BotError::Storage(format!("parse {}: {}", path.display(), e)))
    }

    /// Replace the binding with a matching label, or append a new one,
    /// then rewrite the guild's record in full.
    pub fn upsert(&self, guild_id: GuildId, label: &str, role_id: RoleId) -> Result<(), BotError> {
        let mut registry = self.load(guild_id)?;
        match registry.roles.iter_mut().find(|b| b.label == label) {
            Some(binding) => binding.role_id = role_id,
            None => registry.roles.push(RoleBinding {
                label: label.to_string(),
                role_id,
            }),
        }
        self.save(guild_id, &registry)?;
        info!(
            "Bound label '{}' to role {} in guild {}",
            label, role_id, guild_id
        );
        Ok(())
    }

    /// All bindings of a guild, in insertion order.
    pub fn list_bindings(&self, guild_id: GuildId) -> Result<Vec<RoleBinding>, BotError> {
        self.load(guild_id).map(|registry| registry.roles)
    }

    fn save(&self, guild_id: GuildId, registry: &RoleRegistry) -> Result<(), BotError> {
        let path = self.record_path(guild_id);
        let raw = serde_json::to_string_pretty(registry)
            .map_err(|e| BotError::Storage(format!("encode {}: {}", path.display(), e)))?;
        fs::write(&path, raw)
            .map_err(|e| BotError::Storage(format!("write {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(tag: &str) -> RoleStore {
        let dir = std::env::temp_dir().join(format!(
            "concierge-registry-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        RoleStore::new(dir).expect("store directory")
    }

    fn guild() -> GuildId {
        GuildId::new(42)
    }

    #[test]
    fn missing_record_loads_empty() {
        let store = temp_store("missing");
        let registry = store.load(guild()).expect("load");
        assert!(registry.roles.is_empty());
    }

    #[test]
    fn upsert_appends_new_labels_in_order() {
        let store = temp_store("append");
        store.upsert(guild(), "Gamer", RoleId::new(1)).expect("upsert");
        store.upsert(guild(), "Artist", RoleId::new(2)).expect("upsert");

        let bindings = store.list_bindings(guild()).expect("list");
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].label, "Gamer");
        assert_eq!(bindings[0].role_id, RoleId::new(1));
        assert_eq!(bindings[1].label, "Artist");
        assert_eq!(bindings[1].role_id, RoleId::new(2));
    }

    #[test]
    fn upsert_replaces_matching_label_last_write_wins() {
        let store = temp_store("replace");
        store.upsert(guild(), "Gamer", RoleId::new(1)).expect("upsert");
        store.upsert(guild(), "Gamer", RoleId::new(9)).expect("upsert");

        let bindings = store.list_bindings(guild()).expect("list");
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].label, "Gamer");
        assert_eq!(bindings[0].role_id, RoleId::new(9));
    }

    #[test]
    fn corrupt_record_is_a_storage_error() {
        let store = temp_store("corrupt");
        fs::write(store.record_path(guild()), "{ not json").expect("write garbage");

        let result = store.load(guild());
        assert!(matches!(result, Err(BotError::Storage(_))));
    }

    #[test]
    fn record_uses_pretty_printed_wire_shape() {
        let store = temp_store("wire");
        store.upsert(guild(), "Gamer", RoleId::new(7)).expect("upsert");

        let raw = fs::read_to_string(store.record_path(guild())).expect("read back");
        assert!(raw.contains("\"roles\""));
        assert!(raw.contains("\"buttonText\": \"Gamer\""));
        assert!(raw.contains("\"roleId\""));
        // Pretty-printed, not a single line
        assert!(raw.lines().count() > 1);
    }

    #[test]
    fn guilds_do_not_share_records() {
        let store = temp_store("isolation");
        store.upsert(GuildId::new(1), "A", RoleId::new(1)).expect("upsert");

        let other = store.list_bindings(GuildId::new(2)).expect("list");
        assert!(other.is_empty());
    }
}
