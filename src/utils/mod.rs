/// Shared helper modules
pub mod channel_utils;
pub mod messages;
pub mod permissions;
