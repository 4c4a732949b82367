use std::time::Duration;

/// How long a freshly created voice channel waits for its first member
/// before occupancy is checked once and the channel removed if still empty.
pub const JOIN_GRACE: Duration = Duration::from_secs(10);

/// How long an emptied voice channel waits before occupancy is re-checked
/// once and the channel removed if nobody came back.
pub const EMPTY_GRACE: Duration = Duration::from_secs(10);

/// Category that holds the temporary voice channels, created on demand.
pub const TEMP_CATEGORY_NAME: &str = "Temporary Channels";

/// Maximum length for channel names
pub const MAX_CHANNEL_NAME_LENGTH: u16 = 100;

/// Maximum length for a broadcast message
pub const MAX_BROADCAST_LENGTH: u16 = 2000;

/// Buttons per action row in the role menu
pub const BUTTONS_PER_ROW: usize = 5;

/// Action rows a single message may carry
pub const MAX_COMPONENT_ROWS: usize = 5;

/// Log directive for the application
pub const LOG_DIRECTIVE: &str = "concierge_rs=info";
