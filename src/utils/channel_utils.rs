/// Pure functions for channel naming and validation (Discord-agnostic)

/// Default name for a channel created without an explicit one
pub fn format_default_channel_name(user_name: &str) -> String {
    format!("{}'s Channel", user_name)
}

/// Validate channel name length and content
pub fn is_valid_channel_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Channel name cannot be empty");
    }

    if name.chars().count() > 100 {
        return Err("Channel name cannot exceed 100 characters");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_default_channel_name() {
        assert_eq!(format_default_channel_name("Alice"), "Alice's Channel");
        assert_eq!(format_default_channel_name("Bob123"), "Bob123's Channel");
    }

    #[test]
    fn test_is_valid_channel_name() {
        assert!(is_valid_channel_name("general").is_ok());
        assert!(is_valid_channel_name("Game Room").is_ok());
        assert!(is_valid_channel_name("a").is_ok());

        assert!(is_valid_channel_name("").is_err());
        assert!(is_valid_channel_name("   ").is_err());

        let long_name = "a".repeat(101);
        assert!(is_valid_channel_name(&long_name).is_err());
    }
}
