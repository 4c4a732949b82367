/// Pure functions for formatting user-facing messages (Discord-agnostic)

/// Format a validation error message with emoji
pub fn format_error(message: &str) -> String {
    format!("❌ {}", message)
}

/// Format a success message with emoji
pub fn format_success(message: &str) -> String {
    format!("✅ {}", message)
}

/// Format an info message with emoji
pub fn format_info(message: &str) -> String {
    format!("ℹ️ {}", message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error() {
        assert_eq!(format_error("nope"), "❌ nope");
    }

    #[test]
    fn test_format_success() {
        assert_eq!(format_success("done"), "✅ done");
    }

    #[test]
    fn test_format_info() {
        assert_eq!(format_info("fyi"), "ℹ️ fyi");
    }
}
