//! Shared utility functions

use probectl::error::{ConsoleError, Result};

/// Format seconds as a human-readable interval (e.g., "45s", "5m", "2h", "1d")
pub fn format_interval(secs: u64) -> String {
    if secs < 60 || secs % 60 != 0 {
        format!("{}s", secs)
    } else if secs < 3600 || secs % 3600 != 0 {
        format!("{}m", secs / 60)
    } else if secs < 86400 || secs % 86400 != 0 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86400)
    }
}

/// Truncate a string to max_len characters (not bytes), adding "..." if truncated.
/// Safe for non-ASCII content (emoji, CJK, etc).
pub fn truncate_str(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        chars[..max_len].iter().collect()
    } else {
        format!("{}...", chars[..max_len - 3].iter().collect::<String>())
    }
}

/// Convert a 1-based number typed by the operator into an index
pub fn to_index(number: usize, len: usize) -> Result<usize> {
    if number == 0 || number > len {
        return Err(ConsoleError::TargetIndexOutOfRange {
            index: number.saturating_sub(1),
            len,
        });
    }
    Ok(number - 1)
}
