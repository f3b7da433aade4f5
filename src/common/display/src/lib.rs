//! Display utilities for Mosaic.
//!
//! Outline rendering for registry structure dumps and small formatting
//! helpers shared by diagnostic messages.

mod outline;

pub use outline::Outline;

/// Format a dimension list as `[a, b, c]`.
pub fn format_dims(dims: &[usize]) -> String {
    let inner = dims
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{inner}]")
}

/// Shorten a string to at most `max_len` characters, marking the cut with `...`.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_dims() {
        assert_eq!(format_dims(&[4, 4, 4]), "[4, 4, 4]");
        assert_eq!(format_dims(&[1]), "[1]");
        assert_eq!(format_dims(&[]), "[]");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("a long array name", 8), "a lon...");
    }
}
