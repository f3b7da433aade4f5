//! Diagnostics produced by filter validation and execution.

use std::fmt;

use serde::{Deserialize, Serialize};

use common_error::codes;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// One `(code, message, severity)` record, tagged with the emitting filter.
///
/// Error codes are negative, warning codes positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: i32,
    pub message: String,
    pub severity: Severity,
    pub filter: String,
}

impl Diagnostic {
    /// An error diagnostic. The code is forced negative; `0` becomes
    /// [`codes::INTERNAL`] so an error never reads as success.
    pub fn error(filter: impl Into<String>, code: i32, message: impl Into<String>) -> Self {
        let code = match code.saturating_abs() {
            0 => codes::INTERNAL,
            magnitude => -magnitude,
        };
        Self {
            code,
            message: message.into(),
            severity: Severity::Error,
            filter: filter.into(),
        }
    }

    /// A warning diagnostic. The code is forced positive.
    pub fn warning(filter: impl Into<String>, code: i32, message: impl Into<String>) -> Self {
        Self {
            code: code.saturating_abs(),
            message: message.into(),
            severity: Severity::Warning,
            filter: filter.into(),
        }
    }

    /// Check if this is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Check if this is a warning.
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}): {}",
            self.filter, self.severity, self.code, self.message
        )
    }
}

/// The first (most significant) error code in `diagnostics`, or `NO_ERROR`.
pub fn first_error_code(diagnostics: &[Diagnostic]) -> i32 {
    diagnostics
        .iter()
        .find(|d| d.is_error())
        .map_or(codes::NO_ERROR, |d| d.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_signs() {
        let e = Diagnostic::error("F", 501, "bad");
        let w = Diagnostic::warning("F", -400, "meh");
        assert_eq!(e.code, -501);
        assert_eq!(w.code, 400);
        assert!(e.is_error());
        assert!(w.is_warning());
        assert_eq!(e.to_string(), "[F] error (-501): bad");
    }

    #[test]
    fn test_zero_error_code_stays_an_error() {
        let e = Diagnostic::error("F", 0, "no code");
        assert_eq!(e.code, codes::INTERNAL);
        assert_eq!(first_error_code(&[e]), codes::INTERNAL);
        assert_eq!(Diagnostic::error("F", i32::MIN, "x").code, -i32::MAX);
    }

    #[test]
    fn test_first_error_code() {
        let list = vec![
            Diagnostic::warning("F", 400, "w"),
            Diagnostic::error("F", -100, "e1"),
            Diagnostic::error("F", -200, "e2"),
        ];
        assert_eq!(first_error_code(&list), -100);
        assert_eq!(first_error_code(&list[..1]), codes::NO_ERROR);
    }
}
