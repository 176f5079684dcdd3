//! Event/alarm severity value object.

use crate::{OnmsError, OnmsResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// OpenNMS severities, declared in ascending order.
///
/// The derived ordering follows declaration order, which matches the
/// numeric severity id used by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Severity could not be determined.
    Indeterminate,
    /// The condition has been cleared.
    Cleared,
    /// Informational, nothing wrong.
    Normal,
    /// Early warning of a possible problem.
    Warning,
    /// Minor problem.
    Minor,
    /// Major problem.
    Major,
    /// Critical problem requiring immediate attention.
    Critical,
}

impl Severity {
    /// Returns the numeric id the server uses for this severity.
    #[must_use]
    pub const fn id(&self) -> u8 {
        match self {
            Self::Indeterminate => 1,
            Self::Cleared => 2,
            Self::Normal => 3,
            Self::Warning => 4,
            Self::Minor => 5,
            Self::Major => 6,
            Self::Critical => 7,
        }
    }

    /// Returns the canonical upper-case label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Indeterminate => "INDETERMINATE",
            Self::Cleared => "CLEARED",
            Self::Normal => "NORMAL",
            Self::Warning => "WARNING",
            Self::Minor => "MINOR",
            Self::Major => "MAJOR",
            Self::Critical => "CRITICAL",
        }
    }

    /// All severities in ascending order.
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Indeterminate,
            Self::Cleared,
            Self::Normal,
            Self::Warning,
            Self::Minor,
            Self::Major,
            Self::Critical,
        ]
    }

    /// Looks up a severity by label, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`OnmsError::InvalidValue`] naming the label when it is unknown.
    pub fn for_label(label: &str) -> OnmsResult<Self> {
        let wanted = label.trim();
        Self::all()
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| OnmsError::invalid_value("severity", label))
    }

    /// Looks up a severity by its numeric id.
    ///
    /// # Errors
    ///
    /// Returns [`OnmsError::InvalidValue`] when the id is outside 1..=7.
    pub fn for_id(id: i64) -> OnmsResult<Self> {
        Self::all()
            .into_iter()
            .find(|s| i64::from(s.id()) == id)
            .ok_or_else(|| OnmsError::invalid_value("severity", id.to_string()))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Severity {
    type Err = OnmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::for_label(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_label_case_insensitive() {
        assert_eq!(Severity::for_label("MAJOR").unwrap(), Severity::Major);
        assert_eq!(Severity::for_label("major").unwrap(), Severity::Major);
        assert_eq!(Severity::for_label("Critical").unwrap(), Severity::Critical);
    }

    #[test]
    fn test_for_label_unknown_fails() {
        let err = Severity::for_label("catastrophic").unwrap_err();
        assert!(matches!(
            err,
            OnmsError::InvalidValue { field: "severity", ref value } if value == "catastrophic"
        ));
    }

    #[test]
    fn test_for_id() {
        assert_eq!(Severity::for_id(1).unwrap(), Severity::Indeterminate);
        assert_eq!(Severity::for_id(7).unwrap(), Severity::Critical);
        assert!(Severity::for_id(0).is_err());
        assert!(Severity::for_id(8).is_err());
    }

    #[test]
    fn test_ordering_follows_id() {
        let mut all = Severity::all().to_vec();
        all.reverse();
        all.sort();
        assert_eq!(all, Severity::all().to_vec());
        assert!(Severity::Critical > Severity::Major);
        assert!(Severity::Cleared < Severity::Normal);
        for pair in Severity::all().windows(2) {
            assert!(pair[0].id() < pair[1].id());
        }
    }

    #[test]
    fn test_display_and_from_str() {
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warning);
    }
}
