use std::fmt;
use std::io;

use serde::Serialize;

use crate::provider::ClassScope;

// ---------------------------------------------------------------------------
// Fatal errors
// ---------------------------------------------------------------------------

/// Failure reported by a roster or response provider.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The backing store could not be reached.
    #[error("data source unavailable: {0}")]
    Unavailable(String),

    /// The requested period or scope has no data at all.
    #[error("no data for {0}")]
    NotFound(String),

    /// I/O error while reading a local source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source returned a payload that could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors that abort the analysis of a period.
///
/// Data-quality problems in individual records are never errors; they are
/// collected as [`DataWarning`]s instead.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The roster for the requested class could not be fetched.
    #[error("roster fetch failed for {scope}: {source}")]
    RosterFetch {
        scope: ClassScope,
        #[source]
        source: FetchError,
    },

    /// The survey responses for the requested period could not be fetched.
    #[error("response fetch failed for period {period}: {source}")]
    ResponseFetch {
        period: String,
        #[source]
        source: FetchError,
    },

    /// The caller cancelled the run before it finished.
    #[error("analysis cancelled")]
    Cancelled,
}

impl AnalysisError {
    /// Stable code identifier for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::RosterFetch { .. } => "E1001",
            Self::ResponseFetch { .. } => "E1002",
            Self::Cancelled => "E2001",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::RosterFetch { .. } => Some("Check the school/grade/class scope and the roster source."),
            Self::ResponseFetch { .. } => Some("Check that a survey exists for the requested period."),
            Self::Cancelled => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Non-fatal warnings
// ---------------------------------------------------------------------------

/// A data-quality problem that was recovered from locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataWarning {
    /// A response record's payload was not a question → answer object.
    MalformedRecord { respondent: String, reason: String },
    /// One answer inside an otherwise valid record could not be read.
    MalformedAnswer {
        respondent: String,
        question: String,
        reason: String,
    },
    /// A student nominated themselves.
    SelfNomination { student: String },
    /// A nomination referenced a student outside the roster.
    DanglingReference {
        nominator: String,
        nominee: String,
        missing: String,
    },
    /// The roster listed the same student id more than once.
    DuplicateRosterEntry { student: String },
}

impl DataWarning {
    /// Short machine-friendly label of the warning kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MalformedRecord { .. } => "malformed_record",
            Self::MalformedAnswer { .. } => "malformed_answer",
            Self::SelfNomination { .. } => "self_nomination",
            Self::DanglingReference { .. } => "dangling_reference",
            Self::DuplicateRosterEntry { .. } => "duplicate_roster_entry",
        }
    }
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRecord { respondent, reason } => {
                write!(f, "skipped response from {respondent}: {reason}")
            }
            Self::MalformedAnswer {
                respondent,
                question,
                reason,
            } => write!(
                f,
                "skipped answer to {question} from {respondent}: {reason}"
            ),
            Self::SelfNomination { student } => {
                write!(f, "dropped self-nomination by {student}")
            }
            Self::DanglingReference {
                nominator,
                nominee,
                missing,
            } => write!(
                f,
                "dropped nomination {nominator} -> {nominee}: {missing} is not on the roster"
            ),
            Self::DuplicateRosterEntry { student } => {
                write!(f, "roster lists {student} more than once")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let scope = ClassScope::new("school-1", "3", "2");
        let all = [
            AnalysisError::RosterFetch {
                scope,
                source: FetchError::Unavailable("down".into()),
            },
            AnalysisError::ResponseFetch {
                period: "2024-1".into(),
                source: FetchError::NotFound("2024-1".into()),
            },
            AnalysisError::Cancelled,
        ];
        let codes: HashSet<&str> = all.iter().map(AnalysisError::code).collect();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn fetch_error_message_includes_scope() {
        let err = AnalysisError::RosterFetch {
            scope: ClassScope::new("school-1", "3", "2"),
            source: FetchError::Unavailable("timeout".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("school-1"), "{msg}");
        assert!(msg.contains("timeout"), "{msg}");
    }

    #[test]
    fn warnings_serialize_with_kind_tag() {
        let warning = DataWarning::SelfNomination {
            student: "s-1".into(),
        };
        let json = serde_json::to_value(&warning).expect("serialize warning");
        assert_eq!(json["kind"], "self_nomination");
        assert_eq!(json["student"], "s-1");
        assert_eq!(warning.kind(), "self_nomination");
    }

    #[test]
    fn dangling_reference_display_names_missing_student() {
        let warning = DataWarning::DanglingReference {
            nominator: "a".into(),
            nominee: "zz".into(),
            missing: "zz".into(),
        };
        assert_eq!(
            warning.to_string(),
            "dropped nomination a -> zz: zz is not on the roster"
        );
    }
}
