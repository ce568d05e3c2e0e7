//! Student, response and nomination types.
//!
//! Raw survey payloads arrive as arbitrary JSON per question. They are
//! mapped to [`Answer`] at the extraction boundary so that nothing
//! downstream ever branches on raw JSON shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Student
// ---------------------------------------------------------------------------

/// An enrolled student as returned by the roster provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Stable student identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Grade (school year), kept as the provider spells it.
    pub grade: String,
    /// Class within the grade.
    pub class: String,
    /// Identifier of the school the student currently attends.
    #[serde(default)]
    pub school_id: String,
    /// Inactive students are excluded from rosters.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Student {
    /// Build an active student. Mostly useful for tests and fixtures.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        grade: impl Into<String>,
        class: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grade: grade.into(),
            class: class.into(),
            school_id: String::new(),
            is_active: true,
        }
    }

    /// Set the school affiliation.
    #[must_use]
    pub fn in_school(mut self, school_id: impl Into<String>) -> Self {
        self.school_id = school_id.into();
        self
    }
}

// ---------------------------------------------------------------------------
// Raw responses
// ---------------------------------------------------------------------------

/// One respondent's answers to one survey.
///
/// `responses` is expected to be a JSON object keyed by question id. Any
/// other shape makes the whole record malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// The student who filled in the survey.
    #[serde(alias = "student_id")]
    pub respondent_id: String,
    /// Survey (period) the record belongs to.
    #[serde(default)]
    pub survey_id: String,
    /// Question id → answer payload.
    #[serde(default)]
    pub responses: Value,
}

impl ResponseRecord {
    /// Build a record from a respondent id and a JSON payload.
    pub fn new(respondent_id: impl Into<String>, survey_id: impl Into<String>, responses: Value) -> Self {
        Self {
            respondent_id: respondent_id.into(),
            survey_id: survey_id.into(),
            responses,
        }
    }
}

/// A single question's answer after shape validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Exactly one nominated student.
    Single(String),
    /// Several nominated students, in answer order.
    Many(Vec<String>),
    /// Unanswered (null, empty string or empty list).
    Absent,
    /// The payload could not be interpreted; carries a reason.
    Malformed(String),
}

impl Answer {
    /// Classify a raw JSON answer payload.
    ///
    /// Strings are trimmed; blank strings inside a list are ignored. A list
    /// containing anything other than strings is malformed as a whole.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::String(raw) => {
                let id = raw.trim();
                if id.is_empty() {
                    Self::Absent
                } else {
                    Self::Single(id.to_string())
                }
            }
            Value::Array(items) => {
                let mut ids = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(raw) => {
                            let id = raw.trim();
                            if !id.is_empty() {
                                ids.push(id.to_string());
                            }
                        }
                        other => {
                            return Self::Malformed(format!(
                                "list element is {}, expected a student id",
                                json_kind(other)
                            ));
                        }
                    }
                }
                if ids.is_empty() {
                    Self::Absent
                } else {
                    Self::Many(ids)
                }
            }
            other => Self::Malformed(format!(
                "answer is {}, expected a student id or a list of ids",
                json_kind(other)
            )),
        }
    }

    /// Nominated student ids carried by this answer (empty unless
    /// `Single` or `Many`).
    #[must_use]
    pub fn nominees(&self) -> &[String] {
        match self {
            Self::Single(id) => std::slice::from_ref(id),
            Self::Many(ids) => ids,
            Self::Absent | Self::Malformed(_) => &[],
        }
    }
}

/// Short human-readable name of a JSON value's type.
#[must_use]
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Nomination
// ---------------------------------------------------------------------------

/// A directed nomination edge: `nominator` named `nominee`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nomination {
    pub nominator: String,
    pub nominee: String,
    /// Strength weight of the tie.
    pub weight: f64,
    /// Relation-type tag, e.g. `"friend"`.
    pub relation: String,
    /// Period (survey) the nomination came from.
    pub period: String,
}

const fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
