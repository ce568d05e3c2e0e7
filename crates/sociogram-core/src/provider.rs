//! Data provider seams.
//!
//! The analysis engine never reaches into ambient clients or caches. Roster
//! and response data are injected through [`RosterProvider`] and
//! [`ResponseProvider`], which makes every run deterministic and lets
//! several periods be analyzed concurrently.
//!
//! [`SnapshotStore`] is the in-memory implementation used by tests and by
//! the CLI, which deserializes it straight from a JSON snapshot file.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::model::{ResponseRecord, Student};

/// The `(school, grade, class)` tuple that identifies one classroom.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassScope {
    pub school_id: String,
    pub grade: String,
    pub class: String,
}

impl ClassScope {
    pub fn new(
        school_id: impl Into<String>,
        grade: impl Into<String>,
        class: impl Into<String>,
    ) -> Self {
        Self {
            school_id: school_id.into(),
            grade: grade.into(),
            class: class.into(),
        }
    }

    /// Whether `student` belongs to this classroom.
    #[must_use]
    pub fn contains(&self, student: &Student) -> bool {
        student.school_id == self.school_id
            && student.grade == self.grade
            && student.class == self.class
    }
}

impl fmt::Display for ClassScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} grade {} class {}", self.school_id, self.grade, self.class)
    }
}

/// Supplies the authoritative list of active students for a classroom.
pub trait RosterProvider: Send + Sync {
    /// Return the active students of `scope`, in a stable order.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the roster source is unavailable.
    fn active_students(&self, scope: &ClassScope) -> Result<Vec<Student>, FetchError>;
}

/// Supplies raw survey responses for a period.
pub trait ResponseProvider: Send + Sync {
    /// Return every response record collected for `period`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the responses cannot be retrieved.
    fn responses(&self, period: &str) -> Result<Vec<ResponseRecord>, FetchError>;
}

// ---------------------------------------------------------------------------
// SnapshotStore
// ---------------------------------------------------------------------------

/// An immutable in-memory snapshot of students and responses.
///
/// The JSON form is:
///
/// ```json
/// {
///   "students": [{"id": "s-1", "name": "Kim", "grade": "3", "class": "2", "school_id": "sch-1"}],
///   "responses": {"2024-1": [{"respondent_id": "s-1", "responses": {"q1": ["s-2"]}}]}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotStore {
    #[serde(default)]
    pub students: Vec<Student>,
    /// Period → response records.
    #[serde(default)]
    pub responses: BTreeMap<String, Vec<ResponseRecord>>,
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a student to the snapshot.
    #[must_use]
    pub fn with_student(mut self, student: Student) -> Self {
        self.students.push(student);
        self
    }

    /// Register the responses collected for `period` (replacing any
    /// earlier set).
    #[must_use]
    pub fn with_period(mut self, period: impl Into<String>, records: Vec<ResponseRecord>) -> Self {
        self.responses.insert(period.into(), records);
        self
    }

    /// Periods present in the snapshot, in lexical order.
    pub fn periods(&self) -> impl Iterator<Item = &str> {
        self.responses.keys().map(String::as_str)
    }
}

impl RosterProvider for SnapshotStore {
    fn active_students(&self, scope: &ClassScope) -> Result<Vec<Student>, FetchError> {
        Ok(self
            .students
            .iter()
            .filter(|s| s.is_active && scope.contains(s))
            .cloned()
            .collect())
    }
}

impl ResponseProvider for SnapshotStore {
    /// Unknown periods are an error rather than an empty survey, so a typo
    /// in a period id surfaces instead of reporting a class of isolates.
    fn responses(&self, period: &str) -> Result<Vec<ResponseRecord>, FetchError> {
        self.responses
            .get(period)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(format!("period {period}")))
    }
}
