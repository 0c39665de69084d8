//! Student records and the identifiers that key them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DirectoryError, Result};

/// Primary key of a student record. Always `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StudentId(i64);

impl StudentId {
    pub fn new(id: i64) -> Result<Self> {
        if id < 1 {
            return Err(DirectoryError::InvalidId { id });
        }
        Ok(Self(id))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for StudentId {
    type Error = DirectoryError;

    fn try_from(id: i64) -> Result<Self> {
        Self::new(id)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored student.
///
/// The id lives in the URL on the wire, so it is not serialized with the
/// record body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    #[serde(skip_serializing)]
    pub id: StudentId,
    pub name: String,
    pub age: i64,
    #[serde(rename = "class")]
    pub class_name: String,
}

impl Student {
    pub fn new(id: StudentId, name: impl Into<String>, age: i64, class_name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            class_name: class_name.into(),
        }
    }

    /// Overwrite the fields carried by `patch`.
    ///
    /// Only truthy values are applied: an empty string or an age of zero is
    /// treated the same as an absent field, so those values can never be
    /// written through an update.
    pub fn apply(&mut self, patch: &StudentPatch) {
        if let Some(name) = patch.name.as_deref().filter(|n| !n.is_empty()) {
            self.name = name.to_string();
        }
        if let Some(age) = patch.age.filter(|a| *a != 0) {
            self.age = age;
        }
        if let Some(class_name) = patch.class_name.as_deref().filter(|c| !c.is_empty()) {
            self.class_name = class_name.to_string();
        }
    }
}

/// Partial update of a student record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub class_name: Option<String>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.class_name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn john() -> Student {
        Student::new(StudentId::new(1).unwrap(), "John", 17, "year 12")
    }

    #[test]
    fn test_id_rejects_non_positive() {
        assert_eq!(StudentId::new(0), Err(DirectoryError::InvalidId { id: 0 }));
        assert_eq!(StudentId::new(-3), Err(DirectoryError::InvalidId { id: -3 }));
        assert_eq!(StudentId::try_from(7).unwrap().get(), 7);
    }

    #[test]
    fn test_serializes_without_id_and_with_class_key() {
        let value = serde_json::to_value(john()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"name": "John", "age": 17, "class": "year 12"})
        );
    }

    #[test]
    fn test_apply_partial_patch() {
        let mut student = john();
        student.apply(&StudentPatch {
            age: Some(18),
            ..Default::default()
        });
        assert_eq!(student.age, 18);
        assert_eq!(student.name, "John");
        assert_eq!(student.class_name, "year 12");
    }

    #[test]
    fn test_apply_ignores_falsy_values() {
        let mut student = john();
        let patch = StudentPatch {
            name: Some(String::new()),
            age: Some(0),
            class_name: Some(String::new()),
        };
        assert!(!patch.is_empty());
        student.apply(&patch);
        assert_eq!(student, john());
    }
}
