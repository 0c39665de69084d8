//! StudentDirectory: in-memory student store
//!
//! Holds every student record for the lifetime of the process. Each
//! operation is atomic for the id it touches; DashMap's sharded locks
//! serialize concurrent writers on the same key.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

use crate::error::{DirectoryError, Result};
use crate::student::{Student, StudentId, StudentPatch};

/// Result of a lookup by name. A miss is an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameLookup {
    Found(Student),
    NotFound,
}

/// Result of a lookup by id with an optional name check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdNameLookup {
    Found(Student),
    NameMismatch,
}

pub struct StudentDirectory {
    students: DashMap<StudentId, Student>,
}

impl StudentDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self {
            students: DashMap::new(),
        }
    }

    /// Create a directory holding the default seed records
    pub fn seeded() -> Self {
        let directory = Self::new();
        for student in seed_students() {
            directory.students.insert(student.id, student);
        }
        info!("Seeded student directory with {} records", directory.len());
        directory
    }

    pub fn get_by_id(&self, id: StudentId) -> Result<Student> {
        match self.students.get(&id) {
            Some(entry) => {
                debug!("GET: student {}", id);
                Ok(entry.value().clone())
            }
            None => {
                debug!("GET: student {} not found", id);
                Err(DirectoryError::NotFound { id: id.get() })
            }
        }
    }

    /// Return the first student whose name equals `name` exactly.
    ///
    /// Iteration order is unspecified, so with duplicate names any one of
    /// them may be returned.
    pub fn get_by_name(&self, name: &str) -> NameLookup {
        let found = self
            .students
            .iter()
            .find(|entry| entry.value().name == name)
            .map(|entry| entry.value().clone());

        match found {
            Some(student) => {
                debug!("GET by name: {} -> student {}", name, student.id);
                NameLookup::Found(student)
            }
            None => {
                debug!("GET by name: {} not found", name);
                NameLookup::NotFound
            }
        }
    }

    /// Look up `id`, and if a non-empty `name` is given, check it matches.
    pub fn get_by_id_and_name(&self, id: StudentId, name: Option<&str>) -> Result<IdNameLookup> {
        let student = self.get_by_id(id)?;

        match name.filter(|n| !n.is_empty()) {
            Some(name) if student.name != name => {
                debug!("GET: student {} name mismatch ({} != {})", id, student.name, name);
                Ok(IdNameLookup::NameMismatch)
            }
            _ => Ok(IdNameLookup::Found(student)),
        }
    }

    /// Add a new student. Fails with `Conflict` if `id` is taken, leaving
    /// the existing record untouched.
    ///
    /// Fields are stored as given; an empty name is accepted.
    pub fn insert(
        &self,
        id: StudentId,
        name: impl Into<String>,
        age: i64,
        class_name: impl Into<String>,
    ) -> Result<Student> {
        match self.students.entry(id) {
            Entry::Occupied(_) => {
                debug!("INSERT: student {} already exists", id);
                Err(DirectoryError::Conflict { id: id.get() })
            }
            Entry::Vacant(slot) => {
                let student = Student::new(id, name, age, class_name);
                slot.insert(student.clone());
                info!("INSERT: student {} ({})", id, student.name);
                Ok(student)
            }
        }
    }

    /// Apply `patch` to an existing student and return the result.
    ///
    /// Falsy values in the patch (empty strings, zero age) are ignored; see
    /// [`Student::apply`].
    pub fn update(&self, id: StudentId, patch: &StudentPatch) -> Result<Student> {
        let mut entry = self
            .students
            .get_mut(&id)
            .ok_or(DirectoryError::NotFound { id: id.get() })?;

        if patch.is_empty() {
            debug!("UPDATE: student {} with no fields supplied", id);
        }
        entry.value_mut().apply(patch);
        info!("UPDATE: student {}", id);
        Ok(entry.value().clone())
    }

    /// Remove a student, returning the removed record.
    pub fn delete(&self, id: StudentId) -> Result<Student> {
        match self.students.remove(&id) {
            Some((_, student)) => {
                info!("DELETE: student {}", id);
                Ok(student)
            }
            None => {
                debug!("DELETE: student {} not found", id);
                Err(DirectoryError::NotFound { id: id.get() })
            }
        }
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn stats(&self) -> DirectoryStats {
        DirectoryStats {
            num_students: self.len(),
        }
    }
}

impl Default for StudentDirectory {
    fn default() -> Self {
        Self::new()
    }
}

/// Directory statistics
#[derive(Debug, Clone)]
pub struct DirectoryStats {
    pub num_students: usize,
}

fn seed_students() -> Vec<Student> {
    [(1, "John", 17, "year 12"), (2, "Jane", 16, "year 11")]
        .into_iter()
        .filter_map(|(id, name, age, class_name)| {
            StudentId::new(id)
                .ok()
                .map(|id| Student::new(id, name, age, class_name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: i64) -> StudentId {
        StudentId::new(n).unwrap()
    }

    #[test]
    fn test_seeded_contents() {
        let directory = StudentDirectory::seeded();
        assert_eq!(directory.len(), 2);

        let john = directory.get_by_id(id(1)).unwrap();
        assert_eq!((john.name.as_str(), john.age, john.class_name.as_str()), ("John", 17, "year 12"));

        let jane = directory.get_by_id(id(2)).unwrap();
        assert_eq!((jane.name.as_str(), jane.age, jane.class_name.as_str()), ("Jane", 16, "year 11"));
    }

    #[test]
    fn test_name_lookup_is_case_sensitive() {
        let directory = StudentDirectory::seeded();
        assert!(matches!(directory.get_by_name("Jane"), NameLookup::Found(s) if s.id == id(2)));
        assert_eq!(directory.get_by_name("jane"), NameLookup::NotFound);
    }

    #[test]
    fn test_id_and_name_check() {
        let directory = StudentDirectory::seeded();
        assert!(matches!(
            directory.get_by_id_and_name(id(1), Some("John")),
            Ok(IdNameLookup::Found(_))
        ));
        assert!(matches!(
            directory.get_by_id_and_name(id(1), None),
            Ok(IdNameLookup::Found(_))
        ));
        assert!(matches!(
            directory.get_by_id_and_name(id(1), Some("")),
            Ok(IdNameLookup::Found(_))
        ));
        assert_eq!(
            directory.get_by_id_and_name(id(1), Some("Jane")),
            Ok(IdNameLookup::NameMismatch)
        );
        assert_eq!(
            directory.get_by_id_and_name(id(9), Some("John")),
            Err(DirectoryError::NotFound { id: 9 })
        );
    }

    #[test]
    fn test_stats_track_inserts_and_deletes() {
        let directory = StudentDirectory::seeded();
        directory.insert(id(10), "Zed", 12, "year 7").unwrap();
        assert_eq!(directory.stats().num_students, 3);

        directory.delete(id(1)).unwrap();
        assert_eq!(directory.stats().num_students, 2);
    }
}
