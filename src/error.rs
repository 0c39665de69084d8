use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Student not found")]
    NotFound { id: i64 },

    #[error("Student with this ID already exists.")]
    Conflict { id: i64 },

    #[error("Student id must be greater than or equal to 1, got {id}")]
    InvalidId { id: i64 },
}

impl DirectoryError {
    /// The id the failed operation was asked about.
    pub fn id(&self) -> i64 {
        match self {
            DirectoryError::NotFound { id }
            | DirectoryError::Conflict { id }
            | DirectoryError::InvalidId { id } => *id,
        }
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_wire_detail() {
        assert_eq!(DirectoryError::NotFound { id: 4 }.to_string(), "Student not found");
        assert_eq!(
            DirectoryError::Conflict { id: 1 }.to_string(),
            "Student with this ID already exists."
        );
        assert_eq!(DirectoryError::InvalidId { id: 0 }.id(), 0);
    }
}
