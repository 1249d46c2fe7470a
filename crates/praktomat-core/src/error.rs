//! Gradebook error types.
//!
//! Every operation on the [`Gradebook`](crate::gradebook::Gradebook) validates
//! its input before touching any state, so an error always means the call was
//! rejected as a whole. The shell renders these as human messages.

use thiserror::Error;

use crate::model::{MatNumber, TaskId};

/// Errors returned by gradebook operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradebookError {
    /// A tutor or student name is empty or contains characters other than `a-z`.
    #[error("name must consist of lowercase letters only: '{0}'")]
    InvalidName(String),

    /// A matriculation number outside `1..=99999`.
    #[error("matriculation number must be a positive number of at most five digits: {0}")]
    InvalidMatNumber(u32),

    /// A grade outside `1..=5`.
    #[error("grade must be a number between 1 and 5: {0}")]
    InvalidGrade(u8),

    /// A review comment is blank.
    #[error("no comment is given")]
    InvalidComment,

    /// Some other required text (task description, solution) is blank.
    #[error("no {0} is given")]
    InvalidInput(&'static str),

    /// A student was added before any tutor was created or selected.
    #[error("no tutor is selected")]
    NoTutorSelected,

    #[error("student {0} already exists")]
    DuplicateStudent(MatNumber),

    #[error("student {mat_number} already submitted a solution to task {task}")]
    DuplicateSolution { task: TaskId, mat_number: MatNumber },

    #[error("tutor does not exist: {0}")]
    NoSuchTutor(String),

    #[error("student does not exist: {0}")]
    NoSuchStudent(u32),

    #[error("task does not exist: {0}")]
    NoSuchTask(TaskId),

    #[error("student {mat_number} has no solution for task {task}")]
    NoSuchSolution { task: TaskId, mat_number: MatNumber },
}

impl GradebookError {
    /// Returns `true` if the error is a referential lookup failure rather than
    /// a format or uniqueness violation.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GradebookError::NoSuchTutor(_)
                | GradebookError::NoSuchStudent(_)
                | GradebookError::NoSuchTask(_)
                | GradebookError::NoSuchSolution { .. }
        )
    }
}

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, GradebookError>;
