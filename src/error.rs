//! Errors returned by the task controller and the task store

use crate::draft::Field;
use crate::validation::ValidationErrors;

/// A rejected operation.
///
/// None of these is fatal: the task collection is left untouched whenever one is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TaskError {
    /// The index does not designate a task (e.g. a stale index after a deletion)
    #[error("no task at index {index} (the list holds {len} tasks)")]
    IndexOutOfRange { index: usize, len: usize },

    /// A draft operation was attempted while no task is being created or edited
    #[error("no task is currently being created or edited")]
    NoOpenSession,

    /// The value given for a draft field is not of the kind this field holds
    #[error("field `{field}` expects {expected}")]
    FieldValue { field: Field, expected: &'static str },

    /// The task at the index of a deletion request is not the one the request was made for
    #[error("the task at index {index} changed since its deletion was requested")]
    StaleConfirmation { index: usize },

    /// The draft, or the task given to the store, did not pass validation
    #[error("invalid task: {0}")]
    Invalid(ValidationErrors),
}
