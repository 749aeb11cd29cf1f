//! Validation of task drafts

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::draft::{parse_optional_date, Field, TaskDraft};
use crate::task::Category;

/// Maximum length of a title, in characters
pub const TITLE_MAX_CHARS: usize = 255;
/// Maximum length of an author name, in characters
pub const AUTHOR_MAX_CHARS: usize = 20;
/// Maximum progress, in percent
pub const PROGRESS_MAX: i64 = 100;

/// Error messages, keyed by the field they relate to
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationErrors {
    messages: BTreeMap<Field, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding a single error
    pub fn single<S: ToString>(field: Field, message: S) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    pub fn insert<S: ToString>(&mut self, field: Field, message: S) {
        self.messages.insert(field, message.to_string());
    }

    /// Forget the error about a field (if any). Returns whether there was one
    pub fn clear(&mut self, field: Field) -> bool {
        self.messages.remove(&field).is_some()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.messages.get(&field).map(|msg| msg.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Iterate over the errors, in field order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.messages.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if first == false {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}


/// Check a draft against every rule a task must follow.
///
/// All rules are checked, so that every offending field gets its own message.
/// An empty result means the draft can be turned into a task.
pub fn validate(draft: &TaskDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if draft.title.trim().is_empty() {
        errors.insert(Field::Title, "Title is required");
    } else if draft.title.chars().count() > TITLE_MAX_CHARS {
        errors.insert(Field::Title, format!("Title must be at most {} characters long", TITLE_MAX_CHARS));
    }

    if draft.author.chars().count() > AUTHOR_MAX_CHARS {
        errors.insert(Field::Author, format!("Author must be at most {} characters long", AUTHOR_MAX_CHARS));
    }

    if draft.category.trim().is_empty() {
        errors.insert(Field::Category, "Category is required");
    } else if draft.category.parse::<Category>().is_err() {
        errors.insert(Field::Category, format!("Unknown category {:?}", draft.category));
    }

    let start_date = match parse_optional_date(&draft.start_date) {
        Ok(date) => date,
        Err(_) => {
            errors.insert(Field::StartDate, "Start date must be a YYYY-MM-DD date");
            None
        }
    };
    let end_date = match parse_optional_date(&draft.end_date) {
        Ok(date) => date,
        Err(_) => {
            errors.insert(Field::EndDate, "End date must be a YYYY-MM-DD date");
            None
        }
    };
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            errors.insert(Field::EndDate, "End date must not be before the start date");
        }
    }

    if draft.progress < 0 || draft.progress > PROGRESS_MAX {
        errors.insert(Field::Progress, format!("Progress must be between 0 and {}%", PROGRESS_MAX));
    }

    errors
}
