//! Task drafts, i.e. the mutable form state of a task being created or edited

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::TaskError;
use crate::task::{Category, Task, TaskPatch};
use crate::validation::{validate, ValidationErrors};

/// The format dates are entered and stored with
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The fields of a task, as named in forms and in storage
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Event,
    StartDate,
    EndDate,
    Description,
    Author,
    Category,
    Importancy,
    Urgency,
    Progress,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Title, Field::Event, Field::StartDate, Field::EndDate, Field::Description,
        Field::Author, Field::Category, Field::Importancy, Field::Urgency, Field::Progress,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Event => "event",
            Field::StartDate => "startDate",
            Field::EndDate => "endDate",
            Field::Description => "description",
            Field::Author => "author",
            Field::Category => "category",
            Field::Importancy => "importancy",
            Field::Urgency => "urgency",
            Field::Progress => "progress",
        }
    }

    /// Whether this field is a checkbox
    pub fn is_flag(&self) -> bool {
        matches!(self, Field::Event | Field::Importancy | Field::Urgency)
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Field {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL.iter()
            .find(|field| field.name() == s)
            .copied()
            .ok_or_else(|| format!("Unknown task field {:?}", s))
    }
}


/// A value entered into a draft field
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Number(i64),
}

impl FieldValue {
    /// Interpret raw user input the way a form input of this field's type would.
    ///
    /// Checkboxes accept `true`/`false`, `yes`/`no`, `on`/`off` and `1`/`0` (anything else unchecks them).
    /// The progress field accepts an integer, and falls back to 0 when the input is not a number.
    /// Free text (title, description, author) is kept verbatim, surrounding whitespace included.
    pub fn from_input(field: Field, raw: &str) -> Self {
        if field.is_flag() {
            let checked = matches!(raw.trim().to_lowercase().as_str(), "true" | "yes" | "on" | "1");
            return FieldValue::Flag(checked);
        }
        match field {
            Field::Progress => FieldValue::Number(raw.trim().parse().unwrap_or(0)),
            Field::StartDate | Field::EndDate | Field::Category => FieldValue::Text(raw.trim().to_string()),
            _ => FieldValue::Text(raw.to_string()),
        }
    }
}


/// The in-progress, not-yet-validated state of a task
///
/// Fields hold raw user input: dates and the category are plain text, and the progress may be out of range.
/// Use [`TaskDraft::to_task`] or [`TaskDraft::to_patch`] to turn a draft into an actual task.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub event: bool,
    /// `YYYY-MM-DD`, or empty
    pub start_date: String,
    /// `YYYY-MM-DD`, or empty
    pub end_date: String,
    pub description: String,
    pub author: String,
    /// A category code, or empty when none has been picked yet
    pub category: String,
    pub importancy: bool,
    pub urgency: bool,
    pub progress: i64,
}

impl TaskDraft {
    /// An empty draft, as used when creating a task
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, provided `value` is of the kind this field holds
    pub fn set(&mut self, field: Field, value: FieldValue) -> Result<(), TaskError> {
        match (field, value) {
            (Field::Title, FieldValue::Text(text))       => self.title = text,
            (Field::StartDate, FieldValue::Text(text))   => self.start_date = text,
            (Field::EndDate, FieldValue::Text(text))     => self.end_date = text,
            (Field::Description, FieldValue::Text(text)) => self.description = text,
            (Field::Author, FieldValue::Text(text))      => self.author = text,
            (Field::Category, FieldValue::Text(text))    => self.category = text,
            (Field::Event, FieldValue::Flag(flag))       => self.event = flag,
            (Field::Importancy, FieldValue::Flag(flag))  => self.importancy = flag,
            (Field::Urgency, FieldValue::Flag(flag))     => self.urgency = flag,
            (Field::Progress, FieldValue::Number(n))     => self.progress = n,
            (field, _) => {
                let expected = match field {
                    Field::Progress => "a number",
                    f if f.is_flag() => "a boolean flag",
                    _ => "text",
                };
                return Err(TaskError::FieldValue{ field, expected });
            }
        }
        Ok(())
    }

    /// Validate this draft, and build a task out of it
    pub fn to_task(&self) -> Result<Task, ValidationErrors> {
        let typed = self.typed()?;
        Ok(Task::new_with_parameters(
            self.title.clone(), self.event,
            typed.start_date, typed.end_date,
            self.description.clone(), self.author.clone(), typed.category,
            self.importancy, self.urgency, typed.progress,
        ))
    }

    /// Validate this draft, and build a patch that sets every field of a task to the values of this draft
    pub fn to_patch(&self) -> Result<TaskPatch, ValidationErrors> {
        let typed = self.typed()?;
        Ok(TaskPatch {
            title: Some(self.title.clone()),
            event: Some(self.event),
            start_date: Some(typed.start_date),
            end_date: Some(typed.end_date),
            description: Some(self.description.clone()),
            author: Some(self.author.clone()),
            category: Some(typed.category),
            importancy: Some(self.importancy),
            urgency: Some(self.urgency),
            progress: Some(typed.progress),
        })
    }

    fn typed(&self) -> Result<TypedFields, ValidationErrors> {
        let errors = validate(self);
        if errors.is_empty() == false {
            return Err(errors);
        }

        // These conversions have just been validated, they only fail if the validator is out of sync with them
        let category = self.category.parse::<Category>()
            .map_err(|err| ValidationErrors::single(Field::Category, err))?;
        let start_date = parse_optional_date(&self.start_date)
            .map_err(|err| ValidationErrors::single(Field::StartDate, err))?;
        let end_date = parse_optional_date(&self.end_date)
            .map_err(|err| ValidationErrors::single(Field::EndDate, err))?;
        let progress = u8::try_from(self.progress)
            .map_err(|err| ValidationErrors::single(Field::Progress, err.to_string()))?;

        Ok(TypedFields { category, start_date, end_date, progress })
    }
}

struct TypedFields {
    category: Category,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    progress: u8,
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title().to_string(),
            event: task.event(),
            start_date: format_optional_date(task.start_date()),
            end_date: format_optional_date(task.end_date()),
            description: task.description().to_string(),
            author: task.author().to_string(),
            category: task.category().code().to_string(),
            importancy: task.importancy(),
            urgency: task.urgency(),
            progress: i64::from(task.progress()),
        }
    }
}

/// Parse a `YYYY-MM-DD` date. Blank input means "no date".
pub fn parse_optional_date(input: &str) -> Result<Option<NaiveDate>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map(Some)
        .map_err(|err| format!("Invalid date {:?}: {}", input, err))
}

/// Format a date as `YYYY-MM-DD`, or as an empty string when there is no date
pub fn format_optional_date(date: Option<NaiveDate>) -> String {
    match date {
        None => String::new(),
        Some(d) => d.format(DATE_FORMAT).to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names() {
        for field in Field::ALL.iter() {
            assert_eq!(field.name().parse::<Field>(), Ok(*field));
        }
        assert_eq!("startDate".parse::<Field>(), Ok(Field::StartDate));
        assert!("start_date".parse::<Field>().is_err());
    }

    #[test]
    fn values_from_input() {
        assert_eq!(FieldValue::from_input(Field::Urgency, "on"), FieldValue::Flag(true));
        assert_eq!(FieldValue::from_input(Field::Event, "No"), FieldValue::Flag(false));
        assert_eq!(FieldValue::from_input(Field::Progress, " 42 "), FieldValue::Number(42));
        assert_eq!(FieldValue::from_input(Field::Progress, "lots"), FieldValue::Number(0));
        assert_eq!(FieldValue::from_input(Field::Progress, "-3"), FieldValue::Number(-3));
        assert_eq!(FieldValue::from_input(Field::Category, " work "), FieldValue::Text("work".to_string()));
        assert_eq!(FieldValue::from_input(Field::StartDate, "2024-03-01 "), FieldValue::Text("2024-03-01".to_string()));
        assert_eq!(FieldValue::from_input(Field::Title, " Buy milk "), FieldValue::Text(" Buy milk ".to_string()));
        assert_eq!(FieldValue::from_input(Field::Description, "  indented\n"), FieldValue::Text("  indented\n".to_string()));
        assert_eq!(FieldValue::from_input(Field::Author, "anna "), FieldValue::Text("anna ".to_string()));
    }

    #[test]
    fn set_checks_the_value_kind() {
        let mut draft = TaskDraft::new();
        draft.set(Field::Title, FieldValue::Text("Buy milk".to_string())).unwrap();
        draft.set(Field::Urgency, FieldValue::Flag(true)).unwrap();
        draft.set(Field::Progress, FieldValue::Number(30)).unwrap();
        assert_eq!(draft.title, "Buy milk");
        assert!(draft.urgency);
        assert_eq!(draft.progress, 30);

        assert_eq!(
            draft.set(Field::Progress, FieldValue::Text("30".to_string())),
            Err(TaskError::FieldValue{ field: Field::Progress, expected: "a number" })
        );
        assert!(draft.set(Field::Title, FieldValue::Flag(true)).is_err());
        assert!(draft.set(Field::Event, FieldValue::Number(1)).is_err());
    }

    #[test]
    fn draft_to_task() {
        let draft = TaskDraft {
            title: "Buy milk".to_string(),
            category: "personal".to_string(),
            start_date: "2024-03-01".to_string(),
            urgency: true,
            ..TaskDraft::default()
        };
        let task = draft.to_task().unwrap();
        assert_eq!(task.title(), "Buy milk");
        assert_eq!(task.category(), Category::Personal);
        assert_eq!(task.start_date(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(task.end_date(), None);
        assert_eq!(task.progress(), 0);

        // And back
        assert_eq!(TaskDraft::from(&task), draft);
    }

    #[test]
    fn invalid_draft_is_rejected() {
        let draft = TaskDraft::new();
        let errors = draft.to_task().unwrap_err();
        assert!(errors.get(Field::Title).is_some());
        assert!(errors.get(Field::Category).is_some());
        assert!(draft.to_patch().is_err());
    }

    #[test]
    fn patch_covers_every_field() {
        let draft = TaskDraft {
            title: "Stretch".to_string(),
            category: "sport".to_string(),
            progress: 100,
            ..TaskDraft::default()
        };
        let patch = draft.to_patch().unwrap();
        assert_eq!(patch.title.as_deref(), Some("Stretch"));
        assert_eq!(patch.start_date, Some(None));
        assert_eq!(patch.progress, Some(100));
        assert_eq!(patch.category, Some(Category::Sport));
    }

    #[test]
    fn dates() {
        assert_eq!(parse_optional_date("  "), Ok(None));
        assert_eq!(parse_optional_date("2023-12-31"), Ok(NaiveDate::from_ymd_opt(2023, 12, 31)));
        assert!(parse_optional_date("31.12.2023").is_err());
        assert!(parse_optional_date("2023-02-30").is_err());
        assert_eq!(format_optional_date(NaiveDate::from_ymd_opt(2023, 1, 5)), "2023-01-05");
        assert_eq!(format_optional_date(None), "");
    }
}
