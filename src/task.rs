//! To-do tasks

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use chrono::NaiveDate;

use crate::priority::{priority, Priority};

/// The closed set of categories a task can be filed under
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Sport,
    Travel,
    Other,
}

impl Category {
    /// Every category, in the order a form would offer them
    pub const ALL: [Category; 5] = [
        Category::Work,
        Category::Personal,
        Category::Sport,
        Category::Travel,
        Category::Other,
    ];

    /// The code this category is stored as
    pub fn code(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Sport => "sport",
            Category::Travel => "travel",
            Category::Other => "other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL.iter()
            .find(|cat| cat.code() == s)
            .copied()
            .ok_or_else(|| format!("Unknown category {:?}", s))
    }
}


/// A to-do task
///
/// Tasks are only built out of validated drafts (see [`TaskDraft`](crate::draft::TaskDraft)) or loaded from
/// storage, where they are validated again. They have no identifier: a task is designated by its position in the
/// [`TaskStore`](crate::store::TaskStore).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// The display name of the task
    title: String,
    /// Whether this task is an event rather than a plain chore
    #[serde(default)]
    event: bool,
    #[serde(default, with = "crate::utils::optional_date")]
    start_date: Option<NaiveDate>,
    #[serde(default, with = "crate::utils::optional_date")]
    end_date: Option<NaiveDate>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    author: String,
    category: Category,
    #[serde(default)]
    importancy: bool,
    #[serde(default)]
    urgency: bool,
    /// Completion percentage, in `0..=100`
    #[serde(default)]
    progress: u8,

    /// Keys that are not handled by this crate (e.g. an `id` set by the tool that produced a seed file).
    /// They are kept so that the task is written back unchanged.
    #[serde(flatten)]
    extra_fields: Map<String, Value>,
}

impl Task {
    /// Create a new task, with every optional field left empty
    pub fn new(title: String, category: Category) -> Self {
        Self::new_with_parameters(title, false, None, None, String::new(), String::new(), category, false, false, 0)
    }

    /// Create a new task with every attribute set.
    ///
    /// This does not validate anything. Use [`TaskDraft::to_task`](crate::draft::TaskDraft::to_task) to build a task out of user input.
    pub fn new_with_parameters(title: String, event: bool,
                               start_date: Option<NaiveDate>, end_date: Option<NaiveDate>,
                               description: String, author: String, category: Category,
                               importancy: bool, urgency: bool, progress: u8,
                            ) -> Self
    {
        Self {
            title,
            event,
            start_date,
            end_date,
            description,
            author,
            category,
            importancy,
            urgency,
            progress,
            extra_fields: Map::new(),
        }
    }

    pub fn title(&self) -> &str                   { &self.title       }
    pub fn event(&self) -> bool                   { self.event        }
    pub fn start_date(&self) -> Option<NaiveDate> { self.start_date   }
    pub fn end_date(&self) -> Option<NaiveDate>   { self.end_date     }
    pub fn description(&self) -> &str             { &self.description }
    pub fn author(&self) -> &str                  { &self.author      }
    pub fn category(&self) -> Category            { self.category     }
    pub fn importancy(&self) -> bool              { self.importancy   }
    pub fn urgency(&self) -> bool                 { self.urgency      }
    pub fn progress(&self) -> u8                  { self.progress     }
    pub fn extra_fields(&self) -> &Map<String, Value> { &self.extra_fields }

    /// The Eisenhower priority derived from the importance and urgency flags
    pub fn priority(&self) -> Priority {
        priority(self.importancy, self.urgency)
    }

    /// Whether `needle` (expected lowercase) appears in the title, description, author or category code
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
           self.title.to_lowercase().contains(needle)
        || self.description.to_lowercase().contains(needle)
        || self.author.to_lowercase().contains(needle)
        || self.category.code().contains(needle)
    }

    /// Shallow-merge the fields present in `patch` into this task.
    /// Fields absent from the patch (and the extra fields) are left unchanged.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title             { self.title = title; }
        if let Some(event) = patch.event             { self.event = event; }
        if let Some(start_date) = patch.start_date   { self.start_date = start_date; }
        if let Some(end_date) = patch.end_date       { self.end_date = end_date; }
        if let Some(description) = patch.description { self.description = description; }
        if let Some(author) = patch.author           { self.author = author; }
        if let Some(category) = patch.category       { self.category = category; }
        if let Some(importancy) = patch.importancy   { self.importancy = importancy; }
        if let Some(urgency) = patch.urgency         { self.urgency = urgency; }
        if let Some(progress) = patch.progress       { self.progress = progress; }
    }
}


/// A partial task: only the `Some` fields are applied by [`Task::apply`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub event: Option<bool>,
    /// `Some(None)` clears the date
    pub start_date: Option<Option<NaiveDate>>,
    /// `Some(None)` clears the date
    pub end_date: Option<Option<NaiveDate>>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub category: Option<Category>,
    pub importancy: Option<bool>,
    pub urgency: Option<bool>,
    pub progress: Option<u8>,
}

impl TaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
