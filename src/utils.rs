//! Some utility functions

use crate::Task;

/// Serde support for optional `YYYY-MM-DD` dates.
///
/// A missing date is written as an empty string. An empty string, a `null` or a missing key all read as a missing date.
pub mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::draft::{format_optional_date, parse_optional_date};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_optional_date(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(s) => parse_optional_date(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// Width of the bars drawn by [`progress_bar`]
const PROGRESS_BAR_WIDTH: usize = 20;

/// Draw a progress bar. Values out of `0..=100` are clamped
pub fn progress_bar(progress: i64) -> String {
    let clamped = progress.max(0).min(100) as usize;
    let filled = clamped * PROGRESS_BAR_WIDTH / 100;
    format!("[{}{}] {:>3}%", "#".repeat(filled), "-".repeat(PROGRESS_BAR_WIDTH - filled), clamped)
}

/// A debug utility that pretty-prints a task, along with its index in the list
pub fn print_task(index: usize, task: &Task) {
    let event = if task.event() { "E" } else { " " };
    println!("{:>4}. {} {}\t[{}] ({})", index, event, task.title(), task.category(), task.priority());
    if task.description().is_empty() == false {
        println!("        {}", task.description());
    }
    if task.author().is_empty() == false {
        println!("        author: {}", task.author());
    }
    match (task.start_date(), task.end_date()) {
        (None, None) => {},
        (start, end) => println!("        {} -> {}",
            start.map(|d| d.to_string()).unwrap_or_default(),
            end.map(|d| d.to_string()).unwrap_or_default()),
    }
    println!("        {}", progress_bar(i64::from(task.progress())));
}

/// A debug utility that pretty-prints a list of tasks
pub fn print_task_list(tasks: &[(usize, &Task)]) {
    for (index, task) in tasks {
        print_task(*index, task);
    }
}
