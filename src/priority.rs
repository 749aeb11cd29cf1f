//! Eisenhower-matrix priorities

use std::fmt::{Display, Formatter};

use serde::Serialize;

/// The priority of a task, derived from whether it is important and whether it is urgent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    /// Important and urgent
    DoImmediately,
    /// Important, not urgent
    Schedule,
    /// Urgent, not important
    Delegate,
    /// Neither important nor urgent
    Discard,
}

/// Classify a task. This is a total function over the four flag combinations.
pub fn priority(important: bool, urgent: bool) -> Priority {
    match (important, urgent) {
        (true, true) => Priority::DoImmediately,
        (true, false) => Priority::Schedule,
        (false, true) => Priority::Delegate,
        (false, false) => Priority::Discard,
    }
}

impl Priority {
    /// A human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Priority::DoImmediately => "do immediately",
            Priority::Schedule => "schedule",
            Priority::Delegate => "delegate",
            Priority::Discard => "discard",
        }
    }

    /// 1 is the most severe, 4 the least.
    ///
    /// This is meant for display styling only. Task lists are never sorted by priority.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::DoImmediately => 1,
            Priority::Schedule => 2,
            Priority::Delegate => 3,
            Priority::Discard => 4,
        }
    }

    /// The CSS class a UI would style the priority badge with
    pub fn display_class(&self) -> &'static str {
        match self {
            Priority::DoImmediately => "bg-red-500",
            Priority::Schedule => "bg-yellow-500",
            Priority::Delegate => "bg-orange-500",
            Priority::Discard => "bg-gray-500",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn matrix() {
        assert_eq!(priority(true, true).rank(), 1);
        assert_eq!(priority(true, false).rank(), 2);
        assert_eq!(priority(false, true).rank(), 3);
        assert_eq!(priority(false, false).rank(), 4);
        assert_eq!(priority(false, true).label(), "delegate");
        assert_eq!(priority(true, true).to_string(), "do immediately");
    }

    #[test]
    fn combinations_are_distinct() {
        let all = [priority(true, true), priority(true, false), priority(false, true), priority(false, false)];
        let ranks: HashSet<u8> = all.iter().map(|p| p.rank()).collect();
        let classes: HashSet<&str> = all.iter().map(|p| p.display_class()).collect();
        assert_eq!(ranks.len(), 4);
        assert_eq!(classes.len(), 4);
    }
}
