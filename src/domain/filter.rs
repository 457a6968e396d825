//! Resource and filter selection types.
//!
//! A panel is bound to exactly one remote resource kind and carries exactly
//! one active filter selection at a time. Changing the selection invalidates
//! the current item set and triggers a reload.

use serde::{Deserialize, Serialize};

use super::TaskListId;

/// The remote collection a panel reads from.
///
/// The tasks variant carries the resolved list identifier because task
/// queries are scoped to a single list. The list is discovered at refresh
/// time (the default well-known list), not configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// Inbox mail messages.
    Mail,
    /// Calendar agenda (upcoming events).
    Calendar,
    /// Tasks in a specific to-do list.
    Tasks {
        /// The list the tasks belong to.
        list: TaskListId,
    },
}

/// Semantic filter choice for the mail panel.
///
/// `Important` and `Flagged` come from panel configuration; `All` and
/// `Unread` are switchable at runtime through the panel's pivot control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterSelection {
    /// Every message, newest first.
    #[default]
    All,
    /// Unread messages only, newest first.
    Unread,
    /// Messages marked high importance.
    Important,
    /// Messages with an active follow-up flag.
    Flagged,
}

impl FilterSelection {
    /// Returns true for the selections that can be toggled from the panel
    /// itself rather than fixed by configuration.
    pub fn is_pivot(&self) -> bool {
        matches!(self, FilterSelection::All | FilterSelection::Unread)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_selection_default() {
        assert_eq!(FilterSelection::default(), FilterSelection::All);
    }

    #[test]
    fn filter_selection_pivots() {
        assert!(FilterSelection::All.is_pivot());
        assert!(FilterSelection::Unread.is_pivot());
        assert!(!FilterSelection::Important.is_pivot());
        assert!(!FilterSelection::Flagged.is_pivot());
    }

    #[test]
    fn filter_selection_serialization() {
        let json = serde_json::to_string(&FilterSelection::Unread).unwrap();
        assert_eq!(json, "\"unread\"");

        let deserialized: FilterSelection = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, FilterSelection::Unread);
    }

    #[test]
    fn resource_tasks_carries_list() {
        let resource = Resource::Tasks {
            list: TaskListId::from("list-1"),
        };
        assert_ne!(resource, Resource::Mail);
        if let Resource::Tasks { list } = resource {
            assert_eq!(list.0, "list-1");
        }
    }
}
