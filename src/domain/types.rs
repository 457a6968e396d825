//! Core identifier types for domain entities.
//!
//! These newtype wrappers provide type safety for entity identifiers,
//! preventing accidental mixing of different ID types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned by the remote source to a list item
/// (a mail message, a calendar event, or a to-do task).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Opaque identifier for a remote to-do task list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskListId(pub String);

impl fmt::Display for TaskListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskListId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskListId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_display() {
        let id = ItemId("AAMkAGI2".to_string());
        assert_eq!(id.to_string(), "AAMkAGI2");
    }

    #[test]
    fn item_id_equality() {
        let id1 = ItemId::from("msg-1");
        let id2 = ItemId::from("msg-1".to_string());
        assert_eq!(id1, id2);
    }

    #[test]
    fn item_id_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(ItemId::from("msg-1"));
        assert!(set.contains(&ItemId::from("msg-1")));
    }

    #[test]
    fn task_list_id_from_str() {
        let id: TaskListId = "defaultList".into();
        assert_eq!(id.0, "defaultList");
    }
}
