//! Domain layer types for the glance panels.
//!
//! This module contains the records a panel holds and renders: summary list
//! items, expanded detail records, and the resource/filter selectors that
//! scope a panel to one remote collection.

mod filter;
mod item;
mod types;

pub use filter::{FilterSelection, Resource};
pub use item::{
    Address, BodyContent, BodyType, DetailKind, DetailRecord, EventMeta, FlagStatus, Importance,
    ItemKind, ListItem, MessageMeta, ShowAs, TaskList, TaskMeta, TaskStatus,
};
pub use types::{ItemId, TaskListId};
