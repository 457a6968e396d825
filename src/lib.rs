//! glance - at-a-glance mail, calendar, and to-do panels
//!
//! This crate implements the polling data panel pattern: a small list of
//! remote records refreshed on a timer, with a detail flyout fetched on
//! demand and optimistic fire-and-forget mutations. Three resource kinds
//! share one core: inbox messages, the calendar agenda, and the default
//! to-do list.

pub mod config;
pub mod domain;
pub mod panel;
pub mod providers;
pub mod render;

pub use panel::Panel;
