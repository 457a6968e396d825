//! Panel settings types.
//!
//! One [`PanelSettings`] value configures one panel instance. Settings are
//! stored as given; numeric values are validated where they are consumed
//! (the query builder clamps the page size, the scheduler clamps the
//! refresh period).

use serde::{Deserialize, Serialize};

use crate::domain::FilterSelection;

/// Which remote collection a panel is configured to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    /// Inbox mail messages.
    #[default]
    Mail,
    /// Calendar agenda.
    Calendar,
    /// Default to-do list.
    Tasks,
}

impl PanelKind {
    /// Link for composing a new item in the remote UI, when the kind has one.
    pub fn compose_link(&self) -> Option<&'static str> {
        match self {
            PanelKind::Mail => Some("https://outlook.office.com/?path=/mail/action/compose"),
            PanelKind::Calendar => {
                Some("https://outlook.office.com/?path=/calendar/action/compose")
            }
            PanelKind::Tasks => None,
        }
    }

    /// Link to the full remote UI for this kind's resource.
    pub fn view_all_link(&self) -> &'static str {
        match self {
            PanelKind::Mail => "https://outlook.office.com/owa/",
            PanelKind::Calendar => "https://outlook.office.com/owa/?path=/calendar/view/Day",
            PanelKind::Tasks => "https://to-do.office.com/tasks/",
        }
    }
}

/// What selecting a list item does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickAction {
    /// Open the detail view without touching the item's read state.
    #[default]
    PreviewUnread,
    /// Open the detail view and mark an unread message read.
    PreviewRead,
    /// Skip the detail view and open the item's external link.
    OpenExternally,
}

/// How the panel header is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderDisplay {
    /// No header at all.
    None,
    /// Title with the view-all link alongside.
    #[default]
    Standard,
    /// Title only.
    Compact,
}

/// Configuration for one panel instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    /// Panel title shown in the header.
    pub title: String,
    /// Which resource the panel shows.
    pub kind: PanelKind,
    /// Requested page size; clamped by the query builder.
    pub item_count: u32,
    /// Refresh period in minutes; clamped by the scheduler.
    pub refresh_minutes: u32,
    /// Default mail filter selection.
    pub mail_filter: FilterSelection,
    /// What selecting an item does.
    pub click_action: ClickAction,
    /// Header rendering mode.
    pub header_display: HeaderDisplay,
    /// Calendar look-ahead in days beyond today.
    pub days_in_advance: u32,
    /// Show the new-item button.
    pub show_new: bool,
    /// Show the view-all link.
    pub show_view_all: bool,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            title: "My day".to_string(),
            kind: PanelKind::Mail,
            item_count: 5,
            refresh_minutes: 5,
            mail_filter: FilterSelection::All,
            click_action: ClickAction::PreviewUnread,
            header_display: HeaderDisplay::Standard,
            days_in_advance: 0,
            show_new: false,
            show_view_all: true,
        }
    }
}
