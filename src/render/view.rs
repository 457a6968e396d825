//! Text rendering of a panel.
//!
//! [`render_panel`] is a pure function from panel state and settings to the
//! lines a host would display: header, loading or error or empty state, the
//! item list, and the detail flyout when open. It mirrors the conditional
//! branches of the visual panels without depending on any UI toolkit.

use chrono::{DateTime, Utc};

use crate::config::{HeaderDisplay, PanelKind, PanelSettings};
use crate::domain::{DetailKind, DetailRecord, FlagStatus, Importance, ItemKind, ListItem};
use crate::panel::PanelState;

use super::format::{clock_time, day_heading, due_text, duration_text, short_date};

/// Progress message while a list request is in flight.
fn loading_text(kind: PanelKind) -> &'static str {
    match kind {
        PanelKind::Mail => "Retrieving your messages",
        PanelKind::Calendar => "Retrieving your upcoming meetings",
        PanelKind::Tasks => "Retrieving your tasks",
    }
}

/// Empty-state message after a successful load with no items.
fn empty_text(kind: PanelKind) -> &'static str {
    match kind {
        PanelKind::Mail => "No messages were found",
        PanelKind::Calendar => "You have no upcoming meetings",
        PanelKind::Tasks => "No tasks were found",
    }
}

/// Label for the new-item button.
fn new_button_label(kind: PanelKind) -> &'static str {
    match kind {
        PanelKind::Mail => "New message",
        PanelKind::Calendar => "New event",
        PanelKind::Tasks => "New task",
    }
}

/// Renders one panel to display lines.
///
/// `now` anchors the relative date formatting (Today, Due Tomorrow, ...).
pub fn render_panel(
    state: &PanelState,
    settings: &PanelSettings,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut lines = Vec::new();
    let today = now.date_naive();

    if settings.header_display != HeaderDisplay::None {
        lines.push(settings.title.clone());
        if settings.header_display == HeaderDisplay::Standard && settings.show_view_all {
            lines.push(format!(
                "View the full list: {}",
                settings.kind.view_all_link()
            ));
        }
    }

    if state.loading {
        lines.push(format!("{}...", loading_text(settings.kind)));
        return lines;
    }

    if settings.show_new && settings.kind.compose_link().is_some() {
        lines.push(format!("[ {} ]", new_button_label(settings.kind)));
    }

    if settings.kind == PanelKind::Mail && settings.mail_filter.is_pivot() {
        lines.push(format!("Filter: All | Unread (active: {:?})", state.filter));
    }

    if state.items.is_empty() {
        match &state.error {
            Some(error) => lines.push(format!("Error: {error}")),
            None => lines.push(empty_text(settings.kind).to_string()),
        }
        return lines;
    }

    let mut previous_day = None;
    for item in &state.items {
        render_item(&mut lines, item, settings, today, &mut previous_day);
    }

    if state.detail_open {
        if let Some(detail) = &state.active_detail {
            render_detail(&mut lines, detail, today);
        }
    }

    lines
}

/// Renders one list row (plus a day heading for agenda items when the day
/// changes).
fn render_item(
    lines: &mut Vec<String>,
    item: &ListItem,
    settings: &PanelSettings,
    today: chrono::NaiveDate,
    previous_day: &mut Option<chrono::NaiveDate>,
) {
    match &item.kind {
        ItemKind::Message(meta) => {
            let mut markers = String::new();
            if meta.has_attachments {
                markers.push_str(" [attach]");
            }
            match meta.importance {
                Importance::High => markers.push_str(" [high]"),
                Importance::Low => markers.push_str(" [low]"),
                Importance::Normal => {}
            }
            match meta.flag_status {
                FlagStatus::Flagged => markers.push_str(" [flagged]"),
                FlagStatus::Complete => markers.push_str(" [done]"),
                FlagStatus::NotFlagged => {}
            }

            let read_marker = if meta.is_read { "  " } else { "* " };
            lines.push(format!(
                "{read_marker}{}  {}  {}{markers}",
                meta.from.display(),
                item.title,
                short_date(item.timestamp.date_naive()),
            ));
            if !item.preview.is_empty() {
                lines.push(format!("    {}", item.preview));
            }
        }
        ItemKind::Event(meta) => {
            let day = meta.start.date_naive();
            // One heading per day, the multi-day agenda grouping.
            if settings.days_in_advance > 0 && *previous_day != Some(day) {
                lines.push(day_heading(day, today));
                *previous_day = Some(day);
            }

            let start = meta.start.naive_utc();
            let end = meta.end.naive_utc();
            let mut row = format!(
                "  {}  {}  {}",
                clock_time(start),
                duration_text(start, end, meta.is_all_day),
                item.title,
            );
            if let Some(location) = &meta.location {
                row.push_str(&format!("  ({location})"));
            }
            lines.push(row);
        }
        ItemKind::Task(meta) => {
            let star = if meta.importance == Importance::High {
                " [*]"
            } else {
                ""
            };
            let mut row = format!("( ) {}{star}", item.title);
            if let Some(due) = meta.due {
                row.push_str(&format!("  {}", due_text(due, today)));
            }
            lines.push(row);
        }
    }
}

/// Renders the detail flyout block.
fn render_detail(lines: &mut Vec<String>, detail: &DetailRecord, today: chrono::NaiveDate) {
    lines.push(format!("--- {} ---", detail.subject));

    match &detail.kind {
        DetailKind::Message {
            from,
            received,
            to_recipients,
            cc_recipients,
            ..
        } => {
            lines.push(format!("From: {}", from.display()));
            lines.push(format!(
                "Received: {} {}",
                short_date(received.date_naive()),
                clock_time(received.naive_utc()),
            ));
            if !to_recipients.is_empty() {
                let to: Vec<&str> = to_recipients.iter().map(|r| r.display()).collect();
                lines.push(format!("To: {}", to.join("; ")));
            }
            if !cc_recipients.is_empty() {
                let cc: Vec<&str> = cc_recipients.iter().map(|r| r.display()).collect();
                lines.push(format!("Cc: {}", cc.join("; ")));
            }
        }
        DetailKind::Event {
            start,
            end,
            time_zone,
            location,
        } => {
            lines.push(format!(
                "{} {} - {} ({time_zone})",
                short_date(start.date()),
                clock_time(*start),
                clock_time(*end),
            ));
            if let Some(location) = location {
                lines.push(format!("Location: {location}"));
            }
        }
        DetailKind::Task {
            status,
            importance,
            due,
        } => {
            lines.push(format!("Status: {status:?}"));
            if *importance == Importance::High {
                lines.push("Importance: high".to_string());
            }
            if let Some(due) = due {
                lines.push(due_text(*due, today));
            }
        }
    }

    if !detail.body.content.is_empty() {
        lines.push(detail.body.content.clone());
    }
    if let Some(link) = &detail.web_link {
        lines.push(format!("View in browser: {link}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Address, BodyContent, BodyType, EventMeta, ItemId, MessageMeta, ShowAs, TaskMeta,
        TaskStatus,
    };
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap()
    }

    fn loaded(items: Vec<ListItem>) -> PanelState {
        let mut state = PanelState::default();
        let token = state.begin_refresh();
        state.complete_refresh(token, Ok(items));
        state
    }

    fn message(id: &str, is_read: bool) -> ListItem {
        ListItem {
            id: ItemId::from(id),
            title: "Weekly report".to_string(),
            preview: "Numbers attached".to_string(),
            timestamp: now(),
            web_link: None,
            kind: ItemKind::Message(MessageMeta {
                from: Address::with_name("megan@contoso.com", "Megan Bowen"),
                is_read,
                importance: Importance::High,
                flag_status: FlagStatus::NotFlagged,
                has_attachments: true,
            }),
        }
    }

    fn event(id: &str, start: DateTime<Utc>) -> ListItem {
        ListItem {
            id: ItemId::from(id),
            title: "Standup".to_string(),
            preview: String::new(),
            timestamp: start,
            web_link: None,
            kind: ItemKind::Event(EventMeta {
                start,
                end: start + chrono::Duration::minutes(30),
                location: Some("Conf room 3".to_string()),
                show_as: ShowAs::Busy,
                is_all_day: false,
            }),
        }
    }

    fn task(id: &str, due: Option<chrono::NaiveDate>) -> ListItem {
        ListItem {
            id: ItemId::from(id),
            title: "File expenses".to_string(),
            preview: String::new(),
            timestamp: now(),
            web_link: None,
            kind: ItemKind::Task(TaskMeta {
                status: TaskStatus::NotStarted,
                importance: Importance::High,
                due,
            }),
        }
    }

    #[test]
    fn loading_state_shows_progress_only() {
        let mut state = PanelState::default();
        state.begin_refresh();

        let lines = render_panel(&state, &PanelSettings::default(), now());
        assert!(lines.iter().any(|l| l.contains("Retrieving your messages")));
        assert!(!lines.iter().any(|l| l.contains("No messages")));
    }

    #[test]
    fn error_state_renders_the_message() {
        let mut state = PanelState::default();
        let token = state.begin_refresh();
        state.complete_refresh(token, Err("connection error: timed out".to_string()));

        let lines = render_panel(&state, &PanelSettings::default(), now());
        assert!(lines
            .iter()
            .any(|l| l.contains("Error: connection error: timed out")));
    }

    #[test]
    fn empty_success_renders_empty_state_not_error() {
        let state = loaded(vec![]);
        let lines = render_panel(&state, &PanelSettings::default(), now());

        assert!(lines.iter().any(|l| l == "No messages were found"));
        assert!(!lines.iter().any(|l| l.starts_with("Error:")));
    }

    #[test]
    fn unread_messages_are_marked() {
        let state = loaded(vec![message("a", false), message("b", true)]);
        let lines = render_panel(&state, &PanelSettings::default(), now());

        let rows: Vec<&String> = lines.iter().filter(|l| l.contains("Megan Bowen")).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("* "));
        assert!(rows[1].starts_with("  "));
        assert!(rows[0].contains("[attach]"));
        assert!(rows[0].contains("[high]"));
    }

    #[test]
    fn header_and_view_all_follow_settings() {
        let state = loaded(vec![]);

        let standard = render_panel(&state, &PanelSettings::default(), now());
        assert_eq!(standard[0], "My day");
        assert!(standard[1].contains("outlook.office.com"));

        let hidden = render_panel(
            &state,
            &PanelSettings {
                header_display: HeaderDisplay::None,
                ..Default::default()
            },
            now(),
        );
        assert!(!hidden.iter().any(|l| l == "My day"));
    }

    #[test]
    fn agenda_groups_by_day_when_looking_ahead() {
        let first = Utc.with_ymd_and_hms(2024, 3, 4, 17, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 3, 4, 18, 0, 0).unwrap();
        let next_day = Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
        let state = loaded(vec![event("a", first), event("b", second), event("c", next_day)]);

        let settings = PanelSettings {
            kind: PanelKind::Calendar,
            days_in_advance: 3,
            ..Default::default()
        };
        let lines = render_panel(&state, &settings, now());

        assert_eq!(lines.iter().filter(|l| *l == "Today").count(), 1);
        assert_eq!(lines.iter().filter(|l| *l == "Tomorrow").count(), 1);
        assert!(lines.iter().any(|l| l.contains("5:00 PM")));
        assert!(lines.iter().any(|l| l.contains("30 mins")));
        assert!(lines.iter().any(|l| l.contains("(Conf room 3)")));
    }

    #[test]
    fn agenda_today_only_skips_headings() {
        let first = Utc.with_ymd_and_hms(2024, 3, 4, 17, 0, 0).unwrap();
        let state = loaded(vec![event("a", first)]);

        let settings = PanelSettings {
            kind: PanelKind::Calendar,
            days_in_advance: 0,
            ..Default::default()
        };
        let lines = render_panel(&state, &settings, now());
        assert!(!lines.iter().any(|l| l == "Today"));
    }

    #[test]
    fn tasks_show_due_text_and_importance_star() {
        let due = chrono::NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let state = loaded(vec![task("t", Some(due))]);

        let settings = PanelSettings {
            kind: PanelKind::Tasks,
            ..Default::default()
        };
        let lines = render_panel(&state, &settings, now());

        let row = lines.iter().find(|l| l.contains("File expenses")).unwrap();
        assert!(row.starts_with("( )"));
        assert!(row.contains("[*]"));
        assert!(row.contains("Due Today"));
    }

    #[test]
    fn open_detail_renders_flyout_block() {
        let mut state = loaded(vec![message("a", true)]);
        state.open_detail(DetailRecord {
            id: ItemId::from("a"),
            subject: "Weekly report".to_string(),
            body: BodyContent {
                content_type: BodyType::Text,
                content: "The numbers are up.".to_string(),
            },
            web_link: Some("https://outlook.office365.com/owa/?ItemID=a".to_string()),
            kind: DetailKind::Message {
                from: Address::with_name("megan@contoso.com", "Megan Bowen"),
                received: now(),
                is_read: true,
                to_recipients: vec![Address::new("alex@contoso.com")],
                cc_recipients: vec![],
            },
        });

        let lines = render_panel(&state, &PanelSettings::default(), now());
        assert!(lines.iter().any(|l| l == "--- Weekly report ---"));
        assert!(lines.iter().any(|l| l == "From: Megan Bowen"));
        assert!(lines.iter().any(|l| l == "To: alex@contoso.com"));
        assert!(lines.iter().any(|l| l == "The numbers are up."));
        assert!(lines.iter().any(|l| l.starts_with("View in browser:")));
    }

    #[test]
    fn new_button_respects_toggle_and_kind() {
        let state = loaded(vec![]);

        let with_button = render_panel(
            &state,
            &PanelSettings {
                show_new: true,
                ..Default::default()
            },
            now(),
        );
        assert!(with_button.iter().any(|l| l == "[ New message ]"));

        let tasks = render_panel(
            &state,
            &PanelSettings {
                show_new: true,
                kind: PanelKind::Tasks,
                ..Default::default()
            },
            now(),
        );
        assert!(!tasks.iter().any(|l| l.starts_with("[ New")));
    }
}
