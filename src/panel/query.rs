//! Remote query construction.
//!
//! Translates a panel's semantic filter selection into the query parameters
//! sent to the remote source: field selection, an optional filter predicate,
//! an optional sort key, and a page size. This module builds values only and
//! performs no I/O.

use chrono::{DateTime, Duration, Utc};

use crate::domain::FilterSelection;

/// Page size used when the configured value is unset or out of range.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Upper bound on the configurable page size.
pub const MAX_PAGE_SIZE: u32 = 10;

/// Fallback page size for the agenda when no positive count is configured.
const AGENDA_FALLBACK_PAGE_SIZE: u32 = 100;

/// Fields requested for the mail list view.
const MAIL_LIST_FIELDS: &[&str] = &[
    "id",
    "bodyPreview",
    "receivedDateTime",
    "from",
    "subject",
    "webLink",
    "isRead",
    "importance",
    "flag",
    "hasAttachments",
];

/// Fields requested for the agenda list view.
const EVENT_LIST_FIELDS: &[&str] = &[
    "subject", "start", "end", "showAs", "webLink", "location", "isAllDay",
];

/// A half-open time window constraining a calendar query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    /// Inclusive window start.
    pub start: DateTime<Utc>,
    /// Exclusive window end.
    pub end: DateTime<Utc>,
}

/// The query parameters for one list request.
///
/// Consumed by the remote source adapter; the builder functions below are
/// the only constructors used by the panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemQuery {
    /// Fields to request.
    pub select: Vec<&'static str>,
    /// Filter predicate, when the selection narrows the result.
    pub filter: Option<String>,
    /// Sort directive, when the selection supports one.
    pub order_by: Option<&'static str>,
    /// Maximum number of items to return.
    pub top: u32,
    /// Time window for calendar queries.
    pub window: Option<TimeWindow>,
}

/// Clamps a configured page size to `[1, MAX_PAGE_SIZE]`, substituting
/// [`DEFAULT_PAGE_SIZE`] for anything outside the range (including zero).
pub fn clamp_page_size(requested: u32) -> u32 {
    if (1..=MAX_PAGE_SIZE).contains(&requested) {
        requested
    } else {
        DEFAULT_PAGE_SIZE
    }
}

/// Builds the inbox query for a filter selection.
///
/// The upstream API rejects a time-based sort combined with a flag or
/// importance predicate, so those selections deliberately omit the sort
/// directive instead of sending the invalid combination.
pub fn mail_query(filter: FilterSelection, top: u32) -> ItemQuery {
    let (predicate, order_by) = match filter {
        FilterSelection::All => (None, Some("receivedDateTime desc")),
        FilterSelection::Unread => (
            Some("isRead eq false".to_string()),
            Some("receivedDateTime desc"),
        ),
        FilterSelection::Important => (Some("importance eq 'high'".to_string()), None),
        FilterSelection::Flagged => (Some("flag/flagStatus eq 'flagged'".to_string()), None),
    };

    ItemQuery {
        select: MAIL_LIST_FIELDS.to_vec(),
        filter: predicate,
        order_by,
        top: clamp_page_size(top),
        window: None,
    }
}

/// Returns the end of the agenda window: 23:59:00 on the day
/// `days_in_advance` days after `now`.
pub fn agenda_end(now: DateTime<Utc>, days_in_advance: u32) -> DateTime<Utc> {
    let day = now.date_naive() + Duration::days(i64::from(days_in_advance));
    day.and_hms_opt(23, 59, 0)
        .expect("23:59:00 is a valid time")
        .and_utc()
}

/// Builds the agenda query covering `now` through the end of the configured
/// look-ahead window, soonest event first.
///
/// A non-positive `top` falls back to a wide page rather than the panel
/// default so multi-day agendas are not truncated.
pub fn calendar_query(now: DateTime<Utc>, days_in_advance: u32, top: u32) -> ItemQuery {
    ItemQuery {
        select: EVENT_LIST_FIELDS.to_vec(),
        filter: None,
        order_by: Some("start/dateTime"),
        top: if top > 0 {
            top
        } else {
            AGENDA_FALLBACK_PAGE_SIZE
        },
        window: Some(TimeWindow {
            start: now,
            end: agenda_end(now, days_in_advance),
        }),
    }
}

/// Builds the open-tasks query for the active list.
pub fn task_query(top: u32) -> ItemQuery {
    ItemQuery {
        select: Vec::new(),
        filter: Some("status ne 'completed'".to_string()),
        order_by: None,
        top: clamp_page_size(top),
        window: None,
    }
}
