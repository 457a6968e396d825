//! The polling data panel core.
//!
//! One panel instance is the composition of four pieces:
//!
//! - the query builder translates the active filter selection into the
//!   parameters of the next list request,
//! - the [`RefreshScheduler`] owns the repeating timer and signals when a
//!   reload is due,
//! - [`PanelState`] tracks the list lifecycle and the detail view,
//! - [`Panel`] wires those together against a
//!   [`RemoteSource`](crate::providers::RemoteSource).

mod controller;
mod query;
mod scheduler;
mod state;

pub use controller::Panel;
pub use query::{
    agenda_end, calendar_query, clamp_page_size, mail_query, task_query, ItemQuery, TimeWindow,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use scheduler::{
    clamp_refresh_minutes, RefreshScheduler, RefreshSignal, DEFAULT_REFRESH_MINUTES,
};
pub use state::{PanelState, RefreshToken};
