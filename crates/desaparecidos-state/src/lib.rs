//! Client-side state flow: search and detail controllers plus the tip
//! submission form, driven through the [`PersonsApi`] seam.

pub mod api;
pub mod detail;
pub mod notice;
pub mod search;
pub mod tip_form;

#[cfg(test)]
mod testing;

pub use api::PersonsApi;
pub use detail::{DetailController, DetailState, parse_person_id};
pub use notice::{Notice, NoticeLevel, Notifier, TracingNotifier};
pub use search::{Pagination, Resolution, SearchController, SearchState};
pub use tip_form::{TipError, TipForm};
