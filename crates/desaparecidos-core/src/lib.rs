pub mod adapter;
pub mod format;
pub mod model;
pub mod tip;

pub use adapter::{UpstreamListing, UpstreamRecord, UpstreamStatistics};
pub use model::{
    NewInformation, Person, PersonResponse, PersonSearch, Photo, SearchFilter, Sex, Statistics,
    Status,
};
pub use tip::{PhotoBatchOutcome, PhotoRejection, PhotoSet, TipDraft, ValidationErrors, validate_tip};
