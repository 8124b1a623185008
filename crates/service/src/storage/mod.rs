//! Storage layer for the service crate
//!
//! Whole-document persistence of the users and courses collections on top
//! of the codec, plus the typed mapping from decoded objects to records.

pub mod document;
pub mod mapping;
pub mod record_store;

pub use record_store::{DocumentKind, LoadOutcome, RecordStore, StoreNotice};
