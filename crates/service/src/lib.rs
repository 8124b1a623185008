//! Service layer of the course store.
//! - `codec`: hand-written JSON subset for the two documents.
//! - `storage`: whole-document CRUD with uniqueness checks.
//! - `repository`: traits collaborators depend on instead of the concrete store.

pub mod errors;
pub mod codec;
pub mod storage;
pub mod repository;
#[cfg(test)]
pub mod test_support;

pub use errors::{KeyField, ServiceError};
pub use repository::{CourseRepository, UserRepository};
pub use storage::{DocumentKind, LoadOutcome, RecordStore, StoreNotice};
