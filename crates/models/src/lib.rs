//! Domain records persisted by the course store.
//! - `user`: students and instructors, a role-tagged union over a shared identity.
//! - `course`: courses with their inline lessons.

pub mod errors;
pub mod course;
pub mod user;

pub use course::{CourseRecord, LessonRecord};
pub use user::{Progress, Role, UserProfile, UserRecord};
