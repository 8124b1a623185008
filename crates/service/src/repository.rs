use models::{CourseRecord, UserRecord};

use crate::errors::ServiceError;
use crate::storage::{RecordStore, StoreNotice};

/// Trait abstraction for user persistence as seen by business services.
pub trait UserRepository: Send + Sync {
    fn load_users(&self) -> Vec<UserRecord>;
    fn add_user(&self, user: UserRecord) -> Result<(), ServiceError>;
    fn update_user(&self, user: UserRecord);
    fn get_user_by_id(&self, user_id: &str) -> Option<UserRecord>;
    fn get_user_by_email(&self, email: &str) -> Option<UserRecord>;
    fn user_exists(&self, user_id: &str) -> bool;
    fn email_exists(&self, email: &str) -> bool;
    /// Drain soft failures reported since the last drain.
    fn take_notices(&self) -> Vec<StoreNotice>;
}

/// Trait abstraction for course persistence. Lessons travel inside their course.
pub trait CourseRepository: Send + Sync {
    fn load_courses(&self) -> Vec<CourseRecord>;
    fn add_course(&self, course: CourseRecord) -> Result<(), ServiceError>;
    fn update_course(&self, course: CourseRecord);
    fn delete_course(&self, course_id: &str) -> usize;
    fn get_course_by_id(&self, course_id: &str) -> Option<CourseRecord>;
    fn course_exists(&self, course_id: &str) -> bool;
    fn take_notices(&self) -> Vec<StoreNotice>;
}

impl UserRepository for RecordStore {
    fn load_users(&self) -> Vec<UserRecord> { self.load_users() }
    fn add_user(&self, user: UserRecord) -> Result<(), ServiceError> { self.add_user(user) }
    fn update_user(&self, user: UserRecord) { self.update_user(user) }
    fn get_user_by_id(&self, user_id: &str) -> Option<UserRecord> { self.get_user_by_id(user_id) }
    fn get_user_by_email(&self, email: &str) -> Option<UserRecord> { self.get_user_by_email(email) }
    fn user_exists(&self, user_id: &str) -> bool { self.user_exists(user_id) }
    fn email_exists(&self, email: &str) -> bool { self.email_exists(email) }
    fn take_notices(&self) -> Vec<StoreNotice> { RecordStore::take_notices(self) }
}

impl CourseRepository for RecordStore {
    fn load_courses(&self) -> Vec<CourseRecord> { self.load_courses() }
    fn add_course(&self, course: CourseRecord) -> Result<(), ServiceError> { self.add_course(course) }
    fn update_course(&self, course: CourseRecord) { self.update_course(course) }
    fn delete_course(&self, course_id: &str) -> usize { self.delete_course(course_id) }
    fn get_course_by_id(&self, course_id: &str) -> Option<CourseRecord> { self.get_course_by_id(course_id) }
    fn course_exists(&self, course_id: &str) -> bool { self.course_exists(course_id) }
    fn take_notices(&self) -> Vec<StoreNotice> { RecordStore::take_notices(self) }
}
