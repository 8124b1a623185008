use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use models::{CourseRecord, UserRecord};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{document, mapping};
use crate::codec::{self, JsonObject};
use crate::errors::{KeyField, ServiceError};

/// The two documents owned by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Users,
    Courses,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Users => "users",
            DocumentKind::Courses => "courses",
        }
    }
}

/// Soft failure reported instead of an error. The operation that hit it
/// carries on with an empty collection (reads) or leaves the file as it was
/// (writes).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreNotice {
    #[error("could not create {} document at {}: {reason}", .document.as_str(), .path.display())]
    InitFailed { document: DocumentKind, path: PathBuf, reason: String },
    #[error("could not read {} document at {}: {reason}", .document.as_str(), .path.display())]
    ReadFailed { document: DocumentKind, path: PathBuf, reason: String },
    #[error("could not write {} document at {}: {reason}", .document.as_str(), .path.display())]
    WriteFailed { document: DocumentKind, path: PathBuf, reason: String },
    /// A mutation was dropped because the preceding read failed; writing
    /// would have replaced an unreadable document with a partial one.
    #[error("skipped write of {} document at {} after a failed read", .document.as_str(), .path.display())]
    WriteSkipped { document: DocumentKind, path: PathBuf },
}

impl StoreNotice {
    pub fn document(&self) -> DocumentKind {
        match self {
            StoreNotice::InitFailed { document, .. }
            | StoreNotice::ReadFailed { document, .. }
            | StoreNotice::WriteFailed { document, .. }
            | StoreNotice::WriteSkipped { document, .. } => *document,
        }
    }
}

/// A loaded collection plus the soft failure hit while reading it, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome<T> {
    pub records: Vec<T>,
    pub notice: Option<StoreNotice>,
}

/// File-backed store for the users and courses documents.
///
/// Holds paths only, never records: every call reads its document from disk,
/// and every mutation re-encodes the whole collection and overwrites the
/// file before returning. There is no locking; concurrent writers race and
/// the last one wins.
#[derive(Debug)]
pub struct RecordStore {
    users_path: PathBuf,
    courses_path: PathBuf,
    notices: Mutex<Vec<StoreNotice>>,
}

impl RecordStore {
    pub const USERS_FILE: &'static str = "users.json";
    pub const COURSES_FILE: &'static str = "courses.json";
    /// Undrained notices kept per store; older ones are dropped first.
    pub const MAX_NOTICES: usize = 256;

    /// Open a store over two document paths, creating missing documents.
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(users_path: P, courses_path: Q) -> Self {
        let store = Self { users_path: users_path.into(), courses_path: courses_path.into(), notices: Mutex::new(Vec::new()) };
        store.initialize();
        store
    }

    /// Open a store with the default file names inside `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(Self::USERS_FILE), dir.join(Self::COURSES_FILE))
    }

    pub fn from_config(cfg: &configs::StorageConfig) -> Self {
        Self::new(cfg.users_path(), cfg.courses_path())
    }

    pub fn users_path(&self) -> &Path {
        &self.users_path
    }

    pub fn courses_path(&self) -> &Path {
        &self.courses_path
    }

    /// Create each missing document as an empty array. Existing documents
    /// are never touched, so calling this repeatedly is harmless.
    pub fn initialize(&self) {
        for (kind, empty) in [(DocumentKind::Users, codec::encode_users(&[])), (DocumentKind::Courses, codec::encode_courses(&[]))] {
            let path = self.path_for(kind);
            match document::ensure_document(path, &empty) {
                Ok(true) => info!(event = "document_created", document = kind.as_str(), path = %path.display(), "created empty document"),
                Ok(false) => {}
                Err(e) => self.report(StoreNotice::InitFailed { document: kind, path: path.to_path_buf(), reason: e.to_string() }),
            }
        }
    }

    /// Drain the soft failures reported since the last call.
    pub fn take_notices(&self) -> Vec<StoreNotice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }

    // ----- users -----

    pub fn load_users(&self) -> Vec<UserRecord> {
        self.load_users_outcome().records
    }

    pub fn load_users_outcome(&self) -> LoadOutcome<UserRecord> {
        let (objects, notice) = self.read_objects(DocumentKind::Users);
        let records = objects.iter().filter_map(mapping::user_from_object).collect();
        LoadOutcome { records, notice }
    }

    /// Append a user. Fails when the user id or the email is already taken;
    /// the stored document is left untouched in that case.
    pub fn add_user(&self, user: UserRecord) -> Result<(), ServiceError> {
        let LoadOutcome { records: mut users, notice } = self.load_users_outcome();
        if users.iter().any(|u| u.user_id == user.user_id) {
            return Err(ServiceError::duplicate(KeyField::UserId, &user.user_id));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(ServiceError::duplicate(KeyField::Email, &user.email));
        }
        if self.skip_write_after(notice, DocumentKind::Users) {
            return Ok(());
        }
        debug!(event = "user_added", user_id = %user.user_id, role = %user.role(), "appending user");
        users.push(user);
        self.save_users(&users);
        Ok(())
    }

    /// Replace the first user with the same id. An unknown id is a silent
    /// no-op and leaves the document as it was.
    pub fn update_user(&self, user: UserRecord) {
        // a failed read yields no records, so it always lands on the miss path
        let mut users = self.load_users();
        let Some(slot) = users.iter_mut().find(|u| u.user_id == user.user_id) else {
            debug!(event = "update_miss", document = "users", user_id = %user.user_id, "no user to update");
            return;
        };
        *slot = user;
        self.save_users(&users);
    }

    pub fn get_user_by_id(&self, user_id: &str) -> Option<UserRecord> {
        self.load_users().into_iter().find(|u| u.user_id == user_id)
    }

    /// Exact, case-sensitive match on the stored email.
    pub fn get_user_by_email(&self, email: &str) -> Option<UserRecord> {
        self.load_users().into_iter().find(|u| u.email == email)
    }

    pub fn user_exists(&self, user_id: &str) -> bool {
        self.load_users().iter().any(|u| u.user_id == user_id)
    }

    pub fn email_exists(&self, email: &str) -> bool {
        self.load_users().iter().any(|u| u.email == email)
    }

    // ----- courses -----

    pub fn load_courses(&self) -> Vec<CourseRecord> {
        self.load_courses_outcome().records
    }

    pub fn load_courses_outcome(&self) -> LoadOutcome<CourseRecord> {
        let (objects, notice) = self.read_objects(DocumentKind::Courses);
        let records = objects.iter().map(mapping::course_from_object).collect();
        LoadOutcome { records, notice }
    }

    pub fn add_course(&self, course: CourseRecord) -> Result<(), ServiceError> {
        let LoadOutcome { records: mut courses, notice } = self.load_courses_outcome();
        if courses.iter().any(|c| c.course_id == course.course_id) {
            return Err(ServiceError::duplicate(KeyField::CourseId, &course.course_id));
        }
        if self.skip_write_after(notice, DocumentKind::Courses) {
            return Ok(());
        }
        debug!(event = "course_added", course_id = %course.course_id, "appending course");
        courses.push(course);
        self.save_courses(&courses);
        Ok(())
    }

    /// Replace the first course with the same id; silent no-op otherwise.
    pub fn update_course(&self, course: CourseRecord) {
        let mut courses = self.load_courses();
        let Some(slot) = courses.iter_mut().find(|c| c.course_id == course.course_id) else {
            debug!(event = "update_miss", document = "courses", course_id = %course.course_id, "no course to update");
            return;
        };
        *slot = course;
        self.save_courses(&courses);
    }

    /// Remove every course with this id. Returns how many were removed.
    pub fn delete_course(&self, course_id: &str) -> usize {
        let mut courses = self.load_courses();
        let before = courses.len();
        courses.retain(|c| c.course_id != course_id);
        let removed = before - courses.len();
        if removed == 0 {
            return 0;
        }
        debug!(event = "course_deleted", %course_id, removed, "removing course");
        self.save_courses(&courses);
        removed
    }

    pub fn get_course_by_id(&self, course_id: &str) -> Option<CourseRecord> {
        self.load_courses().into_iter().find(|c| c.course_id == course_id)
    }

    pub fn course_exists(&self, course_id: &str) -> bool {
        self.load_courses().iter().any(|c| c.course_id == course_id)
    }

    // ----- internals -----

    fn path_for(&self, kind: DocumentKind) -> &Path {
        match kind {
            DocumentKind::Users => &self.users_path,
            DocumentKind::Courses => &self.courses_path,
        }
    }

    fn read_objects(&self, kind: DocumentKind) -> (Vec<JsonObject>, Option<StoreNotice>) {
        let path = self.path_for(kind);
        match document::read_document(path) {
            Ok(Some(text)) => (codec::decode_document(&text), None),
            Ok(None) => (Vec::new(), None),
            Err(e) => {
                let notice = StoreNotice::ReadFailed { document: kind, path: path.to_path_buf(), reason: e.to_string() };
                self.report(notice.clone());
                (Vec::new(), Some(notice))
            }
        }
    }

    fn save_users(&self, users: &[UserRecord]) {
        self.write(DocumentKind::Users, &codec::encode_users(users));
    }

    fn save_courses(&self, courses: &[CourseRecord]) {
        self.write(DocumentKind::Courses, &codec::encode_courses(courses));
    }

    fn write(&self, kind: DocumentKind, text: &str) {
        let path = self.path_for(kind);
        if let Err(e) = document::write_document(path, text) {
            self.report(StoreNotice::WriteFailed { document: kind, path: path.to_path_buf(), reason: e.to_string() });
        }
    }

    fn skip_write_after(&self, read_notice: Option<StoreNotice>, kind: DocumentKind) -> bool {
        if read_notice.is_none() {
            return false;
        }
        self.report(StoreNotice::WriteSkipped { document: kind, path: self.path_for(kind).to_path_buf() });
        true
    }

    fn report(&self, notice: StoreNotice) {
        warn!(event = "store_notice", document = notice.document().as_str(), notice = %notice, "storage soft failure");
        let mut notices = self.notices.lock().unwrap_or_else(PoisonError::into_inner);
        if notices.len() >= Self::MAX_NOTICES {
            let excess = notices.len() + 1 - Self::MAX_NOTICES;
            notices.drain(..excess);
        }
        notices.push(notice);
    }
}
