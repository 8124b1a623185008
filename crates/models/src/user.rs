use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::errors::ModelError;

/// Completed lessons per course: `courseId -> [lessonId]`.
pub type Progress = BTreeMap<String, Vec<String>>;

/// Role tag persisted in the `role` field of a user document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    Instructor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Instructor => "INSTRUCTOR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STUDENT" => Ok(Role::Student),
            "INSTRUCTOR" => Ok(Role::Instructor),
            other => Err(ModelError::UnknownRole(other.to_string())),
        }
    }
}

/// Role-specific payload of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserProfile {
    Student {
        enrolled_courses: Vec<String>,
        progress: Progress,
    },
    Instructor {
        created_courses: Vec<String>,
    },
}

impl UserProfile {
    pub fn empty(role: Role) -> Self {
        match role {
            Role::Student => UserProfile::Student { enrolled_courses: Vec::new(), progress: Progress::new() },
            Role::Instructor => UserProfile::Instructor { created_courses: Vec::new() },
        }
    }

    pub fn role(&self) -> Role {
        match self {
            UserProfile::Student { .. } => Role::Student,
            UserProfile::Instructor { .. } => Role::Instructor,
        }
    }
}

/// A student or instructor account as stored in `users.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile: UserProfile,
}

impl UserRecord {
    /// Build a record with a caller-chosen id and an empty role payload.
    pub fn new(
        user_id: impl Into<String>,
        role: Role,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            profile: UserProfile::empty(role),
        }
    }

    /// New student with a freshly generated id.
    pub fn student(username: impl Into<String>, email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4().to_string(), Role::Student, username, email, password_hash)
    }

    /// New instructor with a freshly generated id.
    pub fn instructor(username: impl Into<String>, email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4().to_string(), Role::Instructor, username, email, password_hash)
    }

    pub fn role(&self) -> Role {
        self.profile.role()
    }

    pub fn is_student(&self) -> bool {
        self.role() == Role::Student
    }

    pub fn is_instructor(&self) -> bool {
        self.role() == Role::Instructor
    }

    /// Enrolled course ids; always empty for instructors.
    pub fn enrolled_courses(&self) -> &[String] {
        match &self.profile {
            UserProfile::Student { enrolled_courses, .. } => enrolled_courses,
            UserProfile::Instructor { .. } => &[],
        }
    }

    pub fn progress(&self) -> Option<&Progress> {
        match &self.profile {
            UserProfile::Student { progress, .. } => Some(progress),
            UserProfile::Instructor { .. } => None,
        }
    }

    /// Created course ids; always empty for students.
    pub fn created_courses(&self) -> &[String] {
        match &self.profile {
            UserProfile::Instructor { created_courses } => created_courses,
            UserProfile::Student { .. } => &[],
        }
    }

    /// Enroll a student and open an empty progress entry for the course.
    /// Returns `false` when already enrolled or when the user is an instructor.
    pub fn enroll_course(&mut self, course_id: &str) -> bool {
        let UserProfile::Student { enrolled_courses, progress } = &mut self.profile else {
            return false;
        };
        if enrolled_courses.iter().any(|c| c == course_id) {
            return false;
        }
        enrolled_courses.push(course_id.to_string());
        progress.entry(course_id.to_string()).or_default();
        true
    }

    /// Drop a course from enrolment and progress. Returns whether anything changed.
    pub fn drop_course(&mut self, course_id: &str) -> bool {
        let UserProfile::Student { enrolled_courses, progress } = &mut self.profile else {
            return false;
        };
        let before = enrolled_courses.len();
        enrolled_courses.retain(|c| c != course_id);
        let removed_progress = progress.remove(course_id).is_some();
        before != enrolled_courses.len() || removed_progress
    }

    /// Record a completed lesson. The progress entry is created on demand and
    /// does not require enrolment.
    pub fn mark_lesson_completed(&mut self, course_id: &str, lesson_id: &str) -> bool {
        let UserProfile::Student { progress, .. } = &mut self.profile else {
            return false;
        };
        let done = progress.entry(course_id.to_string()).or_default();
        if done.iter().any(|l| l == lesson_id) {
            return false;
        }
        done.push(lesson_id.to_string());
        true
    }

    pub fn is_lesson_completed(&self, course_id: &str, lesson_id: &str) -> bool {
        self.progress()
            .and_then(|p| p.get(course_id))
            .map(|done| done.iter().any(|l| l == lesson_id))
            .unwrap_or(false)
    }

    pub fn add_created_course(&mut self, course_id: &str) -> bool {
        let UserProfile::Instructor { created_courses } = &mut self.profile else {
            return false;
        };
        if created_courses.iter().any(|c| c == course_id) {
            return false;
        }
        created_courses.push(course_id.to_string());
        true
    }

    pub fn remove_created_course(&mut self, course_id: &str) -> bool {
        let UserProfile::Instructor { created_courses } = &mut self.profile else {
            return false;
        };
        let before = created_courses.len();
        created_courses.retain(|c| c != course_id);
        before != created_courses.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_persisted_tags() {
        assert_eq!("STUDENT".parse::<Role>(), Ok(Role::Student));
        assert_eq!("INSTRUCTOR".parse::<Role>(), Ok(Role::Instructor));
        assert_eq!("student".parse::<Role>(), Err(ModelError::UnknownRole("student".into())));
        assert_eq!(Role::Instructor.to_string(), "INSTRUCTOR");
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = UserRecord::student("a", "a@x.io", "h");
        let b = UserRecord::student("b", "b@x.io", "h");
        assert_ne!(a.user_id, b.user_id);
        assert!(a.is_student());
        assert!(UserRecord::instructor("c", "c@x.io", "h").is_instructor());
    }

    #[test]
    fn enrolment_opens_progress_once() {
        let mut s = UserRecord::new("u1", Role::Student, "ann", "ann@x.io", "h");
        assert!(s.enroll_course("c1"));
        assert!(!s.enroll_course("c1"));
        assert_eq!(s.enrolled_courses(), ["c1".to_string()]);
        assert_eq!(s.progress().and_then(|p| p.get("c1")).map(Vec::len), Some(0));

        assert!(s.mark_lesson_completed("c1", "l1"));
        assert!(!s.mark_lesson_completed("c1", "l1"));
        assert!(s.is_lesson_completed("c1", "l1"));
        assert!(!s.is_lesson_completed("c1", "l2"));

        assert!(s.drop_course("c1"));
        assert!(s.enrolled_courses().is_empty());
        assert!(s.progress().map(|p| p.is_empty()).unwrap_or(false));
    }

    #[test]
    fn progress_may_exist_without_enrolment() {
        let mut s = UserRecord::new("u1", Role::Student, "ann", "ann@x.io", "h");
        assert!(s.mark_lesson_completed("c9", "l1"));
        assert!(s.enrolled_courses().is_empty());
        assert!(s.is_lesson_completed("c9", "l1"));
    }

    #[test]
    fn role_specific_helpers_ignore_other_role() {
        let mut i = UserRecord::new("u2", Role::Instructor, "ian", "ian@x.io", "h");
        assert!(!i.enroll_course("c1"));
        assert!(!i.mark_lesson_completed("c1", "l1"));
        assert!(i.progress().is_none());

        assert!(i.add_created_course("c1"));
        assert!(!i.add_created_course("c1"));
        assert_eq!(i.created_courses().len(), 1);
        assert!(i.remove_created_course("c1"));
        assert!(!i.remove_created_course("c1"));

        let mut s = UserRecord::new("u3", Role::Student, "sue", "sue@x.io", "h");
        assert!(!s.add_created_course("c1"));
        assert!(s.created_courses().is_empty());
    }
}
