//! Typed view over decoded documents.
//!
//! Missing or oddly shaped fields fall back to empty values; only a missing
//! or unknown `role` drops a user record.

use models::{CourseRecord, LessonRecord, Progress, Role, UserProfile, UserRecord};
use tracing::debug;

use crate::codec::{JsonObject, JsonValue};

pub fn user_from_object(obj: &JsonObject) -> Option<UserRecord> {
    let raw_role = text(obj, "role");
    let role = match raw_role.parse::<Role>() {
        Ok(role) => role,
        Err(e) => {
            debug!(event = "user_skipped", user_id = %text(obj, "userId"), error = %e, "user record without a known role");
            return None;
        }
    };
    let profile = match role {
        Role::Student => UserProfile::Student {
            enrolled_courses: string_list(obj, "enrolledCourses"),
            progress: progress(obj, "progress"),
        },
        Role::Instructor => UserProfile::Instructor { created_courses: string_list(obj, "createdCourses") },
    };
    Some(UserRecord {
        user_id: text(obj, "userId"),
        username: text(obj, "username"),
        email: text(obj, "email"),
        password_hash: text(obj, "passwordHash"),
        profile,
    })
}

pub fn course_from_object(obj: &JsonObject) -> CourseRecord {
    let lessons = obj
        .get("lessons")
        .and_then(JsonValue::as_array)
        .map(|items| items.iter().filter_map(lesson_from_value).collect())
        .unwrap_or_default();
    CourseRecord {
        course_id: text(obj, "courseId"),
        title: text(obj, "title"),
        description: text(obj, "description"),
        instructor_id: text(obj, "instructorId"),
        lessons,
        students: string_list(obj, "students"),
    }
}

/// Lessons are objects; anything else in the array is skipped.
fn lesson_from_value(value: &JsonValue) -> Option<LessonRecord> {
    let obj = value.to_object()?;
    Some(LessonRecord {
        lesson_id: text(&obj, "lessonId"),
        title: text(&obj, "title"),
        content: text(&obj, "content"),
        resources: string_list(&obj, "resources"),
    })
}

fn text(obj: &JsonObject, key: &str) -> String {
    obj.get(key).and_then(JsonValue::scalar_text).unwrap_or_default()
}

fn string_list(obj: &JsonObject, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(JsonValue::as_array)
        .map(|items| items.iter().filter_map(JsonValue::scalar_text).collect())
        .unwrap_or_default()
}

/// Accepts both the progress-shaped value and a generic object of arrays
/// (an empty `{}` decodes as the latter).
fn progress(obj: &JsonObject, key: &str) -> Progress {
    match obj.get(key) {
        Some(JsonValue::Progress(p)) => p.clone(),
        Some(JsonValue::Object(o)) => o
            .iter()
            .filter_map(|(course_id, v)| {
                let items = v.as_array()?;
                Some((course_id.clone(), items.iter().filter_map(JsonValue::scalar_text).collect()))
            })
            .collect(),
        _ => Progress::new(),
    }
}
