//! Encoders for the two document shapes.
//!
//! Output is indented two spaces per nesting level for readability only; the
//! decoder does not depend on it.

use models::{CourseRecord, LessonRecord, Progress, UserProfile, UserRecord};

/// Escape backslash, double quote, newline, carriage return and tab.
///
/// Every other character, control characters included, is written through
/// unchanged. Documents holding other control characters are not valid
/// JSON for strict readers.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Render the users document.
pub fn encode_users(users: &[UserRecord]) -> String {
    let mut out = String::from("[\n");
    for (i, user) in users.iter().enumerate() {
        indent(&mut out, 1);
        out.push_str("{\n");
        field(&mut out, 2, "userId", &user.user_id, true);
        field(&mut out, 2, "role", user.role().as_str(), true);
        field(&mut out, 2, "username", &user.username, true);
        field(&mut out, 2, "email", &user.email, true);
        field(&mut out, 2, "passwordHash", &user.password_hash, false);
        match &user.profile {
            UserProfile::Student { enrolled_courses, progress } => {
                out.push_str(",\n");
                key(&mut out, 2, "enrolledCourses");
                string_array(&mut out, enrolled_courses);
                out.push_str(",\n");
                key(&mut out, 2, "progress");
                progress_map(&mut out, progress);
            }
            UserProfile::Instructor { created_courses } => {
                out.push_str(",\n");
                key(&mut out, 2, "createdCourses");
                string_array(&mut out, created_courses);
            }
        }
        out.push('\n');
        close_item(&mut out, 1, '}', i + 1 < users.len());
    }
    out.push(']');
    out
}

/// Render the courses document, lessons nested inline.
pub fn encode_courses(courses: &[CourseRecord]) -> String {
    let mut out = String::from("[\n");
    for (i, course) in courses.iter().enumerate() {
        indent(&mut out, 1);
        out.push_str("{\n");
        field(&mut out, 2, "courseId", &course.course_id, true);
        field(&mut out, 2, "title", &course.title, true);
        field(&mut out, 2, "description", &course.description, true);
        field(&mut out, 2, "instructorId", &course.instructor_id, true);
        key(&mut out, 2, "lessons");
        out.push_str("[\n");
        for (j, lesson) in course.lessons.iter().enumerate() {
            encode_lesson(&mut out, 3, lesson);
            close_item(&mut out, 3, '}', j + 1 < course.lessons.len());
        }
        indent(&mut out, 2);
        out.push_str("],\n");
        key(&mut out, 2, "students");
        string_array(&mut out, &course.students);
        out.push('\n');
        close_item(&mut out, 1, '}', i + 1 < courses.len());
    }
    out.push(']');
    out
}

/// Writes everything but the closing brace.
fn encode_lesson(out: &mut String, depth: usize, lesson: &LessonRecord) {
    indent(out, depth);
    out.push_str("{\n");
    field(out, depth + 1, "lessonId", &lesson.lesson_id, true);
    field(out, depth + 1, "title", &lesson.title, true);
    field(out, depth + 1, "content", &lesson.content, true);
    key(out, depth + 1, "resources");
    string_array(out, &lesson.resources);
    out.push('\n');
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn quoted(out: &mut String, s: &str) {
    out.push('"');
    out.push_str(&escape(s));
    out.push('"');
}

fn key(out: &mut String, depth: usize, name: &str) {
    indent(out, depth);
    quoted(out, name);
    out.push_str(": ");
}

fn field(out: &mut String, depth: usize, name: &str, value: &str, more: bool) {
    key(out, depth, name);
    quoted(out, value);
    if more {
        out.push_str(",\n");
    }
}

fn string_array(out: &mut String, items: &[String]) {
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        quoted(out, item);
    }
    out.push(']');
}

fn progress_map(out: &mut String, progress: &Progress) {
    out.push('{');
    for (i, (course_id, lessons)) in progress.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        quoted(out, course_id);
        out.push_str(": ");
        string_array(out, lessons);
    }
    out.push('}');
}

fn close_item(out: &mut String, depth: usize, closer: char, more: bool) {
    indent(out, depth);
    out.push(closer);
    if more {
        out.push(',');
    }
    out.push('\n');
}
