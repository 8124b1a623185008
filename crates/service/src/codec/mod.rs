//! Document codec for the store's two JSON files.
//!
//! Hand-written on purpose: the files use a small JSON subset and the
//! decoder's forgiving behaviour (malformed text degrades, it never errors)
//! is part of the store's contract.

pub mod decode;
pub mod encode;
pub mod value;

pub use decode::decode_document;
pub use encode::{encode_courses, encode_users};
pub use value::{JsonObject, JsonValue};

#[cfg(test)]
mod tests {
    use super::*;
    use models::{CourseRecord, LessonRecord, Role, UserRecord};

    #[test]
    fn decoded_users_expose_every_field() {
        let mut s = UserRecord::new("u1", Role::Student, "ann \"the\" coder", "a@b.com", "h\\1");
        s.enroll_course("c1");
        s.enroll_course("c2");
        s.mark_lesson_completed("c1", "l1");
        s.mark_lesson_completed("c1", "l2");

        let docs = decode_document(&encode_users(&[s]));
        assert_eq!(docs.len(), 1);
        let o = &docs[0];
        assert_eq!(o["username"].as_str(), Some("ann \"the\" coder"));
        assert_eq!(o["passwordHash"].as_str(), Some("h\\1"));
        let enrolled: Vec<_> = o["enrolledCourses"].as_array().unwrap_or_default().iter().filter_map(|v| v.as_str()).collect();
        assert_eq!(enrolled, ["c1", "c2"]);
        let progress = o["progress"].as_progress().expect("progress map");
        assert_eq!(progress["c1"], ["l1", "l2"]);
        assert!(progress["c2"].is_empty());
    }

    #[test]
    fn decoded_courses_keep_lesson_order() {
        let mut c = CourseRecord::with_id("c1", "Rust", "line one\nline two", "u2");
        for n in 0..3 {
            let mut l = LessonRecord::with_id(format!("l{n}"), format!("Lesson {n}"), "body, with commas");
            l.add_resource("a");
            l.add_resource("b, c");
            c.add_lesson(l);
        }
        let docs = decode_document(&encode_courses(&[c]));
        let lessons = docs[0]["lessons"].as_array().expect("lessons");
        let ids: Vec<_> = lessons.iter().filter_map(|l| l.as_object()).filter_map(|o| o["lessonId"].as_str()).collect();
        assert_eq!(ids, ["l0", "l1", "l2"]);
        assert_eq!(docs[0]["description"].as_str(), Some("line one\nline two"));
        let res = lessons[2].as_object().expect("lesson")["resources"].as_array().expect("resources").len();
        assert_eq!(res, 2);
    }
}
