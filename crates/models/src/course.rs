use uuid::Uuid;

/// One lesson of a course, stored inline in the course document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonRecord {
    pub lesson_id: String,
    pub title: String,
    pub content: String,
    pub resources: Vec<String>,
}

impl LessonRecord {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), title, content)
    }

    pub fn with_id(lesson_id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { lesson_id: lesson_id.into(), title: title.into(), content: content.into(), resources: Vec::new() }
    }

    pub fn add_resource(&mut self, resource: &str) -> bool {
        if self.resources.iter().any(|r| r == resource) {
            return false;
        }
        self.resources.push(resource.to_string());
        true
    }

    pub fn remove_resource(&mut self, resource: &str) -> bool {
        let before = self.resources.len();
        self.resources.retain(|r| r != resource);
        before != self.resources.len()
    }
}

/// A course as stored in `courses.json`.
///
/// `instructor_id` and `students` are soft references to user ids; nothing
/// checks that the users exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseRecord {
    pub course_id: String,
    pub title: String,
    pub description: String,
    pub instructor_id: String,
    pub lessons: Vec<LessonRecord>,
    pub students: Vec<String>,
}

impl CourseRecord {
    /// New course with a freshly generated id and no lessons or students.
    pub fn new(title: impl Into<String>, description: impl Into<String>, instructor_id: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), title, description, instructor_id)
    }

    pub fn with_id(
        course_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        instructor_id: impl Into<String>,
    ) -> Self {
        Self {
            course_id: course_id.into(),
            title: title.into(),
            description: description.into(),
            instructor_id: instructor_id.into(),
            lessons: Vec::new(),
            students: Vec::new(),
        }
    }

    /// Lessons keep authoring order.
    pub fn add_lesson(&mut self, lesson: LessonRecord) {
        self.lessons.push(lesson);
    }

    pub fn remove_lesson(&mut self, lesson_id: &str) -> bool {
        let before = self.lessons.len();
        self.lessons.retain(|l| l.lesson_id != lesson_id);
        before != self.lessons.len()
    }

    pub fn lesson(&self, lesson_id: &str) -> Option<&LessonRecord> {
        self.lessons.iter().find(|l| l.lesson_id == lesson_id)
    }

    pub fn lesson_mut(&mut self, lesson_id: &str) -> Option<&mut LessonRecord> {
        self.lessons.iter_mut().find(|l| l.lesson_id == lesson_id)
    }

    pub fn enroll_student(&mut self, student_id: &str) -> bool {
        if self.students.iter().any(|s| s == student_id) {
            return false;
        }
        self.students.push(student_id.to_string());
        true
    }

    pub fn unenroll_student(&mut self, student_id: &str) -> bool {
        let before = self.students.len();
        self.students.retain(|s| s != student_id);
        before != self.students.len()
    }
}
