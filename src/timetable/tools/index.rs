//! Lookup structures over the reference data.
//!
//! The indices are built once per request by [`ReferenceIndex::build`] and are
//! read-only afterwards; the pipeline only ever borrows them.

use std::collections::HashMap;

use tracing::debug;

use crate::model::{ClassRecord, CourseRecord, TeacherRecord};
use crate::symbol::{parse_annotations, strip_annotations};

/// Base course name → every course variant sharing it, in source order.
#[derive(Debug, Clone, Default)]
pub struct CourseIndex {
    variants: HashMap<String, Vec<CourseRecord>>,
}

impl CourseIndex {
    /// Annotates every course and groups it under its stripped name.
    pub fn build(courses: impl IntoIterator<Item = CourseRecord>) -> Self {
        let mut variants: HashMap<String, Vec<CourseRecord>> = HashMap::new();
        for mut course in courses {
            course.annotations = parse_annotations(&course.name);
            variants
                .entry(strip_annotations(&course.name))
                .or_default()
                .push(course);
        }
        Self { variants }
    }

    /// Variants for a stripped course name. Never returns an empty slice.
    pub fn variants(&self, base_name: &str) -> Option<&[CourseRecord]> {
        self.variants
            .get(base_name)
            .map(Vec::as_slice)
            .filter(|variants| !variants.is_empty())
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Exact class name → class. On duplicate names the last record wins.
#[derive(Debug, Clone, Default)]
pub struct ClassIndex {
    classes: HashMap<String, ClassRecord>,
}

impl ClassIndex {
    pub fn build(classes: impl IntoIterator<Item = ClassRecord>) -> Self {
        let classes = classes
            .into_iter()
            .map(|class| (class.name.clone(), class))
            .collect();
        Self { classes }
    }

    pub fn get(&self, name: &str) -> Option<&ClassRecord> {
        self.classes.get(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Surname + given name → every teacher with that name, in source order.
#[derive(Debug, Clone, Default)]
pub struct TeacherIndex {
    teachers: HashMap<String, Vec<TeacherRecord>>,
}

impl TeacherIndex {
    pub fn build(teachers: impl IntoIterator<Item = TeacherRecord>) -> Self {
        let mut index: HashMap<String, Vec<TeacherRecord>> = HashMap::new();
        for teacher in teachers {
            index.entry(teacher.full_name()).or_default().push(teacher);
        }
        Self { teachers: index }
    }

    /// All teachers bound to a name. Never returns an empty slice.
    pub fn get(&self, full_name: &str) -> Option<&[TeacherRecord]> {
        self.teachers
            .get(full_name)
            .map(Vec::as_slice)
            .filter(|teachers| !teachers.is_empty())
    }

    pub fn len(&self) -> usize {
        self.teachers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teachers.is_empty()
    }
}

/// The three immutable lookups one assignment run works against.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    pub courses: CourseIndex,
    pub classes: ClassIndex,
    pub teachers: TeacherIndex,
}

impl ReferenceIndex {
    pub fn build(
        courses: Vec<CourseRecord>,
        classes: Vec<ClassRecord>,
        teachers: Vec<TeacherRecord>,
    ) -> Self {
        let (course_count, class_count, teacher_count) =
            (courses.len(), classes.len(), teachers.len());
        let index = Self {
            courses: CourseIndex::build(courses),
            classes: ClassIndex::build(classes),
            teachers: TeacherIndex::build(teachers),
        };
        debug!(
            course_count,
            course_keys = index.courses.len(),
            class_count,
            class_keys = index.classes.len(),
            teacher_count,
            teacher_keys = index.teachers.len(),
            "reference index built"
        );
        index
    }
}
