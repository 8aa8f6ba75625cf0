//! Roster records: students, courses, enrollments.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum length of a student's name parts
pub const NAME_MAX_LEN: usize = 50;

/// Surrogate key of a student. Assigned by the store, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(i32);

impl StudentId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for StudentId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// Letter grade for an enrollment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    /// Parse the single-letter storage form
    #[must_use]
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "F" => Some(Self::F),
            _ => None,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A course students can enroll in. The course number is assigned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: i32,
    pub title: String,
    pub credits: i32,
}

/// A student's enrollment in one course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub enrollment_id: i32,
    pub course_id: i32,
    pub student_id: StudentId,
    pub grade: Option<Grade>,
    /// Populated when the enrollment is loaded with its course expanded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<Course>,
}

impl Enrollment {
    /// Text shown in the grade column; ungraded enrollments read "No grade"
    #[must_use]
    pub fn grade_label(&self) -> &'static str {
        self.grade.as_ref().map_or("No grade", Grade::as_str)
    }

    /// Course title, or the bare course number when the course was not expanded
    #[must_use]
    pub fn course_title(&self) -> String {
        match self.course {
            Some(ref course) => course.title.clone(),
            None => format!("Course {}", self.course_id),
        }
    }
}

/// A persisted student record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub last_name: String,
    pub first_mid_name: String,
    pub enrollment_date: NaiveDate,
    /// Empty unless the student was loaded with its enrollments expanded
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enrollments: Vec<Enrollment>,
}

impl Student {
    /// Build a student from its identity and whitelisted fields
    #[must_use]
    pub fn from_fields(id: StudentId, fields: StudentFields) -> Self {
        Self {
            id,
            last_name: fields.last_name,
            first_mid_name: fields.first_mid_name,
            enrollment_date: fields.enrollment_date,
            enrollments: Vec::new(),
        }
    }

    /// Overwrite the whitelisted fields. Identity and relations are untouched.
    pub fn apply(&mut self, fields: StudentFields) {
        self.last_name = fields.last_name;
        self.first_mid_name = fields.first_mid_name;
        self.enrollment_date = fields.enrollment_date;
    }

    /// Snapshot of the whitelisted fields
    #[must_use]
    pub fn fields(&self) -> StudentFields {
        StudentFields {
            last_name: self.last_name.clone(),
            first_mid_name: self.first_mid_name.clone(),
            enrollment_date: self.enrollment_date,
        }
    }
}

/// The mutable subset of a student.
///
/// Create and edit accept only this type, so identity can never be bound from
/// request input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentFields {
    pub last_name: String,
    pub first_mid_name: String,
    pub enrollment_date: NaiveDate,
}

impl StudentFields {
    #[must_use]
    pub fn new(
        last_name: impl Into<String>,
        first_mid_name: impl Into<String>,
        enrollment_date: NaiveDate,
    ) -> Self {
        Self {
            last_name: last_name.into(),
            first_mid_name: first_mid_name.into(),
            enrollment_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_apply_keeps_identity_and_enrollments() {
        let mut student = Student::from_fields(
            StudentId::new(4),
            StudentFields::new("Alonso", "Meredith", date(2002, 9, 1)),
        );
        student.enrollments.push(Enrollment {
            enrollment_id: 1,
            course_id: 1050,
            student_id: StudentId::new(4),
            grade: Some(Grade::A),
            course: None,
        });

        student.apply(StudentFields::new("Justice", "Peggy", date(2001, 9, 1)));

        assert_eq!(student.id, StudentId::new(4));
        assert_eq!(student.last_name, "Justice");
        assert_eq!(student.first_mid_name, "Peggy");
        assert_eq!(student.enrollment_date, date(2001, 9, 1));
        assert_eq!(student.enrollments.len(), 1);
    }

    #[test]
    fn test_grade_letters() {
        for grade in [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F] {
            assert_eq!(Grade::from_letter(grade.as_str()), Some(grade));
        }
        assert_eq!(Grade::from_letter("E"), None);
    }

    #[test]
    fn test_enrollment_labels() {
        let mut enrollment = Enrollment {
            enrollment_id: 9,
            course_id: 4022,
            student_id: StudentId::new(1),
            grade: None,
            course: None,
        };
        assert_eq!(enrollment.grade_label(), "No grade");
        assert_eq!(enrollment.course_title(), "Course 4022");

        enrollment.grade = Some(Grade::C);
        enrollment.course = Some(Course {
            course_id: 4022,
            title: "Microeconomics".to_string(),
            credits: 3,
        });
        assert_eq!(enrollment.grade_label(), "C");
        assert_eq!(enrollment.course_title(), "Microeconomics");
    }

    #[test]
    fn test_student_id_is_transparent_in_json() {
        let json = serde_json::to_string(&StudentId::new(17)).unwrap();
        assert_eq!(json, "17");
    }
}
