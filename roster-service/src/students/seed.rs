//! Sample roster loaded into empty stores

use chrono::NaiveDate;

use super::model::{Course, Grade, StudentFields};

fn fall_term(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 9, 1).unwrap_or_default()
}

/// Sample students, in insertion order
#[must_use]
pub fn sample_students() -> Vec<StudentFields> {
    [
        ("Alexander", "Carson", 2005),
        ("Alonso", "Meredith", 2002),
        ("Anand", "Arturo", 2003),
        ("Barzdukas", "Gytis", 2002),
        ("Li", "Yan", 2002),
        ("Justice", "Peggy", 2001),
        ("Norman", "Laura", 2003),
        ("Olivetto", "Nino", 2005),
    ]
    .into_iter()
    .map(|(last, first, year)| StudentFields::new(last, first, fall_term(year)))
    .collect()
}

#[must_use]
pub fn sample_courses() -> Vec<Course> {
    [
        (1050, "Chemistry", 3),
        (4022, "Microeconomics", 3),
        (4041, "Macroeconomics", 3),
        (1045, "Calculus", 4),
        (3141, "Trigonometry", 4),
        (2021, "Composition", 3),
        (2042, "Literature", 4),
    ]
    .into_iter()
    .map(|(course_id, title, credits)| Course {
        course_id,
        title: title.to_string(),
        credits,
    })
    .collect()
}

/// `(index into sample_students, course_id, grade)`
#[must_use]
pub fn sample_enrollments() -> Vec<(usize, i32, Option<Grade>)> {
    vec![
        (0, 1050, Some(Grade::A)),
        (0, 4022, Some(Grade::C)),
        (0, 4041, Some(Grade::B)),
        (1, 1045, Some(Grade::B)),
        (1, 3141, Some(Grade::F)),
        (1, 2021, Some(Grade::F)),
        (2, 1050, None),
        (3, 1050, None),
        (3, 4022, Some(Grade::F)),
        (4, 4041, Some(Grade::C)),
        (5, 1045, None),
        (6, 3141, Some(Grade::A)),
    ]
}
