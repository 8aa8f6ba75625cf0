//! Query builder values handed to a [`StudentStore`](super::StudentStore)
//!
//! A [`StudentQuery`] is a plain value: an optional search predicate and an
//! ordering. Stores translate it into SQL or evaluate it in memory; the same
//! value drives both the count and the windowed fetch of a page.
//!
//! # Example
//!
//! ```rust
//! use roster_service::repository::{OrderDirection, StudentOrder, StudentQuery, StudentSortField};
//!
//! let query = StudentQuery::new()
//!     .with_search("smith")
//!     .ordered_by(StudentOrder::new(StudentSortField::EnrollmentDate, OrderDirection::Descending));
//!
//! assert_eq!(query.search(), Some("smith"));
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::students::Student;

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Sort in ascending order (A-Z, oldest first)
    #[default]
    Ascending,
    /// Sort in descending order (Z-A, newest first)
    Descending,
}

impl OrderDirection {
    /// SQL ORDER BY keyword
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Column a student listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StudentSortField {
    #[default]
    LastName,
    EnrollmentDate,
}

impl StudentSortField {
    /// Column name in the `student` table
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::LastName => "last_name",
            Self::EnrollmentDate => "enrollment_date",
        }
    }
}

/// Ordering key for a student listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StudentOrder {
    pub field: StudentSortField,
    pub direction: OrderDirection,
}

impl StudentOrder {
    #[must_use]
    pub const fn new(field: StudentSortField, direction: OrderDirection) -> Self {
        Self { field, direction }
    }

    /// Compare two students by this key only. Names compare case-insensitively
    /// and ties compare equal, so a stable sort keeps the store's natural order.
    #[must_use]
    pub fn compare(&self, a: &Student, b: &Student) -> Ordering {
        let ordering = match self.field {
            StudentSortField::LastName => fold_case(&a.last_name).cmp(fold_case(&b.last_name)),
            StudentSortField::EnrollmentDate => a.enrollment_date.cmp(&b.enrollment_date),
        };
        match self.direction {
            OrderDirection::Ascending => ordering,
            OrderDirection::Descending => ordering.reverse(),
        }
    }
}

fn fold_case(value: &str) -> impl Iterator<Item = char> + '_ {
    value.chars().flat_map(char::to_lowercase)
}

/// Filter and ordering for a student listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentQuery {
    search: Option<String>,
    order: StudentOrder,
}

impl StudentQuery {
    /// Every student, ordered by last name ascending
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to students whose last or first/middle name contains `term`,
    /// ignoring case. Blank terms leave the query unfiltered.
    #[must_use]
    pub fn with_search(mut self, term: impl AsRef<str>) -> Self {
        let term = term.as_ref().trim();
        self.search = (!term.is_empty()).then(|| term.to_string());
        self
    }

    #[must_use]
    pub fn ordered_by(mut self, order: StudentOrder) -> Self {
        self.order = order;
        self
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn order(&self) -> StudentOrder {
        self.order
    }

    /// Evaluate the search predicate against one student
    #[must_use]
    pub fn matches(&self, student: &Student) -> bool {
        match self.search {
            None => true,
            Some(ref term) => {
                let needle = term.to_lowercase();
                student.last_name.to_lowercase().contains(&needle)
                    || student.first_mid_name.to_lowercase().contains(&needle)
            }
        }
    }
}
