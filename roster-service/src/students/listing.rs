//! Request parameters of the student index
//!
//! Sorting, filtering, and paging state is not stored anywhere; it travels in
//! the query string and is echoed back so pager and sort links preserve it.

use serde::Deserialize;

use crate::repository::{OrderDirection, StudentOrder, StudentQuery, StudentSortField};

/// Sort key accepted by the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StudentSort {
    /// Last name A-Z; used for absent or unrecognised values
    #[default]
    NameAscending,
    NameDescending,
    DateAscending,
    DateDescending,
}

impl StudentSort {
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("name_desc") => Self::NameDescending,
            Some("Date") => Self::DateAscending,
            Some("date_desc") => Self::DateDescending,
            _ => Self::NameAscending,
        }
    }

    /// Query-string form; the default sort is the empty string
    #[must_use]
    pub const fn as_param(&self) -> &'static str {
        match self {
            Self::NameAscending => "",
            Self::NameDescending => "name_desc",
            Self::DateAscending => "Date",
            Self::DateDescending => "date_desc",
        }
    }

    #[must_use]
    pub const fn order(&self) -> StudentOrder {
        match self {
            Self::NameAscending => {
                StudentOrder::new(StudentSortField::LastName, OrderDirection::Ascending)
            }
            Self::NameDescending => {
                StudentOrder::new(StudentSortField::LastName, OrderDirection::Descending)
            }
            Self::DateAscending => {
                StudentOrder::new(StudentSortField::EnrollmentDate, OrderDirection::Ascending)
            }
            Self::DateDescending => {
                StudentOrder::new(StudentSortField::EnrollmentDate, OrderDirection::Descending)
            }
        }
    }
}

/// Value for the last-name column header link.
///
/// Only an absent sort flips to descending; any other value, recognised or
/// not, links back to the default order.
#[must_use]
pub fn name_toggle(sort_order: &str) -> &'static str {
    if sort_order.is_empty() {
        StudentSort::NameDescending.as_param()
    } else {
        StudentSort::NameAscending.as_param()
    }
}

/// Value for the enrollment-date column header link
#[must_use]
pub fn date_toggle(sort_order: &str) -> &'static str {
    if sort_order == StudentSort::DateAscending.as_param() {
        StudentSort::DateDescending.as_param()
    } else {
        StudentSort::DateAscending.as_param()
    }
}

/// Raw index query string
///
/// `page` is kept as text so a malformed value falls back to the first page
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub sort_order: Option<String>,
    pub current_filter: Option<String>,
    pub search_string: Option<String>,
    pub page: Option<String>,
}

/// Index request after the search/filter/page policy is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// Sort value as sent, trimmed; echoed back on pager links
    pub sort_order: String,
    pub sort: StudentSort,
    pub filter: Option<String>,
    pub page: Option<i64>,
}

impl ListParams {
    /// A new search restarts at page 1; without one the previous filter and
    /// the caller's page carry over.
    #[must_use]
    pub fn resolve(self) -> ListRequest {
        let sort_order = self.sort_order.as_deref().map(str::trim).unwrap_or_default().to_string();
        let sort = StudentSort::from_param(Some(sort_order.as_str()));
        let page = self.page.as_deref().and_then(|p| p.trim().parse::<i64>().ok());

        match non_blank(self.search_string) {
            Some(search) => ListRequest {
                sort_order,
                sort,
                filter: Some(search),
                page: Some(1),
            },
            None => ListRequest {
                sort_order,
                sort,
                filter: non_blank(self.current_filter),
                page,
            },
        }
    }
}

impl ListRequest {
    #[must_use]
    pub fn query(&self) -> StudentQuery {
        let query = StudentQuery::new().ordered_by(self.sort.order());
        match self.filter {
            Some(ref filter) => query.with_search(filter),
            None => query,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
