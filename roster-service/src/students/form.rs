//! Form binding and validation for create and edit
//!
//! [`StudentForm`] keeps the raw submitted strings so a rejected form can be
//! re-rendered exactly as entered. Only the three whitelisted keys are bound;
//! anything else in the request body, such as a forged `ID`, is ignored.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::model::{Student, StudentFields, NAME_MAX_LEN};

/// Storage and input format of the enrollment date
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw create/edit form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentForm {
    #[serde(rename = "LastName", default)]
    pub last_name: String,
    #[serde(rename = "FirstMidName", default)]
    pub first_mid_name: String,
    #[serde(rename = "EnrollmentDate", default)]
    pub enrollment_date: String,
}

impl StudentForm {
    /// Pre-fill the form from a stored student
    #[must_use]
    pub fn from_student(student: &Student) -> Self {
        Self {
            last_name: student.last_name.clone(),
            first_mid_name: student.first_mid_name.clone(),
            enrollment_date: student.enrollment_date.format(DATE_FORMAT).to_string(),
        }
    }

    /// Check the submitted values and convert them into [`StudentFields`].
    ///
    /// # Errors
    ///
    /// Returns every field message at once when any value is missing, too
    /// long, or unparseable.
    pub fn validate(&self) -> Result<StudentFields, FormErrors> {
        let mut errors = FormErrors::default();

        let last_name = required_name(&mut errors, "LastName", "Last Name", &self.last_name);
        let first_mid_name =
            required_name(&mut errors, "FirstMidName", "First Name", &self.first_mid_name);

        let raw_date = self.enrollment_date.trim();
        let enrollment_date = if raw_date.is_empty() {
            errors.add_field_error("EnrollmentDate", "The Enrollment Date field is required.");
            None
        } else {
            match NaiveDate::parse_from_str(raw_date, DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.add_field_error(
                        "EnrollmentDate",
                        format!("The value '{raw_date}' is not valid for Enrollment Date."),
                    );
                    None
                }
            }
        };

        match (last_name, first_mid_name, enrollment_date) {
            (Some(last_name), Some(first_mid_name), Some(enrollment_date)) if errors.is_empty() => {
                Ok(StudentFields::new(last_name, first_mid_name, enrollment_date))
            }
            _ => Err(errors),
        }
    }
}

fn required_name(
    errors: &mut FormErrors,
    field: &'static str,
    label: &str,
    value: &str,
) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        errors.add_field_error(field, format!("The {label} field is required."));
        return None;
    }
    if value.chars().count() > NAME_MAX_LEN {
        errors.add_field_error(
            field,
            format!("{label} cannot be longer than {NAME_MAX_LEN} characters."),
        );
        return None;
    }
    Some(value.to_string())
}

/// Messages shown next to a re-rendered form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    model: Vec<String>,
    fields: BTreeMap<&'static str, String>,
}

impl FormErrors {
    /// A message not tied to one field, shown in the form summary
    pub fn add_model_error(&mut self, message: impl Into<String>) {
        self.model.push(message.into());
    }

    pub fn add_field_error(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.model.is_empty() && self.fields.is_empty()
    }

    pub fn model_errors(&self) -> &[String] {
        &self.model
    }

    /// Message for a form key, or an empty string
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map_or("", String::as_str)
    }
}
