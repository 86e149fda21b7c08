//! Field checks for the new-record draft.

use std::{collections::BTreeMap, fmt};

use shared::domain::{salary_in_range, Employee, EmployeeField};

pub const SALARY_RANGE_MESSAGE: &str = "Salary must be 0-100000";

/// Per-field messages for the draft. An empty message means the field is
/// currently fine; only fields that have been touched or checked have an
/// entry at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<EmployeeField, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: EmployeeField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Returns the message for `field`, or `None` when there is no
    /// non-empty message.
    pub fn message(&self, field: EmployeeField) -> Option<&str> {
        self.0
            .get(&field)
            .map(String::as_str)
            .filter(|message| !message.is_empty())
    }

    pub fn contains(&self, field: EmployeeField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_valid(&self) -> bool {
        self.0.values().all(String::is_empty)
    }

    /// Copies every entry of `other` over this map.
    pub fn merge(&mut self, other: &ValidationErrors) {
        for (field, message) in &other.0 {
            self.0.insert(*field, message.clone());
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EmployeeField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self
            .0
            .values()
            .map(String::as_str)
            .filter(|message| !message.is_empty())
            .collect();
        f.write_str(&messages.join("; "))
    }
}

/// Message for a text field edited on the draft.
pub fn required_message(field: EmployeeField, raw: &str) -> String {
    if raw.is_empty() {
        format!("{field} is required")
    } else {
        String::new()
    }
}

pub fn salary_message(parsed: i64) -> String {
    if salary_in_range(parsed) {
        String::new()
    } else {
        SALARY_RANGE_MESSAGE.to_string()
    }
}

/// Full check run before a draft is submitted. Salary is range-checked at
/// input time and has no required check here.
pub fn validate_draft(draft: &Employee) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if draft.name.is_empty() {
        errors.set(EmployeeField::Name, "Name is required");
    }
    if draft.date_of_birth.is_empty() {
        errors.set(EmployeeField::DateOfBirth, "Date of Birth is required");
    }
    if draft.address.is_empty() {
        errors.set(EmployeeField::Address, "Address is required");
    }
    errors
}
