//! In-memory holder of the canonical, edited and draft employee state.

use std::sync::Arc;

use shared::domain::{clamp_salary, parse_salary, sort_by_name, Employee, EmployeeField};
use tracing::{info, warn};

use crate::{
    error::WorkspaceError,
    validation::{required_message, salary_message, validate_draft, ValidationErrors},
    RecordService,
};

pub const NO_EMPLOYEES_FOUND: &str = "No employees found.";
pub const LOAD_FAILED: &str = "Failed to load employees.";
pub const SAVE_DRAFT_FAILED: &str = "Failed to save employee.";
pub const SAVE_EDITS_FAILED: &str = "Failed to save changes.";
pub const DRAFT_SAVED: &str = "Employee saved successfully!";
pub const EDITS_SAVED: &str = "All changes saved successfully!";

/// What the "Update" action does next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkspaceMode {
    /// Read-only table; Update fetches from the backend.
    #[default]
    Browsing,
    /// Rows are editable; Update saves the edited copy.
    Editing,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspaceState {
    pub employees: Vec<Employee>,
    pub edited_employees: Vec<Employee>,
    pub draft: Employee,
    pub validation_errors: ValidationErrors,
    pub mode: WorkspaceMode,
    pub loading: bool,
    pub add_row_visible: bool,
    pub last_error: Option<String>,
    pub last_message: Option<String>,
}

impl WorkspaceState {
    pub fn is_editing(&self) -> bool {
        self.mode == WorkspaceMode::Editing
    }

    pub fn can_commit_draft(&self) -> bool {
        self.add_row_visible && !self.loading
    }

    /// Rows as the table shows them: one per canonical record, taking the
    /// edited copy at the same position.
    pub fn visible_rows(&self) -> impl Iterator<Item = &Employee> {
        self.employees
            .iter()
            .zip(self.edited_employees.iter())
            .map(|(_, edited)| edited)
    }

    fn fail(&mut self, message: &str) {
        self.last_error = Some(message.to_string());
        self.last_message = None;
    }

    fn succeed(&mut self, message: &str) {
        self.last_message = Some(message.to_string());
        self.last_error = None;
    }

    fn replace_lists(&mut self, employees: Vec<Employee>) {
        self.edited_employees = employees.clone();
        self.employees = employees;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DraftUpdate {
    pub draft: Employee,
    pub errors: ValidationErrors,
}

pub struct RecordWorkspace {
    service: Arc<dyn RecordService>,
    state: WorkspaceState,
}

impl RecordWorkspace {
    pub fn new(service: Arc<dyn RecordService>) -> Self {
        Self {
            service,
            state: WorkspaceState::default(),
        }
    }

    pub fn state(&self) -> &WorkspaceState {
        &self.state
    }

    /// Fetches the record list and enters edit mode when it is non-empty.
    pub async fn load(&mut self) -> Result<(), WorkspaceError> {
        self.state.loading = true;
        let fetched = self.service.fetch_employees().await;
        self.state.loading = false;

        match fetched {
            Ok(records) if !records.is_empty() => {
                let normalized: Vec<Employee> = records
                    .into_iter()
                    .map(Employee::with_normalized_date_of_birth)
                    .collect();
                info!(count = normalized.len(), "loaded employee records");
                self.state.replace_lists(normalized);
                self.state.mode = WorkspaceMode::Editing;
                self.state.last_error = None;
                self.state.last_message = None;
                Ok(())
            }
            Ok(_) => {
                info!("backend returned no employee records");
                self.state.replace_lists(Vec::new());
                self.state.mode = WorkspaceMode::Browsing;
                self.state.fail(NO_EMPLOYEES_FOUND);
                Ok(())
            }
            Err(error) => {
                warn!(%error, "failed to fetch employee records");
                self.state.replace_lists(Vec::new());
                self.state.mode = WorkspaceMode::Browsing;
                self.state.fail(LOAD_FAILED);
                Err(error.into())
            }
        }
    }

    /// Shows the add-row so a draft can be entered.
    pub fn open_draft(&mut self) {
        self.state.add_row_visible = true;
    }

    pub fn update_draft_field(&mut self, field: EmployeeField, raw: &str) -> DraftUpdate {
        let message = match field {
            EmployeeField::Salary => {
                let parsed = parse_salary(raw);
                self.state.draft.salary = clamp_salary(parsed);
                salary_message(parsed)
            }
            _ => {
                self.state.draft = self.state.draft.with_field(field, raw);
                required_message(field, raw)
            }
        };
        self.state.validation_errors.set(field, message);

        DraftUpdate {
            draft: self.state.draft.clone(),
            errors: self.state.validation_errors.clone(),
        }
    }

    /// Replaces one field of the edited row at `row`. Rows are matched by
    /// position only. Returns `None` outside edit mode or for an unknown row.
    pub fn update_edited_field(
        &mut self,
        row: usize,
        field: EmployeeField,
        raw: &str,
    ) -> Option<&Employee> {
        if !self.state.is_editing() {
            return None;
        }
        let next = self.state.edited_employees.get(row)?.with_field(field, raw);
        self.state.edited_employees[row] = next;
        self.state.edited_employees.get(row)
    }

    pub fn validate_draft(&self) -> ValidationErrors {
        validate_draft(&self.state.draft)
    }

    /// Appends the draft to the canonical list and saves the whole list.
    pub async fn commit_draft(&mut self) -> Result<(), WorkspaceError> {
        let errors = self.validate_draft();
        if !errors.is_valid() {
            info!(%errors, "draft rejected before save");
            self.state.validation_errors.merge(&errors);
            return Err(WorkspaceError::Validation(errors));
        }

        let mut updated = self.state.employees.clone();
        updated.push(self.state.draft.clone());

        self.state.loading = true;
        let saved = self.service.save_employees(&updated).await;
        self.state.loading = false;

        match saved {
            Ok(_) => {
                sort_by_name(&mut updated);
                info!(count = updated.len(), "saved new employee record");
                self.state.replace_lists(updated);
                self.state.draft = Employee::default();
                self.state.validation_errors.clear();
                self.state.add_row_visible = false;
                self.state.succeed(DRAFT_SAVED);
                Ok(())
            }
            Err(error) => {
                warn!(%error, "failed to save new employee record");
                self.state.fail(SAVE_DRAFT_FAILED);
                Err(error.into())
            }
        }
    }

    /// Saves the edited copy. Outside edit mode this loads instead.
    pub async fn commit_edits(&mut self) -> Result<(), WorkspaceError> {
        if !self.state.is_editing() {
            return self.load().await;
        }

        self.state.loading = true;
        let saved = self
            .service
            .save_employees(&self.state.edited_employees)
            .await;
        self.state.loading = false;

        match saved {
            Ok(_) => {
                info!(
                    count = self.state.edited_employees.len(),
                    "saved edited employee records"
                );
                self.state.employees = self.state.edited_employees.clone();
                self.state.mode = WorkspaceMode::Browsing;
                self.state.succeed(EDITS_SAVED);
                Ok(())
            }
            Err(error) => {
                warn!(%error, "failed to save edited employee records");
                self.state.fail(SAVE_EDITS_FAILED);
                Err(error.into())
            }
        }
    }

    /// The two-state "Update" action.
    pub async fn update(&mut self) -> Result<(), WorkspaceError> {
        match self.state.mode {
            WorkspaceMode::Browsing => self.load().await,
            WorkspaceMode::Editing => self.commit_edits().await,
        }
    }
}

#[cfg(test)]
#[path = "tests/workspace_tests.rs"]
mod tests;
