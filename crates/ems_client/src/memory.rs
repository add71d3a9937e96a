use ems_core::{EmployeeRecord, EmploymentHistoryEntry};
use std::collections::{HashMap, HashSet};

use crate::credential::Credential;
use crate::error::SourceError;
use crate::source::RecordSource;

/// A record source backed by vectors in memory.
///
/// Employees are returned in insertion order. Individual employees, or the
/// whole collection, can be marked unavailable to simulate a failing
/// service.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    employees: Vec<EmployeeRecord>,
    history: HashMap<i64, Vec<EmploymentHistoryEntry>>,
    unavailable: HashSet<i64>,
    collection_unavailable: bool,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employee(mut self, employee: EmployeeRecord) -> Self {
        self.add_employee(employee);
        self
    }

    pub fn with_history(mut self, id: i64, entries: Vec<EmploymentHistoryEntry>) -> Self {
        self.history.entry(id).or_default().extend(entries);
        self
    }

    /// Fetches for `id` fail with a transport error.
    pub fn with_unavailable(mut self, id: i64) -> Self {
        self.unavailable.insert(id);
        self
    }

    /// `fetch_all_employees` fails with a transport error.
    pub fn with_collection_unavailable(mut self) -> Self {
        self.collection_unavailable = true;
        self
    }

    pub fn add_employee(&mut self, employee: EmployeeRecord) {
        self.employees.retain(|e| e.id != employee.id);
        self.employees.push(employee);
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    fn check(&self, id: i64) -> Result<(), SourceError> {
        if self.unavailable.contains(&id) {
            return Err(SourceError::Transport(format!(
                "employee {id} unavailable"
            )));
        }
        Ok(())
    }
}

impl RecordSource for InMemorySource {
    fn fetch_all_employees(
        &self,
        _credential: &Credential,
    ) -> Result<Vec<EmployeeRecord>, SourceError> {
        if self.collection_unavailable {
            return Err(SourceError::Transport("collection unavailable".into()));
        }
        Ok(self.employees.clone())
    }

    fn fetch_employee(
        &self,
        _credential: &Credential,
        id: i64,
    ) -> Result<Option<EmployeeRecord>, SourceError> {
        self.check(id)?;
        Ok(self.employees.iter().find(|e| e.id == id).cloned())
    }

    fn fetch_history(
        &self,
        _credential: &Credential,
        id: i64,
    ) -> Result<Vec<EmploymentHistoryEntry>, SourceError> {
        self.check(id)?;
        Ok(self.history.get(&id).cloned().unwrap_or_default())
    }
}
