use ems_core::{EmployeeRecord, EmploymentHistoryEntry};

use crate::credential::Credential;
use crate::error::SourceError;

/// Supplier of employee data for the export pipeline.
///
/// Implementations are blocking. Timeouts, retries and token handling are
/// the implementation's concern; callers only see success or a tagged
/// failure.
pub trait RecordSource {
    /// Every employee, in the service's order. An empty collection is `Ok(vec![])`.
    fn fetch_all_employees(&self, credential: &Credential)
    -> Result<Vec<EmployeeRecord>, SourceError>;

    /// One employee, or `Ok(None)` when the id is unknown.
    fn fetch_employee(
        &self,
        credential: &Credential,
        id: i64,
    ) -> Result<Option<EmployeeRecord>, SourceError>;

    /// The employee's history entries in fetch order (possibly empty).
    fn fetch_history(
        &self,
        credential: &Credential,
        id: i64,
    ) -> Result<Vec<EmploymentHistoryEntry>, SourceError>;
}

impl<S: RecordSource + ?Sized> RecordSource for &S {
    fn fetch_all_employees(
        &self,
        credential: &Credential,
    ) -> Result<Vec<EmployeeRecord>, SourceError> {
        (**self).fetch_all_employees(credential)
    }

    fn fetch_employee(
        &self,
        credential: &Credential,
        id: i64,
    ) -> Result<Option<EmployeeRecord>, SourceError> {
        (**self).fetch_employee(credential, id)
    }

    fn fetch_history(
        &self,
        credential: &Credential,
        id: i64,
    ) -> Result<Vec<EmploymentHistoryEntry>, SourceError> {
        (**self).fetch_history(credential, id)
    }
}
