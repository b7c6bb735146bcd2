//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports describe how the domain expects to talk to the persistence
//! gateway; driving ports are the use-case surface the inbound adapters
//! call. Each driven trait exposes strongly typed errors so adapters map
//! their failures into predictable variants instead of returning
//! `anyhow::Result`.

use async_trait::async_trait;
use chrono::NaiveDate;
#[cfg(test)]
use mockall::automock;

use crate::domain::audit::AuditTrail;
use crate::domain::department::{Department, DepartmentId};
use crate::domain::employee::{Employee, EmployeeId, EmployeeProfile};
use crate::domain::error::Error;
use crate::domain::history::{DepartmentAssignment, JobTitle, SalaryPeriod, TitlePeriod};

/// Errors surfaced by the persistence gateway.
///
/// These are storage faults, not domain errors; the services translate them
/// at the port boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The gateway could not serve the request at all.
    #[error("persistence gateway unavailable: {message}")]
    Unavailable { message: String },
    /// A write collided with an already-used identity.
    #[error("duplicate key: {message}")]
    DuplicateKey { message: String },
}

impl StoreError {
    /// Helper for gateway-level faults.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Helper for identity collisions.
    pub fn duplicate_key(message: impl Into<String>) -> Self {
        Self::DuplicateKey {
            message: message.into(),
        }
    }
}

/// Validated input for one department assignment period.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentInput {
    pub department: DepartmentId,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

/// Validated input for one salary period.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryInput {
    pub from_date: NaiveDate,
    pub amount: i64,
    pub to_date: NaiveDate,
}

/// Validated input for one title period.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleInput {
    pub title: JobTitle,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

/// The three temporal collections as submitted by a caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryInput {
    pub assignments: Vec<AssignmentInput>,
    pub salaries: Vec<SalaryInput>,
    pub titles: Vec<TitleInput>,
}

/// Validated input for creating an employee aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub birth_date: NaiveDate,
    pub first_name: String,
    pub last_name: Option<String>,
    pub gender: String,
    pub hire_date: NaiveDate,
    /// Defaults to `true` when omitted.
    pub active: Option<bool>,
    pub created_by: i64,
    pub history: HistoryInput,
}

/// Validated input for replacing an employee aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeUpdate {
    pub birth_date: NaiveDate,
    pub first_name: String,
    pub last_name: Option<String>,
    pub gender: String,
    pub hire_date: NaiveDate,
    /// Falls back to the stored value when omitted; every other field is
    /// overwritten unconditionally.
    pub active: Option<bool>,
    pub updated_by: i64,
    pub history: HistoryInput,
}

/// Validated input for creating a department.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDepartment {
    pub id: DepartmentId,
    pub name: String,
    /// Defaults to `true` when omitted.
    pub active: Option<bool>,
    pub created_by: i64,
}

/// Validated input for updating a department.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentUpdate {
    pub name: String,
    /// Falls back to the stored value when omitted.
    pub active: Option<bool>,
    pub updated_by: i64,
}

/// Atomic unit of work over an employee aggregate.
///
/// Every write staged through the unit becomes durable together on
/// [`commit`](Self::commit); dropping the unit without committing discards
/// all of it. The gateway serialises units touching the same store, so two
/// clear-then-rebuild passes can never interleave. Department reads issued
/// through the unit observe the same snapshot the writes apply to.
#[async_trait]
pub trait EmployeeUnitOfWork: Send + Sync {
    /// Insert a new employee row and return its store-assigned id.
    async fn insert_employee(
        &mut self,
        profile: &EmployeeProfile,
        audit: &AuditTrail,
    ) -> Result<EmployeeId, StoreError>;

    /// Overwrite an employee row.
    async fn update_employee(
        &mut self,
        id: EmployeeId,
        profile: &EmployeeProfile,
        audit: &AuditTrail,
    ) -> Result<(), StoreError>;

    /// Remove an employee row together with every record in its three
    /// temporal collections.
    async fn delete_employee(&mut self, id: EmployeeId) -> Result<(), StoreError>;

    /// Discard every temporal record owned by the employee.
    async fn clear_history(&mut self, id: EmployeeId) -> Result<(), StoreError>;

    /// Insert one department assignment; an already-used identity is a
    /// duplicate-key fault, never an overwrite.
    async fn insert_assignment(&mut self, record: &DepartmentAssignment)
    -> Result<(), StoreError>;

    /// Insert one salary period; duplicate identities are rejected.
    async fn insert_salary(&mut self, record: &SalaryPeriod) -> Result<(), StoreError>;

    /// Insert one title period; duplicate identities are rejected.
    async fn insert_title(&mut self, record: &TitlePeriod) -> Result<(), StoreError>;

    /// Read a department within this unit's snapshot.
    async fn find_department(&self, id: &DepartmentId) -> Result<Option<Department>, StoreError>;

    /// Materialise an employee, collections included, from this unit's
    /// snapshot (staged writes visible).
    async fn fetch_employee(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError>;

    /// Publish every staged write. The unit must not be used afterwards.
    async fn commit(&mut self) -> Result<(), StoreError>;
}

/// Persistence port for employee aggregates.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Open an atomic unit of work.
    async fn begin(&self) -> Result<Box<dyn EmployeeUnitOfWork>, StoreError>;

    /// Materialise an employee by id from a consistent snapshot.
    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError>;

    /// Sorted scan of all employees, ascending by assigned id.
    async fn find_all_ordered(&self) -> Result<Vec<Employee>, StoreError>;
}

/// Persistence port for the department aggregate.
///
/// Single-row operations; each call is individually atomic.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DepartmentStore: Send + Sync {
    async fn find_by_id(&self, id: &DepartmentId) -> Result<Option<Department>, StoreError>;

    /// Sorted scan, ascending by id.
    async fn find_all_ordered(&self) -> Result<Vec<Department>, StoreError>;

    /// Insert a department; an existing id is a duplicate-key fault.
    async fn insert(&self, department: &Department) -> Result<(), StoreError>;

    async fn update(&self, department: &Department) -> Result<(), StoreError>;

    async fn delete(&self, id: &DepartmentId) -> Result<(), StoreError>;
}

/// Resolution of a department reference during employee writes.
///
/// Injected into the employee service so tests can substitute a stub. The
/// production implementation reads through the caller's unit of work, which
/// keeps the read-then-attach step consistent with the surrounding writes.
#[async_trait]
pub trait DepartmentLookup: Send + Sync {
    /// Return the department for `id` or fail with a not-found error.
    async fn resolve(
        &self,
        uow: &dyn EmployeeUnitOfWork,
        id: &DepartmentId,
    ) -> Result<Department, Error>;
}

/// Employee mutation use-cases exposed to inbound adapters.
#[async_trait]
pub trait EmployeeCommand: Send + Sync {
    async fn create(&self, input: NewEmployee) -> Result<Employee, Error>;

    async fn update(&self, id: EmployeeId, input: EmployeeUpdate) -> Result<Employee, Error>;

    /// Delete the aggregate, cascading to all three collections. Returns
    /// `true` on success; failure is always an error, never `false`.
    async fn delete(&self, id: EmployeeId) -> Result<bool, Error>;
}

/// Employee read use-cases exposed to inbound adapters.
#[async_trait]
pub trait EmployeeQuery: Send + Sync {
    /// All employees ascending by id; an empty store yields an empty list.
    async fn get_all(&self) -> Result<Vec<Employee>, Error>;

    async fn get_by_id(&self, id: EmployeeId) -> Result<Employee, Error>;
}

/// Department mutation use-cases exposed to inbound adapters.
#[async_trait]
pub trait DepartmentCommand: Send + Sync {
    async fn create(&self, input: NewDepartment) -> Result<Department, Error>;

    async fn update(&self, id: DepartmentId, input: DepartmentUpdate)
    -> Result<Department, Error>;

    async fn delete(&self, id: DepartmentId) -> Result<bool, Error>;
}

/// Department read use-cases exposed to inbound adapters.
#[async_trait]
pub trait DepartmentQuery: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Department>, Error>;

    async fn get_by_id(&self, id: DepartmentId) -> Result<Department, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_helpers_build_the_expected_variants() {
        assert_eq!(
            StoreError::unavailable("down"),
            StoreError::Unavailable {
                message: "down".into()
            }
        );
        assert_eq!(
            StoreError::duplicate_key("used"),
            StoreError::DuplicateKey {
                message: "used".into()
            }
        );
    }

    #[test]
    fn store_error_messages_name_the_fault() {
        assert_eq!(
            StoreError::unavailable("down").to_string(),
            "persistence gateway unavailable: down"
        );
        assert_eq!(
            StoreError::duplicate_key("used").to_string(),
            "duplicate key: used"
        );
    }
}
