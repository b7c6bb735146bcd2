//! Employee aggregate.
//!
//! An employee owns its three temporal collections outright: the records in
//! them are never addressable outside their parent and are replaced or
//! removed together with it.

use std::fmt;

use chrono::NaiveDate;

use crate::domain::audit::AuditTrail;
use crate::domain::history::{DepartmentAssignment, SalaryPeriod, TitlePeriod};

/// Surrogate employee identifier assigned by the store on first insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmployeeId(i64);

impl EmployeeId {
    /// Wrap a store-assigned identifier.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw numeric value.
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EmployeeId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Scalar attributes of an employee, exclusive of identity and audit data.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeProfile {
    pub birth_date: NaiveDate,
    pub first_name: String,
    pub last_name: Option<String>,
    pub gender: String,
    pub hire_date: NaiveDate,
    pub active: bool,
}

/// Fully materialised employee aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: EmployeeId,
    pub profile: EmployeeProfile,
    pub audit: AuditTrail,
    pub assignments: Vec<DepartmentAssignment>,
    pub salaries: Vec<SalaryPeriod>,
    pub titles: Vec<TitlePeriod>,
}
