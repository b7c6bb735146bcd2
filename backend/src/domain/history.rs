//! Temporal sub-records of the employee aggregate.
//!
//! Each record is identified by an immutable composite identity that
//! includes the owning employee id. The identity structs are ordered so the
//! gateway can use them directly as map keys. Date ranges are deliberately
//! not checked for overlap between periods of the same kind.

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::department::DepartmentId;
use crate::domain::employee::EmployeeId;

/// Validation error raised when constructing a [`JobTitle`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobTitleError {
    /// Title is missing or blank after trimming whitespace.
    #[error("Title cannot be blank")]
    Blank,
}

/// Job title carried inside a title period's identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobTitle(String);

impl JobTitle {
    /// Validate and construct a title, rejecting blank input.
    pub fn new(raw: impl Into<String>) -> Result<Self, JobTitleError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(JobTitleError::Blank);
        }
        Ok(Self(raw))
    }

    /// Borrow the title text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for JobTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite identity of a department assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssignmentId {
    employee: EmployeeId,
    department: DepartmentId,
}

impl AssignmentId {
    /// Derive the identity from the owning employee and the resolved
    /// department.
    pub fn new(employee: EmployeeId, department: DepartmentId) -> Self {
        Self {
            employee,
            department,
        }
    }

    /// Owning employee.
    pub fn employee(&self) -> EmployeeId {
        self.employee
    }

    /// Referenced department.
    pub fn department(&self) -> &DepartmentId {
        &self.department
    }
}

/// Period during which an employee belonged to a department.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentAssignment {
    id: AssignmentId,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl DepartmentAssignment {
    pub fn new(id: AssignmentId, from_date: NaiveDate, to_date: NaiveDate) -> Self {
        Self {
            id,
            from_date,
            to_date,
        }
    }

    /// Immutable composite identity.
    pub fn id(&self) -> &AssignmentId {
        &self.id
    }
}

/// Composite identity of a salary period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SalaryPeriodId {
    employee: EmployeeId,
    from_date: NaiveDate,
}

impl SalaryPeriodId {
    pub fn new(employee: EmployeeId, from_date: NaiveDate) -> Self {
        Self {
            employee,
            from_date,
        }
    }

    /// Owning employee.
    pub fn employee(&self) -> EmployeeId {
        self.employee
    }

    /// Start of the period, part of the identity.
    pub fn from_date(&self) -> NaiveDate {
        self.from_date
    }
}

/// Period during which an employee earned a given amount.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryPeriod {
    id: SalaryPeriodId,
    pub amount: i64,
    pub to_date: NaiveDate,
}

impl SalaryPeriod {
    pub fn new(id: SalaryPeriodId, amount: i64, to_date: NaiveDate) -> Self {
        Self { id, amount, to_date }
    }

    /// Immutable composite identity.
    pub fn id(&self) -> &SalaryPeriodId {
        &self.id
    }
}

/// Composite identity of a title period.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TitlePeriodId {
    employee: EmployeeId,
    title: JobTitle,
    from_date: NaiveDate,
}

impl TitlePeriodId {
    pub fn new(employee: EmployeeId, title: JobTitle, from_date: NaiveDate) -> Self {
        Self {
            employee,
            title,
            from_date,
        }
    }

    /// Owning employee.
    pub fn employee(&self) -> EmployeeId {
        self.employee
    }

    /// Title held during the period, part of the identity.
    pub fn title(&self) -> &JobTitle {
        &self.title
    }

    /// Start of the period, part of the identity.
    pub fn from_date(&self) -> NaiveDate {
        self.from_date
    }
}

/// Period during which an employee held a given title.
#[derive(Debug, Clone, PartialEq)]
pub struct TitlePeriod {
    id: TitlePeriodId,
    pub to_date: NaiveDate,
}

impl TitlePeriod {
    pub fn new(id: TitlePeriodId, to_date: NaiveDate) -> Self {
        Self { id, to_date }
    }

    /// Immutable composite identity.
    pub fn id(&self) -> &TitlePeriodId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    fn blank_titles_are_rejected(#[case] raw: &str) {
        let err = JobTitle::new(raw).expect_err("blank title rejected");
        assert_eq!(err, JobTitleError::Blank);
    }

    #[test]
    fn titles_keep_their_original_case() {
        let title = JobTitle::new("Senior Engineer").expect("valid title");
        assert_eq!(title.as_str(), "Senior Engineer");
    }

    #[test]
    fn assignment_identity_is_employee_and_department() {
        let department = DepartmentId::new("d001").expect("valid id");
        let a = AssignmentId::new(EmployeeId::new(1), department.clone());
        let b = AssignmentId::new(EmployeeId::new(1), department);
        assert_eq!(a, b);
        assert_ne!(
            a,
            AssignmentId::new(
                EmployeeId::new(2),
                DepartmentId::new("d001").expect("valid id")
            )
        );
    }

    #[test]
    fn salary_identity_distinguishes_start_dates() {
        let a = SalaryPeriodId::new(EmployeeId::new(1), date(2024, 1, 1));
        let b = SalaryPeriodId::new(EmployeeId::new(1), date(2024, 6, 1));
        assert_ne!(a, b);
    }

    #[test]
    fn title_identity_includes_the_title_itself() {
        let employee = EmployeeId::new(1);
        let a = TitlePeriodId::new(
            employee,
            JobTitle::new("Engineer").expect("valid title"),
            date(2024, 1, 1),
        );
        let b = TitlePeriodId::new(
            employee,
            JobTitle::new("Manager").expect("valid title"),
            date(2024, 1, 1),
        );
        assert_ne!(a, b);
    }
}
