//! Employee aggregate service.
//!
//! Owns the aggregate's write protocol: the employee row is inserted first
//! so its assigned id can seed the composite identities, then every
//! sub-record is resolved, constructed, and inserted inside the same unit
//! of work. Updates clear the three collections outright and rebuild them
//! from the input through the same construction path as create; nothing is
//! merged or diffed.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::audit::AuditTrail;
use crate::domain::employee::{Employee, EmployeeId, EmployeeProfile};
use crate::domain::error::Error;
use crate::domain::history::{
    AssignmentId, DepartmentAssignment, SalaryPeriod, SalaryPeriodId, TitlePeriod, TitlePeriodId,
};
use crate::domain::ports::{
    DepartmentLookup, EmployeeCommand, EmployeeQuery, EmployeeStore, EmployeeUnitOfWork,
    EmployeeUpdate, HistoryInput, NewEmployee, StoreError,
};

fn missing(id: EmployeeId) -> Error {
    Error::not_found(format!("Employee with id {id} does not exist"))
}

/// Service implementing the employee use-case ports.
#[derive(Clone)]
pub struct EmployeeService<S> {
    store: Arc<S>,
    departments: Arc<dyn DepartmentLookup>,
}

impl<S> EmployeeService<S> {
    /// Create a new service over the given store and department lookup.
    pub fn new(store: Arc<S>, departments: Arc<dyn DepartmentLookup>) -> Self {
        Self { store, departments }
    }
}

impl<S: EmployeeStore> EmployeeService<S> {
    fn map_store_error(error: StoreError) -> Error {
        match error {
            StoreError::Unavailable { message } => {
                Error::storage(format!("employee store unavailable: {message}"))
            }
            StoreError::DuplicateKey { message } => {
                Error::internal(format!("duplicate record identity: {message}"))
            }
        }
    }

    /// Resolve, construct, and insert every sub-record of the three input
    /// lists for `employee`, inside the caller's unit of work.
    async fn attach_history(
        &self,
        uow: &mut dyn EmployeeUnitOfWork,
        employee: EmployeeId,
        history: &HistoryInput,
    ) -> Result<(), Error> {
        for entry in &history.assignments {
            let department = self.departments.resolve(&*uow, &entry.department).await?;
            let record = DepartmentAssignment::new(
                AssignmentId::new(employee, department.id),
                entry.from_date,
                entry.to_date,
            );
            uow.insert_assignment(&record)
                .await
                .map_err(Self::map_store_error)?;
        }

        for entry in &history.salaries {
            let record = SalaryPeriod::new(
                SalaryPeriodId::new(employee, entry.from_date),
                entry.amount,
                entry.to_date,
            );
            uow.insert_salary(&record)
                .await
                .map_err(Self::map_store_error)?;
        }

        for entry in &history.titles {
            let record = TitlePeriod::new(
                TitlePeriodId::new(employee, entry.title.clone(), entry.from_date),
                entry.to_date,
            );
            uow.insert_title(&record)
                .await
                .map_err(Self::map_store_error)?;
        }

        Ok(())
    }

    async fn materialise(
        uow: &dyn EmployeeUnitOfWork,
        id: EmployeeId,
    ) -> Result<Employee, Error> {
        uow.fetch_employee(id)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| {
                Error::internal(format!("employee {id} vanished inside its own unit of work"))
            })
    }
}

#[async_trait]
impl<S: EmployeeStore> EmployeeCommand for EmployeeService<S> {
    async fn create(&self, input: NewEmployee) -> Result<Employee, Error> {
        let profile = EmployeeProfile {
            birth_date: input.birth_date,
            first_name: input.first_name,
            last_name: input.last_name,
            gender: input.gender,
            hire_date: input.hire_date,
            active: input.active.unwrap_or(true),
        };
        let audit = AuditTrail::stamp_created(input.created_by, Utc::now());

        let mut uow = self.store.begin().await.map_err(Self::map_store_error)?;
        let id = uow
            .insert_employee(&profile, &audit)
            .await
            .map_err(Self::map_store_error)?;
        self.attach_history(&mut *uow, id, &input.history)
            .await?;
        let employee = Self::materialise(&*uow, id).await?;
        uow.commit().await.map_err(Self::map_store_error)?;
        Ok(employee)
    }

    async fn update(&self, id: EmployeeId, input: EmployeeUpdate) -> Result<Employee, Error> {
        let mut uow = self.store.begin().await.map_err(Self::map_store_error)?;
        let existing = uow
            .fetch_employee(id)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| missing(id))?;

        let profile = EmployeeProfile {
            birth_date: input.birth_date,
            first_name: input.first_name,
            last_name: input.last_name,
            gender: input.gender,
            hire_date: input.hire_date,
            active: input.active.unwrap_or(existing.profile.active),
        };
        let audit = existing.audit.stamp_updated(input.updated_by, Utc::now());

        uow.update_employee(id, &profile, &audit)
            .await
            .map_err(Self::map_store_error)?;
        uow.clear_history(id).await.map_err(Self::map_store_error)?;
        self.attach_history(&mut *uow, id, &input.history)
            .await?;
        let employee = Self::materialise(&*uow, id).await?;
        uow.commit().await.map_err(Self::map_store_error)?;
        Ok(employee)
    }

    async fn delete(&self, id: EmployeeId) -> Result<bool, Error> {
        let mut uow = self.store.begin().await.map_err(Self::map_store_error)?;
        let existing = uow
            .fetch_employee(id)
            .await
            .map_err(Self::map_store_error)?;
        if existing.is_none() {
            return Err(missing(id));
        }

        uow.delete_employee(id)
            .await
            .map_err(Self::map_store_error)?;
        uow.commit().await.map_err(Self::map_store_error)?;
        Ok(true)
    }
}

#[async_trait]
impl<S: EmployeeStore> EmployeeQuery for EmployeeService<S> {
    async fn get_all(&self) -> Result<Vec<Employee>, Error> {
        self.store
            .find_all_ordered()
            .await
            .map_err(Self::map_store_error)
    }

    async fn get_by_id(&self, id: EmployeeId) -> Result<Employee, Error> {
        self.store
            .find_by_id(id)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| missing(id))
    }
}
