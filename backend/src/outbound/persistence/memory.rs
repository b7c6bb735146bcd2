//! In-memory persistence gateway.
//!
//! Four ordered maps (one per record kind) behind a single async mutex. A
//! unit of work owns the lock for its whole lifetime and stages writes
//! against a copy of the state; `commit` publishes the staged state and
//! dropping without committing discards it. Holding the lock across the
//! unit serialises conflicting writers and keeps department reads
//! consistent with the surrounding writes.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::audit::AuditTrail;
use crate::domain::department::{Department, DepartmentId};
use crate::domain::employee::{Employee, EmployeeId, EmployeeProfile};
use crate::domain::history::{
    AssignmentId, DepartmentAssignment, SalaryPeriod, SalaryPeriodId, TitlePeriod, TitlePeriodId,
};
use crate::domain::ports::{DepartmentStore, EmployeeStore, EmployeeUnitOfWork, StoreError};

#[derive(Debug, Clone)]
struct EmployeeRow {
    profile: EmployeeProfile,
    audit: AuditTrail,
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    next_employee_id: i64,
    employees: BTreeMap<EmployeeId, EmployeeRow>,
    assignments: BTreeMap<AssignmentId, DepartmentAssignment>,
    salaries: BTreeMap<SalaryPeriodId, SalaryPeriod>,
    titles: BTreeMap<TitlePeriodId, TitlePeriod>,
    departments: BTreeMap<DepartmentId, Department>,
}

impl StoreState {
    fn materialise(&self, id: EmployeeId) -> Option<Employee> {
        let row = self.employees.get(&id)?;
        Some(Employee {
            id,
            profile: row.profile.clone(),
            audit: row.audit,
            assignments: self
                .assignments
                .values()
                .filter(|record| record.id().employee() == id)
                .cloned()
                .collect(),
            salaries: self
                .salaries
                .values()
                .filter(|record| record.id().employee() == id)
                .cloned()
                .collect(),
            titles: self
                .titles
                .values()
                .filter(|record| record.id().employee() == id)
                .cloned()
                .collect(),
        })
    }

    fn purge_history(&mut self, id: EmployeeId) {
        self.assignments.retain(|key, _| key.employee() != id);
        self.salaries.retain(|key, _| key.employee() != id);
        self.titles.retain(|key, _| key.employee() != id);
    }
}

/// Shared in-memory store implementing every gateway port.
#[derive(Clone, Default)]
pub struct MemoryHrStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryHrStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<StoreState>,
    staged: StoreState,
    committed: bool,
}

impl MemoryUnitOfWork {
    fn staged_mut(&mut self) -> Result<&mut StoreState, StoreError> {
        if self.committed {
            return Err(StoreError::unavailable("unit of work already committed"));
        }
        Ok(&mut self.staged)
    }
}

#[async_trait]
impl EmployeeUnitOfWork for MemoryUnitOfWork {
    async fn insert_employee(
        &mut self,
        profile: &EmployeeProfile,
        audit: &AuditTrail,
    ) -> Result<EmployeeId, StoreError> {
        let state = self.staged_mut()?;
        state.next_employee_id += 1;
        let id = EmployeeId::new(state.next_employee_id);
        state.employees.insert(
            id,
            EmployeeRow {
                profile: profile.clone(),
                audit: *audit,
            },
        );
        Ok(id)
    }

    async fn update_employee(
        &mut self,
        id: EmployeeId,
        profile: &EmployeeProfile,
        audit: &AuditTrail,
    ) -> Result<(), StoreError> {
        let state = self.staged_mut()?;
        state.employees.insert(
            id,
            EmployeeRow {
                profile: profile.clone(),
                audit: *audit,
            },
        );
        Ok(())
    }

    async fn delete_employee(&mut self, id: EmployeeId) -> Result<(), StoreError> {
        let state = self.staged_mut()?;
        state.employees.remove(&id);
        state.purge_history(id);
        Ok(())
    }

    async fn clear_history(&mut self, id: EmployeeId) -> Result<(), StoreError> {
        self.staged_mut()?.purge_history(id);
        Ok(())
    }

    async fn insert_assignment(
        &mut self,
        record: &DepartmentAssignment,
    ) -> Result<(), StoreError> {
        let state = self.staged_mut()?;
        if state.assignments.contains_key(record.id()) {
            return Err(StoreError::duplicate_key(format!(
                "assignment of employee {} to department {} already exists",
                record.id().employee(),
                record.id().department()
            )));
        }
        state
            .assignments
            .insert(record.id().clone(), record.clone());
        Ok(())
    }

    async fn insert_salary(&mut self, record: &SalaryPeriod) -> Result<(), StoreError> {
        let state = self.staged_mut()?;
        if state.salaries.contains_key(record.id()) {
            return Err(StoreError::duplicate_key(format!(
                "salary period of employee {} from {} already exists",
                record.id().employee(),
                record.id().from_date()
            )));
        }
        state.salaries.insert(*record.id(), record.clone());
        Ok(())
    }

    async fn insert_title(&mut self, record: &TitlePeriod) -> Result<(), StoreError> {
        let state = self.staged_mut()?;
        if state.titles.contains_key(record.id()) {
            return Err(StoreError::duplicate_key(format!(
                "title period {} of employee {} from {} already exists",
                record.id().title(),
                record.id().employee(),
                record.id().from_date()
            )));
        }
        state.titles.insert(record.id().clone(), record.clone());
        Ok(())
    }

    async fn find_department(&self, id: &DepartmentId) -> Result<Option<Department>, StoreError> {
        Ok(self.staged.departments.get(id).cloned())
    }

    async fn fetch_employee(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError> {
        Ok(self.staged.materialise(id))
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        if self.committed {
            return Err(StoreError::unavailable("unit of work already committed"));
        }
        *self.guard = std::mem::take(&mut self.staged);
        self.committed = true;
        Ok(())
    }
}

#[async_trait]
impl EmployeeStore for MemoryHrStore {
    async fn begin(&self) -> Result<Box<dyn EmployeeUnitOfWork>, StoreError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = (*guard).clone();
        Ok(Box::new(MemoryUnitOfWork {
            guard,
            staged,
            committed: false,
        }))
    }

    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError> {
        Ok(self.state.lock().await.materialise(id))
    }

    async fn find_all_ordered(&self) -> Result<Vec<Employee>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .employees
            .keys()
            .copied()
            .filter_map(|id| state.materialise(id))
            .collect())
    }
}

#[async_trait]
impl DepartmentStore for MemoryHrStore {
    async fn find_by_id(&self, id: &DepartmentId) -> Result<Option<Department>, StoreError> {
        Ok(self.state.lock().await.departments.get(id).cloned())
    }

    async fn find_all_ordered(&self) -> Result<Vec<Department>, StoreError> {
        Ok(self.state.lock().await.departments.values().cloned().collect())
    }

    async fn insert(&self, department: &Department) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.departments.contains_key(&department.id) {
            return Err(StoreError::duplicate_key(format!(
                "department {} already exists",
                department.id
            )));
        }
        state
            .departments
            .insert(department.id.clone(), department.clone());
        Ok(())
    }

    async fn update(&self, department: &Department) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state
            .departments
            .insert(department.id.clone(), department.clone());
        Ok(())
    }

    async fn delete(&self, id: &DepartmentId) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.departments.remove(id);
        Ok(())
    }
}
