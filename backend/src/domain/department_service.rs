//! Department services: single-table CRUD plus the lookup used while
//! attaching assignments to employees.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::audit::AuditTrail;
use crate::domain::department::{Department, DepartmentId};
use crate::domain::error::Error;
use crate::domain::ports::{
    DepartmentCommand, DepartmentLookup, DepartmentQuery, DepartmentStore, DepartmentUpdate,
    EmployeeUnitOfWork, NewDepartment, StoreError,
};

fn missing(id: &DepartmentId) -> Error {
    Error::not_found(format!("Department with id {id} does not exist"))
}

fn already_exists(id: &DepartmentId) -> Error {
    Error::conflict(format!("Department with id {id} already exists"))
}

/// CRUD service over the department aggregate.
#[derive(Clone)]
pub struct DepartmentService<S> {
    store: Arc<S>,
}

impl<S> DepartmentService<S> {
    /// Create a new service over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: DepartmentStore> DepartmentService<S> {
    fn map_store_error(error: StoreError) -> Error {
        match error {
            StoreError::Unavailable { message } => {
                Error::storage(format!("department store unavailable: {message}"))
            }
            StoreError::DuplicateKey { message } => {
                Error::internal(format!("unexpected department key conflict: {message}"))
            }
        }
    }
}

#[async_trait]
impl<S: DepartmentStore> DepartmentCommand for DepartmentService<S> {
    async fn create(&self, input: NewDepartment) -> Result<Department, Error> {
        let existing = self
            .store
            .find_by_id(&input.id)
            .await
            .map_err(Self::map_store_error)?;
        if existing.is_some() {
            return Err(already_exists(&input.id));
        }

        let department = Department {
            id: input.id,
            name: input.name,
            active: input.active.unwrap_or(true),
            audit: AuditTrail::stamp_created(input.created_by, Utc::now()),
        };
        match self.store.insert(&department).await {
            Ok(()) => Ok(department),
            // A concurrent create slipped in between the check and the write.
            Err(StoreError::DuplicateKey { .. }) => Err(already_exists(&department.id)),
            Err(other) => Err(Self::map_store_error(other)),
        }
    }

    async fn update(
        &self,
        id: DepartmentId,
        input: DepartmentUpdate,
    ) -> Result<Department, Error> {
        let existing = self
            .store
            .find_by_id(&id)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| missing(&id))?;

        let department = Department {
            id,
            name: input.name,
            active: input.active.unwrap_or(existing.active),
            audit: existing.audit.stamp_updated(input.updated_by, Utc::now()),
        };
        self.store
            .update(&department)
            .await
            .map_err(Self::map_store_error)?;
        Ok(department)
    }

    async fn delete(&self, id: DepartmentId) -> Result<bool, Error> {
        let existing = self
            .store
            .find_by_id(&id)
            .await
            .map_err(Self::map_store_error)?;
        if existing.is_none() {
            return Err(missing(&id));
        }

        self.store
            .delete(&id)
            .await
            .map_err(Self::map_store_error)?;
        Ok(true)
    }
}

#[async_trait]
impl<S: DepartmentStore> DepartmentQuery for DepartmentService<S> {
    async fn get_all(&self) -> Result<Vec<Department>, Error> {
        self.store
            .find_all_ordered()
            .await
            .map_err(Self::map_store_error)
    }

    async fn get_by_id(&self, id: DepartmentId) -> Result<Department, Error> {
        self.store
            .find_by_id(&id)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| missing(&id))
    }
}

/// Production [`DepartmentLookup`] reading through the caller's unit of
/// work, so a department deleted mid-operation cannot be attached.
pub struct GatewayDepartmentLookup;

#[async_trait]
impl DepartmentLookup for GatewayDepartmentLookup {
    async fn resolve(
        &self,
        uow: &dyn EmployeeUnitOfWork,
        id: &DepartmentId,
    ) -> Result<Department, Error> {
        uow.find_department(id)
            .await
            .map_err(|error| Error::storage(format!("department lookup failed: {error}")))?
            .ok_or_else(|| missing(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::MockDepartmentStore;

    fn dept_id(raw: &str) -> DepartmentId {
        DepartmentId::new(raw).expect("valid id")
    }

    fn sample(id: &str, active: bool) -> Department {
        Department {
            id: dept_id(id),
            name: "Research".into(),
            active,
            audit: AuditTrail::stamp_created(1, Utc::now()),
        }
    }

    fn service(store: MockDepartmentStore) -> DepartmentService<MockDepartmentStore> {
        DepartmentService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn create_rejects_an_existing_id() {
        let mut store = MockDepartmentStore::new();
        store
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(sample("d001", true))));
        store.expect_insert().times(0);

        let error = service(store)
            .create(NewDepartment {
                id: dept_id("d001"),
                name: "Research".into(),
                active: None,
                created_by: 1,
            })
            .await
            .expect_err("conflict");
        assert_eq!(error.code(), ErrorCode::Conflict);
        assert_eq!(
            error.message(),
            "Department with id d001 already exists"
        );
    }

    #[tokio::test]
    async fn create_defaults_the_active_flag() {
        let mut store = MockDepartmentStore::new();
        store.expect_find_by_id().times(1).returning(|_| Ok(None));
        store.expect_insert().times(1).returning(|_| Ok(()));

        let department = service(store)
            .create(NewDepartment {
                id: dept_id("d001"),
                name: "Research".into(),
                active: None,
                created_by: 4,
            })
            .await
            .expect("create succeeds");
        assert!(department.active);
        assert_eq!(department.audit.created_by, 4);
        assert_eq!(department.audit.updated_by, 4);
    }

    #[tokio::test]
    async fn create_maps_a_write_race_to_conflict() {
        let mut store = MockDepartmentStore::new();
        store.expect_find_by_id().times(1).returning(|_| Ok(None));
        store
            .expect_insert()
            .times(1)
            .returning(|_| Err(StoreError::duplicate_key("d001")));

        let error = service(store)
            .create(NewDepartment {
                id: dept_id("d001"),
                name: "Research".into(),
                active: None,
                created_by: 1,
            })
            .await
            .expect_err("conflict");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn update_keeps_the_active_flag_when_omitted() {
        let mut store = MockDepartmentStore::new();
        store
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(sample("d001", false))));
        store.expect_update().times(1).returning(|_| Ok(()));

        let department = service(store)
            .update(
                dept_id("d001"),
                DepartmentUpdate {
                    name: "Development".into(),
                    active: None,
                    updated_by: 9,
                },
            )
            .await
            .expect("update succeeds");
        assert!(!department.active);
        assert_eq!(department.name, "Development");
        assert_eq!(department.audit.updated_by, 9);
        assert_eq!(department.audit.created_by, 1);
    }

    #[tokio::test]
    async fn missing_departments_surface_not_found() {
        let mut store = MockDepartmentStore::new();
        store.expect_find_by_id().times(1).returning(|_| Ok(None));

        let error = service(store)
            .get_by_id(dept_id("zzzz"))
            .await
            .expect_err("not found");
        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "Department with id zzzz does not exist");
    }

    #[tokio::test]
    async fn store_faults_surface_as_storage_failures() {
        let mut store = MockDepartmentStore::new();
        store
            .expect_find_all_ordered()
            .times(1)
            .returning(|| Err(StoreError::unavailable("disk on fire")));

        let error = service(store).get_all().await.expect_err("storage fault");
        assert_eq!(error.code(), ErrorCode::StorageFailure);
    }
}
