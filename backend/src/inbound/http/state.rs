//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle via `actix_web::web::Data`, so they only
//! depend on the driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::department_service::{DepartmentService, GatewayDepartmentLookup};
use crate::domain::employee_service::EmployeeService;
use crate::domain::ports::{DepartmentCommand, DepartmentQuery, EmployeeCommand, EmployeeQuery};
use crate::outbound::persistence::MemoryHrStore;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub employees: Arc<dyn EmployeeCommand>,
    pub employee_queries: Arc<dyn EmployeeQuery>,
    pub departments: Arc<dyn DepartmentCommand>,
    pub department_queries: Arc<dyn DepartmentQuery>,
}

impl HttpState {
    /// Wire both aggregate services over one shared in-memory gateway.
    pub fn with_memory_store() -> Self {
        Self::from_store(Arc::new(MemoryHrStore::new()))
    }

    /// Wire both aggregate services over the given gateway.
    pub fn from_store(store: Arc<MemoryHrStore>) -> Self {
        let employees = Arc::new(EmployeeService::new(
            Arc::clone(&store),
            Arc::new(GatewayDepartmentLookup),
        ));
        let departments = Arc::new(DepartmentService::new(store));
        Self {
            employees: employees.clone(),
            employee_queries: employees,
            departments: departments.clone(),
            department_queries: departments,
        }
    }
}
