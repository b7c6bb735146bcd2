//! Domain layer: aggregates, ports, and the services behind them.
//!
//! Types in here are transport and storage agnostic. Inbound adapters call
//! the driving ports ([`ports::EmployeeCommand`] and friends); the
//! persistence gateway implements the driven ports.

pub mod audit;
pub mod department;
pub mod department_service;
pub mod employee;
pub mod employee_service;
pub mod error;
pub mod history;
pub mod ports;

pub use self::department::{Department, DepartmentId};
pub use self::department_service::{DepartmentService, GatewayDepartmentLookup};
pub use self::employee::{Employee, EmployeeId};
pub use self::employee_service::EmployeeService;
pub use self::error::{Error, ErrorCode};
