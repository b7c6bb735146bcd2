//! Employee REST handlers.
//!
//! ```text
//! POST   /api/v1/employees
//! GET    /api/v1/employees
//! GET    /api/v1/employees/{id}
//! PUT    /api/v1/employees/{id}
//! DELETE /api/v1/employees/{id}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::department::DepartmentId;
use crate::domain::employee::{Employee, EmployeeId};
use crate::domain::error::Error;
use crate::domain::history::{DepartmentAssignment, JobTitle, SalaryPeriod, TitlePeriod};
use crate::domain::ports::{
    AssignmentInput, EmployeeUpdate, HistoryInput, NewEmployee, SalaryInput, TitleInput,
};
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::Violations;

/// One department assignment period as submitted by a client.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentPayload {
    pub department_id: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

/// One salary period as submitted by a client.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalaryPayload {
    pub from_date: Option<NaiveDate>,
    pub amount: Option<i64>,
    pub to_date: Option<NaiveDate>,
}

/// One title period as submitted by a client.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TitlePayload {
    pub title: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

/// Payload for creating an employee together with its temporal histories.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCreatePayload {
    pub birth_date: Option<NaiveDate>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub active_status: Option<bool>,
    pub created_by: Option<i64>,
    #[serde(default)]
    pub departments: Vec<AssignmentPayload>,
    #[serde(default)]
    pub salaries: Vec<SalaryPayload>,
    #[serde(default)]
    pub titles: Vec<TitlePayload>,
}

/// Payload for replacing an employee's scalars and all three histories.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdatePayload {
    pub birth_date: Option<NaiveDate>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub active_status: Option<bool>,
    pub updated_by: Option<i64>,
    #[serde(default)]
    pub departments: Vec<AssignmentPayload>,
    #[serde(default)]
    pub salaries: Vec<SalaryPayload>,
    #[serde(default)]
    pub titles: Vec<TitlePayload>,
}

/// Department assignment representation returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub department_id: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl From<&DepartmentAssignment> for AssignmentResponse {
    fn from(record: &DepartmentAssignment) -> Self {
        Self {
            department_id: record.id().department().as_str().to_owned(),
            from_date: record.from_date,
            to_date: record.to_date,
        }
    }
}

/// Salary period representation returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalaryResponse {
    pub from_date: NaiveDate,
    pub amount: i64,
    pub to_date: NaiveDate,
}

impl From<&SalaryPeriod> for SalaryResponse {
    fn from(record: &SalaryPeriod) -> Self {
        Self {
            from_date: record.id().from_date(),
            amount: record.amount,
            to_date: record.to_date,
        }
    }
}

/// Title period representation returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TitleResponse {
    pub title: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl From<&TitlePeriod> for TitleResponse {
    fn from(record: &TitlePeriod) -> Self {
        Self {
            title: record.id().title().as_str().to_owned(),
            from_date: record.id().from_date(),
            to_date: record.to_date,
        }
    }
}

/// Employee representation returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: i64,
    pub birth_date: NaiveDate,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub gender: String,
    pub hire_date: NaiveDate,
    pub active_status: bool,
    pub created_by: i64,
    pub created_date: DateTime<Utc>,
    pub updated_by: i64,
    pub updated_date: DateTime<Utc>,
    pub departments: Vec<AssignmentResponse>,
    pub salaries: Vec<SalaryResponse>,
    pub titles: Vec<TitleResponse>,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id.value(),
            birth_date: employee.profile.birth_date,
            first_name: employee.profile.first_name,
            last_name: employee.profile.last_name,
            gender: employee.profile.gender,
            hire_date: employee.profile.hire_date,
            active_status: employee.profile.active,
            created_by: employee.audit.created_by,
            created_date: employee.audit.created_at,
            updated_by: employee.audit.updated_by,
            updated_date: employee.audit.updated_at,
            departments: employee.assignments.iter().map(Into::into).collect(),
            salaries: employee.salaries.iter().map(Into::into).collect(),
            titles: employee.titles.iter().map(Into::into).collect(),
        }
    }
}

fn parse_history(
    violations: &mut Violations,
    departments: Vec<AssignmentPayload>,
    salaries: Vec<SalaryPayload>,
    titles: Vec<TitlePayload>,
) -> Option<HistoryInput> {
    let mut history = HistoryInput::default();

    for (index, entry) in departments.into_iter().enumerate() {
        let department = match entry.department_id {
            Some(raw) => match DepartmentId::new(&raw) {
                Ok(id) => Some(id),
                Err(err) => {
                    violations.add(format!("departments[{index}].departmentId"), err.to_string());
                    None
                }
            },
            None => {
                violations.add(
                    format!("departments[{index}].departmentId"),
                    "Department ID cannot be blank",
                );
                None
            }
        };
        let from_date = violations.require(
            entry.from_date,
            &format!("departments[{index}].fromDate"),
            "From Date cannot be null",
        );
        let to_date = violations.require(
            entry.to_date,
            &format!("departments[{index}].toDate"),
            "To Date cannot be null",
        );
        if let (Some(department), Some(from_date), Some(to_date)) = (department, from_date, to_date)
        {
            history.assignments.push(AssignmentInput {
                department,
                from_date,
                to_date,
            });
        }
    }

    for (index, entry) in salaries.into_iter().enumerate() {
        let from_date = violations.require(
            entry.from_date,
            &format!("salaries[{index}].fromDate"),
            "From Date cannot be null",
        );
        let amount = violations.require(
            entry.amount,
            &format!("salaries[{index}].amount"),
            "Amount cannot be null",
        );
        let to_date = violations.require(
            entry.to_date,
            &format!("salaries[{index}].toDate"),
            "To Date cannot be null",
        );
        if let (Some(from_date), Some(amount), Some(to_date)) = (from_date, amount, to_date) {
            history.salaries.push(SalaryInput {
                from_date,
                amount,
                to_date,
            });
        }
    }

    for (index, entry) in titles.into_iter().enumerate() {
        let title = match entry.title {
            Some(raw) => match JobTitle::new(raw) {
                Ok(title) => Some(title),
                Err(err) => {
                    violations.add(format!("titles[{index}].title"), err.to_string());
                    None
                }
            },
            None => {
                violations.add(format!("titles[{index}].title"), "Title cannot be blank");
                None
            }
        };
        let from_date = violations.require(
            entry.from_date,
            &format!("titles[{index}].fromDate"),
            "From Date cannot be null",
        );
        let to_date = violations.require(
            entry.to_date,
            &format!("titles[{index}].toDate"),
            "To Date cannot be null",
        );
        if let (Some(title), Some(from_date), Some(to_date)) = (title, from_date, to_date) {
            history.titles.push(TitleInput {
                title,
                from_date,
                to_date,
            });
        }
    }

    if violations.is_empty() {
        Some(history)
    } else {
        None
    }
}

fn parse_create(payload: EmployeeCreatePayload) -> Result<NewEmployee, Error> {
    let mut violations = Violations::default();
    let birth_date = violations.require(payload.birth_date, "birthDate", "Birth Date cannot be null");
    let first_name =
        violations.require_text(payload.first_name, "firstName", "First Name cannot be blank");
    let gender = violations.require_text(payload.gender, "gender", "Gender cannot be blank");
    let hire_date = violations.require(payload.hire_date, "hireDate", "Hire Date cannot be null");
    let created_by =
        violations.require(payload.created_by, "createdBy", "Created By cannot be null");
    let history = parse_history(
        &mut violations,
        payload.departments,
        payload.salaries,
        payload.titles,
    );

    match (birth_date, first_name, gender, hire_date, created_by, history) {
        (
            Some(birth_date),
            Some(first_name),
            Some(gender),
            Some(hire_date),
            Some(created_by),
            Some(history),
        ) => Ok(NewEmployee {
            birth_date,
            first_name,
            last_name: payload.last_name,
            gender,
            hire_date,
            active: payload.active_status,
            created_by,
            history,
        }),
        _ => Err(violations.into_error()),
    }
}

fn parse_update(payload: EmployeeUpdatePayload) -> Result<EmployeeUpdate, Error> {
    let mut violations = Violations::default();
    let birth_date = violations.require(payload.birth_date, "birthDate", "Birth Date cannot be null");
    let first_name =
        violations.require_text(payload.first_name, "firstName", "First Name cannot be blank");
    let gender = violations.require_text(payload.gender, "gender", "Gender cannot be blank");
    let hire_date = violations.require(payload.hire_date, "hireDate", "Hire Date cannot be null");
    let updated_by =
        violations.require(payload.updated_by, "updatedBy", "Updated By cannot be null");
    let history = parse_history(
        &mut violations,
        payload.departments,
        payload.salaries,
        payload.titles,
    );

    match (birth_date, first_name, gender, hire_date, updated_by, history) {
        (
            Some(birth_date),
            Some(first_name),
            Some(gender),
            Some(hire_date),
            Some(updated_by),
            Some(history),
        ) => Ok(EmployeeUpdate {
            birth_date,
            first_name,
            last_name: payload.last_name,
            gender,
            hire_date,
            active: payload.active_status,
            updated_by,
            history,
        }),
        _ => Err(violations.into_error()),
    }
}

/// Create an employee aggregate together with its three histories.
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = EmployeeCreatePayload,
    responses(
        (status = 201, description = "Employee created", body = EmployeeResponse),
        (status = 400, description = "Invalid input", body = ApiError),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "A referenced department does not exist", body = ApiError)
    ),
    tags = ["employees"],
    operation_id = "createEmployee"
)]
#[post("/employees")]
pub async fn create_employee(
    state: web::Data<HttpState>,
    payload: web::Json<EmployeeCreatePayload>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let input =
        parse_create(payload.into_inner()).map_err(|err| ApiError::classify(err, req.path()))?;
    let employee = state.employees.create(input).await.map_err(|err| {
        error!(error = %err, "failed to create employee");
        ApiError::classify(err, req.path())
    })?;
    Ok(HttpResponse::Created().json(EmployeeResponse::from(employee)))
}

/// List every employee, ascending by id.
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses(
        (status = 200, description = "Employees", body = [EmployeeResponse]),
        (status = 401, description = "Missing or invalid API key")
    ),
    tags = ["employees"],
    operation_id = "listEmployees"
)]
#[get("/employees")]
pub async fn list_employees(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<web::Json<Vec<EmployeeResponse>>> {
    let employees = state.employee_queries.get_all().await.map_err(|err| {
        error!(error = %err, "failed to list employees");
        ApiError::classify(err, req.path())
    })?;
    Ok(web::Json(
        employees.into_iter().map(EmployeeResponse::from).collect(),
    ))
}

/// Fetch one employee by id.
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}",
    params(("id" = i64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee", body = EmployeeResponse),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Employee does not exist", body = ApiError)
    ),
    tags = ["employees"],
    operation_id = "getEmployeeById"
)]
#[get("/employees/{id}")]
pub async fn get_employee(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
    req: HttpRequest,
) -> ApiResult<web::Json<EmployeeResponse>> {
    let employee = state
        .employee_queries
        .get_by_id(EmployeeId::new(id.into_inner()))
        .await
        .map_err(|err| {
            error!(error = %err, "failed to fetch employee");
            ApiError::classify(err, req.path())
        })?;
    Ok(web::Json(EmployeeResponse::from(employee)))
}

/// Replace an employee's scalars and all three histories.
#[utoipa::path(
    put,
    path = "/api/v1/employees/{id}",
    params(("id" = i64, Path, description = "Employee id")),
    request_body = EmployeeUpdatePayload,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeResponse),
        (status = 400, description = "Invalid input", body = ApiError),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Employee or referenced department does not exist", body = ApiError)
    ),
    tags = ["employees"],
    operation_id = "updateEmployee"
)]
#[put("/employees/{id}")]
pub async fn update_employee(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
    payload: web::Json<EmployeeUpdatePayload>,
    req: HttpRequest,
) -> ApiResult<web::Json<EmployeeResponse>> {
    let input =
        parse_update(payload.into_inner()).map_err(|err| ApiError::classify(err, req.path()))?;
    let employee = state
        .employees
        .update(EmployeeId::new(id.into_inner()), input)
        .await
        .map_err(|err| {
            error!(error = %err, "failed to update employee");
            ApiError::classify(err, req.path())
        })?;
    Ok(web::Json(EmployeeResponse::from(employee)))
}

/// Delete an employee, cascading to its three histories.
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}",
    params(("id" = i64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee deleted", body = bool),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Employee does not exist", body = ApiError)
    ),
    tags = ["employees"],
    operation_id = "deleteEmployee"
)]
#[delete("/employees/{id}")]
pub async fn delete_employee(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
    req: HttpRequest,
) -> ApiResult<web::Json<bool>> {
    let deleted = state
        .employees
        .delete(EmployeeId::new(id.into_inner()))
        .await
        .map_err(|err| {
            error!(error = %err, "failed to delete employee");
            ApiError::classify(err, req.path())
        })?;
    Ok(web::Json(deleted))
}
