//! Department REST handlers.
//!
//! ```text
//! POST   /api/v1/departments
//! GET    /api/v1/departments
//! GET    /api/v1/departments/{id}
//! PUT    /api/v1/departments/{id}
//! DELETE /api/v1/departments/{id}
//! ```
//!
//! Path identifiers pass through [`DepartmentId`], so any spelling of an id
//! is lowercased before it reaches the service.

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::department::{Department, DepartmentId};
use crate::domain::error::Error;
use crate::domain::ports::{DepartmentUpdate, NewDepartment};
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::Violations;

/// Payload for creating a department.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentCreatePayload {
    pub id: Option<String>,
    pub dept_name: Option<String>,
    pub active: Option<bool>,
    pub created_by: Option<i64>,
}

/// Payload for updating a department.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentUpdatePayload {
    pub dept_name: Option<String>,
    pub active: Option<bool>,
    pub updated_by: Option<i64>,
}

/// Department representation returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub id: String,
    pub dept_name: String,
    pub active: bool,
    pub created_by: i64,
    pub created_date: DateTime<Utc>,
    pub updated_by: i64,
    pub updated_date: DateTime<Utc>,
}

impl From<Department> for DepartmentResponse {
    fn from(department: Department) -> Self {
        Self {
            id: department.id.as_str().to_owned(),
            dept_name: department.name,
            active: department.active,
            created_by: department.audit.created_by,
            created_date: department.audit.created_at,
            updated_by: department.audit.updated_by,
            updated_date: department.audit.updated_at,
        }
    }
}

fn parse_create(payload: DepartmentCreatePayload) -> Result<NewDepartment, Error> {
    let mut violations = Violations::default();
    let id = match payload.id {
        Some(raw) => match DepartmentId::new(&raw) {
            Ok(id) => Some(id),
            Err(err) => {
                violations.add("id", err.to_string());
                None
            }
        },
        None => {
            violations.add("id", "Department ID cannot be blank");
            None
        }
    };
    let name = violations.require_text(
        payload.dept_name,
        "deptName",
        "Department Name cannot be blank",
    );
    let created_by = violations.require(
        payload.created_by,
        "createdBy",
        "Department Created By cannot be null",
    );

    match (id, name, created_by) {
        (Some(id), Some(name), Some(created_by)) => Ok(NewDepartment {
            id,
            name,
            active: payload.active,
            created_by,
        }),
        _ => Err(violations.into_error()),
    }
}

fn parse_update(payload: DepartmentUpdatePayload) -> Result<DepartmentUpdate, Error> {
    let mut violations = Violations::default();
    let name = violations.require_text(
        payload.dept_name,
        "deptName",
        "Department Name cannot be blank",
    );
    let updated_by = violations.require(
        payload.updated_by,
        "updatedBy",
        "Department Updated By cannot be null",
    );

    match (name, updated_by) {
        (Some(name), Some(updated_by)) => Ok(DepartmentUpdate {
            name,
            active: payload.active,
            updated_by,
        }),
        _ => Err(violations.into_error()),
    }
}

/// Lowercase and validate a path identifier; a blank one is a semantically
/// illegal argument, not a validation failure.
fn parse_path_id(raw: &str, req: &HttpRequest) -> Result<DepartmentId, ApiError> {
    DepartmentId::new(raw)
        .map_err(|err| ApiError::classify(Error::invalid_argument(err.to_string()), req.path()))
}

/// Create a department.
#[utoipa::path(
    post,
    path = "/api/v1/departments",
    request_body = DepartmentCreatePayload,
    responses(
        (status = 201, description = "Department created", body = DepartmentResponse),
        (status = 400, description = "Invalid input", body = ApiError),
        (status = 401, description = "Missing or invalid API key"),
        (status = 409, description = "Department already exists", body = ApiError)
    ),
    tags = ["departments"],
    operation_id = "createDepartment"
)]
#[post("/departments")]
pub async fn create_department(
    state: web::Data<HttpState>,
    payload: web::Json<DepartmentCreatePayload>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let input =
        parse_create(payload.into_inner()).map_err(|err| ApiError::classify(err, req.path()))?;
    let department = state.departments.create(input).await.map_err(|err| {
        error!(error = %err, "failed to create department");
        ApiError::classify(err, req.path())
    })?;
    Ok(HttpResponse::Created().json(DepartmentResponse::from(department)))
}

/// List every department, ascending by id.
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    responses(
        (status = 200, description = "Departments", body = [DepartmentResponse]),
        (status = 401, description = "Missing or invalid API key")
    ),
    tags = ["departments"],
    operation_id = "listDepartments"
)]
#[get("/departments")]
pub async fn list_departments(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<web::Json<Vec<DepartmentResponse>>> {
    let departments = state.department_queries.get_all().await.map_err(|err| {
        error!(error = %err, "failed to list departments");
        ApiError::classify(err, req.path())
    })?;
    Ok(web::Json(
        departments
            .into_iter()
            .map(DepartmentResponse::from)
            .collect(),
    ))
}

/// Fetch one department by id, any capitalisation.
#[utoipa::path(
    get,
    path = "/api/v1/departments/{id}",
    params(("id" = String, Path, description = "Department id, case-insensitive")),
    responses(
        (status = 200, description = "Department", body = DepartmentResponse),
        (status = 400, description = "Blank identifier", body = ApiError),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Department does not exist", body = ApiError)
    ),
    tags = ["departments"],
    operation_id = "getDepartmentById"
)]
#[get("/departments/{id}")]
pub async fn get_department(
    state: web::Data<HttpState>,
    id: web::Path<String>,
    req: HttpRequest,
) -> ApiResult<web::Json<DepartmentResponse>> {
    let id = parse_path_id(&id, &req)?;
    let department = state
        .department_queries
        .get_by_id(id)
        .await
        .map_err(|err| {
            error!(error = %err, "failed to fetch department");
            ApiError::classify(err, req.path())
        })?;
    Ok(web::Json(DepartmentResponse::from(department)))
}

/// Update a department's name and active flag.
#[utoipa::path(
    put,
    path = "/api/v1/departments/{id}",
    params(("id" = String, Path, description = "Department id, case-insensitive")),
    request_body = DepartmentUpdatePayload,
    responses(
        (status = 200, description = "Department updated", body = DepartmentResponse),
        (status = 400, description = "Invalid input", body = ApiError),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Department does not exist", body = ApiError)
    ),
    tags = ["departments"],
    operation_id = "updateDepartment"
)]
#[put("/departments/{id}")]
pub async fn update_department(
    state: web::Data<HttpState>,
    id: web::Path<String>,
    payload: web::Json<DepartmentUpdatePayload>,
    req: HttpRequest,
) -> ApiResult<web::Json<DepartmentResponse>> {
    let id = parse_path_id(&id, &req)?;
    let input =
        parse_update(payload.into_inner()).map_err(|err| ApiError::classify(err, req.path()))?;
    let department = state.departments.update(id, input).await.map_err(|err| {
        error!(error = %err, "failed to update department");
        ApiError::classify(err, req.path())
    })?;
    Ok(web::Json(DepartmentResponse::from(department)))
}

/// Delete a department.
#[utoipa::path(
    delete,
    path = "/api/v1/departments/{id}",
    params(("id" = String, Path, description = "Department id, case-insensitive")),
    responses(
        (status = 200, description = "Department deleted", body = bool),
        (status = 400, description = "Blank identifier", body = ApiError),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Department does not exist", body = ApiError)
    ),
    tags = ["departments"],
    operation_id = "deleteDepartment"
)]
#[delete("/departments/{id}")]
pub async fn delete_department(
    state: web::Data<HttpState>,
    id: web::Path<String>,
    req: HttpRequest,
) -> ApiResult<web::Json<bool>> {
    let id = parse_path_id(&id, &req)?;
    let deleted = state.departments.delete(id).await.map_err(|err| {
        error!(error = %err, "failed to delete department");
        ApiError::classify(err, req.path())
    })?;
    Ok(web::Json(deleted))
}
