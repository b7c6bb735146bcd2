//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] assembles the specification for the REST surface: employee
//! and department endpoints, health probes, the error envelope schemas,
//! and the API-key security scheme. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::departments::{
    DepartmentCreatePayload, DepartmentResponse, DepartmentUpdatePayload,
};
use crate::inbound::http::employees::{
    AssignmentPayload, AssignmentResponse, EmployeeCreatePayload, EmployeeResponse,
    EmployeeUpdatePayload, SalaryPayload, SalaryResponse, TitlePayload, TitleResponse,
};
use crate::inbound::http::error::{ApiError, ErrorCategory};

/// Enrich the generated document with the API-key security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "ApiKey",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "X-API-KEY",
                "Shared secret required for every /api/v1 request.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "HR backend API",
        description = "Employee and department records with temporal histories."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("ApiKey" = [])),
    paths(
        crate::inbound::http::employees::create_employee,
        crate::inbound::http::employees::list_employees,
        crate::inbound::http::employees::get_employee,
        crate::inbound::http::employees::update_employee,
        crate::inbound::http::employees::delete_employee,
        crate::inbound::http::departments::create_department,
        crate::inbound::http::departments::list_departments,
        crate::inbound::http::departments::get_department,
        crate::inbound::http::departments::update_department,
        crate::inbound::http::departments::delete_department,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        EmployeeCreatePayload,
        EmployeeUpdatePayload,
        EmployeeResponse,
        AssignmentPayload,
        AssignmentResponse,
        SalaryPayload,
        SalaryResponse,
        TitlePayload,
        TitleResponse,
        DepartmentCreatePayload,
        DepartmentUpdatePayload,
        DepartmentResponse,
        ApiError,
        ErrorCategory,
    )),
    tags(
        (name = "employees", description = "Employee aggregates and their temporal histories"),
        (name = "departments", description = "Department records"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_endpoint_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for path in [
            "/api/v1/employees",
            "/api/v1/employees/{id}",
            "/api/v1/departments",
            "/api/v1/departments/{id}",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn the_error_envelope_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.contains_key("ApiError"));
        assert!(schemas.contains_key("ErrorCategory"));
    }
}
