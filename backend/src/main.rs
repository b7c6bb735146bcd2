//! Backend entry-point: wires the REST surface, the API-key gate, and docs.

use std::io;

use actix_web::{App, HttpServer, web};
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use hr_backend::ApiDoc;
use hr_backend::config::ServerSettings;
use hr_backend::inbound::http::health::{ServiceHealth, live, ready};
use hr_backend::inbound::http::state::HttpState;
use hr_backend::inbound::http::{departments, employees};
use hr_backend::middleware::{ApiKeyGuard, RequestLog};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("failed to load configuration: {e}")))?;
    let Some(api_key) = settings.api_key().map(str::to_owned) else {
        return Err(io::Error::other(
            "HR_API_KEY must be set before the server can start",
        ));
    };
    let bind_addr = settings.bind_addr().to_owned();

    let state = HttpState::with_memory_store();
    let health = web::Data::new(ServiceHealth::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health = health.clone();

    let server = HttpServer::new(move || {
        let api = web::scope("/api/v1")
            .wrap(ApiKeyGuard::new(api_key.clone()))
            .service(employees::create_employee)
            .service(employees::list_employees)
            .service(employees::get_employee)
            .service(employees::update_employee)
            .service(employees::delete_employee)
            .service(departments::create_department)
            .service(departments::list_departments)
            .service(departments::get_department)
            .service(departments::update_department)
            .service(departments::delete_department);

        let app = App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(server_health.clone())
            .wrap(RequestLog)
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(bind_addr.as_str())?;

    health.mark_ready();
    server.run().await
}
