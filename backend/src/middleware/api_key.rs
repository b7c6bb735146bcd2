//! API-key gate for the query/mutation surface.
//!
//! A pure allow/deny filter with no session state: requests carrying the
//! expected `X-API-KEY` header pass through untouched, anything else is
//! answered with 401 and a structured JSON body before a handler runs.
//! Endpoints mounted outside the guarded scope are unaffected.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use serde_json::json;
use tracing::warn;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Middleware factory holding the shared secret.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use hr_backend::middleware::ApiKeyGuard;
///
/// let app = App::new().service(web::scope("/api/v1").wrap(ApiKeyGuard::new("secret")));
/// ```
#[derive(Clone)]
pub struct ApiKeyGuard {
    secret: Arc<String>,
}

impl ApiKeyGuard {
    /// Build a guard around the configured shared secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Arc::new(secret.into()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiKeyGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyGuardMiddleware {
            service,
            secret: Arc::clone(&self.secret),
        }))
    }
}

/// Service wrapper produced by [`ApiKeyGuard`].
pub struct ApiKeyGuardMiddleware<S> {
    service: S,
    secret: Arc<String>,
}

impl<S, B> Service<ServiceRequest> for ApiKeyGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let authorised = req
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|presented| presented == self.secret.as_str());

        if !authorised {
            warn!(path = %req.path(), "rejected request without a valid API key");
            let response = HttpResponse::Unauthorized()
                .json(json!({ "error": "Unauthorized: Invalid or missing API key" }));
            let (request, _payload) = req.into_parts();
            let rejected = ServiceResponse::new(request, response).map_into_right_body();
            return Box::pin(async move { Ok(rejected) });
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(|res| res.map_into_left_body()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::Value;

    const SECRET: &str = "local-test-key";

    async fn echo() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    fn guarded_app() -> App<
        impl actix_web::dev::ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl actix_web::body::MessageBody>,
            Error = Error,
            InitError = (),
        >,
    > {
        App::new().service(
            web::scope("/api/v1")
                .wrap(ApiKeyGuard::new(SECRET))
                .route("/ping", web::get().to(echo)),
        )
    }

    #[actix_web::test]
    async fn a_matching_key_passes_through() {
        let app = test::init_service(guarded_app()).await;
        let req = test::TestRequest::get()
            .uri("/api/v1/ping")
            .insert_header((API_KEY_HEADER, SECRET))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn a_missing_key_is_rejected_with_a_structured_body() {
        let app = test::init_service(guarded_app()).await;
        let req = test::TestRequest::get().uri("/api/v1/ping").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Unauthorized: Invalid or missing API key");
    }

    #[actix_web::test]
    async fn a_wrong_key_is_rejected() {
        let app = test::init_service(guarded_app()).await;
        let req = test::TestRequest::get()
            .uri("/api/v1/ping")
            .insert_header((API_KEY_HEADER, "not-the-key"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn routes_outside_the_scope_are_unfiltered() {
        let app = test::init_service(
            App::new()
                .service(
                    web::scope("/api/v1")
                        .wrap(ApiKeyGuard::new(SECRET))
                        .route("/ping", web::get().to(echo)),
                )
                .route("/health/live", web::get().to(echo)),
        )
        .await;
        let req = test::TestRequest::get().uri("/health/live").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
