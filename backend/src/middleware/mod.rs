//! Actix middleware: the API-key gate and request logging.

pub mod api_key;
pub mod request_log;

pub use api_key::ApiKeyGuard;
pub use request_log::RequestLog;
