//! HTTP handlers.

pub mod health_handler;
pub mod sync_handler;

pub use health_handler::health_routes;
pub use sync_handler::auth_routes;
