pub mod handlers;
pub mod routes;
pub mod webhooks;

pub use routes::create_router;
