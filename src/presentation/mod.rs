// Presentation layer - HTTP surface of the persistence service
pub mod app_state;
pub mod handlers;
pub mod router;
