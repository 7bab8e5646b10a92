// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_probe;
pub mod http_response;
pub mod local_store;
pub mod remote_store;
