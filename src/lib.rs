// Start-page dashboard engine and its persistence service
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
