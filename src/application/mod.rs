// Application layer - Dashboard use cases and persistence seams
pub mod commands;
pub mod favicon_service;
pub mod shortcuts;
pub mod state_repository;
pub mod store;
