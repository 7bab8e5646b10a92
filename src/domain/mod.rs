// Domain layer - Dashboard documents and pure list algorithms
pub mod dashboard;
pub mod error;
pub mod favicon;
pub mod reorder;
