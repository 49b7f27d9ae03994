pub mod app;
pub mod audit;
pub mod auth;
pub mod authz;
pub mod config;
pub mod docs;
pub mod errors;
pub mod extract;
pub mod models;
pub mod reconcile;
pub mod routes;
pub mod session;
pub mod store;
pub mod utils;

// Re-export commonly used items for tests
pub use app::{bootstrap, create_app, AppState};
