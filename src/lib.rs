/// Retail API
///
/// CRUD service for users, products, promotional products and purchases,
/// with every business route behind bearer token authentication.

pub mod account;
pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod metrics;
pub mod purchases;
pub mod server;

pub use context::AppContext;
pub use error::{AppError, AppResult};
