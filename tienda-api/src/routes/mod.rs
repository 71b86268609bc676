/// API route handlers
///
/// Organized by resource:
///
/// - `home`: public home and about pages
/// - `health`: health check endpoint
/// - `auth`: registration, login, logout
/// - `account`: self-service profile management
/// - `customers`: customer CRUD
/// - `products`: product creation
/// - `search`: free-text search across customers and products

pub mod account;
pub mod auth;
pub mod customers;
pub mod health;
pub mod home;
pub mod products;
pub mod search;
