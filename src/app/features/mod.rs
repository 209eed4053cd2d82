pub mod auth;
pub mod organizations;
pub mod products;
