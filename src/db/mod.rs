pub mod connection;
pub mod loader;
pub mod schema;
