pub mod config;
pub mod db;
pub mod document;
pub mod errors;
pub mod extract;
pub mod identity;
pub mod loader;
pub mod logging;
pub mod models;
pub mod prediction;
pub mod relational;
pub mod repository;
pub mod routes;
pub mod state;
