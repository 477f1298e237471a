pub mod error;
pub mod media;
pub mod middleware;
pub mod models;
pub mod relay;
pub mod routes;
