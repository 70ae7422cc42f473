pub mod auth;
pub mod common;
pub mod errors;
pub mod model;
pub mod observability;
pub mod rate_limiting;
pub mod routes;
pub mod startup;
pub mod sync;
