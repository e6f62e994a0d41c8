pub mod aggregate;
pub mod clock;
pub mod config;
pub mod constants;
pub mod extractors;
pub mod logging;
pub mod middleware;
pub mod response;
pub mod rotation;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;
