pub mod app;
pub mod auth;
pub mod error;
pub mod requests;
mod routes;
