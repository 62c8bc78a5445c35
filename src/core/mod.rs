//! Configuration and request/response types shared by the API and providers.

pub mod config;
pub mod models;
