//! Core services and infrastructure

pub mod config;
pub mod error_handling;
pub mod logging;
pub mod services;
pub mod sync;
pub mod time;
pub mod types;
pub mod validation;
