//! # Actix Middleware Library
//!
//! Shared middleware for the time-events HTTP services
//!
//! ## Modules
//! - `logging`: structured request/response logging

pub mod logging;

pub use logging::Logging;
