//! Wedding films API library.
//!
//! The record access layer, form controllers and page view models behind
//! the HTTP routes. The binary in `main.rs` wires them to configuration.

pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod pages;
pub mod rate_limiter;
pub mod repositories;
pub mod routes;
pub mod state;
