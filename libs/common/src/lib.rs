//! Common library for the wedding films site
//!
//! This crate provides the pieces shared by the services: the availability
//! calendar model, the record types, table access to PostgreSQL (or an
//! in-memory stand-in), object storage for videos, database connectivity and
//! the backend error type.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use common::database::{DatabaseConfig, health_check, init_pool};
//! use common::models::VideoFilter;
//! use common::storage::MemoryStorage;
//! use common::store::Backend;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     println!("Database health check: {}", health_check(&pool).await?);
//!
//!     let storage = Arc::new(MemoryStorage::new("http://localhost:9000/videos"));
//!     let backend = Backend::postgres(pool, storage);
//!     let videos = backend.videos.select(&VideoFilter::default()).await?;
//!     println!("{} videos", videos.len());
//!     Ok(())
//! }
//! ```

pub mod calendar;
pub mod database;
pub mod error;
pub mod models;
pub mod storage;
pub mod store;
