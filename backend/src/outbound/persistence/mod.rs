//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementation of the user repository port backed by PostgreSQL
//! via Diesel with async support through `diesel-async` and `bb8`.
//!
//! Diesel row structs (`models.rs`) and table definitions (`schema.rs`) are
//! internal details and never reach the domain layer.
//!
//! # Example
//!
//! ```no_run
//! use user_service::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn connect() -> Result<(), user_service::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/users")).await?;
//! let repository = DieselUserRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DEFAULT_MAX_SIZE, DbPool, PoolConfig, PoolError};
