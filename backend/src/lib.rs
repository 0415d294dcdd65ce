//! User service library: domain types, the repository port, its PostgreSQL
//! adapter, and the HTTP surface serving them.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use middleware::Trace;
