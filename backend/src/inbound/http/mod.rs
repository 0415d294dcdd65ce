//! HTTP inbound adapter exposing the user endpoints.

pub mod error;
pub(crate) mod request;
pub mod response;
pub mod routes;
pub mod state;
pub mod users;
pub mod validation;

pub use error::{ApiError, ApiResult};
pub use routes::configure;
pub use state::HttpState;
