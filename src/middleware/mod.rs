pub mod auth;
pub mod response;

pub use auth::{AuthUser, RequirePublisher};
pub use response::{ApiResponse, ApiResult};
