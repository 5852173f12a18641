pub mod api_gateway;
pub mod error;
pub mod response;

pub use api_gateway::AuthApi;
pub use error::{ApiError, ApiResult};

#[cfg(target_arch = "wasm32")]
pub use api_gateway::ApiGateway;
