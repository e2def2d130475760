pub mod auth;
pub mod body;
pub mod ownership;
pub mod response;

pub use auth::{credential_gate, Principal, TOKEN_HEADER};
pub use body::JsonBody;
pub use ownership::Action;
pub use response::{ApiResponse, ApiResult, Message};
