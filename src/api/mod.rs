//! HTTP API module.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod response;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use extract::ApiJson;
pub use response::{SuccessResponse, ok_success};
pub use router::{AliasedRouterExt, create_router};
pub use state::AppState;
