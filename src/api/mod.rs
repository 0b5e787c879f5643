mod cookie;
mod error;
mod handler;
mod router;

pub use cookie::{REFRESH_COOKIE, cleared_refresh_cookie, refresh_cookie};
pub use error::{ApiError, ApiErrorCode, ErrorResponse, recover_error};
pub use handler::{LoginRequest, SessionResponse};
pub use router::routes;

use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

/// Full HTTP surface with rejection recovery and request tracing.
pub fn service(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Infallible> + Clone {
    routes(server)
        .recover(recover_error)
        .with(warp::trace::request())
}
