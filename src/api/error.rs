use crate::application_port::AuthError;
use crate::logger::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let (status, code) = if let Some(err) = err.find::<ApiError>() {
        (err.status, err.code)
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, ApiErrorCode::NotFound)
    } else if err.find::<warp::filters::body::BodyDeserializeError>().is_some()
        || err.find::<reject::PayloadTooLarge>().is_some()
        || err.find::<reject::UnsupportedMediaType>().is_some()
        || err.find::<reject::LengthRequired>().is_some()
    {
        (StatusCode::BAD_REQUEST, ApiErrorCode::BadRequest)
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, ApiErrorCode::MethodNotAllowed)
    } else {
        warn!("unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, ApiErrorCode::InternalError)
    };

    let json = warp::reply::json(&ErrorResponse {
        is_login: false,
        reason: code,
        message: code.to_string(),
    });
    Ok(warp::reply::with_status(json, status))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub is_login: bool,
    pub reason: ApiErrorCode,
    pub message: String,
}

/// Machine-readable failure reason carried in every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    #[error("Refresh token is missing")]
    MissingToken,
    #[error("Token is malformed")]
    MalformedToken,
    #[error("Token signature is not valid")]
    SignatureInvalid,
    #[error("Token has expired")]
    ExpiredToken,
    #[error("Token has the wrong category")]
    WrongCategory,
    #[error("Token is not a recognized session")]
    NotFoundInStore,
    #[error("Token has been revoked")]
    Revoked,
    #[error("Session store is unavailable")]
    StoreUnavailable,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Access denied")]
    Forbidden,
    #[error("Request could not be parsed")]
    BadRequest,
    #[error("Not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Internal error")]
    InternalError,
}

impl From<&AuthError> for ApiErrorCode {
    fn from(error: &AuthError) -> Self {
        match error {
            AuthError::MissingToken => ApiErrorCode::MissingToken,
            AuthError::MalformedToken => ApiErrorCode::MalformedToken,
            AuthError::SignatureInvalid => ApiErrorCode::SignatureInvalid,
            AuthError::ExpiredToken => ApiErrorCode::ExpiredToken,
            AuthError::WrongCategory => ApiErrorCode::WrongCategory,
            AuthError::NotFoundInStore => ApiErrorCode::NotFoundInStore,
            AuthError::Revoked => ApiErrorCode::Revoked,
            AuthError::StoreUnavailable(_) => ApiErrorCode::StoreUnavailable,
            AuthError::InvalidCredentials => ApiErrorCode::InvalidCredentials,
            AuthError::InternalError(_) => ApiErrorCode::InternalError,
        }
    }
}

/// Status and reason for a failed request. The status depends on which
/// surface rejected it, so construct through the per-surface functions.
///
/// `StoreUnavailable` is the only 5xx a token or credential failure can
/// produce. `InternalError` sits outside that taxonomy: it covers local
/// faults such as a token that cannot be encoded or an unusable argon2
/// hash, and maps to 500.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: ApiErrorCode,
}

impl reject::Reject for ApiError {}

impl ApiError {
    fn new(error: AuthError, client_status: StatusCode) -> Self {
        let status = match &error {
            AuthError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::InternalError(e) => {
                warn!("Internal error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => client_status,
        };
        ApiError {
            status,
            code: ApiErrorCode::from(&error),
        }
    }

    pub fn login(error: AuthError) -> Self {
        Self::new(error, StatusCode::UNAUTHORIZED)
    }

    pub fn access(error: AuthError) -> Self {
        Self::new(error, StatusCode::UNAUTHORIZED)
    }

    pub fn logout(error: AuthError) -> Self {
        Self::new(error, StatusCode::BAD_REQUEST)
    }

    /// A lapsed session gets 401 so clients can tell "log in again" from
    /// a bad request.
    pub fn reissue(error: AuthError) -> Self {
        match error {
            AuthError::ExpiredToken => Self::new(error, StatusCode::UNAUTHORIZED),
            other => Self::new(other, StatusCode::BAD_REQUEST),
        }
    }

    pub fn forbidden() -> Self {
        ApiError {
            status: StatusCode::FORBIDDEN,
            code: ApiErrorCode::Forbidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_are_the_only_5xx() {
        let unavailable = AuthError::StoreUnavailable("down".to_string());
        assert_eq!(ApiError::login(unavailable.clone()).status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ApiError::logout(unavailable.clone()).status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ApiError::reissue(unavailable).status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            ApiError::access(AuthError::SignatureInvalid).status,
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn internal_faults_are_500_and_token_faults_never_are() {
        let internal = AuthError::InternalError("encode".to_string());
        assert_eq!(ApiError::login(internal.clone()).status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::reissue(internal).status, StatusCode::INTERNAL_SERVER_ERROR);
        for token_fault in [
            AuthError::MalformedToken,
            AuthError::SignatureInvalid,
            AuthError::Revoked,
            AuthError::InvalidCredentials,
        ] {
            assert!(ApiError::login(token_fault.clone()).status.is_client_error());
            assert!(ApiError::reissue(token_fault).status.is_client_error());
        }
    }

    #[test]
    fn reissue_separates_lapsed_sessions_from_bad_requests() {
        assert_eq!(ApiError::reissue(AuthError::ExpiredToken).status, StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::reissue(AuthError::NotFoundInStore).status, StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::reissue(AuthError::WrongCategory).status, StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::logout(AuthError::ExpiredToken).status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn reason_codes_are_snake_case() {
        let json = serde_json::to_string(&ApiErrorCode::NotFoundInStore).unwrap();
        assert_eq!(json, "\"not_found_in_store\"");
    }
}
