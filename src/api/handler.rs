use super::cookie;
use super::error::*;
use crate::application_port::{AuthService, LoginInput, SessionTokens};
use crate::domain_model::{Principal, ROLE_ADMIN, ROLE_MEMBER};
use crate::logger::*;
use crate::server::CookiePolicy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::{StatusCode, header::SET_COOKIE};
use warp::{self, reject};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub username: String,
    pub access_token: String,
    pub is_login: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
struct PrincipalResponse {
    subject: String,
    role: String,
}

fn session_reply(tokens: SessionTokens, set_cookie: String) -> impl warp::Reply {
    let body = SessionResponse {
        username: tokens.subject,
        access_token: tokens.access_token.0,
        is_login: true,
    };
    warp::reply::with_header(warp::reply::json(&body), SET_COOKIE, set_cookie)
}

pub async fn login(
    body: LoginRequest,
    auth_service: Arc<dyn AuthService>,
    cookie_policy: Arc<CookiePolicy>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let login_input = LoginInput {
        username: body.username,
        password: body.password,
    };
    let tokens = auth_service
        .login(login_input)
        .await
        .map_err(ApiError::login)
        .map_err(reject::custom)?;

    debug!(subject = %tokens.subject, "login succeeded");
    let set_cookie = cookie::refresh_cookie(&tokens.refresh_token.0, &cookie_policy);
    Ok(session_reply(tokens, set_cookie))
}

pub async fn reissue(
    refresh_token: Option<String>,
    auth_service: Arc<dyn AuthService>,
    cookie_policy: Arc<CookiePolicy>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let tokens = auth_service
        .reissue(refresh_token.as_deref())
        .await
        .map_err(ApiError::reissue)
        .map_err(reject::custom)?;

    let set_cookie = cookie::refresh_cookie(&tokens.refresh_token.0, &cookie_policy);
    Ok(session_reply(tokens, set_cookie))
}

pub async fn logout(
    refresh_token: Option<String>,
    auth_service: Arc<dyn AuthService>,
    cookie_policy: Arc<CookiePolicy>,
) -> Result<impl warp::Reply, warp::Rejection> {
    auth_service
        .logout(refresh_token.as_deref())
        .await
        .map_err(ApiError::logout)
        .map_err(reject::custom)?;

    let cleared = warp::reply::with_header(
        warp::reply(),
        SET_COOKIE,
        cookie::cleared_refresh_cookie(&cookie_policy),
    );
    Ok(warp::reply::with_status(cleared, StatusCode::NO_CONTENT))
}

pub async fn home(_principal: Option<Principal>) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&MessageResponse {
        message: "sessionkeeper".to_string(),
    }))
}

pub async fn authenticated(
    principal: Option<Principal>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let principal = require(principal, None)?;
    Ok(warp::reply::json(&PrincipalResponse {
        subject: principal.subject,
        role: principal.role,
    }))
}

pub async fn member(principal: Option<Principal>) -> Result<impl warp::Reply, warp::Rejection> {
    let principal = require(principal, Some(&[ROLE_MEMBER, ROLE_ADMIN][..]))?;
    Ok(warp::reply::json(&PrincipalResponse {
        subject: principal.subject,
        role: principal.role,
    }))
}

/// A request that got past the pipeline without a principal, or with the
/// wrong role, is forbidden rather than unauthenticated.
fn require(
    principal: Option<Principal>,
    roles: Option<&[&str]>,
) -> Result<Principal, warp::Rejection> {
    match principal {
        Some(principal) if roles.is_none_or(|roles| principal.has_any_role(roles)) => {
            Ok(principal)
        }
        _ => Err(reject::custom(ApiError::forbidden())),
    }
}
