use super::cookie::REFRESH_COOKIE;
use super::error::*;
use super::handler;
use crate::application_port::{AuthService, Flow};
use crate::domain_model::Principal;
use crate::server::*;
use std::convert::Infallible;
use std::sync::Arc;
use warp::filters::path::FullPath;
use warp::http::Method;
use warp::{Filter, http, reject};

const LOGIN_BODY_LIMIT: u64 = 16 * 1024;

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let cookie_policy = Arc::new(server.cookie_policy.clone());

    let login = on_flow(server.auth_service.clone(), Flow::LoginFlow)
        .and(warp::body::content_length_limit(LOGIN_BODY_LIMIT))
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and(with(cookie_policy.clone()))
        .and_then(handler::login);

    let logout = on_flow(server.auth_service.clone(), Flow::LogoutFlow)
        .and(warp::cookie::optional::<String>(REFRESH_COOKIE))
        .and(with(server.auth_service.clone()))
        .and(with(cookie_policy.clone()))
        .and_then(handler::logout);

    let reissue = warp::path("reissue")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::cookie::optional::<String>(REFRESH_COOKIE))
        .and(with(server.auth_service.clone()))
        .and(with(cookie_policy))
        .and_then(handler::reissue);

    let home = warp::path::end()
        .and(warp::get())
        .and(with_principal(server.auth_service.clone()))
        .and_then(handler::home);

    let authenticated = warp::path("authenticated")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_principal(server.auth_service.clone()))
        .and_then(handler::authenticated);

    let member = warp::path("member")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_principal(server.auth_service.clone()))
        .and_then(handler::member);

    login
        .or(logout)
        .or(reissue)
        .or(home)
        .or(authenticated)
        .or(member)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

/// Matches only requests the pipeline classifies as `flow`, so the login
/// and logout paths follow the route settings.
fn on_flow(
    auth_service: Arc<dyn AuthService>,
    flow: Flow,
) -> impl Filter<Extract = (), Error = warp::Rejection> + Clone {
    warp::method()
        .and(warp::path::full())
        .and_then(move |method: Method, path: FullPath| {
            let auth_service = auth_service.clone();
            async move {
                if auth_service.flow(method.as_str(), path.as_str()) == flow {
                    Ok(())
                } else {
                    Err(reject::not_found())
                }
            }
        })
        .untuple_one()
}

/// Runs the authentication pipeline. Public routes and requests without a
/// bearer token pass through with no principal; a token that fails
/// verification is rejected.
fn with_principal(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (Option<Principal>,), Error = warp::Rejection> + Clone {
    warp::method()
        .and(warp::path::full())
        .and(warp::header::optional::<String>(
            http::header::AUTHORIZATION.as_ref(),
        ))
        .and_then(
            move |method: Method, path: FullPath, authorization: Option<String>| {
                let auth_service = auth_service.clone();
                async move {
                    match auth_service.flow(method.as_str(), path.as_str()) {
                        Flow::ProtectedFlow => auth_service
                            .authenticate(authorization.as_deref())
                            .await
                            .map_err(ApiError::access)
                            .map_err(reject::custom),
                        _ => Ok(None),
                    }
                }
            },
        )
}
