use crate::server::CookiePolicy;

pub const REFRESH_COOKIE: &str = "refresh_token";

/// `Set-Cookie` value carrying a refresh token.
pub fn refresh_cookie(token: &str, policy: &CookiePolicy) -> String {
    build(token, policy.max_age.num_seconds().max(0), policy.secure)
}

/// `Set-Cookie` value that makes the browser drop the refresh token.
pub fn cleared_refresh_cookie(policy: &CookiePolicy) -> String {
    build("", 0, policy.secure)
}

fn build(value: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!("{}={}; Max-Age={}; Path=/; HttpOnly", REFRESH_COOKIE, value, max_age);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
