use serde::Serialize;

pub const ROLE_MEMBER: &str = "ROLE_MEMBER";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Identity attached to a request after its access token verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub subject: String,
    pub role: String,
}

impl Principal {
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| *role == self.role)
    }
}
