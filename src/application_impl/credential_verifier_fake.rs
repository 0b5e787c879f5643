use super::MemberAccount;
use crate::application_port::{AuthError, CredentialVerifier, VerifiedAccount};
use std::collections::HashMap;

/// Plaintext member table for development and tests.
#[derive(Debug, Default)]
pub struct FakeCredentialVerifier {
    members: HashMap<String, (String, String)>,
}

impl FakeCredentialVerifier {
    pub fn new(members: Vec<MemberAccount>) -> Self {
        let members = members
            .into_iter()
            .map(|m| (m.username, (m.secret, m.role)))
            .collect();
        Self { members }
    }

    pub fn with_member(mut self, username: &str, password: &str, role: &str) -> Self {
        self.members
            .insert(username.to_string(), (password.to_string(), role.to_string()));
        self
    }
}

#[async_trait::async_trait]
impl CredentialVerifier for FakeCredentialVerifier {
    async fn verify(&self, username: &str, password: &str) -> Result<VerifiedAccount, AuthError> {
        match self.members.get(username) {
            Some((secret, role)) if secret == password => Ok(VerifiedAccount {
                subject: username.to_string(),
                role: role.clone(),
            }),
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}
