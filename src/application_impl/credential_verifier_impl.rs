use crate::application_port::{AuthError, CredentialVerifier, VerifiedAccount};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use std::collections::HashMap;

/// Member table entry. `secret` is a PHC hash for the argon2 verifier and
/// plaintext for the fake one.
#[derive(Debug, Clone)]
pub struct MemberAccount {
    pub username: String,
    pub secret: String,
    pub role: String,
}

struct StoredCredential {
    password_hash: String,
    role: String,
}

pub struct Argon2CredentialVerifier {
    members: HashMap<String, StoredCredential>,
    /// Checked for unknown usernames so they cost as much as a wrong password.
    decoy_hash: String,
}

fn check_password(password_hash: &str, password: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| AuthError::InternalError(format!("invalid PHC hash: {}", e)))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::InternalError(format!("verify error: {}", e))),
    }
}

impl Argon2CredentialVerifier {
    /// Rejects the table up front if any hash is not a valid PHC string.
    pub fn try_new(members: Vec<MemberAccount>) -> Result<Self, AuthError> {
        let mut table = HashMap::with_capacity(members.len());
        for member in members {
            PasswordHash::new(&member.secret).map_err(|e| {
                AuthError::InternalError(format!("invalid PHC hash for {}: {}", member.username, e))
            })?;
            table.insert(
                member.username,
                StoredCredential {
                    password_hash: member.secret,
                    role: member.role,
                },
            );
        }
        let salt = SaltString::generate(&mut OsRng);
        let decoy_hash = Argon2::default()
            .hash_password(b"decoy-password", &salt)
            .map_err(|e| AuthError::InternalError(format!("decoy hash: {}", e)))?
            .to_string();
        Ok(Self {
            members: table,
            decoy_hash,
        })
    }
}

#[async_trait::async_trait]
impl CredentialVerifier for Argon2CredentialVerifier {
    async fn verify(&self, username: &str, password: &str) -> Result<VerifiedAccount, AuthError> {
        let Some(stored) = self.members.get(username) else {
            check_password(&self.decoy_hash, password)?;
            return Err(AuthError::InvalidCredentials);
        };

        if check_password(&stored.password_hash, password)? {
            Ok(VerifiedAccount {
                subject: username.to_string(),
                role: stored.role.clone(),
            })
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}
