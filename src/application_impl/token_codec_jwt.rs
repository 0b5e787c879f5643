use crate::application_port::{AuthError, TokenCodec};
use crate::domain_model::{Claims, TokenCategory};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

/// HS256 codec. The key is fixed when the codec is built.
pub struct JwtHs256Codec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtHs256Codec {
    pub fn new(signing_key: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = 0;
        JwtHs256Codec {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
            validation,
        }
    }

    #[inline]
    fn gen_jti() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[async_trait::async_trait]
impl TokenCodec for JwtHs256Codec {
    async fn issue(
        &self,
        category: TokenCategory,
        subject: &str,
        role: &str,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let iat_dt = Utc::now();
        let exp_dt = iat_dt.checked_add_signed(ttl).ok_or_else(|| {
            AuthError::InternalError(format!("token lifetime out of range: {}", ttl))
        })?;
        let claims = Claims {
            category,
            sub: subject.to_string(),
            role: role.to_string(),
            jti: Self::gen_jti(),
            iat: iat_dt.timestamp(),
            exp: exp_dt.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InternalError(e.to_string()))
    }

    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        // jsonwebtoken checks the signature before it looks at `exp`, so an
        // expired token is only reported as such when it is authentic.
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::SignatureInvalid
                }
                _ => AuthError::MalformedToken,
            }
        })?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::token_signature;

    fn codec() -> JwtHs256Codec {
        JwtHs256Codec::new(b"test-signing-key-0123456789abcdef")
    }

    #[tokio::test]
    async fn verify_returns_what_issue_embedded() {
        let codec = codec();
        for category in [TokenCategory::Access, TokenCategory::Refresh] {
            let ttl = Duration::milliseconds(90_000);
            let token = codec.issue(category, "alice", "ROLE_MEMBER", ttl).await.unwrap();
            let claims = codec.verify(&token).await.unwrap();
            assert_eq!(claims.category, category);
            assert_eq!(claims.sub, "alice");
            assert_eq!(claims.role, "ROLE_MEMBER");
            let drift = (claims.lifetime() - ttl).num_milliseconds().abs();
            assert!(drift <= 1_000, "lifetime drifted by {}ms", drift);
        }
    }

    #[tokio::test]
    async fn already_expired_token_reports_expired() {
        let codec = codec();
        let token = codec
            .issue(TokenCategory::Access, "alice", "ROLE_MEMBER", Duration::milliseconds(-1_000))
            .await
            .unwrap();
        assert_eq!(codec.verify(&token).await, Err(AuthError::ExpiredToken));
    }

    #[tokio::test]
    async fn foreign_key_is_rejected_as_bad_signature() {
        let token = codec()
            .issue(TokenCategory::Access, "alice", "ROLE_MEMBER", Duration::minutes(5))
            .await
            .unwrap();
        let other = JwtHs256Codec::new(b"some-other-key");
        assert_eq!(other.verify(&token).await, Err(AuthError::SignatureInvalid));
    }

    #[tokio::test]
    async fn expired_and_forged_token_is_a_signature_failure() {
        let token = JwtHs256Codec::new(b"some-other-key")
            .issue(TokenCategory::Access, "alice", "ROLE_MEMBER", Duration::milliseconds(-5_000))
            .await
            .unwrap();
        assert_eq!(codec().verify(&token).await, Err(AuthError::SignatureInvalid));
    }

    #[tokio::test]
    async fn truncated_signature_is_rejected() {
        let codec = codec();
        let token = codec
            .issue(TokenCategory::Refresh, "alice", "ROLE_MEMBER", Duration::minutes(5))
            .await
            .unwrap();
        let truncated = &token[..token.len() - 4];
        assert_eq!(codec.verify(truncated).await, Err(AuthError::SignatureInvalid));
    }

    #[tokio::test]
    async fn swapped_payload_is_rejected() {
        let codec = codec();
        let member = codec
            .issue(TokenCategory::Access, "alice", "ROLE_MEMBER", Duration::minutes(5))
            .await
            .unwrap();
        let admin = codec
            .issue(TokenCategory::Access, "root", "ROLE_ADMIN", Duration::minutes(5))
            .await
            .unwrap();
        let member_parts: Vec<&str> = member.split('.').collect();
        let admin_parts: Vec<&str> = admin.split('.').collect();
        let forged = format!("{}.{}.{}", member_parts[0], admin_parts[1], member_parts[2]);
        assert_eq!(codec.verify(&forged).await, Err(AuthError::SignatureInvalid));
    }

    #[tokio::test]
    async fn garbage_is_malformed() {
        assert_eq!(codec().verify("not-a-token").await, Err(AuthError::MalformedToken));
        assert_eq!(codec().verify("").await, Err(AuthError::MalformedToken));
    }

    #[tokio::test]
    async fn simultaneous_issues_differ() {
        let codec = codec();
        let ttl = Duration::minutes(5);
        let a = codec.issue(TokenCategory::Refresh, "alice", "ROLE_MEMBER", ttl).await.unwrap();
        let b = codec.issue(TokenCategory::Refresh, "alice", "ROLE_MEMBER", ttl).await.unwrap();
        assert_ne!(a, b);
        assert_ne!(token_signature(&a), token_signature(&b));
    }

    #[tokio::test]
    async fn claim_accessors_read_verified_claims() {
        let codec = codec();
        let token = codec
            .issue(TokenCategory::Refresh, "bob", "ROLE_ADMIN", Duration::minutes(5))
            .await
            .unwrap();
        assert_eq!(codec.category(&token).await.unwrap(), TokenCategory::Refresh);
        assert_eq!(codec.subject(&token).await.unwrap(), "bob");
        assert_eq!(codec.role(&token).await.unwrap(), "ROLE_ADMIN");
        assert!(codec.expiration(&token).await.unwrap() > Utc::now());
        assert_eq!(codec.subject("x.y.z").await, Err(AuthError::MalformedToken));
    }

    #[tokio::test]
    async fn out_of_range_lifetime_is_an_error() {
        let codec = codec();
        for ttl in [Duration::MAX, Duration::MIN] {
            let err = codec
                .issue(TokenCategory::Access, "alice", "ROLE_MEMBER", ttl)
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::InternalError(_)));
        }
    }
}
