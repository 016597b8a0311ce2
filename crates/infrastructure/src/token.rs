use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use domain::{AuthToken, Claims, DomainError, TokenIssuer, User};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const MIN_SECRET_LEN: usize = 32;

/// Stateless bearer tokens: `base64url(claims json).hex(hmac-sha256)`.
pub struct HmacTokenIssuer {
    secret: Vec<u8>,
    issuer: String,
    audience: String,
    expiry: Duration,
}

impl HmacTokenIssuer {
    pub fn new(
        secret: &[u8],
        issuer: &str,
        audience: &str,
        expiry_minutes: i64,
    ) -> Result<Self, DomainError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(DomainError::InvalidArgument(format!(
                "Token secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }
        Ok(Self {
            secret: secret.to_vec(),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            expiry: Duration::minutes(expiry_minutes),
        })
    }

    fn mac(&self) -> Result<HmacSha256, DomainError> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| DomainError::InvalidArgument(e.to_string()))
    }

    fn sign(&self, claims: &Claims) -> Result<String, DomainError> {
        let payload = serde_json::to_vec(claims)
            .map_err(|e| DomainError::InvalidArgument(e.to_string()))?;
        let payload_part = URL_SAFE_NO_PAD.encode(payload);

        let mut mac = self.mac()?;
        mac.update(payload_part.as_bytes());
        let sig_part = hex::encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", payload_part, sig_part))
    }
}

fn rejected(reason: &str) -> DomainError {
    DomainError::Unauthorized(reason.to_string())
}

impl TokenIssuer for HmacTokenIssuer {
    fn issue(&self, user: &User) -> Result<AuthToken, DomainError> {
        let issued_at = Utc::now();
        let expires_at = issued_at + self.expiry;
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        Ok(AuthToken {
            token: self.sign(&claims)?,
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
            expires_at,
        })
    }

    fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        let (payload_part, sig_part) = token
            .trim()
            .split_once('.')
            .ok_or_else(|| rejected("Malformed token"))?;

        let expected = hex::decode(sig_part).map_err(|_| rejected("Malformed token"))?;
        let mut mac = self.mac()?;
        mac.update(payload_part.as_bytes());
        mac.verify_slice(&expected)
            .map_err(|_| rejected("Invalid token signature"))?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_part)
            .map_err(|_| rejected("Malformed token"))?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| rejected("Malformed token"))?;

        if claims.iss != self.issuer || claims.aud != self.audience {
            return Err(rejected("Token was not issued for this service"));
        }
        if claims.exp <= Utc::now().timestamp() {
            return Err(rejected("Token has expired"));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::UserRole;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn issuer() -> HmacTokenIssuer {
        HmacTokenIssuer::new(SECRET, "bookstore-api", "bookstore-users", 60).unwrap()
    }

    fn user() -> User {
        User::new("reader", "reader@example.com", "password123", UserRole::Admin).unwrap()
    }

    #[test]
    fn issued_token_verifies_without_storage() {
        let issuer = issuer();
        let user = user();
        let token = issuer.issue(&user).unwrap();

        let claims = issuer.verify(&token.token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "reader@example.com");
        assert_eq!(claims.role, UserRole::Admin);
        assert!(claims.is_admin());
    }

    #[test]
    fn short_secret_is_rejected() {
        let err = HmacTokenIssuer::new(b"short", "iss", "aud", 60).err().unwrap();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }

    #[test]
    fn tampered_payload_fails_signature_check() {
        let issuer = issuer();
        let token = issuer.issue(&user()).unwrap().token;
        let (_, sig) = token.split_once('.').unwrap();

        let mut claims = issuer.verify(&token).unwrap();
        claims.role = UserRole::User;
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let forged = format!("{}.{}", forged_payload, sig);

        assert!(matches!(issuer.verify(&forged), Err(DomainError::Unauthorized(_))));
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let other = HmacTokenIssuer::new(
            b"ffffffffffffffffffffffffffffffff",
            "bookstore-api",
            "bookstore-users",
            60,
        )
        .unwrap();
        let token = other.issue(&user()).unwrap().token;

        assert!(issuer().verify(&token).is_err());
    }

    #[test]
    fn expired_and_foreign_audience_are_rejected() {
        let issuer = issuer();
        let mut claims = issuer.verify(&issuer.issue(&user()).unwrap().token).unwrap();

        claims.exp = Utc::now().timestamp() - 1;
        let expired = issuer.sign(&claims).unwrap();
        assert_eq!(
            issuer.verify(&expired),
            Err(DomainError::Unauthorized("Token has expired".to_string()))
        );

        claims.exp = Utc::now().timestamp() + 600;
        claims.aud = "someone-else".to_string();
        let foreign = issuer.sign(&claims).unwrap();
        assert!(issuer.verify(&foreign).is_err());
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(issuer().verify("not-a-token"), Err(DomainError::Unauthorized(_))));
        assert!(issuer().verify("abc.zz").is_err());
    }
}
