use crate::errors::DomainError;
use rand::RngCore;
use sha2::Sha256;
use std::fmt;
use subtle::ConstantTimeEq;

const SCHEME: &str = "pbkdf2-sha256";
const DIGEST_LEN: usize = 32;
const SALT_LEN: usize = 16;
const DEFAULT_ITERATIONS: u32 = 10_000;

/// Salted PBKDF2-HMAC-SHA256 password digest.
///
/// Encoded as `pbkdf2-sha256$<iterations>$<salt hex>$<digest hex>`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    iterations: u32,
    salt: Vec<u8>,
    digest: Vec<u8>,
}

impl PasswordHash {
    pub fn generate(password: &str) -> Self {
        let mut salt = vec![0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = derive(password, &salt, DEFAULT_ITERATIONS);
        Self {
            iterations: DEFAULT_ITERATIONS,
            salt,
            digest,
        }
    }

    pub fn parse(encoded: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::RepositoryError("Malformed password hash".to_string());

        let mut parts = encoded.split('$');
        if parts.next() != Some(SCHEME) {
            return Err(invalid());
        }
        let iterations = parts
            .next()
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|value| *value > 0)
            .ok_or_else(invalid)?;
        let salt = parts
            .next()
            .and_then(|value| hex::decode(value).ok())
            .ok_or_else(invalid)?;
        let digest = parts
            .next()
            .and_then(|value| hex::decode(value).ok())
            .ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            iterations,
            salt,
            digest,
        })
    }

    pub fn encode(&self) -> String {
        format!(
            "{}${}${}${}",
            SCHEME,
            self.iterations,
            hex::encode(&self.salt),
            hex::encode(&self.digest)
        )
    }

    pub fn verify(&self, password: &str) -> bool {
        let candidate = derive(password, &self.salt, self.iterations);
        candidate.ct_eq(&self.digest).into()
    }

    /// Burns the same amount of work as a real verification. Used when the
    /// account does not exist so both failure paths cost the same.
    pub fn verify_dummy(password: &str) -> bool {
        let _ = derive(password, &[0u8; SALT_LEN], DEFAULT_ITERATIONS);
        false
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHash")
            .field("iterations", &self.iterations)
            .finish_non_exhaustive()
    }
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> Vec<u8> {
    let mut digest = vec![0u8; DIGEST_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut digest);
    digest
}
