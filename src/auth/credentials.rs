//! Credential hashing and comparison
//!
//! Secrets are stored as Argon2id PHC strings
//! (`$argon2id$v=19$m=..,t=..,p=..$<salt>$<hash>`). Verification rebuilds the
//! hasher from the parameters stored in the string, so accounts hashed under an
//! older work factor keep verifying after the configured one changes.

use crate::config::HashingConfig;
use crate::error::{AuthError, StoreError};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use subtle::ConstantTimeEq;

/// Placeholder used when the looked-up identifier does not exist
const DUMMY_SECRET: &str = "rax-auth-server/unknown-identifier";

/// Salts longer than this are not produced by us and are refused
const MAX_SALT_BYTES: usize = 64;

/// Hashes new secrets and checks supplied secrets against stored hashes.
///
/// Holds a dummy credential hashed with the configured work factor so that
/// checking an unknown identifier costs the same as checking a known one.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl CredentialHasher {
    pub fn new(config: &HashingConfig) -> Result<Self, AuthError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| AuthError::Hashing(format!("invalid Argon2 parameters: {e}")))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy_hash = hash_with(&argon2, DUMMY_SECRET)?;

        Ok(Self { argon2, dummy_hash })
    }

    /// Hash a secret with a fresh random salt. Returns a PHC string.
    pub fn hash_secret(&self, secret: &str) -> Result<String, AuthError> {
        hash_with(&self.argon2, secret)
    }

    /// Check `secret` against a stored PHC string in constant time.
    ///
    /// A stored value that cannot be parsed or reproduced is reported as a
    /// malformed record for `identifier`.
    pub fn matches(&self, identifier: &str, secret: &str, stored: &str) -> Result<bool, StoreError> {
        let malformed = |reason: String| StoreError::MalformedRecord {
            identifier: identifier.to_string(),
            reason,
        };

        let parsed = PasswordHash::new(stored).map_err(|e| malformed(e.to_string()))?;
        let algorithm = Algorithm::try_from(parsed.algorithm).map_err(|e| malformed(e.to_string()))?;
        let version = match parsed.version {
            Some(v) => Version::try_from(v).map_err(|e| malformed(e.to_string()))?,
            None => Version::default(),
        };
        let params = Params::try_from(&parsed).map_err(|e| malformed(e.to_string()))?;
        let salt = parsed
            .salt
            .ok_or_else(|| malformed("missing salt".to_string()))?;
        let expected = parsed
            .hash
            .ok_or_else(|| malformed("missing hash output".to_string()))?;

        let mut salt_buf = [0u8; MAX_SALT_BYTES];
        let salt_bytes = salt
            .decode_b64(&mut salt_buf)
            .map_err(|e| malformed(e.to_string()))?;

        let mut computed = vec![0u8; expected.len()];
        Argon2::new(algorithm, version, params)
            .hash_password_into(secret.as_bytes(), salt_bytes, &mut computed)
            .map_err(|e| malformed(e.to_string()))?;

        Ok(computed.as_slice().ct_eq(expected.as_bytes()).into())
    }

    /// Spend the same work as a real comparison and discard the result.
    pub fn burn(&self, secret: &str) {
        let _ = self.matches("", secret, &self.dummy_hash);
    }
}

fn hash_with(argon2: &Argon2<'_>, secret: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(format!("failed to hash secret: {e}")))
}
