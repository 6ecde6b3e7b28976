use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use crate::error::AuthError;

pub const DEFAULT_ITERATIONS: u32 = 600_000;
pub const SALT_LENGTH: usize = 16;
pub const HASH_LENGTH: usize = 32;

const SCHEME: &str = "pbkdf2-sha256";

/// Salted PBKDF2-HMAC-SHA256 password hashing.
///
/// Encoded form: `pbkdf2-sha256$<iterations>$<salt>$<hash>` with unpadded
/// base64 salt and hash. The iteration count travels with the hash, so
/// changing it only affects newly hashed passwords.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    pub fn hash(&self, password: &str) -> String {
        let salt = generate_salt();
        let hash = derive(password, &salt, self.iterations);
        format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            STANDARD_NO_PAD.encode(salt),
            STANDARD_NO_PAD.encode(hash)
        )
    }

    /// Check `password` against an encoded hash.
    pub fn verify(&self, password: &str, encoded: &str) -> Result<bool, AuthError> {
        let mut parts = encoded.split('$');
        let (Some(SCHEME), Some(iterations), Some(salt), Some(expected), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(AuthError::MalformedHash);
        };

        let iterations: u32 = iterations.parse().map_err(|_| AuthError::MalformedHash)?;
        let salt = STANDARD_NO_PAD
            .decode(salt)
            .map_err(|_| AuthError::MalformedHash)?;
        let expected = STANDARD_NO_PAD
            .decode(expected)
            .map_err(|_| AuthError::MalformedHash)?;
        if iterations == 0 || expected.len() != HASH_LENGTH {
            return Err(AuthError::MalformedHash);
        }

        let actual = derive(password, &salt, iterations);
        Ok(constant_time_eq(&actual, &expected))
    }
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LENGTH] {
    let mut out = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

fn generate_salt() -> [u8; SALT_LENGTH] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
