//! # Credential Module
//!
//! Opaque secrets supplied by users and the salted hashes stored in their
//! place. A [`Credential`] never prints its contents and is wiped on drop.

use crate::error::{CoreError, CoreResult};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// A secret supplied by a user (password, PIN).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn expose(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl From<&str> for Credential {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Salted SHA-256 digest of a credential, encoded as
/// `sha256$<salt hex>$<digest hex>`.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash {
    salt: [u8; SALT_LEN],
    digest: [u8; 32],
}

impl CredentialHash {
    /// Hash a credential with a fresh random salt
    pub fn derive(credential: &Credential) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::with_salt(credential, salt)
    }

    fn with_salt(credential: &Credential, salt: [u8; SALT_LEN]) -> Self {
        Self {
            salt,
            digest: Self::digest(&salt, credential),
        }
    }

    fn digest(salt: &[u8], credential: &Credential) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(credential.expose());
        hasher.finalize().into()
    }

    /// Constant-time check of a candidate credential against this hash
    pub fn verify(&self, candidate: &Credential) -> bool {
        let computed = Self::digest(&self.salt, candidate);
        computed[..].ct_eq(&self.digest[..]).into()
    }

    /// Parse the stored `sha256$salt$digest` form
    pub fn parse(encoded: &str) -> CoreResult<Self> {
        let mut parts = encoded.split('$');
        let (Some(SCHEME), Some(salt_hex), Some(digest_hex), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(CoreError::MalformedCredentialHash);
        };

        let mut salt = [0u8; SALT_LEN];
        let mut digest = [0u8; 32];
        hex::decode_to_slice(salt_hex, &mut salt)
            .map_err(|_| CoreError::MalformedCredentialHash)?;
        hex::decode_to_slice(digest_hex, &mut digest)
            .map_err(|_| CoreError::MalformedCredentialHash)?;

        Ok(Self { salt, digest })
    }

    /// Encoded form written to storage
    pub fn encode(&self) -> String {
        format!(
            "{}${}${}",
            SCHEME,
            hex::encode(self.salt),
            hex::encode(self.digest)
        )
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(***)")
    }
}
