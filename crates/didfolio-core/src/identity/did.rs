//! Decentralized Identifier (DID) implementation
//!
//! Format: `did:folio:z{base58-ed25519-pubkey}`
//!
//! The identifier encodes the Ed25519 verifying key directly, which makes
//! the DID self-certifying: anyone holding the DID can recover the key that
//! controls it without a registry lookup.

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FolioError;

/// Decentralized Identifier for didfolio identities
///
/// Format: `did:<method>:z{base58}` where the built-in `folio` method encodes
/// the raw Ed25519 verifying key (32 bytes) as the identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Did(String);

impl Did {
    /// Derive the DID controlled by an Ed25519 verifying key
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let encoded = bs58::encode(key.as_bytes()).into_string();
        Did(format!("did:folio:z{}", encoded))
    }

    /// Get the DID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The DID method name (the part between the colons)
    pub fn method(&self) -> &str {
        // Format was validated at construction; split is always 3 parts
        self.0.split(':').nth(1).unwrap_or("")
    }

    /// The identifier part (after the method and the 'z' multibase prefix)
    pub fn identifier(&self) -> &str {
        self.0
            .rsplit(':')
            .next()
            .and_then(|part| part.strip_prefix('z'))
            .unwrap_or("")
    }

    /// Validate the format of a DID string without constructing one
    fn validate_format(did_str: &str) -> Result<(), FolioError> {
        let parts: Vec<&str> = did_str.split(':').collect();

        if parts.len() != 3 {
            return Err(FolioError::InvalidDidFormat(
                "DID must have 3 parts separated by ':'".to_string(),
            ));
        }

        if parts[0] != "did" {
            return Err(FolioError::InvalidDidFormat(
                "DID must start with 'did:'".to_string(),
            ));
        }

        if parts[1].is_empty() || !parts[1].chars().all(|c| c.is_ascii_lowercase()) {
            return Err(FolioError::InvalidDidFormat(
                "DID method must be lowercase ASCII".to_string(),
            ));
        }

        if !parts[2].starts_with('z') {
            return Err(FolioError::InvalidDidFormat(
                "DID identifier must start with 'z' (multibase prefix)".to_string(),
            ));
        }

        let identifier = &parts[2][1..];
        if identifier.is_empty() {
            return Err(FolioError::InvalidDidFormat(
                "DID identifier cannot be empty".to_string(),
            ));
        }

        bs58::decode(identifier).into_vec().map_err(|_| {
            FolioError::InvalidDidFormat("Invalid base58 encoding in DID identifier".to_string())
        })?;

        Ok(())
    }

    /// Parse a DID from a string
    pub fn parse(did_str: &str) -> Result<Self, FolioError> {
        Self::validate_format(did_str)?;
        Ok(Did(did_str.to_string()))
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Did {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Did {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
