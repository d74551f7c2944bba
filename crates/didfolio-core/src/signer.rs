//! Signer capability and address acquisition
//!
//! The signer is an opaque external capability: it holds keys, prompts its
//! user for consent, and signs authentication challenges. This module defines
//! the [`Signer`] trait consumed by the rest of the crate, the
//! [`AddressProvider`] that turns an account request into a single
//! [`AccountId`], and [`LocalWallet`], an Ed25519 signer backed by a key file
//! so the CLI works without a browser wallet.

use std::path::Path;

use async_trait::async_trait;
use ed25519_dalek::{Signer as _, SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FolioError, FolioResult};
use crate::identity::ChallengeResponse;

/// Chain namespace used for identity references when none is configured
pub const DEFAULT_CHAIN_NAMESPACE: &str = "eip155:1";

/// Opaque identifier for a blockchain account
///
/// Obtained fresh per flow invocation; never persisted as an ownership claim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Wrap an account address string
    pub fn new(address: impl Into<String>) -> Self {
        AccountId(address.into())
    }

    /// Get the account address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the public lookup key for this account on the given chain
    /// namespace, e.g. `0xabc...@eip155:1`
    pub fn identity_ref(&self, chain_namespace: &str) -> String {
        format!("{}@{}", self.0, chain_namespace)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External signer capability
///
/// Implementations may prompt an external party for consent; both operations
/// are suspension points with no timeout enforced by this crate.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Request account access; the accounts are returned in preference order
    async fn request_accounts(&self) -> FolioResult<Vec<AccountId>>;

    /// Sign an authentication challenge payload on behalf of `account`
    async fn sign_challenge(
        &self,
        account: &AccountId,
        payload: &[u8],
    ) -> FolioResult<ChallengeResponse>;
}

/// Acquires an account identifier from a signer capability
pub struct AddressProvider;

impl AddressProvider {
    /// Request accounts from the signer and return the first one.
    ///
    /// Idempotent per call; nothing is cached. Fails with
    /// [`FolioError::SignerUnavailable`] if the signer reports no accounts,
    /// or propagates [`FolioError::UserRejected`] if the external party
    /// declines the request.
    pub async fn connect(signer: &dyn Signer) -> FolioResult<AccountId> {
        let accounts = signer.request_accounts().await?;
        let account = accounts.into_iter().next().ok_or_else(|| {
            FolioError::SignerUnavailable("signer returned no accounts".to_string())
        })?;
        debug!(account = %account, "Connected account");
        Ok(account)
    }
}

/// Derive the account address controlled by an Ed25519 verifying key.
///
/// Format: `0x` + hex of the trailing 20 bytes of the BLAKE3 key hash,
/// so addresses look and compare like familiar chain addresses while being
/// recomputable from a challenge response during authentication.
pub fn address_for_key(key: &VerifyingKey) -> AccountId {
    let hash = blake3::hash(key.as_bytes());
    AccountId::new(format!("0x{}", hex::encode(&hash.as_bytes()[12..])))
}

/// Ed25519 signer backed by a local key file
///
/// Stands in for an injected wallet in the CLI and in tests: it manages a
/// single account and signs any challenge for it without prompting.
pub struct LocalWallet {
    signing_key: SigningKey,
}

impl LocalWallet {
    /// Generate a wallet with a fresh random key
    pub fn generate() -> Self {
        // Use getrandom directly to avoid rand version conflicts
        let mut seed = [0u8; 32];
        getrandom::getrandom(&mut seed).expect("Failed to get random bytes");
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Build a wallet from a 32-byte seed
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Load the wallet key from `path`, generating and persisting a new one
    /// if the file does not exist yet.
    pub fn load_or_generate(path: impl AsRef<Path>) -> FolioResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            let bytes = std::fs::read(path)?;
            let seed: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
                FolioError::Serialization(format!(
                    "wallet key file {} is not 32 bytes",
                    path.display()
                ))
            })?;
            Ok(Self::from_seed(&seed))
        } else {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let wallet = Self::generate();
            std::fs::write(path, wallet.signing_key.to_bytes())?;
            debug!(path = %path.display(), "Generated new wallet key");
            Ok(wallet)
        }
    }

    /// The single account this wallet controls
    pub fn address(&self) -> AccountId {
        address_for_key(&self.signing_key.verifying_key())
    }

    /// The wallet's Ed25519 verifying key
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }
}

#[async_trait]
impl Signer for LocalWallet {
    async fn request_accounts(&self) -> FolioResult<Vec<AccountId>> {
        Ok(vec![self.address()])
    }

    async fn sign_challenge(
        &self,
        account: &AccountId,
        payload: &[u8],
    ) -> FolioResult<ChallengeResponse> {
        if *account != self.address() {
            return Err(FolioError::UserRejected(format!(
                "account {} is not managed by this wallet",
                account
            )));
        }
        let signature = self.signing_key.sign(payload);
        Ok(ChallengeResponse {
            verifying_key: self.signing_key.verifying_key(),
            signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_ref_format() {
        let account = AccountId::new("0xabc123");
        assert_eq!(account.identity_ref("eip155:1"), "0xabc123@eip155:1");
    }

    #[test]
    fn test_address_format() {
        let wallet = LocalWallet::generate();
        let address = wallet.address();
        assert!(address.as_str().starts_with("0x"));
        // 20 bytes of hex after the prefix
        assert_eq!(address.as_str().len(), 2 + 40);
    }

    #[test]
    fn test_address_deterministic() {
        let seed = [7u8; 32];
        let a = LocalWallet::from_seed(&seed).address();
        let b = LocalWallet::from_seed(&seed).address();
        assert_eq!(a, b);
    }

    #[test]
    fn test_load_or_generate_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.key");

        let first = LocalWallet::load_or_generate(&path).unwrap();
        let second = LocalWallet::load_or_generate(&path).unwrap();
        assert_eq!(first.address(), second.address());
    }

    #[tokio::test]
    async fn test_connect_returns_first_account() {
        let wallet = LocalWallet::generate();
        let account = AddressProvider::connect(&wallet).await.unwrap();
        assert_eq!(account, wallet.address());
    }

    #[tokio::test]
    async fn test_sign_challenge_for_foreign_account_rejected() {
        let wallet = LocalWallet::generate();
        let other = AccountId::new("0xdeadbeef");
        let err = wallet.sign_challenge(&other, b"payload").await.unwrap_err();
        assert!(matches!(err, FolioError::UserRejected(_)));
    }
}
