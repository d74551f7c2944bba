//! DID session establishment
//!
//! [`SessionAuthenticator::authenticate`] exchanges a signature challenge for
//! a [`DidSession`] bound to an account. The session is the only value
//! [`crate::store::ProfileStore::set`] accepts, and this module is the only
//! place one can be minted, so a write without a completed handshake does not
//! typecheck.

use ed25519_dalek::{Signature, VerifyingKey};
use rand::RngCore;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{FolioError, FolioResult};
use crate::identity::{Did, DidDocument, ResolverRegistry};
use crate::signer::{address_for_key, AccountId, Signer};

/// Authentication challenge presented to the signer capability
///
/// Bound to the account being authenticated; the nonce and timestamp make
/// each handshake's signing bytes unique.
#[derive(Clone, Debug, Serialize)]
pub struct Challenge {
    /// Account the session will be bound to
    pub account: AccountId,
    /// Random per-handshake nonce
    pub nonce: [u8; 32],
    /// Unix timestamp when the challenge was issued
    pub issued_at: i64,
}

impl Challenge {
    /// Build a fresh challenge for `account`
    pub fn new(account: AccountId) -> Self {
        let mut nonce = [0u8; 32];
        rand::rng().fill_bytes(&mut nonce);
        Self {
            account,
            nonce,
            issued_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Canonical bytes the signer must sign.
    ///
    /// Serialized with postcard for a stable byte representation across
    /// platforms.
    pub fn signing_bytes(&self) -> FolioResult<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|e| FolioError::Serialization(e.to_string()))
    }
}

/// The signer's answer to a [`Challenge`]
#[derive(Debug)]
pub struct ChallengeResponse {
    /// Key the signer claims controls the account
    pub verifying_key: VerifyingKey,
    /// Ed25519 signature over the challenge's signing bytes
    pub signature: Signature,
}

/// Authenticated binding between an account and a DID
///
/// Valid for the lifetime of the call chain that created it; re-derived on
/// every write rather than cached.
#[derive(Debug)]
pub struct DidSession {
    account: AccountId,
    did: Did,
    document: DidDocument,
}

impl DidSession {
    /// The account this session authenticates
    pub fn account(&self) -> &AccountId {
        &self.account
    }

    /// The DID write operations are performed as
    pub fn did(&self) -> &Did {
        &self.did
    }

    /// The resolved DID document
    pub fn document(&self) -> &DidDocument {
        &self.document
    }
}

/// Exchanges a signature challenge for a verifiable DID session
pub struct SessionAuthenticator {
    resolvers: ResolverRegistry,
}

impl SessionAuthenticator {
    /// Build an authenticator over the given resolver capability set
    pub fn new(resolvers: ResolverRegistry) -> Self {
        Self { resolvers }
    }

    /// Run the challenge/response handshake and mint a session.
    ///
    /// Steps:
    /// 1. issue a fresh challenge bound to `account`;
    /// 2. ask the signer to sign it (the signer may report
    ///    [`FolioError::UserRejected`] or [`FolioError::HandshakeTimeout`]);
    /// 3. verify the signature over the challenge bytes;
    /// 4. verify the responding key actually controls the claimed account;
    /// 5. derive the DID and resolve its document through the registry.
    ///
    /// Fails with [`FolioError::AuthenticationDenied`] on steps 3-4 and
    /// [`FolioError::ResolverError`] on step 5.
    pub async fn authenticate(
        &self,
        signer: &dyn Signer,
        account: AccountId,
    ) -> FolioResult<DidSession> {
        let challenge = Challenge::new(account.clone());
        let payload = challenge.signing_bytes()?;
        debug!(account = %account, "Requesting challenge signature");

        let response = signer.sign_challenge(&account, &payload).await?;

        response
            .verifying_key
            .verify_strict(&payload, &response.signature)
            .map_err(|_| {
                FolioError::AuthenticationDenied(
                    "challenge signature did not verify".to_string(),
                )
            })?;

        let derived = address_for_key(&response.verifying_key);
        if derived != account {
            return Err(FolioError::AuthenticationDenied(format!(
                "signing key controls {}, not {}",
                derived, account
            )));
        }

        let did = Did::from_verifying_key(&response.verifying_key);
        let document = self.resolvers.resolve(&did)?;

        info!(account = %account, did = %did, "DID session established");
        Ok(DidSession {
            account,
            did,
            document,
        })
    }
}

impl Default for SessionAuthenticator {
    fn default() -> Self {
        Self::new(ResolverRegistry::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::LocalWallet;
    use async_trait::async_trait;
    use ed25519_dalek::Signer as _;

    #[tokio::test]
    async fn test_authenticate_success() {
        let wallet = LocalWallet::generate();
        let account = wallet.address();

        let session = SessionAuthenticator::default()
            .authenticate(&wallet, account.clone())
            .await
            .unwrap();

        assert_eq!(*session.account(), account);
        assert_eq!(
            *session.did(),
            Did::from_verifying_key(&wallet.verifying_key())
        );
    }

    /// Signer that answers with a key unrelated to the claimed account
    struct ForeignKeySigner {
        wallet: LocalWallet,
    }

    #[async_trait]
    impl Signer for ForeignKeySigner {
        async fn request_accounts(&self) -> FolioResult<Vec<AccountId>> {
            Ok(vec![AccountId::new("0xsomeoneelse")])
        }

        async fn sign_challenge(
            &self,
            _account: &AccountId,
            payload: &[u8],
        ) -> FolioResult<ChallengeResponse> {
            self.wallet.sign_challenge(&self.wallet.address(), payload).await
        }
    }

    #[tokio::test]
    async fn test_wrong_account_binding_denied() {
        let signer = ForeignKeySigner {
            wallet: LocalWallet::generate(),
        };

        let err = SessionAuthenticator::default()
            .authenticate(&signer, AccountId::new("0xsomeoneelse"))
            .await
            .unwrap_err();
        assert!(matches!(err, FolioError::AuthenticationDenied(_)));
    }

    /// Signer that returns a signature over the wrong bytes
    struct BadSignatureSigner {
        wallet: LocalWallet,
    }

    #[async_trait]
    impl Signer for BadSignatureSigner {
        async fn request_accounts(&self) -> FolioResult<Vec<AccountId>> {
            Ok(vec![self.wallet.address()])
        }

        async fn sign_challenge(
            &self,
            _account: &AccountId,
            _payload: &[u8],
        ) -> FolioResult<ChallengeResponse> {
            let signing_key = ed25519_dalek::SigningKey::from_bytes(&[9u8; 32]);
            Ok(ChallengeResponse {
                verifying_key: self.wallet.verifying_key(),
                signature: signing_key.sign(b"unrelated bytes"),
            })
        }
    }

    #[tokio::test]
    async fn test_invalid_signature_denied() {
        let signer = BadSignatureSigner {
            wallet: LocalWallet::generate(),
        };
        let account = signer.wallet.address();

        let err = SessionAuthenticator::default()
            .authenticate(&signer, account)
            .await
            .unwrap_err();
        assert!(matches!(err, FolioError::AuthenticationDenied(_)));
    }

    #[tokio::test]
    async fn test_empty_registry_resolver_error() {
        let wallet = LocalWallet::generate();
        let account = wallet.address();

        let authenticator = SessionAuthenticator::new(ResolverRegistry::empty());
        let err = authenticator.authenticate(&wallet, account).await.unwrap_err();
        assert!(matches!(err, FolioError::ResolverError(_)));
    }

    #[test]
    fn test_challenge_bytes_unique_per_handshake() {
        let account = AccountId::new("0xabc");
        let a = Challenge::new(account.clone()).signing_bytes().unwrap();
        let b = Challenge::new(account).signing_bytes().unwrap();
        assert_ne!(a, b);
    }
}
