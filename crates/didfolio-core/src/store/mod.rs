//! Profile storage against a content-addressed document index
//!
//! [`DocumentIndex`] is the remote get/set contract; the index itself
//! (transport, content addressing, anchoring) is an external collaborator.
//! [`ProfileStore`] layers the profile shape contract and the session
//! requirement on top of whichever index implementation it is given.
//!
//! The index is eventually consistent: a `set` immediately followed by a
//! `get` may or may not observe the update.

mod http;
mod memory;
mod redb_index;

pub use http::{HttpIndex, DEFAULT_ENDPOINT};
pub use memory::MemoryIndex;
pub use redb_index::RedbIndex;

use async_trait::async_trait;
use tracing::debug;

use crate::error::FolioResult;
use crate::identity::{Did, DidSession};
use crate::profile::Profile;
use crate::signer::DEFAULT_CHAIN_NAMESPACE;

/// Get/set contract of the document index service
///
/// Documents are untyped JSON maps keyed by a well-known key name plus either
/// an identity reference (reads) or the writer's DID (writes).
#[async_trait]
pub trait DocumentIndex: Send + Sync {
    /// Read the document at `key` for `identity_ref`; `None` if nothing is
    /// stored yet. Reads are public and require no authentication.
    async fn get(
        &self,
        key: &str,
        identity_ref: &str,
    ) -> FolioResult<Option<serde_json::Value>>;

    /// Write/overwrite the document at `key` under `did`, linking
    /// `identity_ref` to the DID for public reads. Fails with
    /// [`crate::FolioError::Unauthorized`] if `identity_ref` is already
    /// owned by a different DID.
    async fn set(
        &self,
        key: &str,
        document: serde_json::Value,
        did: &Did,
        identity_ref: &str,
    ) -> FolioResult<()>;
}

#[async_trait]
impl<I: DocumentIndex + ?Sized> DocumentIndex for std::sync::Arc<I> {
    async fn get(
        &self,
        key: &str,
        identity_ref: &str,
    ) -> FolioResult<Option<serde_json::Value>> {
        (**self).get(key, identity_ref).await
    }

    async fn set(
        &self,
        key: &str,
        document: serde_json::Value,
        did: &Did,
        identity_ref: &str,
    ) -> FolioResult<()> {
        (**self).set(key, document, did, identity_ref).await
    }
}

/// Keyed profile read/write scoped to a DID
pub struct ProfileStore<I> {
    index: I,
    chain_namespace: String,
}

impl<I: DocumentIndex> ProfileStore<I> {
    /// Build a store over an index, using the default chain namespace
    pub fn new(index: I) -> Self {
        Self {
            index,
            chain_namespace: DEFAULT_CHAIN_NAMESPACE.to_string(),
        }
    }

    /// Override the chain namespace used in identity references
    pub fn with_chain_namespace(mut self, chain_namespace: impl Into<String>) -> Self {
        self.chain_namespace = chain_namespace.into();
        self
    }

    /// The chain namespace identity references are rendered with
    pub fn chain_namespace(&self) -> &str {
        &self.chain_namespace
    }

    /// The underlying index
    pub fn index(&self) -> &I {
        &self.index
    }

    /// Public read of the document at `key` for an identity reference.
    ///
    /// Absence is `Ok(None)`, not an error. A stored document that does not
    /// conform to the profile shape is
    /// [`crate::FolioError::MalformedDocument`].
    pub async fn get(&self, key: &str, identity_ref: &str) -> FolioResult<Option<Profile>> {
        match self.index.get(key, identity_ref).await? {
            Some(value) => {
                let profile = Profile::from_document(&value)?;
                debug!(key, identity_ref, "Fetched profile document");
                Ok(Some(profile))
            }
            None => {
                debug!(key, identity_ref, "No document stored");
                Ok(None)
            }
        }
    }

    /// Write the profile at `key` under the session's DID.
    ///
    /// Requires a live [`DidSession`]; only
    /// [`crate::identity::SessionAuthenticator`] can mint one, so a set
    /// without a prior successful handshake does not typecheck.
    pub async fn set(&self, key: &str, profile: &Profile, session: &DidSession) -> FolioResult<()> {
        let identity_ref = session.account().identity_ref(&self.chain_namespace);
        debug!(key, did = %session.did(), "Writing profile document");
        self.index
            .set(key, profile.to_document(), session.did(), &identity_ref)
            .await
    }
}
