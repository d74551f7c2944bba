//! DID resolution
//!
//! A [`ResolverRegistry`] is a capability set keyed by DID method name,
//! supplied to the session authenticator. The built-in [`FolioResolver`]
//! handles `did:folio` by decoding the identifier back to its Ed25519
//! verifying key.

use std::collections::HashMap;

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};

use crate::error::{FolioError, FolioResult};
use crate::identity::Did;

/// Resolved DID document describing the identity's verification key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidDocument {
    /// The DID this document describes
    pub id: Did,
    /// Raw Ed25519 verification key bytes
    pub verification_key: [u8; 32],
}

impl DidDocument {
    /// Parse the verification key back into a dalek key
    pub fn verifying_key(&self) -> FolioResult<VerifyingKey> {
        VerifyingKey::from_bytes(&self.verification_key).map_err(|e| {
            FolioError::ResolverError(format!("document carries an invalid key: {}", e))
        })
    }
}

/// Resolver for a single DID method
pub trait MethodResolver: Send + Sync {
    /// The method name this resolver handles (e.g. "folio")
    fn method(&self) -> &'static str;

    /// Resolve a DID of this method to its document
    fn resolve(&self, did: &Did) -> FolioResult<DidDocument>;
}

/// Resolver for the self-certifying `did:folio` method
pub struct FolioResolver;

impl MethodResolver for FolioResolver {
    fn method(&self) -> &'static str {
        "folio"
    }

    fn resolve(&self, did: &Did) -> FolioResult<DidDocument> {
        let bytes = bs58::decode(did.identifier())
            .into_vec()
            .map_err(|e| FolioError::ResolverError(format!("identifier is not base58: {}", e)))?;

        let key_bytes: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            FolioError::ResolverError(format!(
                "identifier decodes to {} bytes, expected 32",
                bytes.len()
            ))
        })?;

        // Reject identifiers that are not valid curve points
        VerifyingKey::from_bytes(&key_bytes).map_err(|e| {
            FolioError::ResolverError(format!("identifier is not a valid Ed25519 key: {}", e))
        })?;

        Ok(DidDocument {
            id: did.clone(),
            verification_key: key_bytes,
        })
    }
}

/// Capability set of method resolvers, keyed by DID method name
pub struct ResolverRegistry {
    resolvers: HashMap<&'static str, Box<dyn MethodResolver>>,
}

impl ResolverRegistry {
    /// Registry with the built-in `folio` resolver registered
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(FolioResolver));
        registry
    }

    /// Registry with no resolvers (register your own methods)
    pub fn empty() -> Self {
        Self {
            resolvers: HashMap::new(),
        }
    }

    /// Register a resolver under its method name, replacing any existing one
    pub fn register(&mut self, resolver: Box<dyn MethodResolver>) {
        self.resolvers.insert(resolver.method(), resolver);
    }

    /// Resolve a DID by dispatching on its method name
    pub fn resolve(&self, did: &Did) -> FolioResult<DidDocument> {
        let resolver = self.resolvers.get(did.method()).ok_or_else(|| {
            FolioError::ResolverError(format!("no resolver for method '{}'", did.method()))
        })?;
        resolver.resolve(did)
    }
}

impl Default for ResolverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
