//! Identity module: DIDs, resolution, and session authentication
//!
//! A [`Did`] here is self-certifying: the identifier encodes the Ed25519
//! verifying key itself (`did:folio:z{base58(pubkey)}`), so resolving a DID
//! to its document is a pure decode with no registry lookup.
//!
//! [`SessionAuthenticator`] is the single point where write authority is
//! established. It runs a challenge/response handshake against a signer
//! capability, checks that the responding key controls the claimed account,
//! resolves the derived DID, and mints a [`DidSession`]. Nothing else in the
//! crate can construct a session, which makes "authenticate before set"
//! structural.

mod did;
mod resolver;
mod session;

// Re-export public types
pub use did::Did;
pub use resolver::{DidDocument, FolioResolver, MethodResolver, ResolverRegistry};
pub use session::{Challenge, ChallengeResponse, DidSession, SessionAuthenticator};
