//! didfolio Core Library
//!
//! Authentication-to-storage pipeline for decentralized profiles: prove
//! control of an account with a signature handshake, derive a DID session
//! from the proof, and read/write a `basicProfile` document in a
//! content-addressed document index.
//!
//! ## Overview
//!
//! - **Address acquisition**: a [`Signer`] capability hands out an
//!   [`AccountId`]; reads look the profile up by the public identity
//!   reference `<address>@<chainNamespace>`.
//! - **Session establishment**: [`SessionAuthenticator`] runs a
//!   challenge/response handshake and mints a [`DidSession`], the only
//!   value that authorizes a write.
//! - **Document storage**: [`ProfileStore`] speaks the [`DocumentIndex`]
//!   get/set contract (in-memory, local redb, or remote HTTP) and validates
//!   document shape at the boundary.
//! - **Orchestration**: [`ProfileController`] runs the read and update flows
//!   and owns the state a UI renders from.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use didfolio_core::{LocalWallet, MemoryIndex, ProfileController};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let wallet = Arc::new(LocalWallet::generate());
//!     let mut controller = ProfileController::new(wallet, MemoryIndex::new(), notifier);
//!
//!     controller.set_name("Ada");
//!     controller.update_profile().await?;
//!     controller.read_profile().await?;
//!
//!     println!("{}", controller.state().name);
//!     Ok(())
//! }
//! ```

pub mod controller;
pub mod error;
pub mod identity;
pub mod profile;
pub mod signer;
pub mod store;

// Re-exports
pub use controller::{
    LoadPhase, Notification, Notifier, ProfileController, ProfileState, Severity,
};
pub use error::{FolioError, FolioResult};
pub use identity::{
    Challenge, ChallengeResponse, Did, DidDocument, DidSession, FolioResolver, MethodResolver,
    ResolverRegistry, SessionAuthenticator,
};
pub use profile::{Profile, BASIC_PROFILE_KEY};
pub use signer::{
    address_for_key, AccountId, AddressProvider, LocalWallet, Signer, DEFAULT_CHAIN_NAMESPACE,
};
pub use store::{
    DocumentIndex, HttpIndex, MemoryIndex, ProfileStore, RedbIndex, DEFAULT_ENDPOINT,
};
