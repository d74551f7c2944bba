//! Profile controller: the read/write flows and their state machine
//!
//! Owns the single [`ProfileState`] the presentation layer renders from and
//! orchestrates address acquisition, session authentication (writes only),
//! and the profile store. Flows are independently retriable; no retries,
//! timeouts, or cross-flow serialization happen here.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::FolioResult;
use crate::identity::SessionAuthenticator;
use crate::profile::{Profile, BASIC_PROFILE_KEY};
use crate::signer::{AddressProvider, Signer};
use crate::store::{DocumentIndex, ProfileStore};

/// Outcome severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// User-visible notification emitted by the flows (toast-equivalent)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    /// Success notification with no description
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            severity: Severity::Success,
        }
    }

    /// Error notification carrying the failure's description
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Error,
        }
    }
}

/// Sink for flow outcome notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Read-flow phase of the controller
///
/// Local edits are orthogonal: they are permitted in every phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// View projection of the last successful read and the user's pending edits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileState {
    pub name: String,
    pub image: String,
    pub has_loaded: bool,
}

/// Orchestrates the read and update flows over a signer, authenticator,
/// and profile store
pub struct ProfileController<I> {
    signer: Arc<dyn Signer>,
    store: ProfileStore<I>,
    authenticator: SessionAuthenticator,
    notifier: Arc<dyn Notifier>,
    state: ProfileState,
    phase: LoadPhase,
    read_failed: bool,
}

impl<I: DocumentIndex> ProfileController<I> {
    /// Build a controller over a signer capability, an index, and a
    /// notification sink
    pub fn new(signer: Arc<dyn Signer>, index: I, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            signer,
            store: ProfileStore::new(index),
            authenticator: SessionAuthenticator::default(),
            notifier,
            state: ProfileState::default(),
            phase: LoadPhase::Idle,
            read_failed: false,
        }
    }

    /// Override the chain namespace used in identity references
    pub fn with_chain_namespace(mut self, chain_namespace: impl Into<String>) -> Self {
        self.store = self.store.with_chain_namespace(chain_namespace);
        self
    }

    /// Override the session authenticator (e.g. a custom resolver set)
    pub fn with_authenticator(mut self, authenticator: SessionAuthenticator) -> Self {
        self.authenticator = authenticator;
        self
    }

    /// The UI-facing state
    pub fn state(&self) -> &ProfileState {
        &self.state
    }

    /// Current read-flow phase
    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    /// Local edit; permitted in any phase
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.state.name = name.into();
    }

    /// Local edit; permitted in any phase
    pub fn set_image(&mut self, image: impl Into<String>) {
        self.state.image = image.into();
    }

    /// True when the UI should show its "no profile" message: a read
    /// completed cleanly, nothing was stored, and the user has typed
    /// nothing. A failed read never presents as "no profile".
    pub fn shows_no_profile(&self) -> bool {
        self.state.has_loaded
            && self.state.name.is_empty()
            && self.state.image.is_empty()
            && !self.read_failed
    }

    /// Read flow: connect, then fetch the profile document.
    ///
    /// A present document merges only its present fields into the state, so
    /// pending edits in the other field survive the read. Absent leaves the
    /// state untouched. Either way the phase becomes `Loaded`. On failure an
    /// error notification is emitted, the phase becomes `Failed`, and
    /// `has_loaded` is still set.
    pub async fn read_profile(&mut self) -> FolioResult<()> {
        self.phase = LoadPhase::Loading;

        match self.fetch_profile().await {
            Ok(Some(profile)) => {
                if let Some(name) = profile.name {
                    self.state.name = name;
                }
                if let Some(avatar_url) = profile.avatar_url {
                    self.state.image = avatar_url;
                }
                self.finish_read(false);
                info!("Profile read complete");
                Ok(())
            }
            Ok(None) => {
                self.finish_read(false);
                info!("Profile read complete, nothing stored");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Profile read failed");
                self.notifier
                    .notify(Notification::error("Error occurred:", err.to_string()));
                self.finish_read(true);
                Err(err)
            }
        }
    }

    /// Update flow: connect, authenticate a fresh DID session, then write
    /// the current in-memory name/image.
    ///
    /// Emits a success or error notification; never touches the read phase
    /// or `has_loaded`.
    pub async fn update_profile(&mut self) -> FolioResult<()> {
        match self.push_profile().await {
            Ok(()) => {
                info!("Profile updated");
                self.notifier.notify(Notification::success("Profile updated!"));
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Profile update failed");
                self.notifier
                    .notify(Notification::error("Error occurred:", err.to_string()));
                Err(err)
            }
        }
    }

    async fn fetch_profile(&self) -> FolioResult<Option<Profile>> {
        let account = AddressProvider::connect(self.signer.as_ref()).await?;
        let identity_ref = account.identity_ref(self.store.chain_namespace());
        self.store.get(BASIC_PROFILE_KEY, &identity_ref).await
    }

    async fn push_profile(&self) -> FolioResult<()> {
        let account = AddressProvider::connect(self.signer.as_ref()).await?;
        let session = self
            .authenticator
            .authenticate(self.signer.as_ref(), account)
            .await?;

        let profile = Profile {
            name: non_empty(&self.state.name),
            avatar_url: non_empty(&self.state.image),
        };
        self.store.set(BASIC_PROFILE_KEY, &profile, &session).await
    }

    fn finish_read(&mut self, failed: bool) {
        // hasLoaded flips on every read attempt, success or failure
        self.state.has_loaded = true;
        self.read_failed = failed;
        self.phase = if failed {
            LoadPhase::Failed
        } else {
            LoadPhase::Loaded
        };
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
