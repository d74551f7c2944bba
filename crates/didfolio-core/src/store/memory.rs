//! In-process document index
//!
//! Backs tests and doubles. With a visibility lag configured, a write only
//! becomes readable after N subsequent reads, which models the index's
//! eventual consistency for round-trip-with-poll tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{FolioError, FolioResult};
use crate::identity::Did;
use crate::store::DocumentIndex;

struct PendingWrite {
    remaining: u32,
    key: String,
    identity_ref: String,
    did: Did,
    document: serde_json::Value,
}

#[derive(Default)]
struct MemoryState {
    /// identity_ref -> owning DID
    links: HashMap<String, Did>,
    /// (did string, key) -> document
    documents: HashMap<(String, String), serde_json::Value>,
    pending: Vec<PendingWrite>,
}

/// In-memory [`DocumentIndex`] with optional eventual-consistency lag
pub struct MemoryIndex {
    state: Mutex<MemoryState>,
    visibility_lag: u32,
}

impl MemoryIndex {
    /// Index where writes are immediately visible
    pub fn new() -> Self {
        Self::with_visibility_lag(0)
    }

    /// Index where a write becomes visible only after `lag` subsequent reads
    pub fn with_visibility_lag(lag: u32) -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            visibility_lag: lag,
        }
    }

    fn apply(state: &mut MemoryState, write: PendingWrite) {
        state
            .links
            .insert(write.identity_ref, write.did.clone());
        state
            .documents
            .insert((write.did.as_str().to_string(), write.key), write.document);
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentIndex for MemoryIndex {
    async fn get(
        &self,
        key: &str,
        identity_ref: &str,
    ) -> FolioResult<Option<serde_json::Value>> {
        let mut state = self.state.lock();

        // Each read advances pending writes one step toward visibility
        for write in &mut state.pending {
            write.remaining = write.remaining.saturating_sub(1);
        }
        let ready: Vec<PendingWrite> = {
            let (ready, waiting) = state
                .pending
                .drain(..)
                .partition(|write| write.remaining == 0);
            state.pending = waiting;
            ready
        };
        for write in ready {
            Self::apply(&mut state, write);
        }

        let Some(did) = state.links.get(identity_ref) else {
            return Ok(None);
        };
        let document = state
            .documents
            .get(&(did.as_str().to_string(), key.to_string()))
            .cloned();
        Ok(document)
    }

    async fn set(
        &self,
        key: &str,
        document: serde_json::Value,
        did: &Did,
        identity_ref: &str,
    ) -> FolioResult<()> {
        let mut state = self.state.lock();

        if let Some(owner) = state.links.get(identity_ref) {
            if owner != did {
                return Err(FolioError::Unauthorized(format!(
                    "{} is owned by {}",
                    identity_ref, owner
                )));
            }
        }

        let write = PendingWrite {
            remaining: self.visibility_lag,
            key: key.to_string(),
            identity_ref: identity_ref.to_string(),
            did: did.clone(),
            document,
        };
        if write.remaining == 0 {
            MemoryIndex::apply(&mut state, write);
        } else {
            state.pending.push(write);
        }
        Ok(())
    }
}
