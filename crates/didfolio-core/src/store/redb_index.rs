//! Persistent local document index over redb
//!
//! Lets the CLI exercise the full pipeline without a remote index service.
//! Two tables: identity links (identity_ref -> DID) and documents
//! (`{did}/{key}` -> JSON bytes). Owner-may-write is enforced on the link:
//! an identity ref stays bound to the first DID that wrote under it.

use std::path::Path;

use async_trait::async_trait;
use redb::{Database, ReadableTable, TableDefinition};

use crate::error::{FolioError, FolioResult};
use crate::identity::Did;
use crate::store::DocumentIndex;

/// identity_ref -> DID string
const LINKS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("identity_links");
/// "{did}/{key}" -> serialized JSON document
const DOCUMENTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("documents");

/// Local persistent [`DocumentIndex`]
pub struct RedbIndex {
    db: Database,
}

impl RedbIndex {
    /// Create or open the index database at `path`
    pub fn new(path: impl AsRef<Path>) -> FolioResult<Self> {
        let db = Database::create(path.as_ref())?;
        Ok(Self { db })
    }

    fn document_key(did: &str, key: &str) -> String {
        format!("{}/{}", did, key)
    }
}

#[async_trait]
impl DocumentIndex for RedbIndex {
    async fn get(
        &self,
        key: &str,
        identity_ref: &str,
    ) -> FolioResult<Option<serde_json::Value>> {
        let read_txn = self.db.begin_read()?;

        // Before any write has committed, the tables do not exist yet
        let links = match read_txn.open_table(LINKS_TABLE) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let Some(did) = links.get(identity_ref)? else {
            return Ok(None);
        };
        let document_key = Self::document_key(did.value(), key);

        let documents = match read_txn.open_table(DOCUMENTS_TABLE) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match documents.get(document_key.as_str())? {
            Some(bytes) => {
                let value: serde_json::Value = serde_json::from_slice(bytes.value())
                    .map_err(|e| FolioError::Serialization(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        key: &str,
        document: serde_json::Value,
        did: &Did,
        identity_ref: &str,
    ) -> FolioResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut links = write_txn.open_table(LINKS_TABLE)?;
            if let Some(owner) = links.get(identity_ref)? {
                if owner.value() != did.as_str() {
                    return Err(FolioError::Unauthorized(format!(
                        "{} is owned by {}",
                        identity_ref,
                        owner.value()
                    )));
                }
            }
            links.insert(identity_ref, did.as_str())?;

            let mut documents = write_txn.open_table(DOCUMENTS_TABLE)?;
            let bytes = serde_json::to_vec(&document)
                .map_err(|e| FolioError::Serialization(e.to_string()))?;
            documents.insert(
                Self::document_key(did.as_str(), key).as_str(),
                bytes.as_slice(),
            )?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
