//! Profile document type
//!
//! The index stores untyped JSON maps; this crate imposes the
//! `{name, avatarUrl}` shape contract only on the `basicProfile` key, at the
//! store boundary.

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, FolioResult};

/// Well-known document key for the basic profile
pub const BASIC_PROFILE_KEY: &str = "basicProfile";

/// Basic profile document: display name and avatar, both absent-capable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Avatar image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Profile {
    /// True if neither field is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.avatar_url.is_none()
    }

    /// Validate an untyped index document into a profile.
    ///
    /// Unknown keys are ignored (the index map is untyped); a non-object
    /// document or a present-but-wrongly-typed field is
    /// [`FolioError::MalformedDocument`].
    pub fn from_document(value: &serde_json::Value) -> FolioResult<Self> {
        if !value.is_object() {
            return Err(FolioError::MalformedDocument(
                "profile document is not an object".to_string(),
            ));
        }
        serde_json::from_value(value.clone())
            .map_err(|e| FolioError::MalformedDocument(e.to_string()))
    }

    /// Render this profile as an index document, emitting only present fields
    pub fn to_document(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("Profile serialization should never fail")
    }
}
