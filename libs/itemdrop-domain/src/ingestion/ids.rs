use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a persisted Item
///
/// Assigned by the structured store on insert, never generated locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Create an ItemId from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID value
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ItemId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ItemId> for Uuid {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

/// Random file-name component for an uploaded image
///
/// Backed by a v4 UUID and rendered in its 32-character hex form, so two
/// uploads from the same user never share a path in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageToken(Uuid);

impl ImageToken {
    /// Generate a new random token
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}
