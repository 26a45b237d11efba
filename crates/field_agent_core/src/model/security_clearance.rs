//! Security clearance domain model.

use super::EntityId;
use serde::{Deserialize, Serialize};

/// Named clearance level an agency membership is granted under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityClearance {
    pub security_clearance_id: EntityId,
    /// Unique across all clearances.
    pub name: String,
}

impl SecurityClearance {
    /// Creates an unsaved clearance (`security_clearance_id == 0`).
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(0, name)
    }

    pub fn with_id(security_clearance_id: EntityId, name: impl Into<String>) -> Self {
        Self {
            security_clearance_id,
            name: name.into(),
        }
    }
}
