//! Agency and agency membership models.
//!
//! # Invariants
//! - An `AgencyAgent` row is keyed by `(agency_id, agent_id)`.
//! - `AgencyAgent::security_clearance_id` pins the referenced clearance; a
//!   clearance with any membership row cannot be deleted.

use super::EntityId;
use serde::{Deserialize, Serialize};

/// Employing agency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agency {
    pub agency_id: EntityId,
    pub short_name: String,
    pub long_name: String,
}

impl Agency {
    pub fn new(short_name: impl Into<String>, long_name: impl Into<String>) -> Self {
        Self {
            agency_id: 0,
            short_name: short_name.into(),
            long_name: long_name.into(),
        }
    }
}

/// Membership of an agent in an agency under a security clearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyAgent {
    pub agency_id: EntityId,
    pub agent_id: EntityId,
    /// Agency-internal badge identifier.
    pub identifier: String,
    pub security_clearance_id: EntityId,
    /// Calendar date in `YYYY-MM-DD` form.
    pub activation_date: String,
    pub is_active: bool,
}
