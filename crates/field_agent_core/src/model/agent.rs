//! Field agent domain model.

use super::EntityId;
use serde::{Deserialize, Serialize};

/// Person record for a field agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub agent_id: EntityId,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub last_name: String,
    /// Calendar date in `YYYY-MM-DD` form.
    #[serde(default)]
    pub dob: Option<String>,
    pub height_in_inches: i32,
}

impl Agent {
    /// Creates an unsaved agent with only the required fields set.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        height_in_inches: i32,
    ) -> Self {
        Self {
            agent_id: 0,
            first_name: first_name.into(),
            middle_name: None,
            last_name: last_name.into(),
            dob: None,
            height_in_inches,
        }
    }
}
