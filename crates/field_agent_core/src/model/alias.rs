//! Alias domain model.
//!
//! An alias is a cover name owned by exactly one agent. Names may repeat
//! across aliases as long as the repeat carries a persona.

use super::EntityId;
use serde::{Deserialize, Serialize};

/// Cover identity used by an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alias {
    pub alias_id: EntityId,
    pub name: String,
    /// Disambiguates aliases sharing a name.
    #[serde(default)]
    pub persona: Option<String>,
    /// Owning agent; must reference an existing `agent` row.
    pub agent_id: EntityId,
}

impl Alias {
    /// Creates an unsaved alias without persona.
    pub fn new(name: impl Into<String>, agent_id: EntityId) -> Self {
        Self {
            alias_id: 0,
            name: name.into(),
            persona: None,
            agent_id,
        }
    }

    /// Returns a copy carrying `persona`.
    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = Some(persona.into());
        self
    }
}
