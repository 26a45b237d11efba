//! Agent repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `agent` table.
//! - Remove an agent's dependent rows together with the agent.
//!
//! # Invariants
//! - `delete_by_id` removes aliases, agency memberships and the agent in one
//!   immediate transaction; either all three go or none do.

use crate::model::agent::Agent;
use crate::model::EntityId;
use crate::repo::{ensure_connection_ready, RepoResult, TableShape};
use crate::result::ServiceResult;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const AGENT_SELECT_SQL: &str = "SELECT
    agent_id,
    first_name,
    middle_name,
    last_name,
    dob,
    height_in_inches
FROM agent";

const REQUIRED_SHAPES: &[TableShape] = &[
    (
        "agent",
        &[
            "agent_id",
            "first_name",
            "middle_name",
            "last_name",
            "dob",
            "height_in_inches",
        ],
    ),
    ("alias", &["agent_id"]),
    ("agency_agent", &["agent_id"]),
];

pub const NOT_FOUND_MESSAGE: &str = "agent not found.";

/// Repository interface for agents.
pub trait AgentRepository {
    fn find_all(&self) -> RepoResult<Vec<Agent>>;
    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Agent>>;
    fn add(&self, agent: &Agent) -> RepoResult<Option<Agent>>;
    fn update(&self, agent: &Agent) -> RepoResult<bool>;
    /// Cascading delete; `NotFound` when the agent does not exist.
    fn delete_by_id(&self, id: EntityId) -> RepoResult<ServiceResult<Agent>>;
}

/// SQLite-backed agent repository.
pub struct SqliteAgentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAgentRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_SHAPES)?;
        Ok(Self { conn })
    }
}

impl AgentRepository for SqliteAgentRepository<'_> {
    fn find_all(&self) -> RepoResult<Vec<Agent>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AGENT_SELECT_SQL} ORDER BY agent_id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut agents = Vec::new();
        while let Some(row) = rows.next()? {
            agents.push(map_agent(row)?);
        }
        Ok(agents)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Agent>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AGENT_SELECT_SQL} WHERE agent_id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(map_agent(row)?));
        }
        Ok(None)
    }

    fn add(&self, agent: &Agent) -> RepoResult<Option<Agent>> {
        let changed = self.conn.execute(
            "INSERT INTO agent (
                first_name,
                middle_name,
                last_name,
                dob,
                height_in_inches
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                agent.first_name.as_str(),
                agent.middle_name.as_deref(),
                agent.last_name.as_str(),
                agent.dob.as_deref(),
                agent.height_in_inches,
            ],
        )?;

        if changed == 0 {
            return Ok(None);
        }

        Ok(Some(Agent {
            agent_id: self.conn.last_insert_rowid(),
            ..agent.clone()
        }))
    }

    fn update(&self, agent: &Agent) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE agent
             SET
                first_name = ?1,
                middle_name = ?2,
                last_name = ?3,
                dob = ?4,
                height_in_inches = ?5
             WHERE agent_id = ?6;",
            params![
                agent.first_name.as_str(),
                agent.middle_name.as_deref(),
                agent.last_name.as_str(),
                agent.dob.as_deref(),
                agent.height_in_inches,
                agent.agent_id,
            ],
        )?;
        Ok(changed == 1)
    }

    fn delete_by_id(&self, id: EntityId) -> RepoResult<ServiceResult<Agent>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM alias WHERE agent_id = ?1;", [id])?;
        tx.execute("DELETE FROM agency_agent WHERE agent_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM agent WHERE agent_id = ?1;", [id])?;

        if changed == 0 {
            // Dropping `tx` rolls back; nothing was there to remove anyway.
            return Ok(ServiceResult::not_found(NOT_FOUND_MESSAGE));
        }

        tx.commit()?;
        Ok(ServiceResult::success_empty())
    }
}

fn map_agent(row: &Row<'_>) -> RepoResult<Agent> {
    Ok(Agent {
        agent_id: row.get("agent_id")?,
        first_name: row.get("first_name")?,
        middle_name: row.get("middle_name")?,
        last_name: row.get("last_name")?,
        dob: row.get("dob")?,
        height_in_inches: row.get("height_in_inches")?,
    })
}
