//! Agency and agency membership repositories.
//!
//! # Responsibility
//! - Persist agencies.
//! - Persist the `agency_agent` rows that pin agents and clearances.
//!
//! # Invariants
//! - Membership rows reference existing agency, agent and clearance rows;
//!   the foreign keys reject anything else.

use crate::model::agency::{Agency, AgencyAgent};
use crate::model::EntityId;
use crate::repo::{ensure_connection_ready, int_to_bool, RepoResult, TableShape};
use rusqlite::{params, Connection, Row};

const AGENCY_SELECT_SQL: &str = "SELECT
    agency_id,
    short_name,
    long_name
FROM agency";

const AGENCY_AGENT_SELECT_SQL: &str = "SELECT
    agency_id,
    agent_id,
    identifier,
    security_clearance_id,
    activation_date,
    is_active
FROM agency_agent";

const AGENCY_SHAPES: &[TableShape] = &[("agency", &["agency_id", "short_name", "long_name"])];

const AGENCY_AGENT_SHAPES: &[TableShape] = &[(
    "agency_agent",
    &[
        "agency_id",
        "agent_id",
        "identifier",
        "security_clearance_id",
        "activation_date",
        "is_active",
    ],
)];

/// Repository interface for agencies.
pub trait AgencyRepository {
    fn find_all(&self) -> RepoResult<Vec<Agency>>;
    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Agency>>;
    fn add(&self, agency: &Agency) -> RepoResult<Option<Agency>>;
}

/// Repository interface for agency memberships.
pub trait AgencyAgentRepository {
    /// Inserts one membership; `false` when nothing was written.
    fn add(&self, agency_agent: &AgencyAgent) -> RepoResult<bool>;
    fn find_by_agency_id(&self, agency_id: EntityId) -> RepoResult<Vec<AgencyAgent>>;
    /// Removes the membership keyed by `(agency_id, agent_id)`.
    fn delete_by_key(&self, agency_id: EntityId, agent_id: EntityId) -> RepoResult<bool>;
}

/// SQLite-backed agency repository.
pub struct SqliteAgencyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAgencyRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, AGENCY_SHAPES)?;
        Ok(Self { conn })
    }
}

impl AgencyRepository for SqliteAgencyRepository<'_> {
    fn find_all(&self) -> RepoResult<Vec<Agency>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AGENCY_SELECT_SQL} ORDER BY agency_id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut agencies = Vec::new();
        while let Some(row) = rows.next()? {
            agencies.push(map_agency(row)?);
        }
        Ok(agencies)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Agency>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AGENCY_SELECT_SQL} WHERE agency_id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(map_agency(row)?));
        }
        Ok(None)
    }

    fn add(&self, agency: &Agency) -> RepoResult<Option<Agency>> {
        let changed = self.conn.execute(
            "INSERT INTO agency (short_name, long_name) VALUES (?1, ?2);",
            params![agency.short_name.as_str(), agency.long_name.as_str()],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        Ok(Some(Agency {
            agency_id: self.conn.last_insert_rowid(),
            ..agency.clone()
        }))
    }
}

/// SQLite-backed agency membership repository.
pub struct SqliteAgencyAgentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAgencyAgentRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, AGENCY_AGENT_SHAPES)?;
        Ok(Self { conn })
    }
}

impl AgencyAgentRepository for SqliteAgencyAgentRepository<'_> {
    fn add(&self, agency_agent: &AgencyAgent) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "INSERT INTO agency_agent (
                agency_id,
                agent_id,
                identifier,
                security_clearance_id,
                activation_date,
                is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                agency_agent.agency_id,
                agency_agent.agent_id,
                agency_agent.identifier.as_str(),
                agency_agent.security_clearance_id,
                agency_agent.activation_date.as_str(),
                agency_agent.is_active,
            ],
        )?;
        Ok(changed == 1)
    }

    fn find_by_agency_id(&self, agency_id: EntityId) -> RepoResult<Vec<AgencyAgent>> {
        let mut stmt = self.conn.prepare(&format!(
            "{AGENCY_AGENT_SELECT_SQL} WHERE agency_id = ?1 ORDER BY agent_id ASC;"
        ))?;
        let mut rows = stmt.query([agency_id])?;
        let mut members = Vec::new();
        while let Some(row) = rows.next()? {
            members.push(map_agency_agent(row)?);
        }
        Ok(members)
    }

    fn delete_by_key(&self, agency_id: EntityId, agent_id: EntityId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM agency_agent WHERE agency_id = ?1 AND agent_id = ?2;",
            [agency_id, agent_id],
        )?;
        Ok(changed == 1)
    }
}

fn map_agency(row: &Row<'_>) -> RepoResult<Agency> {
    Ok(Agency {
        agency_id: row.get("agency_id")?,
        short_name: row.get("short_name")?,
        long_name: row.get("long_name")?,
    })
}

fn map_agency_agent(row: &Row<'_>) -> RepoResult<AgencyAgent> {
    Ok(AgencyAgent {
        agency_id: row.get("agency_id")?,
        agent_id: row.get("agent_id")?,
        identifier: row.get("identifier")?,
        security_clearance_id: row.get("security_clearance_id")?,
        activation_date: row.get("activation_date")?,
        is_active: int_to_bool(row.get("is_active")?, "agency_agent.is_active")?,
    })
}
