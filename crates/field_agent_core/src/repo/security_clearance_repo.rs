//! Security clearance repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `security_clearance` table.
//! - Own the reference check against `agency_agent` before deletion.
//!
//! # Invariants
//! - `name` is unique at storage level; violations surface as
//!   `RepoError::UniqueViolation`.
//! - A clearance referenced by any `agency_agent` row is never deleted.

use crate::model::security_clearance::SecurityClearance;
use crate::model::EntityId;
use crate::repo::{
    count_references, ensure_connection_ready, is_foreign_key_violation, is_unique_violation,
    RepoError, RepoResult, TableShape,
};
use crate::result::ServiceResult;
use rusqlite::{params, Connection, Row};

const SECURITY_CLEARANCE_SELECT_SQL: &str = "SELECT
    security_clearance_id,
    name
FROM security_clearance";

const REQUIRED_SHAPES: &[TableShape] = &[
    ("security_clearance", &["security_clearance_id", "name"]),
    ("agency_agent", &["security_clearance_id"]),
];

pub const NOT_FOUND_MESSAGE: &str = "securityClearance not found.";
pub const IN_USE_MESSAGE: &str = "Cannot delete security clearance that is in use.";

/// Repository interface for security clearances.
pub trait SecurityClearanceRepository {
    fn find_all(&self) -> RepoResult<Vec<SecurityClearance>>;
    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<SecurityClearance>>;
    /// Inserts and returns the clearance with its generated id, or `None`
    /// when nothing was written.
    fn add(&self, clearance: &SecurityClearance) -> RepoResult<Option<SecurityClearance>>;
    /// Returns `true` iff exactly one row was overwritten.
    fn update(&self, clearance: &SecurityClearance) -> RepoResult<bool>;
    /// Three-way delete: `NotFound`, `Invalid` (in use) or `Success`.
    fn delete_by_id(&self, id: EntityId) -> RepoResult<ServiceResult<SecurityClearance>>;
}

/// SQLite-backed security clearance repository.
pub struct SqliteSecurityClearanceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSecurityClearanceRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_SHAPES)?;
        Ok(Self { conn })
    }
}

impl SecurityClearanceRepository for SqliteSecurityClearanceRepository<'_> {
    fn find_all(&self) -> RepoResult<Vec<SecurityClearance>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SECURITY_CLEARANCE_SELECT_SQL} ORDER BY security_clearance_id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut clearances = Vec::new();
        while let Some(row) = rows.next()? {
            clearances.push(map_security_clearance(row)?);
        }
        Ok(clearances)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<SecurityClearance>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SECURITY_CLEARANCE_SELECT_SQL} WHERE security_clearance_id = ?1;"
        ))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(map_security_clearance(row)?));
        }
        Ok(None)
    }

    fn add(&self, clearance: &SecurityClearance) -> RepoResult<Option<SecurityClearance>> {
        let changed = self
            .conn
            .execute(
                "INSERT INTO security_clearance (name) VALUES (?1);",
                [clearance.name.as_str()],
            )
            .map_err(unique_name_error)?;

        if changed == 0 {
            return Ok(None);
        }

        Ok(Some(SecurityClearance {
            security_clearance_id: self.conn.last_insert_rowid(),
            name: clearance.name.clone(),
        }))
    }

    fn update(&self, clearance: &SecurityClearance) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE security_clearance
                 SET name = ?1
                 WHERE security_clearance_id = ?2;",
                params![clearance.name.as_str(), clearance.security_clearance_id],
            )
            .map_err(unique_name_error)?;
        Ok(changed == 1)
    }

    fn delete_by_id(&self, id: EntityId) -> RepoResult<ServiceResult<SecurityClearance>> {
        if self.find_by_id(id)?.is_none() {
            return Ok(ServiceResult::not_found(NOT_FOUND_MESSAGE));
        }

        if count_references(self.conn, "agency_agent", "security_clearance_id", id)? > 0 {
            return Ok(ServiceResult::invalid(IN_USE_MESSAGE));
        }

        // A membership inserted after the count still trips the foreign key.
        let changed = match self.conn.execute(
            "DELETE FROM security_clearance WHERE security_clearance_id = ?1;",
            [id],
        ) {
            Ok(changed) => changed,
            Err(err) if is_foreign_key_violation(&err) => {
                return Ok(ServiceResult::invalid(IN_USE_MESSAGE));
            }
            Err(err) => return Err(err.into()),
        };

        if changed == 0 {
            return Ok(ServiceResult::not_found(NOT_FOUND_MESSAGE));
        }
        Ok(ServiceResult::success_empty())
    }
}

fn map_security_clearance(row: &Row<'_>) -> RepoResult<SecurityClearance> {
    Ok(SecurityClearance {
        security_clearance_id: row.get("security_clearance_id")?,
        name: row.get("name")?,
    })
}

fn unique_name_error(err: rusqlite::Error) -> RepoError {
    if is_unique_violation(&err) {
        RepoError::UniqueViolation {
            table: "security_clearance",
            column: "name",
        }
    } else {
        err.into()
    }
}
