//! Alias repository contract and SQLite implementation.
//!
//! # Invariants
//! - `alias.agent_id` always references an existing agent (foreign key).
//! - Alias names are not unique at storage level; the persona rule lives in
//!   `AliasService`.

use crate::model::alias::Alias;
use crate::model::EntityId;
use crate::repo::{ensure_connection_ready, RepoResult, TableShape};
use crate::result::ServiceResult;
use rusqlite::{params, Connection, Row};

const ALIAS_SELECT_SQL: &str = "SELECT
    alias_id,
    name,
    persona,
    agent_id
FROM alias";

const REQUIRED_SHAPES: &[TableShape] = &[
    ("alias", &["alias_id", "name", "persona", "agent_id"]),
    ("agent", &["agent_id"]),
];

pub const NOT_FOUND_MESSAGE: &str = "alias not found.";

/// Repository interface for aliases.
pub trait AliasRepository {
    fn find_all(&self) -> RepoResult<Vec<Alias>>;
    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Alias>>;
    fn find_by_agent_id(&self, agent_id: EntityId) -> RepoResult<Vec<Alias>>;
    fn add(&self, alias: &Alias) -> RepoResult<Option<Alias>>;
    fn update(&self, alias: &Alias) -> RepoResult<bool>;
    /// Nothing references an alias, so the outcome is `NotFound` or `Success`.
    fn delete_by_id(&self, id: EntityId) -> RepoResult<ServiceResult<Alias>>;
    fn agent_exists(&self, agent_id: EntityId) -> RepoResult<bool>;
}

/// SQLite-backed alias repository.
pub struct SqliteAliasRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAliasRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_SHAPES)?;
        Ok(Self { conn })
    }

    fn query_aliases(&self, sql: &str, id: Option<EntityId>) -> RepoResult<Vec<Alias>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = match id {
            Some(id) => stmt.query([id])?,
            None => stmt.query([])?,
        };
        let mut aliases = Vec::new();
        while let Some(row) = rows.next()? {
            aliases.push(map_alias(row)?);
        }
        Ok(aliases)
    }
}

impl AliasRepository for SqliteAliasRepository<'_> {
    fn find_all(&self) -> RepoResult<Vec<Alias>> {
        self.query_aliases(&format!("{ALIAS_SELECT_SQL} ORDER BY alias_id ASC;"), None)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Alias>> {
        let aliases =
            self.query_aliases(&format!("{ALIAS_SELECT_SQL} WHERE alias_id = ?1;"), Some(id))?;
        Ok(aliases.into_iter().next())
    }

    fn find_by_agent_id(&self, agent_id: EntityId) -> RepoResult<Vec<Alias>> {
        self.query_aliases(
            &format!("{ALIAS_SELECT_SQL} WHERE agent_id = ?1 ORDER BY alias_id ASC;"),
            Some(agent_id),
        )
    }

    fn add(&self, alias: &Alias) -> RepoResult<Option<Alias>> {
        let changed = self.conn.execute(
            "INSERT INTO alias (name, persona, agent_id) VALUES (?1, ?2, ?3);",
            params![alias.name.as_str(), alias.persona.as_deref(), alias.agent_id],
        )?;

        if changed == 0 {
            return Ok(None);
        }

        Ok(Some(Alias {
            alias_id: self.conn.last_insert_rowid(),
            ..alias.clone()
        }))
    }

    fn update(&self, alias: &Alias) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE alias
             SET
                name = ?1,
                persona = ?2,
                agent_id = ?3
             WHERE alias_id = ?4;",
            params![
                alias.name.as_str(),
                alias.persona.as_deref(),
                alias.agent_id,
                alias.alias_id,
            ],
        )?;
        Ok(changed == 1)
    }

    fn delete_by_id(&self, id: EntityId) -> RepoResult<ServiceResult<Alias>> {
        let changed = self
            .conn
            .execute("DELETE FROM alias WHERE alias_id = ?1;", [id])?;
        if changed == 0 {
            return Ok(ServiceResult::not_found(NOT_FOUND_MESSAGE));
        }
        Ok(ServiceResult::success_empty())
    }

    fn agent_exists(&self, agent_id: EntityId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM agent WHERE agent_id = ?1);",
            [agent_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn map_alias(row: &Row<'_>) -> RepoResult<Alias> {
    Ok(Alias {
        alias_id: row.get("alias_id")?,
        name: row.get("name")?,
        persona: row.get("persona")?,
        agent_id: row.get("agent_id")?,
    })
}
