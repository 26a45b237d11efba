//! Alias use-case service.
//!
//! # Responsibility
//! - Enforce the alias naming rule before persistence.
//! - Verify the owning agent exists before writing.
//!
//! # Invariants
//! - Alias names may repeat, but a repeated name must carry a persona.
//! - `add` requires an unset id, `update` requires a set id.

use crate::model::alias::Alias;
use crate::model::{is_blank, EntityId};
use crate::repo::alias_repo::AliasRepository;
use crate::repo::RepoResult;
use crate::result::{ResultType, ServiceResult, Violations};
use crate::service::log_outcome;
use std::time::Instant;

const ENTITY: &str = "alias";

pub const NULL_MESSAGE: &str = "alias cannot be null";
pub const NAME_REQUIRED_MESSAGE: &str = "name is required";
pub const PERSONA_REQUIRED_MESSAGE: &str = "persona is required if name is duplicated.";
pub const AGENT_REQUIRED_MESSAGE: &str = "agentId is required";
pub const ID_SET_ON_ADD_MESSAGE: &str = "aliasId cannot be set for `add` operation";
pub const ID_UNSET_ON_UPDATE_MESSAGE: &str = "aliasId must be set for `update` operation";
const NOT_SAVED_MESSAGE: &str = "alias could not be saved";

/// Alias service facade over repository implementations.
pub struct AliasService<R: AliasRepository> {
    repo: R,
}

impl<R: AliasRepository> AliasService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn find_all(&self) -> RepoResult<Vec<Alias>> {
        self.repo.find_all()
    }

    pub fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Alias>> {
        self.repo.find_by_id(id)
    }

    pub fn find_by_agent_id(&self, agent_id: EntityId) -> RepoResult<Vec<Alias>> {
        self.repo.find_by_agent_id(agent_id)
    }

    pub fn add(&self, alias: Option<Alias>) -> RepoResult<ServiceResult<Alias>> {
        let started_at = Instant::now();
        let Some(alias) = alias else {
            return Ok(log_outcome(
                ENTITY,
                "add",
                started_at,
                ServiceResult::invalid(NULL_MESSAGE),
            ));
        };

        // Id rules are checked before any storage lookup.
        if alias.alias_id != 0 {
            return Ok(log_outcome(
                ENTITY,
                "add",
                started_at,
                ServiceResult::invalid(ID_SET_ON_ADD_MESSAGE),
            ));
        }

        let violations = self.validate(&alias)?;
        if !violations.is_empty() {
            return Ok(log_outcome(ENTITY, "add", started_at, violations.into_result()));
        }

        let result = match self.repo.add(&alias)? {
            Some(saved) => ServiceResult::success(saved),
            None => ServiceResult::invalid(NOT_SAVED_MESSAGE),
        };
        Ok(log_outcome(ENTITY, "add", started_at, result))
    }

    pub fn update(&self, alias: Option<Alias>) -> RepoResult<ServiceResult<Alias>> {
        let started_at = Instant::now();
        let Some(alias) = alias else {
            return Ok(log_outcome(
                ENTITY,
                "update",
                started_at,
                ServiceResult::invalid(NULL_MESSAGE),
            ));
        };

        if alias.alias_id <= 0 {
            return Ok(log_outcome(
                ENTITY,
                "update",
                started_at,
                ServiceResult::invalid(ID_UNSET_ON_UPDATE_MESSAGE),
            ));
        }

        let violations = self.validate(&alias)?;
        if !violations.is_empty() {
            return Ok(log_outcome(
                ENTITY,
                "update",
                started_at,
                violations.into_result(),
            ));
        }

        let result = if self.repo.update(&alias)? {
            ServiceResult::success(alias)
        } else {
            ServiceResult::not_found(format!("aliasId: {}, not found", alias.alias_id))
        };
        Ok(log_outcome(ENTITY, "update", started_at, result))
    }

    pub fn delete_by_id(&self, id: EntityId) -> RepoResult<ServiceResult<Alias>> {
        let started_at = Instant::now();
        let result = self.repo.delete_by_id(id)?;
        Ok(log_outcome(ENTITY, "delete", started_at, result))
    }

    fn validate(&self, alias: &Alias) -> RepoResult<Violations> {
        let mut violations = Violations::new();

        if is_blank(Some(alias.name.as_str())) {
            violations.push(ResultType::Invalid, NAME_REQUIRED_MESSAGE);
        } else if is_blank(alias.persona.as_deref()) && self.is_duplicate(alias)? {
            violations.push(ResultType::Invalid, PERSONA_REQUIRED_MESSAGE);
        }

        if alias.agent_id <= 0 {
            violations.push(ResultType::Invalid, AGENT_REQUIRED_MESSAGE);
        } else if !self.repo.agent_exists(alias.agent_id)? {
            violations.push(
                ResultType::NotFound,
                format!("agentId: {}, not found", alias.agent_id),
            );
        }

        Ok(violations)
    }

    fn is_duplicate(&self, alias: &Alias) -> RepoResult<bool> {
        Ok(self
            .repo
            .find_all()?
            .iter()
            .any(|existing| existing.alias_id != alias.alias_id && existing.name == alias.name))
    }
}
