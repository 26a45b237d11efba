//! Agent use-case service.
//!
//! # Invariants
//! - First and last name are required; agents may share names.
//! - `dob`, when present, is a `YYYY-MM-DD` calendar date.
//! - `height_in_inches` stays within `36..=96`.

use crate::model::agent::Agent;
use crate::model::{is_blank, EntityId};
use crate::repo::agent_repo::AgentRepository;
use crate::repo::RepoResult;
use crate::result::{ServiceResult, Violations};
use crate::service::log_outcome;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::RangeInclusive;
use std::time::Instant;

const ENTITY: &str = "agent";

static DOB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").expect("valid dob regex")
});

pub const HEIGHT_RANGE: RangeInclusive<i32> = 36..=96;

pub const NULL_MESSAGE: &str = "agent cannot be null";
pub const FIRST_NAME_REQUIRED_MESSAGE: &str = "firstName is required";
pub const LAST_NAME_REQUIRED_MESSAGE: &str = "lastName is required";
pub const DOB_FORMAT_MESSAGE: &str = "dob must use YYYY-MM-DD format";
pub const HEIGHT_RANGE_MESSAGE: &str = "heightInInches must be between 36 and 96";
pub const ID_SET_ON_ADD_MESSAGE: &str = "agentId cannot be set for `add` operation";
pub const ID_UNSET_ON_UPDATE_MESSAGE: &str = "agentId must be set for `update` operation";
const NOT_SAVED_MESSAGE: &str = "agent could not be saved";

/// Agent service facade over repository implementations.
pub struct AgentService<R: AgentRepository> {
    repo: R,
}

impl<R: AgentRepository> AgentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn find_all(&self) -> RepoResult<Vec<Agent>> {
        self.repo.find_all()
    }

    pub fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Agent>> {
        self.repo.find_by_id(id)
    }

    pub fn add(&self, agent: Option<Agent>) -> RepoResult<ServiceResult<Agent>> {
        let started_at = Instant::now();
        let Some(agent) = agent else {
            return Ok(log_outcome(
                ENTITY,
                "add",
                started_at,
                ServiceResult::invalid(NULL_MESSAGE),
            ));
        };

        let mut violations = validate(&agent);
        if agent.agent_id != 0 {
            violations = violations.invalid(ID_SET_ON_ADD_MESSAGE);
        }
        if !violations.is_empty() {
            return Ok(log_outcome(ENTITY, "add", started_at, violations.into_result()));
        }

        let result = match self.repo.add(&agent)? {
            Some(saved) => ServiceResult::success(saved),
            None => ServiceResult::invalid(NOT_SAVED_MESSAGE),
        };
        Ok(log_outcome(ENTITY, "add", started_at, result))
    }

    pub fn update(&self, agent: Option<Agent>) -> RepoResult<ServiceResult<Agent>> {
        let started_at = Instant::now();
        let Some(agent) = agent else {
            return Ok(log_outcome(
                ENTITY,
                "update",
                started_at,
                ServiceResult::invalid(NULL_MESSAGE),
            ));
        };

        let mut violations = validate(&agent);
        if agent.agent_id <= 0 {
            violations = violations.invalid(ID_UNSET_ON_UPDATE_MESSAGE);
        }
        if !violations.is_empty() {
            return Ok(log_outcome(
                ENTITY,
                "update",
                started_at,
                violations.into_result(),
            ));
        }

        let result = if self.repo.update(&agent)? {
            ServiceResult::success(agent)
        } else {
            ServiceResult::not_found(format!("agentId: {}, not found", agent.agent_id))
        };
        Ok(log_outcome(ENTITY, "update", started_at, result))
    }

    /// Deletes the agent together with its aliases and agency memberships.
    pub fn delete_by_id(&self, id: EntityId) -> RepoResult<ServiceResult<Agent>> {
        let started_at = Instant::now();
        let result = self.repo.delete_by_id(id)?;
        Ok(log_outcome(ENTITY, "delete", started_at, result))
    }
}

fn validate(agent: &Agent) -> Violations {
    let mut violations = Violations::new();
    if is_blank(Some(agent.first_name.as_str())) {
        violations = violations.invalid(FIRST_NAME_REQUIRED_MESSAGE);
    }
    if is_blank(Some(agent.last_name.as_str())) {
        violations = violations.invalid(LAST_NAME_REQUIRED_MESSAGE);
    }
    if let Some(dob) = agent.dob.as_deref() {
        if !DOB_RE.is_match(dob) {
            violations = violations.invalid(DOB_FORMAT_MESSAGE);
        }
    }
    if !HEIGHT_RANGE.contains(&agent.height_in_inches) {
        violations = violations.invalid(HEIGHT_RANGE_MESSAGE);
    }
    violations
}
