//! Core domain logic for the field agent backend.
//! This crate owns the validation and persistence rules for agents, aliases
//! and security clearances; transports sit outside it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod result;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::agency::{Agency, AgencyAgent};
pub use model::agent::Agent;
pub use model::alias::Alias;
pub use model::security_clearance::SecurityClearance;
pub use model::EntityId;
pub use repo::agency_repo::{
    AgencyAgentRepository, AgencyRepository, SqliteAgencyAgentRepository, SqliteAgencyRepository,
};
pub use repo::agent_repo::{AgentRepository, SqliteAgentRepository};
pub use repo::alias_repo::{AliasRepository, SqliteAliasRepository};
pub use repo::security_clearance_repo::{
    SecurityClearanceRepository, SqliteSecurityClearanceRepository,
};
pub use repo::{RepoError, RepoResult};
pub use result::{ResultType, ServiceResult, Violations};
pub use service::agent_service::AgentService;
pub use service::alias_service::AliasService;
pub use service::security_clearance_service::SecurityClearanceService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
