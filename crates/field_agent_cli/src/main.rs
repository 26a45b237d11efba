//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `field_agent_core` linkage against the configured database.
//! - Print deterministic `key=value` lines for quick local sanity checks.

use field_agent_core::db::open_db;
use field_agent_core::{
    AgentRepository, AliasRepository, CoreConfig, SecurityClearanceRepository,
    SqliteAgentRepository, SqliteAliasRepository, SqliteSecurityClearanceRepository,
};
use log::error;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("field_agent_cli error={err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    // An optional first argument points at a JSON config file.
    let config = match std::env::args().nth(1) {
        Some(path) => CoreConfig::from_file(path)?,
        None => CoreConfig::from_env()?,
    };
    config.init_logging()?;

    println!("field_agent_core ping={}", field_agent_core::ping());
    println!("field_agent_core version={}", field_agent_core::core_version());
    println!("db_path={}", config.db_path.display());

    let conn = open_db(&config.db_path)?;
    let clearances = SqliteSecurityClearanceRepository::try_new(&conn)?.find_all()?;
    let agents = SqliteAgentRepository::try_new(&conn)?.find_all()?;
    let aliases = SqliteAliasRepository::try_new(&conn)?.find_all()?;

    println!("security_clearances={}", clearances.len());
    println!("agents={}", agents.len());
    println!("aliases={}", aliases.len());
    Ok(())
}
