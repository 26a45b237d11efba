//! Core use-case services.
//!
//! # Responsibility
//! - Validate caller input before any repository write.
//! - Translate repository outcomes into `ServiceResult` values.
//!
//! # Invariants
//! - A rejected write never reaches the repository write path.
//! - Services stay storage-agnostic; they only see repository traits.

use crate::result::{ResultType, ServiceResult};
use log::{debug, info};
use std::time::Instant;

pub mod agent_service;
pub mod alias_service;
pub mod security_clearance_service;

/// Emits one `service_<operation>` event and hands the result back.
///
/// Only identifiers and classifications are logged, never field values.
pub(crate) fn log_outcome<T>(
    entity: &'static str,
    operation: &'static str,
    started_at: Instant,
    result: ServiceResult<T>,
) -> ServiceResult<T> {
    let duration_ms = started_at.elapsed().as_millis();
    match result.kind() {
        ResultType::Success => info!(
            "event=service_{operation} module=service entity={entity} status=ok duration_ms={duration_ms}"
        ),
        kind => debug!(
            "event=service_{operation} module=service entity={entity} status=rejected result_type={kind:?} message_count={} duration_ms={duration_ms}",
            result.messages().len()
        ),
    }
    result
}
