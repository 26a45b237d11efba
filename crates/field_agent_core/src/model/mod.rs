//! Domain records persisted by the field agent core.
//!
//! # Responsibility
//! - Define the plain data shapes exchanged between services, repositories
//!   and outer transports.
//!
//! # Invariants
//! - Identifier `0` means "not yet persisted"; storage assigns the real value
//!   on insert and it never changes afterwards.
//! - Business rules (required fields, duplicates) live in services, not here.

pub mod agency;
pub mod agent;
pub mod alias;
pub mod security_clearance;

/// Storage-assigned row identifier. `0` is the unset value.
pub type EntityId = i64;

/// Returns whether `value` is missing or only whitespace.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |text| text.trim().is_empty())
}
