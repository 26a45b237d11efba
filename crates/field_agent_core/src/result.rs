//! Business outcome carrier shared by repositories and services.
//!
//! # Responsibility
//! - Classify a write outcome as success, invalid input or missing target.
//! - Carry human-readable messages in the order they were raised.
//!
//! # Invariants
//! - `ResultType::Success` if and only if `messages` is empty.
//! - The classification is the most severe condition recorded.
//! - A `ServiceResult` is immutable once built.

use serde::Serialize;

/// Outcome classification ordered by severity (`Success` < `Invalid` < `NotFound`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultType {
    /// Operation completed.
    Success,
    /// Caller-supplied data violates a business rule.
    Invalid,
    /// A referenced identifier does not exist.
    NotFound,
}

/// Immutable outcome of a validated write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceResult<T> {
    #[serde(rename = "type")]
    kind: ResultType,
    messages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<T>,
}

impl<T> ServiceResult<T> {
    /// Successful outcome carrying `payload`.
    pub fn success(payload: T) -> Self {
        Self {
            kind: ResultType::Success,
            messages: Vec::new(),
            payload: Some(payload),
        }
    }

    /// Successful outcome with no payload (update/delete).
    pub fn success_empty() -> Self {
        Self {
            kind: ResultType::Success,
            messages: Vec::new(),
            payload: None,
        }
    }

    /// Single-message `Invalid` outcome.
    pub fn invalid(message: impl Into<String>) -> Self {
        Violations::new().invalid(message).into_result()
    }

    /// Single-message `NotFound` outcome.
    pub fn not_found(message: impl Into<String>) -> Self {
        Violations::new().not_found(message).into_result()
    }

    pub fn kind(&self) -> ResultType {
        self.kind
    }

    pub fn is_success(&self) -> bool {
        self.kind == ResultType::Success
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn into_payload(self) -> Option<T> {
        self.payload
    }
}

/// Accumulator for validation messages raised during one call.
///
/// Builds exactly one `ServiceResult` via [`Violations::into_result`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations {
    kind: Option<ResultType>,
    messages: Vec<String>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an `Invalid` message.
    pub fn invalid(mut self, message: impl Into<String>) -> Self {
        self.push(ResultType::Invalid, message);
        self
    }

    /// Records a `NotFound` message.
    pub fn not_found(mut self, message: impl Into<String>) -> Self {
        self.push(ResultType::NotFound, message);
        self
    }

    /// Records a message under `kind`, escalating the classification when
    /// `kind` is more severe than anything seen so far.
    pub fn push(&mut self, kind: ResultType, message: impl Into<String>) {
        if kind == ResultType::Success {
            return;
        }
        self.messages.push(message.into());
        self.kind = Some(self.kind.map_or(kind, |current| current.max(kind)));
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Builds a payload-free result; `Success` when nothing was recorded.
    pub fn into_result<T>(self) -> ServiceResult<T> {
        ServiceResult {
            kind: self.kind.unwrap_or(ResultType::Success),
            messages: self.messages,
            payload: None,
        }
    }
}
