//! Security clearance use-case service.
//!
//! # Responsibility
//! - Enforce required-name and unique-name rules before persistence.
//! - Report write outcomes as `ServiceResult<SecurityClearance>`.
//!
//! # Invariants
//! - No two clearances share a name; any collision is rejected.
//! - `add` requires an unset id, `update` requires a set id.

use crate::model::security_clearance::SecurityClearance;
use crate::model::{is_blank, EntityId};
use crate::repo::security_clearance_repo::SecurityClearanceRepository;
use crate::repo::{RepoError, RepoResult};
use crate::result::{ServiceResult, Violations};
use crate::service::log_outcome;
use std::time::Instant;

const ENTITY: &str = "security_clearance";

pub const NULL_MESSAGE: &str = "securityClearance cannot be null";
pub const NAME_REQUIRED_MESSAGE: &str = "securityClearance name is required";
pub const DUPLICATE_MESSAGE: &str = "Duplicate security clearances not allowed.";
pub const ID_SET_ON_ADD_MESSAGE: &str = "securityClearanceId cannot be set for `add` operation";
pub const ID_UNSET_ON_UPDATE_MESSAGE: &str =
    "securityClearanceId must be set for `update` operation";
const NOT_SAVED_MESSAGE: &str = "securityClearance could not be saved";

/// Security clearance service facade over repository implementations.
pub struct SecurityClearanceService<R: SecurityClearanceRepository> {
    repo: R,
}

impl<R: SecurityClearanceRepository> SecurityClearanceService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn find_all(&self) -> RepoResult<Vec<SecurityClearance>> {
        self.repo.find_all()
    }

    pub fn find_by_id(&self, id: EntityId) -> RepoResult<Option<SecurityClearance>> {
        self.repo.find_by_id(id)
    }

    /// Validates and inserts a new clearance.
    ///
    /// `None` stands for a missing request body and is rejected as `Invalid`.
    pub fn add(
        &self,
        clearance: Option<SecurityClearance>,
    ) -> RepoResult<ServiceResult<SecurityClearance>> {
        let started_at = Instant::now();
        let Some(clearance) = clearance else {
            return Ok(log_outcome(
                ENTITY,
                "add",
                started_at,
                ServiceResult::invalid(NULL_MESSAGE),
            ));
        };

        let mut violations = self.validate(&clearance)?;
        if clearance.security_clearance_id != 0 {
            violations = violations.invalid(ID_SET_ON_ADD_MESSAGE);
        }
        if !violations.is_empty() {
            return Ok(log_outcome(ENTITY, "add", started_at, violations.into_result()));
        }

        let result = match self.repo.add(&clearance) {
            Ok(Some(saved)) => ServiceResult::success(saved),
            Ok(None) => ServiceResult::invalid(NOT_SAVED_MESSAGE),
            Err(RepoError::UniqueViolation { .. }) => ServiceResult::invalid(DUPLICATE_MESSAGE),
            Err(err) => return Err(err),
        };
        Ok(log_outcome(ENTITY, "add", started_at, result))
    }

    /// Validates and overwrites an existing clearance.
    pub fn update(
        &self,
        clearance: Option<SecurityClearance>,
    ) -> RepoResult<ServiceResult<SecurityClearance>> {
        let started_at = Instant::now();
        let Some(clearance) = clearance else {
            return Ok(log_outcome(
                ENTITY,
                "update",
                started_at,
                ServiceResult::invalid(NULL_MESSAGE),
            ));
        };

        let mut violations = self.validate(&clearance)?;
        if clearance.security_clearance_id <= 0 {
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

        let result = match self.repo.update(&clearance) {
            Ok(true) => ServiceResult::success(clearance),
            Ok(false) => ServiceResult::not_found(format!(
                "securityClearanceId: {}, not found",
                clearance.security_clearance_id
            )),
            Err(RepoError::UniqueViolation { .. }) => ServiceResult::invalid(DUPLICATE_MESSAGE),
            Err(err) => return Err(err),
        };
        Ok(log_outcome(ENTITY, "update", started_at, result))
    }

    /// Deletes an unreferenced clearance; see the repository for outcomes.
    pub fn delete_by_id(&self, id: EntityId) -> RepoResult<ServiceResult<SecurityClearance>> {
        let started_at = Instant::now();
        let result = self.repo.delete_by_id(id)?;
        Ok(log_outcome(ENTITY, "delete", started_at, result))
    }

    fn validate(&self, clearance: &SecurityClearance) -> RepoResult<Violations> {
        let violations = Violations::new();
        if is_blank(Some(clearance.name.as_str())) {
            return Ok(violations.invalid(NAME_REQUIRED_MESSAGE));
        }
        if self.is_duplicate(clearance)? {
            return Ok(violations.invalid(DUPLICATE_MESSAGE));
        }
        Ok(violations)
    }

    fn is_duplicate(&self, clearance: &SecurityClearance) -> RepoResult<bool> {
        Ok(self.repo.find_all()?.iter().any(|existing| {
            existing.security_clearance_id != clearance.security_clearance_id
                && existing.name == clearance.name
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ResultType;
    use std::cell::{Cell, RefCell};

    /// In-memory stand-in that records whether a write was attempted.
    #[derive(Default)]
    struct FakeRepo {
        rows: RefCell<Vec<SecurityClearance>>,
        referenced: Vec<EntityId>,
        writes: Cell<usize>,
        fail_unique_on_write: bool,
    }

    impl FakeRepo {
        fn with_rows(rows: Vec<SecurityClearance>) -> Self {
            Self {
                rows: RefCell::new(rows),
                ..Self::default()
            }
        }
    }

    impl SecurityClearanceRepository for FakeRepo {
        fn find_all(&self) -> RepoResult<Vec<SecurityClearance>> {
            Ok(self.rows.borrow().clone())
        }

        fn find_by_id(&self, id: EntityId) -> RepoResult<Option<SecurityClearance>> {
            Ok(self
                .rows
                .borrow()
                .iter()
                .find(|row| row.security_clearance_id == id)
                .cloned())
        }

        fn add(&self, clearance: &SecurityClearance) -> RepoResult<Option<SecurityClearance>> {
            self.writes.set(self.writes.get() + 1);
            if self.fail_unique_on_write {
                return Err(RepoError::UniqueViolation {
                    table: "security_clearance",
                    column: "name",
                });
            }
            let mut rows = self.rows.borrow_mut();
            let next_id = rows
                .iter()
                .map(|row| row.security_clearance_id)
                .max()
                .unwrap_or(0)
                + 1;
            let saved = SecurityClearance::with_id(next_id, clearance.name.clone());
            rows.push(saved.clone());
            Ok(Some(saved))
        }

        fn update(&self, clearance: &SecurityClearance) -> RepoResult<bool> {
            self.writes.set(self.writes.get() + 1);
            let mut rows = self.rows.borrow_mut();
            match rows
                .iter_mut()
                .find(|row| row.security_clearance_id == clearance.security_clearance_id)
            {
                Some(row) => {
                    *row = clearance.clone();
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        fn delete_by_id(&self, id: EntityId) -> RepoResult<ServiceResult<SecurityClearance>> {
            if self.find_by_id(id)?.is_none() {
                return Ok(ServiceResult::not_found("securityClearance not found."));
            }
            if self.referenced.contains(&id) {
                return Ok(ServiceResult::invalid(
                    "Cannot delete security clearance that is in use.",
                ));
            }
            self.rows
                .borrow_mut()
                .retain(|row| row.security_clearance_id != id);
            Ok(ServiceResult::success_empty())
        }
    }

    fn seeded() -> Vec<SecurityClearance> {
        vec![
            SecurityClearance::with_id(1, "Secret"),
            SecurityClearance::with_id(2, "Top Secret"),
            SecurityClearance::with_id(3, "basic"),
        ]
    }

    #[test]
    fn finds_top_secret() {
        let service = SecurityClearanceService::new(FakeRepo::with_rows(seeded()));
        let actual = service.find_by_id(2).unwrap();
        assert_eq!(actual, Some(SecurityClearance::with_id(2, "Top Secret")));
        assert_eq!(service.find_by_id(99).unwrap(), None);
    }

    #[test]
    fn adds_into_empty_storage() {
        let service = SecurityClearanceService::new(FakeRepo::default());
        let actual = service
            .add(Some(SecurityClearance::new("Uber Secret")))
            .unwrap();

        assert_eq!(actual.kind(), ResultType::Success);
        assert!(actual.messages().is_empty());
        assert_eq!(
            actual.payload(),
            Some(&SecurityClearance::with_id(1, "Uber Secret"))
        );
    }

    #[test]
    fn rejects_null_and_blank_on_add() {
        let service = SecurityClearanceService::new(FakeRepo::default());

        let actual = service.add(None).unwrap();
        assert_eq!(actual.kind(), ResultType::Invalid);
        assert_eq!(actual.messages()[0], NULL_MESSAGE);

        let actual = service.add(Some(SecurityClearance::new(""))).unwrap();
        assert_eq!(actual.kind(), ResultType::Invalid);
        assert_eq!(actual.messages()[0], NAME_REQUIRED_MESSAGE);

        let actual = service.add(Some(SecurityClearance::new("   "))).unwrap();
        assert_eq!(actual.messages()[0], NAME_REQUIRED_MESSAGE);
        assert_eq!(service.repo.writes.get(), 0);
    }

    #[test]
    fn rejects_duplicate_on_add() {
        let service = SecurityClearanceService::new(FakeRepo::with_rows(seeded()));
        let actual = service
            .add(Some(SecurityClearance::new("Top Secret")))
            .unwrap();

        assert_eq!(actual.kind(), ResultType::Invalid);
        assert_eq!(actual.messages()[0], DUPLICATE_MESSAGE);
        assert_eq!(service.repo.writes.get(), 0);
    }

    #[test]
    fn rejects_preset_id_on_add_even_when_otherwise_valid() {
        let service = SecurityClearanceService::new(FakeRepo::default());
        let actual = service
            .add(Some(SecurityClearance::with_id(5, "Cosmic")))
            .unwrap();

        assert_eq!(actual.kind(), ResultType::Invalid);
        assert_eq!(actual.messages(), [ID_SET_ON_ADD_MESSAGE]);
    }

    #[test]
    fn storage_unique_violation_reports_duplicate() {
        let repo = FakeRepo {
            fail_unique_on_write: true,
            ..FakeRepo::default()
        };
        let service = SecurityClearanceService::new(repo);
        let actual = service.add(Some(SecurityClearance::new("Racy"))).unwrap();

        assert_eq!(actual.kind(), ResultType::Invalid);
        assert_eq!(actual.messages(), [DUPLICATE_MESSAGE]);
    }

    #[test]
    fn updates_existing() {
        let service = SecurityClearanceService::new(FakeRepo::with_rows(seeded()));
        let actual = service
            .update(Some(SecurityClearance::with_id(1, "Uber Secret")))
            .unwrap();

        assert_eq!(actual.kind(), ResultType::Success);
        assert_eq!(
            service.find_by_id(1).unwrap().unwrap().name,
            "Uber Secret"
        );
    }

    #[test]
    fn update_keeping_own_name_is_not_a_duplicate() {
        let service = SecurityClearanceService::new(FakeRepo::with_rows(seeded()));
        let actual = service
            .update(Some(SecurityClearance::with_id(2, "Top Secret")))
            .unwrap();
        assert!(actual.is_success());
    }

    #[test]
    fn rejects_invalid_update() {
        let service = SecurityClearanceService::new(FakeRepo::default());

        let actual = service.update(None).unwrap();
        assert_eq!(actual.kind(), ResultType::Invalid);
        assert_eq!(actual.messages()[0], NULL_MESSAGE);

        let actual = service
            .update(Some(SecurityClearance::with_id(1, "")))
            .unwrap();
        assert_eq!(actual.kind(), ResultType::Invalid);
        assert_eq!(actual.messages()[0], NAME_REQUIRED_MESSAGE);

        let actual = service
            .update(Some(SecurityClearance::with_id(0, "Uber Secret")))
            .unwrap();
        assert_eq!(actual.kind(), ResultType::Invalid);
        assert_eq!(actual.messages()[0], ID_UNSET_ON_UPDATE_MESSAGE);

        let actual = service
            .update(Some(SecurityClearance::with_id(-4, "Uber Secret")))
            .unwrap();
        assert_eq!(actual.messages()[0], ID_UNSET_ON_UPDATE_MESSAGE);
    }

    #[test]
    fn rejects_update_to_duplicate() {
        let service = SecurityClearanceService::new(FakeRepo::with_rows(seeded()));
        let actual = service
            .update(Some(SecurityClearance::with_id(2, "basic")))
            .unwrap();

        assert_eq!(actual.kind(), ResultType::Invalid);
        assert_eq!(actual.messages()[0], DUPLICATE_MESSAGE);
    }

    #[test]
    fn update_of_missing_id_is_not_found() {
        let service = SecurityClearanceService::new(FakeRepo::with_rows(seeded()));
        let actual = service
            .update(Some(SecurityClearance::with_id(42, "Ghost")))
            .unwrap();

        assert_eq!(actual.kind(), ResultType::NotFound);
        assert_eq!(actual.messages(), ["securityClearanceId: 42, not found"]);
    }

    #[test]
    fn delete_reports_three_way_outcome() {
        let repo = FakeRepo {
            referenced: vec![1],
            ..FakeRepo::with_rows(seeded())
        };
        let service = SecurityClearanceService::new(repo);

        assert_eq!(service.delete_by_id(2).unwrap().kind(), ResultType::Success);
        assert_eq!(service.delete_by_id(2).unwrap().kind(), ResultType::NotFound);

        let in_use = service.delete_by_id(1).unwrap();
        assert_eq!(in_use.kind(), ResultType::Invalid);
        assert_eq!(
            in_use.messages(),
            ["Cannot delete security clearance that is in use."]
        );
    }
}
