//! Non-activation lease state transitions.
//!
//! One function per edge; every edge takes the expected concurrency token
//! and returns the lease with the token bumped. Activation has its own
//! gate in [`crate::lease::activation`].

use chrono::NaiveDate;
use rentora_shared::types::ConcurrencyToken;

use super::error::TransitionError;
use super::types::{Lease, LeaseStatus};

/// Stateless service for lease lifecycle transitions.
pub struct LeaseLifecycle;

impl LeaseLifecycle {
    /// Cancel a draft lease before activation (Draft → Cancelled).
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::InvalidTransition` if the lease is not in
    /// Draft status, `ConcurrencyConflict` on a stale token.
    pub fn cancel(
        lease: &Lease,
        expected_version: ConcurrencyToken,
    ) -> Result<Lease, TransitionError> {
        Self::check_version(lease, expected_version)?;
        match lease.status {
            LeaseStatus::Draft => Ok(Self::with_status(lease, LeaseStatus::Cancelled)),
            _ => Err(TransitionError::InvalidTransition {
                from: lease.status,
                to: LeaseStatus::Cancelled,
            }),
        }
    }

    /// Record a termination notice (Active → NoticeGiven), fixing the
    /// lease's end date.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::InvalidTransition` if the lease is not
    /// Active, `EndDateBeforeStart` if the effective end does not follow
    /// the start date, `ConcurrencyConflict` on a stale token.
    pub fn give_notice(
        lease: &Lease,
        expected_version: ConcurrencyToken,
        effective_end: NaiveDate,
    ) -> Result<Lease, TransitionError> {
        Self::check_version(lease, expected_version)?;
        if lease.status != LeaseStatus::Active {
            return Err(TransitionError::InvalidTransition {
                from: lease.status,
                to: LeaseStatus::NoticeGiven,
            });
        }
        if effective_end <= lease.start_date {
            return Err(TransitionError::EndDateBeforeStart {
                start: lease.start_date,
                end: effective_end,
            });
        }

        let mut updated = Self::with_status(lease, LeaseStatus::NoticeGiven);
        updated.end_date = Some(effective_end);
        Ok(updated)
    }

    /// End a lease (Active | NoticeGiven → Ended).
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::InvalidTransition` from any other status,
    /// `EndDateBeforeStart` for an end date on or before the start,
    /// `ConcurrencyConflict` on a stale token.
    pub fn end(
        lease: &Lease,
        expected_version: ConcurrencyToken,
        end_date: NaiveDate,
    ) -> Result<Lease, TransitionError> {
        Self::check_version(lease, expected_version)?;
        if !matches!(
            lease.status,
            LeaseStatus::Active | LeaseStatus::NoticeGiven
        ) {
            return Err(TransitionError::InvalidTransition {
                from: lease.status,
                to: LeaseStatus::Ended,
            });
        }
        if end_date <= lease.start_date {
            return Err(TransitionError::EndDateBeforeStart {
                start: lease.start_date,
                end: end_date,
            });
        }

        let mut updated = Self::with_status(lease, LeaseStatus::Ended);
        updated.end_date = Some(end_date);
        Ok(updated)
    }

    /// Check if a status transition is one the state machine defines.
    ///
    /// Valid transitions:
    /// - Draft → Active (activate)
    /// - Draft → Cancelled (cancel)
    /// - Active → NoticeGiven (give notice)
    /// - Active → Ended (end)
    /// - NoticeGiven → Ended (end)
    #[must_use]
    pub fn is_valid_transition(from: LeaseStatus, to: LeaseStatus) -> bool {
        matches!(
            (from, to),
            (
                LeaseStatus::Draft,
                LeaseStatus::Active | LeaseStatus::Cancelled
            ) | (
                LeaseStatus::Active,
                LeaseStatus::NoticeGiven | LeaseStatus::Ended
            ) | (LeaseStatus::NoticeGiven, LeaseStatus::Ended)
        )
    }

    fn check_version(
        lease: &Lease,
        expected: ConcurrencyToken,
    ) -> Result<(), TransitionError> {
        if lease.version != expected {
            return Err(TransitionError::ConcurrencyConflict {
                expected,
                actual: lease.version,
            });
        }
        Ok(())
    }

    fn with_status(lease: &Lease, status: LeaseStatus) -> Lease {
        let mut updated = lease.clone();
        updated.status = status;
        updated.version = lease.version.next();
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lease::LateFeePolicy;
    use rentora_shared::types::{Currency, LeaseId, OrganizationId, UnitId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lease_with(status: LeaseStatus) -> Lease {
        Lease {
            id: LeaseId::new(),
            organization_id: OrganizationId::new(),
            unit_id: UnitId::new(),
            status,
            start_date: date(2026, 1, 1),
            end_date: None,
            rent_due_day: 1,
            grace_days: 0,
            late_fee_policy: LateFeePolicy::None,
            auto_renew: false,
            currency: Currency::Eur,
            version: ConcurrencyToken::initial(),
        }
    }

    #[test]
    fn test_cancel_from_draft() {
        let lease = lease_with(LeaseStatus::Draft);
        let cancelled = LeaseLifecycle::cancel(&lease, lease.version).unwrap();
        assert_eq!(cancelled.status, LeaseStatus::Cancelled);
        assert_eq!(cancelled.version, lease.version.next());
    }

    #[test]
    fn test_cancel_from_active_fails() {
        let lease = lease_with(LeaseStatus::Active);
        let result = LeaseLifecycle::cancel(&lease, lease.version);
        assert!(matches!(
            result,
            Err(TransitionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_give_notice_from_active_sets_end_date() {
        let lease = lease_with(LeaseStatus::Active);
        let end = date(2026, 12, 31);
        let updated = LeaseLifecycle::give_notice(&lease, lease.version, end).unwrap();
        assert_eq!(updated.status, LeaseStatus::NoticeGiven);
        assert_eq!(updated.end_date, Some(end));
    }

    #[test]
    fn test_give_notice_rejects_end_before_start() {
        let lease = lease_with(LeaseStatus::Active);
        let result = LeaseLifecycle::give_notice(&lease, lease.version, date(2025, 12, 31));
        assert!(matches!(
            result,
            Err(TransitionError::EndDateBeforeStart { .. })
        ));
    }

    #[test]
    fn test_give_notice_from_draft_fails() {
        let lease = lease_with(LeaseStatus::Draft);
        let result = LeaseLifecycle::give_notice(&lease, lease.version, date(2026, 12, 31));
        assert!(matches!(
            result,
            Err(TransitionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_end_from_active_and_notice_given() {
        for status in [LeaseStatus::Active, LeaseStatus::NoticeGiven] {
            let lease = lease_with(status);
            let ended = LeaseLifecycle::end(&lease, lease.version, date(2026, 6, 30)).unwrap();
            assert_eq!(ended.status, LeaseStatus::Ended);
            assert_eq!(ended.end_date, Some(date(2026, 6, 30)));
        }
    }

    #[test]
    fn test_end_from_terminal_fails() {
        for status in [LeaseStatus::Ended, LeaseStatus::Cancelled] {
            let lease = lease_with(status);
            let result = LeaseLifecycle::end(&lease, lease.version, date(2026, 6, 30));
            assert!(matches!(
                result,
                Err(TransitionError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_stale_token_is_rejected_on_every_edge() {
        let lease = lease_with(LeaseStatus::Active);
        let stale = lease.version.next();
        assert!(matches!(
            LeaseLifecycle::give_notice(&lease, stale, date(2026, 12, 31)),
            Err(TransitionError::ConcurrencyConflict { .. })
        ));
        assert!(matches!(
            LeaseLifecycle::end(&lease, stale, date(2026, 12, 31)),
            Err(TransitionError::ConcurrencyConflict { .. })
        ));

        let draft = lease_with(LeaseStatus::Draft);
        assert!(matches!(
            LeaseLifecycle::cancel(&draft, stale),
            Err(TransitionError::ConcurrencyConflict { .. })
        ));
    }

    #[test]
    fn test_transition_table() {
        use LeaseStatus::{Active, Cancelled, Draft, Ended, NoticeGiven};

        assert!(LeaseLifecycle::is_valid_transition(Draft, Active));
        assert!(LeaseLifecycle::is_valid_transition(Draft, Cancelled));
        assert!(LeaseLifecycle::is_valid_transition(Active, NoticeGiven));
        assert!(LeaseLifecycle::is_valid_transition(Active, Ended));
        assert!(LeaseLifecycle::is_valid_transition(NoticeGiven, Ended));

        assert!(!LeaseLifecycle::is_valid_transition(Draft, Ended));
        assert!(!LeaseLifecycle::is_valid_transition(Active, Cancelled));
        assert!(!LeaseLifecycle::is_valid_transition(Ended, Active));
        assert!(!LeaseLifecycle::is_valid_transition(Cancelled, Draft));
        assert!(!LeaseLifecycle::is_valid_transition(NoticeGiven, Active));
    }
}
