#![allow(dead_code)]

extern crate std;

use crate::types::{Project, ProjectStatus};

/// A project always asks for a positive amount.
pub fn assert_amount_positive(project: &Project) {
    assert!(
        project.amount_required > 0,
        "project {} has non-positive amount_required ({})",
        project.id,
        project.amount_required
    );
}

/// Vote tallies are sums of non-negative balances.
pub fn assert_tallies_non_negative(project: &Project) {
    assert!(
        project.yes_votes >= 0 && project.no_votes >= 0,
        "project {} has a negative tally ({} / {})",
        project.id,
        project.yes_votes,
        project.no_votes
    );
}

/// The coupon flag and the CouponsCreated/Closed statuses go together.
pub fn assert_coupon_flag_consistent(project: &Project) {
    if project.status == ProjectStatus::CouponsCreated {
        assert!(
            project.coupons_has_been_created,
            "project {} is CouponsCreated without the flag",
            project.id
        );
    }
    if project.coupons_has_been_created {
        assert!(
            matches!(
                project.status,
                ProjectStatus::CouponsCreated | ProjectStatus::Closed
            ),
            "project {} has coupons but status {:?}",
            project.id,
            project.status
        );
    }
}

/// A pool balance moves by exactly `delta`.
pub fn assert_balance_delta(before: i128, after: i128, delta: i128) {
    assert_eq!(
        after,
        before + delta,
        "balance moved by {} instead of {}",
        after - before,
        delta
    );
}

/// `first_donation_block` is written once.
pub fn assert_first_donation_block_fixed(before: u32, after: u32) {
    assert_eq!(
        before, after,
        "first_donation_block changed from {} to {}",
        before, after
    );
}

/// Tallies only grow.
pub fn assert_tallies_monotonic(before: &Project, after: &Project) {
    assert!(
        after.yes_votes >= before.yes_votes && after.no_votes >= before.no_votes,
        "project {} tallies decreased",
        before.id
    );
}

/// Transitions the engine can perform on its own or through
/// `change_project_status` once coupons exist.
pub fn assert_valid_status_transition(from: &ProjectStatus, to: &ProjectStatus) {
    let valid = matches!(
        (from, to),
        (ProjectStatus::Pending, ProjectStatus::Approved)
            | (ProjectStatus::Pending, ProjectStatus::Rejected)
            | (ProjectStatus::Approved, ProjectStatus::CouponsCreated)
            | (ProjectStatus::CouponsCreated, ProjectStatus::Closed)
    );

    assert!(
        valid,
        "invalid status transition from {:?} to {:?}",
        from, to
    );
}

/// Fields written at creation never change.
pub fn assert_project_immutable_fields(original: &Project, current: &Project) {
    assert_eq!(original.id, current.id, "project id changed");
    assert_eq!(original.pool, current.pool, "project pool changed");
    assert_eq!(
        original.amount_required, current.amount_required,
        "project amount_required changed"
    );
    assert_eq!(original.ong, current.ong, "project ong changed");
    assert_eq!(original.partner, current.partner, "project partner changed");
    assert_eq!(
        original.start_block, current.start_block,
        "project start_block changed"
    );
}

/// Run all stateless project invariants.
pub fn assert_all_project_invariants(project: &Project) {
    assert_amount_positive(project);
    assert_tallies_non_negative(project);
    assert_coupon_flag_consistent(project);
}
