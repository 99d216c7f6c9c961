extern crate std;

use soroban_sdk::{testutils::Address as _, Address};

use crate::invariants;
use crate::test::{advance, donor_with, new_project, setup, UNIT, VOTING_DELAY};
use crate::{Error, PoolType, ProjectStatus};

#[test]
fn test_yes_weight_200_against_zero_approves() {
    let s = setup();
    let supporter = donor_with(&s, PoolType::Newborns, 2 * UNIT);
    let opponent = donor_with(&s, PoolType::Newborns, 1);
    new_project(&s, 1, PoolType::Newborns, UNIT);

    s.engine.vote_on_project(&supporter, &1, &true);
    s.engine.vote_on_project(&opponent, &1, &false);

    let project = s.engine.get_project(&1);
    assert_eq!(project.yes_votes, 200);
    assert_eq!(project.no_votes, 0);

    advance(&s, VOTING_DELAY);
    assert_eq!(s.engine.finallize_votes(&s.owner, &1), ProjectStatus::Approved);
    assert_eq!(s.engine.get_project(&1).status as u32, 1);
}

#[test]
fn test_no_only_rejects() {
    let s = setup();
    let opponent = donor_with(&s, PoolType::Malaria, UNIT);
    new_project(&s, 1, PoolType::Malaria, UNIT);

    s.engine.vote_on_project(&opponent, &1, &false);
    advance(&s, VOTING_DELAY);

    assert_eq!(s.engine.finallize_votes(&s.owner, &1), ProjectStatus::Rejected);
    assert_eq!(s.engine.get_project(&1).status as u32, 2);
}

#[test]
fn test_tie_rejects() {
    let s = setup();
    let a = donor_with(&s, PoolType::Hiv, UNIT);
    let b = donor_with(&s, PoolType::Hiv, UNIT);
    new_project(&s, 1, PoolType::Hiv, UNIT);

    s.engine.vote_on_project(&a, &1, &true);
    s.engine.vote_on_project(&b, &1, &false);
    advance(&s, VOTING_DELAY);

    assert_eq!(s.engine.finallize_votes(&s.owner, &1), ProjectStatus::Rejected);
}

#[test]
fn test_no_votes_at_all_rejects() {
    let s = setup();
    donor_with(&s, PoolType::Hiv, UNIT);
    new_project(&s, 1, PoolType::Hiv, UNIT);
    advance(&s, VOTING_DELAY);

    assert_eq!(s.engine.finallize_votes(&s.owner, &1), ProjectStatus::Rejected);
}

#[test]
fn test_quorum_is_not_enforced() {
    let s = setup();
    // Weight 1 out of a supply of 10_001 is far below the configured quorum.
    let small = donor_with(&s, PoolType::Newborns, 100_000);
    donor_with(&s, PoolType::Newborns, 100 * UNIT);
    new_project(&s, 1, PoolType::Newborns, UNIT);

    s.engine.vote_on_project(&small, &1, &true);
    advance(&s, VOTING_DELAY);

    assert_eq!(s.engine.finallize_votes(&s.owner, &1), ProjectStatus::Approved);
}

#[test]
fn test_donor_of_same_ledger_can_vote() {
    let s = setup();
    advance(&s, 5);
    let donor = donor_with(&s, PoolType::Tuberculosis, UNIT);
    new_project(&s, 1, PoolType::Tuberculosis, UNIT);

    let project = s.engine.get_project(&1);
    assert_eq!(
        s.engine.get_donor(&donor).first_donation_block,
        project.start_block
    );
    s.engine.vote_on_project(&donor, &1, &true);
    assert!(s.engine.has_voted(&1, &donor));
}

#[test]
fn test_donor_after_project_creation_cannot_vote() {
    let s = setup();
    donor_with(&s, PoolType::Tuberculosis, UNIT);
    new_project(&s, 1, PoolType::Tuberculosis, UNIT);

    advance(&s, 1);
    let late = donor_with(&s, PoolType::Tuberculosis, UNIT);

    assert_eq!(
        s.engine.try_vote_on_project(&late, &1, &true),
        Err(Ok(Error::DonationAfterProjectCreation))
    );
    assert!(!s.engine.has_voted(&1, &late));
}

#[test]
fn test_early_donor_of_other_pool_is_not_eligible() {
    let s = setup();
    let donor = donor_with(&s, PoolType::Malaria, UNIT);
    donor_with(&s, PoolType::Hiv, UNIT);
    new_project(&s, 1, PoolType::Hiv, UNIT);

    assert_eq!(
        s.engine.try_vote_on_project(&donor, &1, &true),
        Err(Ok(Error::NotEligibleToVote))
    );
}

#[test]
fn test_later_donation_to_project_pool_still_allows_vote() {
    // Eligibility is decided by the first donation ever, not the first to
    // the project's pool.
    let s = setup();
    let donor = donor_with(&s, PoolType::Malaria, UNIT);
    donor_with(&s, PoolType::Hiv, UNIT);
    new_project(&s, 1, PoolType::Hiv, UNIT);

    advance(&s, 1);
    s.payment_admin.mint(&donor, &UNIT);
    s.engine.donate(&donor, &PoolType::Hiv, &UNIT);

    s.engine.vote_on_project(&donor, &1, &true);
    assert_eq!(s.engine.get_project(&1).yes_votes, 200);
}

#[test]
fn test_unregistered_voter_fails() {
    let s = setup();
    donor_with(&s, PoolType::Hiv, UNIT);
    new_project(&s, 1, PoolType::Hiv, UNIT);
    let stranger = Address::generate(&s.env);

    assert_eq!(
        s.engine.try_vote_on_project(&stranger, &1, &true),
        Err(Ok(Error::InvalidOwner))
    );
}

#[test]
fn test_vote_on_missing_project_fails() {
    let s = setup();
    let donor = donor_with(&s, PoolType::Hiv, UNIT);

    assert_eq!(
        s.engine.try_vote_on_project(&donor, &9, &true),
        Err(Ok(Error::DoesNotExists))
    );
}

#[test]
fn test_double_vote_fails() {
    let s = setup();
    let donor = donor_with(&s, PoolType::Hiv, UNIT);
    new_project(&s, 1, PoolType::Hiv, UNIT);
    s.engine.vote_on_project(&donor, &1, &true);

    assert_eq!(
        s.engine.try_vote_on_project(&donor, &1, &false),
        Err(Ok(Error::AlreadyVoted))
    );
    assert_eq!(s.engine.get_project(&1).no_votes, 0);
}

#[test]
fn test_vote_after_finalization_fails() {
    let s = setup();
    let a = donor_with(&s, PoolType::Hiv, UNIT);
    let b = donor_with(&s, PoolType::Hiv, UNIT);
    new_project(&s, 1, PoolType::Hiv, UNIT);
    s.engine.vote_on_project(&a, &1, &true);
    advance(&s, VOTING_DELAY);
    s.engine.finallize_votes(&s.owner, &1);

    assert_eq!(
        s.engine.try_vote_on_project(&b, &1, &true),
        Err(Ok(Error::InvalidProjectStatus))
    );
}

#[test]
fn test_vote_weight_is_current_balance() {
    let s = setup();
    let donor = donor_with(&s, PoolType::Newborns, UNIT);
    new_project(&s, 1, PoolType::Newborns, UNIT);
    new_project(&s, 2, PoolType::Newborns, UNIT);

    s.engine.vote_on_project(&donor, &1, &true);
    let before = s.engine.get_project(&2);

    // Topping up raises the weight of later votes only.
    s.payment_admin.mint(&donor, &UNIT);
    s.engine.donate(&donor, &PoolType::Newborns, &UNIT);
    s.engine.vote_on_project(&donor, &2, &true);

    let after = s.engine.get_project(&2);
    invariants::assert_tallies_monotonic(&before, &after);
    assert_eq!(s.engine.get_project(&1).yes_votes, 100);
    assert_eq!(after.yes_votes, 200);
}

#[test]
fn test_finalize_before_delay_fails() {
    let s = setup();
    donor_with(&s, PoolType::Newborns, UNIT);
    new_project(&s, 1, PoolType::Newborns, UNIT);

    advance(&s, VOTING_DELAY - 1);
    assert_eq!(
        s.engine.try_finallize_votes(&s.owner, &1),
        Err(Ok(Error::VotingPeriodNotEnded))
    );

    advance(&s, 1);
    s.engine.finallize_votes(&s.owner, &1);
}

#[test]
fn test_finalize_validation() {
    let s = setup();
    donor_with(&s, PoolType::Newborns, UNIT);
    new_project(&s, 1, PoolType::Newborns, UNIT);
    advance(&s, VOTING_DELAY);
    let stranger = Address::generate(&s.env);

    assert_eq!(
        s.engine.try_finallize_votes(&stranger, &1),
        Err(Ok(Error::Unauthorized))
    );
    assert_eq!(
        s.engine.try_finallize_votes(&s.owner, &2),
        Err(Ok(Error::DoesNotExists))
    );

    s.engine.finallize_votes(&s.owner, &1);
    assert_eq!(
        s.engine.try_finallize_votes(&s.owner, &1),
        Err(Ok(Error::InvalidProjectStatus))
    );
}

#[test]
fn test_finalization_keeps_immutable_fields() {
    let s = setup();
    let donor = donor_with(&s, PoolType::Newborns, UNIT);
    new_project(&s, 1, PoolType::Newborns, UNIT);
    let before = s.engine.get_project(&1);

    s.engine.vote_on_project(&donor, &1, &true);
    advance(&s, VOTING_DELAY);
    s.engine.finallize_votes(&s.owner, &1);

    let after = s.engine.get_project(&1);
    invariants::assert_project_immutable_fields(&before, &after);
    invariants::assert_valid_status_transition(&before.status, &after.status);
    invariants::assert_all_project_invariants(&after);
}
