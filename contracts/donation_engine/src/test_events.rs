extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    vec, Address, IntoVal, String, TryIntoVal, Val, Vec,
};

use crate::test::{
    advance, approved_project, donor_with, new_project, setup, Setup, UNIT, VOTING_DELAY,
};
use crate::{
    AssociationRegistered, CouponsCreated, DonationReceived, PoolType, ProjectCreated,
    ProjectStatus, ProjectStatusChanged, ProjectVoted,
};

/// Data of the latest event the engine published under `topics`.
fn engine_event(s: &Setup, topics: Vec<Val>) -> Val {
    let all: std::vec::Vec<_> = s.env.events().all().iter().collect();
    all.into_iter()
        .rev()
        .find(|(contract, t, _)| *contract == s.engine.address && *t == topics)
        .map(|(_, _, data)| data)
        .expect("event not published")
}

#[test]
fn test_donation_received_event() {
    let s = setup();
    let donor = donor_with(&s, PoolType::Malaria, UNIT);

    let data = engine_event(
        &s,
        vec![
            &s.env,
            symbol_short!("donated").into_val(&s.env),
            PoolType::Malaria.into_val(&s.env),
        ],
    );
    let event: DonationReceived = data.try_into_val(&s.env).unwrap();
    assert_eq!(
        event,
        DonationReceived {
            donor,
            pool: PoolType::Malaria,
            amount: UNIT,
        }
    );
}

#[test]
fn test_project_created_event() {
    let s = setup();
    donor_with(&s, PoolType::Hiv, UNIT);
    let (ong, partner) = new_project(&s, 4, PoolType::Hiv, UNIT);

    let data = engine_event(
        &s,
        vec![
            &s.env,
            symbol_short!("created").into_val(&s.env),
            4u64.into_val(&s.env),
        ],
    );
    let event: ProjectCreated = data.try_into_val(&s.env).unwrap();
    assert_eq!(
        event,
        ProjectCreated {
            project_id: 4,
            pool: PoolType::Hiv,
            amount_required: UNIT,
            ong,
            partner,
        }
    );
}

#[test]
fn test_project_voted_event() {
    let s = setup();
    let voter = donor_with(&s, PoolType::Hiv, 2 * UNIT);
    new_project(&s, 1, PoolType::Hiv, UNIT);
    s.engine.vote_on_project(&voter, &1, &true);

    let data = engine_event(
        &s,
        vec![
            &s.env,
            symbol_short!("voted").into_val(&s.env),
            1u64.into_val(&s.env),
        ],
    );
    let event: ProjectVoted = data.try_into_val(&s.env).unwrap();
    assert_eq!(
        event,
        ProjectVoted {
            project_id: 1,
            voter,
            support: true,
            weight: 200,
        }
    );
}

#[test]
fn test_rejection_emits_status_changed() {
    let s = setup();
    let voter = donor_with(&s, PoolType::Newborns, UNIT);
    new_project(&s, 1, PoolType::Newborns, UNIT);
    s.engine.vote_on_project(&voter, &1, &false);
    advance(&s, VOTING_DELAY);
    s.engine.finallize_votes(&s.owner, &1);

    let data = engine_event(
        &s,
        vec![
            &s.env,
            symbol_short!("status").into_val(&s.env),
            1u64.into_val(&s.env),
        ],
    );
    let event: ProjectStatusChanged = data.try_into_val(&s.env).unwrap();
    assert_eq!(event.project_id, 1);
    assert_eq!(event.status, ProjectStatus::Rejected);
    assert_eq!(event.status as u32, 2);
}

#[test]
fn test_coupons_created_events() {
    let s = setup();
    let (ong, _) = approved_project(&s, 3, PoolType::Malaria, UNIT);
    s.engine.create_coupons(&ong, &3, &(UNIT / 4));

    let data = engine_event(
        &s,
        vec![
            &s.env,
            symbol_short!("coupons").into_val(&s.env),
            3u64.into_val(&s.env),
        ],
    );
    let event: CouponsCreated = data.try_into_val(&s.env).unwrap();
    assert_eq!(
        event,
        CouponsCreated {
            project_id: 3,
            count: 4,
            coupon_value: UNIT / 4,
        }
    );

    let data = engine_event(
        &s,
        vec![
            &s.env,
            symbol_short!("status").into_val(&s.env),
            3u64.into_val(&s.env),
        ],
    );
    let event: ProjectStatusChanged = data.try_into_val(&s.env).unwrap();
    assert_eq!(event.status, ProjectStatus::CouponsCreated);
}

#[test]
fn test_association_events() {
    let s = setup();
    let wallet = Address::generate(&s.env);
    let name = String::from_str(&s.env, "Aid");

    s.engine.register_association(&name, &wallet);
    let data = engine_event(
        &s,
        vec![
            &s.env,
            symbol_short!("assoc_reg").into_val(&s.env),
            wallet.into_val(&s.env),
        ],
    );
    let event: AssociationRegistered = data.try_into_val(&s.env).unwrap();
    assert_eq!(
        event,
        AssociationRegistered {
            wallet: wallet.clone(),
            name,
        }
    );

    s.engine.approve_association(&s.owner, &wallet);
    let data = engine_event(
        &s,
        vec![
            &s.env,
            symbol_short!("assoc_ok").into_val(&s.env),
            wallet.into_val(&s.env),
        ],
    );
    let approved: Address = data.try_into_val(&s.env).unwrap();
    assert_eq!(approved, wallet);

    s.engine.reject_association(&s.owner, &wallet);
    let data = engine_event(
        &s,
        vec![
            &s.env,
            symbol_short!("assoc_rej").into_val(&s.env),
            wallet.into_val(&s.env),
        ],
    );
    let rejected: Address = data.try_into_val(&s.env).unwrap();
    assert_eq!(rejected, wallet);
}

#[test]
fn test_reward_rate_event() {
    let s = setup();
    s.engine.set_reward_rate(&s.owner, &5);

    let data = engine_event(
        &s,
        vec![&s.env, symbol_short!("rate_set").into_val(&s.env)],
    );
    let rate: u32 = data.try_into_val(&s.env).unwrap();
    assert_eq!(rate, 5);
}
