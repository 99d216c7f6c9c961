use soroban_sdk::{token, Address, Env, Vec};

use crate::admin;
use crate::collaborators;
use crate::events;
use crate::storage;
use crate::types::{PoolType, Project, ProjectStatus};
use crate::Error;

/// Most coupons a single project may be split into.
pub const MAX_COUPON_BATCH: i128 = 100;

pub fn create_project(
    env: &Env,
    caller: Address,
    id: u64,
    pool: PoolType,
    amount_required: i128,
    ong: Address,
    partner: Address,
) -> Result<Project, Error> {
    let config = admin::require_owner(env, &caller)?;

    if amount_required <= 0 || amount_required > storage::get_pool_balance(env, pool) {
        return Err(Error::InvalidAmount);
    }
    if storage::has_project(env, id) {
        return Err(Error::AlreadyExists);
    }
    // The engine and its collaborators can never act as a beneficiary.
    if ong == env.current_contract_address()
        || ong == config.payment_token
        || ong == config.reward_token
        || ong == config.coupon_registry
    {
        return Err(Error::InvalidAddress);
    }

    let project = Project {
        id,
        pool,
        amount_required,
        ong: ong.clone(),
        partner: partner.clone(),
        status: ProjectStatus::Pending,
        yes_votes: 0,
        no_votes: 0,
        start_block: env.ledger().sequence(),
        coupons_has_been_created: false,
    };
    storage::save_project(env, &project);

    events::emit_project_created(env, id, pool, amount_required, ong, partner);
    Ok(project)
}

pub fn vote_on_project(env: &Env, voter: Address, id: u64, support: bool) -> Result<(), Error> {
    voter.require_auth();
    let config = admin::load_config(env)?;

    let donor = storage::get_donor(env, &voter);
    if !donor.is_registered {
        return Err(Error::InvalidOwner);
    }
    let project = storage::load_project_config(env, id).ok_or(Error::DoesNotExists)?;
    let mut state = storage::load_project_state(env, id).ok_or(Error::DoesNotExists)?;
    if state.status != ProjectStatus::Pending {
        return Err(Error::InvalidProjectStatus);
    }
    if storage::has_voted(env, id, &voter) {
        return Err(Error::AlreadyVoted);
    }
    if donor.first_donation_block > project.start_block {
        return Err(Error::DonationAfterProjectCreation);
    }
    if storage::get_contribution(env, project.pool, &voter) == 0 {
        return Err(Error::NotEligibleToVote);
    }

    storage::set_voted(env, id, &voter);

    let weight = collaborators::reward_ledger(env, &config)?.balance(&voter);
    if support {
        state.yes_votes = state.yes_votes.checked_add(weight).ok_or(Error::Overflow)?;
    } else {
        state.no_votes = state.no_votes.checked_add(weight).ok_or(Error::Overflow)?;
    }
    storage::save_project_state(env, id, &state);

    events::emit_project_voted(env, id, voter, support, weight);
    Ok(())
}

/// Close the vote on `id` once `voting_delay` ledgers have passed since its
/// creation. Strictly more yes weight approves; anything else rejects.
pub fn finallize_votes(env: &Env, caller: Address, id: u64) -> Result<ProjectStatus, Error> {
    let config = admin::require_owner(env, &caller)?;

    let project = storage::load_project_config(env, id).ok_or(Error::DoesNotExists)?;
    let mut state = storage::load_project_state(env, id).ok_or(Error::DoesNotExists)?;
    if state.status != ProjectStatus::Pending {
        return Err(Error::InvalidProjectStatus);
    }
    let voting_end = project.start_block.saturating_add(config.voting_delay);
    if env.ledger().sequence() < voting_end {
        return Err(Error::VotingPeriodNotEnded);
    }

    state.status = if state.yes_votes > state.no_votes {
        ProjectStatus::Approved
    } else {
        ProjectStatus::Rejected
    };
    storage::save_project_state(env, id, &state);

    events::emit_status_changed(env, id, state.status);
    Ok(state.status)
}

/// Release an approved project's funds as `amount_required / coupon_value`
/// coupons minted to its partner. Only the beneficiary association may ask.
///
/// The pool is debited and the project marked before the funds move to the
/// registry.
pub fn create_coupons(
    env: &Env,
    caller: Address,
    id: u64,
    coupon_value: i128,
) -> Result<u32, Error> {
    caller.require_auth();
    let config = admin::load_config(env)?;

    // An unknown id is simply not an approved project.
    let project = storage::load_project_config(env, id).ok_or(Error::InvalidProjectStatus)?;
    let mut state = storage::load_project_state(env, id).ok_or(Error::InvalidProjectStatus)?;
    if state.status != ProjectStatus::Approved || state.coupons_has_been_created {
        return Err(Error::InvalidProjectStatus);
    }
    if caller != project.ong {
        return Err(Error::InvalidOwner);
    }
    if coupon_value <= 0 {
        return Err(Error::InvalidAmount);
    }
    if project.amount_required % coupon_value != 0 {
        return Err(Error::InvalidDivisibility);
    }
    let count = project.amount_required / coupon_value;
    if count > MAX_COUPON_BATCH {
        return Err(Error::InvalidParameters);
    }
    let count = count as u32;

    let pool_balance = storage::get_pool_balance(env, project.pool);
    if pool_balance < project.amount_required {
        return Err(Error::InsufficientBalance);
    }
    let registry = collaborators::coupon_registry(env, &config)?;

    storage::set_pool_balance(env, project.pool, pool_balance - project.amount_required);
    state.status = ProjectStatus::CouponsCreated;
    state.coupons_has_been_created = true;
    storage::save_project_state(env, id, &state);

    let engine = env.current_contract_address();
    token::Client::new(env, &config.payment_token).transfer(
        &engine,
        &config.coupon_registry,
        &project.amount_required,
    );
    registry.create_coupons(&engine, &coupon_value, &id, &project.partner, &count);

    events::emit_coupons_created(env, id, count, coupon_value);
    events::emit_status_changed(env, id, state.status);
    Ok(count)
}

/// Administrative status override, used to close a project once its
/// coupons are spent.
pub fn change_project_status(
    env: &Env,
    caller: Address,
    id: u64,
    new_status: ProjectStatus,
) -> Result<(), Error> {
    admin::require_owner(env, &caller)?;

    let mut state = storage::load_project_state(env, id).ok_or(Error::DoesNotExists)?;
    if new_status == ProjectStatus::CouponsCreated {
        return Err(Error::InvalidProjectStatus);
    }
    if state.coupons_has_been_created && new_status != ProjectStatus::Closed {
        return Err(Error::InvalidProjectStatus);
    }

    state.status = new_status;
    storage::save_project_state(env, id, &state);

    events::emit_status_changed(env, id, new_status);
    Ok(())
}

pub fn get_project(env: &Env, id: u64) -> Result<Project, Error> {
    storage::load_project(env, id).ok_or(Error::DoesNotExists)
}

/// One page of projects in creation order as parallel `(ids, projects)`.
pub fn get_all_projects(env: &Env, offset: u32, limit: u32) -> (Vec<u64>, Vec<Project>) {
    let (start, end) = storage::page_range(storage::project_count(env), offset, limit);

    let mut ids = Vec::new(env);
    let mut projects = Vec::new(env);
    for i in start..end {
        let Some(id) = storage::project_id_at(env, i) else { continue };
        if let Some(project) = storage::load_project(env, id) {
            ids.push_back(id);
            projects.push_back(project);
        }
    }
    (ids, projects)
}
