//! # Storage
//!
//! Typed helpers over the engine's two storage tiers. Nothing outside this
//! module touches `env.storage()`.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key      | Type     | Description                        |
//! |----------|----------|------------------------------------|
//! | `Config` | `Config` | Owner, collaborators, parameters   |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                           | Type            | Description                         |
//! |-------------------------------|-----------------|-------------------------------------|
//! | `PoolBalance(pool)`           | `i128`          | Undisbursed funds of a pool         |
//! | `Donor(addr)`                 | `Donor`         | Registration + first donation block |
//! | `Contribution(pool, addr)`    | `i128`          | Cumulative donations to a pool      |
//! | `Association(addr)`           | `Association`   | Directory record                    |
//! | `AssociationIndex(addr)`      | `u32`           | Position in the directory           |
//! | `AssociationAt(i)`            | `Address`       | Directory slot `i`                  |
//! | `AssociationCount`            | `u32`           | Directory length                    |
//! | `ProjConfig(id)`              | `ProjectConfig` | Immutable project configuration     |
//! | `ProjState(id)`               | `ProjectState`  | Mutable project state               |
//! | `ProjectAt(i)`                | `u64`           | `i`-th project id, creation order   |
//! | `ProjectCount`                | `u32`           | Number of projects                  |
//! | `Voted(id, addr)`             | `bool`          | Vote record                         |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! ## Association list
//!
//! `AssociationAt` and `AssociationIndex` move together: for every wallet
//! `w` with `AssociationAt(i) == w`, `AssociationIndex(w) == i`. Removal
//! moves the last slot into the freed one. Both enumerations are stored one
//! entry per slot, so a page reads only the slots it returns.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{
    Association, Config, Donor, PoolType, Project, ProjectConfig, ProjectState,
};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Config,
    PoolBalance(PoolType),
    Donor(Address),
    Contribution(PoolType, Address),
    Association(Address),
    AssociationIndex(Address),
    AssociationAt(u32),
    AssociationCount,
    ProjConfig(u64),
    ProjState(u64),
    ProjectAt(u32),
    ProjectCount,
    Voted(u64, Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Option<Config> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Config)
}

pub fn set_config(env: &Env, config: &Config) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn read<V>(env: &Env, key: &DataKey) -> Option<V>
where
    V: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
{
    let value = env.storage().persistent().get(key);
    if value.is_some() {
        bump_persistent(env, key);
    }
    value
}

fn write<V>(env: &Env, key: &DataKey, value: &V)
where
    V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage().persistent().set(key, value);
    bump_persistent(env, key);
}

// ── Pools & donors ───────────────────────────────────────────────────

pub fn get_pool_balance(env: &Env, pool: PoolType) -> i128 {
    read(env, &DataKey::PoolBalance(pool)).unwrap_or(0)
}

pub fn set_pool_balance(env: &Env, pool: PoolType, balance: i128) {
    write(env, &DataKey::PoolBalance(pool), &balance);
}

/// Donor record, or the default (unregistered) one.
pub fn get_donor(env: &Env, donor: &Address) -> Donor {
    read(env, &DataKey::Donor(donor.clone())).unwrap_or_default()
}

pub fn set_donor(env: &Env, donor: &Address, record: &Donor) {
    write(env, &DataKey::Donor(donor.clone()), record);
}

pub fn get_contribution(env: &Env, pool: PoolType, donor: &Address) -> i128 {
    read(env, &DataKey::Contribution(pool, donor.clone())).unwrap_or(0)
}

pub fn set_contribution(env: &Env, pool: PoolType, donor: &Address, amount: i128) {
    write(env, &DataKey::Contribution(pool, donor.clone()), &amount);
}

// ── Associations ─────────────────────────────────────────────────────

pub fn load_association(env: &Env, wallet: &Address) -> Option<Association> {
    read(env, &DataKey::Association(wallet.clone()))
}

pub fn save_association(env: &Env, wallet: &Address, association: &Association) {
    write(env, &DataKey::Association(wallet.clone()), association);
}

pub fn association_count(env: &Env) -> u32 {
    read(env, &DataKey::AssociationCount).unwrap_or(0)
}

pub fn association_at(env: &Env, index: u32) -> Option<Address> {
    read(env, &DataKey::AssociationAt(index))
}

/// Append a new wallet to the directory and record its index.
pub fn push_association_wallet(env: &Env, wallet: &Address) {
    let index = association_count(env);
    write(env, &DataKey::AssociationAt(index), wallet);
    write(env, &DataKey::AssociationIndex(wallet.clone()), &index);
    write(env, &DataKey::AssociationCount, &(index + 1));
}

/// Delete the association at `wallet` and swap-remove it from the directory.
pub fn remove_association(env: &Env, wallet: &Address) {
    let index_key = DataKey::AssociationIndex(wallet.clone());
    let index: Option<u32> = read(env, &index_key);
    let storage = env.storage().persistent();

    if let Some(index) = index {
        let last = association_count(env).saturating_sub(1);
        if index < last {
            if let Some(moved) = association_at(env, last) {
                write(env, &DataKey::AssociationAt(index), &moved);
                write(env, &DataKey::AssociationIndex(moved), &index);
            }
        }
        storage.remove(&DataKey::AssociationAt(last));
        write(env, &DataKey::AssociationCount, &last);
    }

    storage.remove(&index_key);
    storage.remove(&DataKey::Association(wallet.clone()));
}

// ── Projects ─────────────────────────────────────────────────────────

pub fn has_project(env: &Env, id: u64) -> bool {
    env.storage().persistent().has(&DataKey::ProjConfig(id))
}

/// Save both the immutable config and initial mutable state for a new
/// project and append its id to the enumeration.
pub fn save_project(env: &Env, project: &Project) {
    let config = ProjectConfig {
        id: project.id,
        pool: project.pool,
        amount_required: project.amount_required,
        ong: project.ong.clone(),
        partner: project.partner.clone(),
        start_block: project.start_block,
    };
    let state = ProjectState {
        status: project.status,
        yes_votes: project.yes_votes,
        no_votes: project.no_votes,
        coupons_has_been_created: project.coupons_has_been_created,
    };

    write(env, &DataKey::ProjConfig(project.id), &config);
    write(env, &DataKey::ProjState(project.id), &state);

    let index = project_count(env);
    write(env, &DataKey::ProjectAt(index), &project.id);
    write(env, &DataKey::ProjectCount, &(index + 1));
}

pub fn load_project_config(env: &Env, id: u64) -> Option<ProjectConfig> {
    read(env, &DataKey::ProjConfig(id))
}

pub fn load_project_state(env: &Env, id: u64) -> Option<ProjectState> {
    read(env, &DataKey::ProjState(id))
}

/// Save only the mutable project state.
pub fn save_project_state(env: &Env, id: u64, state: &ProjectState) {
    write(env, &DataKey::ProjState(id), state);
}

/// Load the full `Project` by combining config and state.
pub fn load_project(env: &Env, id: u64) -> Option<Project> {
    let config = load_project_config(env, id)?;
    let state = load_project_state(env, id)?;
    Some(join_project(config, state))
}

pub fn join_project(config: ProjectConfig, state: ProjectState) -> Project {
    Project {
        id: config.id,
        pool: config.pool,
        amount_required: config.amount_required,
        ong: config.ong,
        partner: config.partner,
        status: state.status,
        yes_votes: state.yes_votes,
        no_votes: state.no_votes,
        start_block: config.start_block,
        coupons_has_been_created: state.coupons_has_been_created,
    }
}

pub fn project_count(env: &Env) -> u32 {
    read(env, &DataKey::ProjectCount).unwrap_or(0)
}

pub fn project_id_at(env: &Env, index: u32) -> Option<u64> {
    read(env, &DataKey::ProjectAt(index))
}

// ── Votes ────────────────────────────────────────────────────────────

pub fn has_voted(env: &Env, id: u64, voter: &Address) -> bool {
    read(env, &DataKey::Voted(id, voter.clone())).unwrap_or(false)
}

pub fn set_voted(env: &Env, id: u64, voter: &Address) {
    write(env, &DataKey::Voted(id, voter.clone()), &true);
}

// ── Pagination ───────────────────────────────────────────────────────

/// Upper bound on the page size of the enumeration queries.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Half-open index range `[start, end)` of the requested page over a list of
/// `len` items. Empty when `offset` is past the end.
pub fn page_range(len: u32, offset: u32, limit: u32) -> (u32, u32) {
    let start = offset.min(len);
    let end = start.saturating_add(limit.min(MAX_PAGE_SIZE)).min(len);
    (start, end)
}
