//! # Donation Engine
//!
//! Core contract of the Chain4Good donation platform. Donors fund six
//! thematic pools, earn reward tokens that weigh their votes, and decide
//! which association projects are paid. Approved projects are released as
//! coupons held by a partner and redeemed against the Coupon Registry.
//!
//! | Phase        | Entry Point(s)                                              |
//! |--------------|-------------------------------------------------------------|
//! | Bootstrap    | [`DonationEngine::init`]                                    |
//! | Admin        | `set_reward_rate`, `transfer_ownership`, `sweep_coupon_residual` |
//! | Directory    | `register_association`, `approve_association`, `reject_association` |
//! | Funding      | [`DonationEngine::donate`]                                  |
//! | Governance   | `create_project`, `vote_on_project`, `finallize_votes`      |
//! | Payout       | `create_coupons`, `change_project_status`                   |
//! | Queries      | `get_project`, `get_all_projects`, `get_pool_balance`, ...  |
//!
//! ## Architecture
//!
//! This file holds only the entry points. Business rules live in
//! [`admin`], [`donation`], [`projects`] and [`associations`]; storage access
//! is confined to [`storage`]; calls into the reward ledger and the coupon
//! registry go through [`collaborators`].
//!
//! ## Deployment
//!
//! 1. Deploy the reward token, the coupon registry and the engine.
//! 2. `init` all three.
//! 3. `transfer_ownership` of the reward token and the registry to the
//!    engine's address. Until then, donations and payouts fail with
//!    [`Error::DelegationMissing`].

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, Address, Env, String, Vec};

mod admin;
mod associations;
mod collaborators;
mod donation;
mod events;
mod projects;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_voting;

pub use donation::REWARD_UNIT;
pub use events::{
    AssociationRegistered, CouponsCreated, DonationReceived, ProjectCreated, ProjectStatusChanged,
    ProjectVoted,
};
pub use projects::MAX_COUPON_BATCH;
pub use storage::MAX_PAGE_SIZE;
pub use types::{Association, Config, Donor, PoolType, Project, ProjectStatus};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InvalidAddress = 5,
    InvalidParameters = 6,
    InvalidDivisibility = 7,
    AlreadyExists = 8,
    DoesNotExists = 9,
    AlreadyVoted = 10,
    InvalidOwner = 11,
    VotingPeriodNotEnded = 12,
    DonationAfterProjectCreation = 13,
    NotEligibleToVote = 14,
    InvalidProjectStatus = 15,
    InsufficientBalance = 16,
    /// A collaborator contract is not owned by the engine.
    DelegationMissing = 17,
    Overflow = 18,
}

#[contract]
pub struct DonationEngine;

#[contractimpl]
impl DonationEngine {
    // ─────────────────────────────────────────────────────────
    // Initialisation & administration
    // ─────────────────────────────────────────────────────────

    /// Configure the engine. Callable once; `owner` must sign.
    ///
    /// `voting_delay` is measured in ledgers. `token_reward_rate` reward
    /// tokens are minted per [`REWARD_UNIT`] of payment asset donated.
    #[allow(clippy::too_many_arguments)]
    pub fn init(
        env: Env,
        owner: Address,
        payment_token: Address,
        reward_token: Address,
        coupon_registry: Address,
        voting_delay: u32,
        token_reward_rate: u32,
        quorum: u32,
    ) -> Result<(), Error> {
        admin::init(
            &env,
            owner,
            payment_token,
            reward_token,
            coupon_registry,
            voting_delay,
            token_reward_rate,
            quorum,
        )
    }

    pub fn set_reward_rate(env: Env, caller: Address, rate: u32) -> Result<(), Error> {
        admin::set_reward_rate(&env, caller, rate)
    }

    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) -> Result<(), Error> {
        admin::transfer_ownership(&env, caller, new_owner)
    }

    /// Recover the coupon registry's unreserved balance to the owner.
    pub fn sweep_coupon_residual(env: Env, caller: Address) -> Result<i128, Error> {
        admin::sweep_coupon_residual(&env, caller)
    }

    pub fn get_config(env: Env) -> Result<Config, Error> {
        admin::load_config(&env)
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        Ok(admin::load_config(&env)?.owner)
    }

    // ─────────────────────────────────────────────────────────
    // Associations
    // ─────────────────────────────────────────────────────────

    /// Self-registration of an association wallet, pending approval.
    pub fn register_association(env: Env, name: String, wallet: Address) -> Result<(), Error> {
        associations::register_association(&env, name, wallet)
    }

    pub fn approve_association(env: Env, caller: Address, wallet: Address) -> Result<(), Error> {
        associations::approve_association(&env, caller, wallet)
    }

    pub fn reject_association(env: Env, caller: Address, wallet: Address) -> Result<(), Error> {
        associations::reject_association(&env, caller, wallet)
    }

    /// `(name, is_approved)` of the association at `wallet`.
    pub fn get_association(env: Env, wallet: Address) -> Result<(String, bool), Error> {
        associations::get_association(&env, wallet)
    }

    /// Page through the directory. `limit` is capped at [`MAX_PAGE_SIZE`].
    pub fn get_all_associations(
        env: Env,
        offset: u32,
        limit: u32,
    ) -> (Vec<Association>, Vec<Address>) {
        associations::get_all_associations(&env, offset, limit)
    }

    // ─────────────────────────────────────────────────────────
    // Donations
    // ─────────────────────────────────────────────────────────

    /// Donate `amount` of the payment asset to `pool`.
    ///
    /// The first donation registers the donor and fixes the ledger from
    /// which they are allowed to vote. Rewards are minted on every donation.
    pub fn donate(env: Env, donor: Address, pool: PoolType, amount: i128) -> Result<(), Error> {
        donation::donate(&env, donor, pool, amount)
    }

    pub fn get_pool_balance(env: Env, pool: PoolType) -> i128 {
        storage::get_pool_balance(&env, pool)
    }

    pub fn get_contribution(env: Env, pool: PoolType, donor: Address) -> i128 {
        storage::get_contribution(&env, pool, &donor)
    }

    pub fn get_donor(env: Env, donor: Address) -> Donor {
        storage::get_donor(&env, &donor)
    }

    // ─────────────────────────────────────────────────────────
    // Projects
    // ─────────────────────────────────────────────────────────

    pub fn create_project(
        env: Env,
        caller: Address,
        id: u64,
        pool: PoolType,
        amount_required: i128,
        ong: Address,
        partner: Address,
    ) -> Result<Project, Error> {
        projects::create_project(&env, caller, id, pool, amount_required, ong, partner)
    }

    /// Cast a vote weighted by the voter's current reward-token balance.
    pub fn vote_on_project(env: Env, voter: Address, id: u64, support: bool) -> Result<(), Error> {
        projects::vote_on_project(&env, voter, id, support)
    }

    pub fn finallize_votes(env: Env, caller: Address, id: u64) -> Result<ProjectStatus, Error> {
        projects::finallize_votes(&env, caller, id)
    }

    /// Split an approved project into coupons minted to its partner.
    /// Returns the number of coupons created.
    pub fn create_coupons(
        env: Env,
        caller: Address,
        id: u64,
        coupon_value: i128,
    ) -> Result<u32, Error> {
        projects::create_coupons(&env, caller, id, coupon_value)
    }

    pub fn change_project_status(
        env: Env,
        caller: Address,
        id: u64,
        new_status: ProjectStatus,
    ) -> Result<(), Error> {
        projects::change_project_status(&env, caller, id, new_status)
    }

    pub fn get_project(env: Env, id: u64) -> Result<Project, Error> {
        projects::get_project(&env, id)
    }

    pub fn get_all_projects(env: Env, offset: u32, limit: u32) -> (Vec<u64>, Vec<Project>) {
        projects::get_all_projects(&env, offset, limit)
    }

    pub fn has_voted(env: Env, id: u64, voter: Address) -> bool {
        storage::has_voted(&env, id, &voter)
    }
}
