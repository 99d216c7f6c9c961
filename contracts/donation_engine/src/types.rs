//! # Types
//!
//! Shared data structures of the donation engine.
//!
//! ## Config / State split
//!
//! As for every frequently-written record, a `Project` is stored as two
//! ledger entries:
//!
//! - [`ProjectConfig`]: written once by `create_project`; never mutated.
//! - [`ProjectState`]: rewritten on every vote, on finalization, on coupon
//!   creation and on administrative status changes.
//!
//! The public API returns the reconstructed [`Project`].
//!
//! ## Project lifecycle
//!
//! ```text
//! Pending ──► Approved ──► CouponsCreated ──► Closed
//!     └─────► Rejected
//! ```
//!
//! `Pending → Approved | Rejected` happens only through `finallize_votes`,
//! `Approved → CouponsCreated` only through `create_coupons`. Closure is a
//! manual administrative act.

use soroban_sdk::{contracttype, Address, String};

/// The six thematic donation pools. The numeric encoding is part of the
/// public interface.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PoolType {
    Newborns = 0,
    RespiratoryInfections = 1,
    DiarrhealDiseases = 2,
    Malaria = 3,
    Tuberculosis = 4,
    Hiv = 5,
}

impl PoolType {
    pub const ALL: [PoolType; 6] = [
        PoolType::Newborns,
        PoolType::RespiratoryInfections,
        PoolType::DiarrhealDiseases,
        PoolType::Malaria,
        PoolType::Tuberculosis,
        PoolType::Hiv,
    ];
}

/// Lifecycle status of a project.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ProjectStatus {
    /// Open for donor votes.
    Pending = 0,
    /// Donors approved; the beneficiary may create coupons.
    Approved = 1,
    /// Donors rejected (ties included). Terminal.
    Rejected = 2,
    /// Funds moved to the coupon registry.
    CouponsCreated = 3,
    /// Administratively closed once the coupons are spent.
    Closed = 4,
}

/// Parameters fixed at initialization (the reward rate can be retuned).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub owner: Address,
    /// Asset donated into the pools and paid out through coupons.
    pub payment_token: Address,
    pub reward_token: Address,
    pub coupon_registry: Address,
    /// Ledgers that must elapse after project creation before finalization.
    pub voting_delay: u32,
    /// Reward tokens minted per `REWARD_UNIT` donated.
    pub token_reward_rate: u32,
    /// Stored for reference; finalization compares yes/no weight only.
    pub quorum: u32,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Donor {
    pub is_registered: bool,
    /// Ledger sequence of the first ever donation. Set once.
    pub first_donation_block: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Association {
    pub name: String,
    pub is_approved: bool,
}

/// Immutable project configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectConfig {
    pub id: u64,
    pub pool: PoolType,
    pub amount_required: i128,
    pub ong: Address,
    pub partner: Address,
    pub start_block: u32,
}

/// Mutable project state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectState {
    pub status: ProjectStatus,
    pub yes_votes: i128,
    pub no_votes: i128,
    pub coupons_has_been_created: bool,
}

/// Full on-chain representation of a project.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    /// Caller-supplied identifier.
    pub id: u64,
    /// Pool the project draws from.
    pub pool: PoolType,
    /// Amount released through coupons once approved.
    pub amount_required: i128,
    /// Beneficiary association; the only address allowed to create coupons.
    pub ong: Address,
    /// Intermediary that receives the coupons.
    pub partner: Address,
    pub status: ProjectStatus,
    /// Reward-token weighted votes in favour.
    pub yes_votes: i128,
    /// Reward-token weighted votes against.
    pub no_votes: i128,
    /// Ledger sequence at creation; donors who first gave later cannot vote.
    pub start_block: u32,
    pub coupons_has_been_created: bool,
}
