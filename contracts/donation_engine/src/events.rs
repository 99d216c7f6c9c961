//! # Events
//!
//! Every engine notification is published with a short symbol as its first
//! topic and, where one exists, the subject it concerns (pool, project id or
//! association wallet) as its second topic. Payloads are the structs below.
//!
//! | Topic       | Subject    | Payload                   |
//! |-------------|------------|---------------------------|
//! | `donated`   | pool       | [`DonationReceived`]      |
//! | `created`   | project id | [`ProjectCreated`]        |
//! | `voted`     | project id | [`ProjectVoted`]          |
//! | `status`    | project id | [`ProjectStatusChanged`]  |
//! | `coupons`   | project id | [`CouponsCreated`]        |
//! | `assoc_reg` | wallet     | [`AssociationRegistered`] |
//! | `assoc_ok`  | wallet     | wallet                    |
//! | `assoc_rej` | wallet     | wallet                    |
//! | `rate_set`  | none       | new reward rate           |

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

use crate::types::{PoolType, ProjectStatus};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationReceived {
    pub donor: Address,
    pub pool: PoolType,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectCreated {
    pub project_id: u64,
    pub pool: PoolType,
    pub amount_required: i128,
    pub ong: Address,
    pub partner: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectVoted {
    pub project_id: u64,
    pub voter: Address,
    pub support: bool,
    pub weight: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectStatusChanged {
    pub project_id: u64,
    pub status: ProjectStatus,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CouponsCreated {
    pub project_id: u64,
    pub count: u32,
    pub coupon_value: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssociationRegistered {
    pub wallet: Address,
    pub name: String,
}

pub fn emit_donation_received(env: &Env, donor: Address, pool: PoolType, amount: i128) {
    env.events().publish(
        (symbol_short!("donated"), pool),
        DonationReceived { donor, pool, amount },
    );
}

pub fn emit_project_created(
    env: &Env,
    project_id: u64,
    pool: PoolType,
    amount_required: i128,
    ong: Address,
    partner: Address,
) {
    env.events().publish(
        (symbol_short!("created"), project_id),
        ProjectCreated {
            project_id,
            pool,
            amount_required,
            ong,
            partner,
        },
    );
}

pub fn emit_project_voted(env: &Env, project_id: u64, voter: Address, support: bool, weight: i128) {
    env.events().publish(
        (symbol_short!("voted"), project_id),
        ProjectVoted {
            project_id,
            voter,
            support,
            weight,
        },
    );
}

pub fn emit_status_changed(env: &Env, project_id: u64, status: ProjectStatus) {
    env.events().publish(
        (symbol_short!("status"), project_id),
        ProjectStatusChanged { project_id, status },
    );
}

pub fn emit_coupons_created(env: &Env, project_id: u64, count: u32, coupon_value: i128) {
    env.events().publish(
        (symbol_short!("coupons"), project_id),
        CouponsCreated {
            project_id,
            count,
            coupon_value,
        },
    );
}

pub fn emit_association_registered(env: &Env, wallet: Address, name: String) {
    env.events().publish(
        (symbol_short!("assoc_reg"), wallet.clone()),
        AssociationRegistered { wallet, name },
    );
}

pub fn emit_association_approved(env: &Env, wallet: Address) {
    env.events()
        .publish((symbol_short!("assoc_ok"), wallet.clone()), wallet);
}

pub fn emit_association_rejected(env: &Env, wallet: Address) {
    env.events()
        .publish((symbol_short!("assoc_rej"), wallet.clone()), wallet);
}

pub fn emit_reward_rate_set(env: &Env, rate: u32) {
    env.events().publish((symbol_short!("rate_set"),), rate);
}
