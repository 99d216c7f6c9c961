//! # Storage
//!
//! ## Instance storage
//!
//! | Key            | Type      | Description                                  |
//! |----------------|-----------|----------------------------------------------|
//! | `Owner`        | `Address` | Privileged issuer (the donation engine)      |
//! | `PaymentToken` | `Address` | Asset backing every coupon                   |
//! | `NextTokenId`  | `u64`     | Sequential coupon id counter                 |
//! | `Reserved`     | `i128`    | Sum of values of all outstanding coupons     |
//!
//! ## Persistent storage
//!
//! | Key                   | Type       | Description                     |
//! |-----------------------|------------|---------------------------------|
//! | `Coupon(token_id)`    | `Coupon`   | Live coupon                     |
//! | `ProjectCoupons(id)`  | `Vec<u64>` | Live coupon ids of a project    |

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::Coupon;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Owner,
    PaymentToken,
    NextTokenId,
    Reserved,
    Coupon(u64),
    ProjectCoupons(u64),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn has_owner(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Owner)
}

pub fn get_owner(env: &Env) -> Option<Address> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Owner)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
    bump_instance(env);
}

pub fn get_payment_token(env: &Env) -> Option<Address> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::PaymentToken)
}

pub fn set_payment_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::PaymentToken, token);
    bump_instance(env);
}

pub fn get_next_token_id(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::NextTokenId)
        .unwrap_or(0)
}

pub fn set_next_token_id(env: &Env, next: u64) {
    env.storage().instance().set(&DataKey::NextTokenId, &next);
    bump_instance(env);
}

pub fn get_reserved(env: &Env) -> i128 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Reserved)
        .unwrap_or(0)
}

pub fn set_reserved(env: &Env, reserved: i128) {
    env.storage().instance().set(&DataKey::Reserved, &reserved);
    bump_instance(env);
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn load_coupon(env: &Env, token_id: u64) -> Option<Coupon> {
    let key = DataKey::Coupon(token_id);
    let coupon = env.storage().persistent().get(&key);
    if coupon.is_some() {
        bump_persistent(env, &key);
    }
    coupon
}

pub fn save_coupon(env: &Env, coupon: &Coupon) {
    let key = DataKey::Coupon(coupon.token_id);
    env.storage().persistent().set(&key, coupon);
    bump_persistent(env, &key);
}

pub fn remove_coupon(env: &Env, token_id: u64) {
    env.storage().persistent().remove(&DataKey::Coupon(token_id));
}

pub fn get_project_coupons(env: &Env, project_id: u64) -> Vec<u64> {
    let key = DataKey::ProjectCoupons(project_id);
    match env.storage().persistent().get(&key) {
        Some(ids) => {
            bump_persistent(env, &key);
            ids
        }
        None => Vec::new(env),
    }
}

pub fn set_project_coupons(env: &Env, project_id: u64, ids: &Vec<u64>) {
    let key = DataKey::ProjectCoupons(project_id);
    env.storage().persistent().set(&key, ids);
    bump_persistent(env, &key);
}

/// Drop `token_id` from the project's enumeration, keeping mint order.
pub fn remove_project_coupon(env: &Env, project_id: u64, token_id: u64) {
    let mut ids = get_project_coupons(env, project_id);
    if let Some(index) = ids.first_index_of(token_id) {
        ids.remove(index);
        set_project_coupons(env, project_id, &ids);
    }
}
