//! # Collaborators
//!
//! Typed clients for the two contracts the engine controls. Both expose
//! owner-only entry points that take the caller explicitly; the engine
//! passes its own address, which the host authorizes for direct calls.
//!
//! Ownership of each collaborator is handed to the engine by the deployer.
//! [`reward_ledger`] and [`coupon_registry`] refuse to return a client
//! unless that delegation is in place, so a misconfigured deployment fails
//! with `DelegationMissing` instead of half-applying a donation or payout.

use soroban_sdk::{contractclient, Address, Env, Vec};

use crate::types::Config;
use crate::Error;

#[allow(dead_code)]
#[contractclient(name = "RewardLedgerClient")]
pub trait RewardLedger {
    fn mint(env: Env, caller: Address, to: Address, amount: i128);
    fn balance(env: Env, id: Address) -> i128;
    fn owner(env: Env) -> Address;
}

#[allow(dead_code)]
#[contractclient(name = "CouponIssuerClient")]
pub trait CouponIssuer {
    fn create_coupons(
        env: Env,
        caller: Address,
        value: i128,
        project_id: u64,
        owner: Address,
        count: u32,
    ) -> Vec<u64>;
    fn withdraw_ether(env: Env, caller: Address, to: Address) -> i128;
    fn reserved(env: Env) -> i128;
    fn owner(env: Env) -> Address;
}

/// Reward ledger client, once the engine is confirmed as its owner.
pub fn reward_ledger<'a>(env: &Env, config: &Config) -> Result<RewardLedgerClient<'a>, Error> {
    let client = RewardLedgerClient::new(env, &config.reward_token);
    if client.owner() != env.current_contract_address() {
        return Err(Error::DelegationMissing);
    }
    Ok(client)
}

/// Coupon registry client, once the engine is confirmed as its owner.
pub fn coupon_registry<'a>(env: &Env, config: &Config) -> Result<CouponIssuerClient<'a>, Error> {
    let client = CouponIssuerClient::new(env, &config.coupon_registry);
    if client.owner() != env.current_contract_address() {
        return Err(Error::DelegationMissing);
    }
    Ok(client)
}
