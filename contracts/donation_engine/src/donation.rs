use soroban_sdk::{token, Address, Env};

use crate::admin;
use crate::collaborators;
use crate::events;
use crate::storage;
use crate::types::PoolType;
use crate::Error;

/// Payment-asset base units that earn `token_reward_rate` reward tokens:
/// one hundredth of a 7-decimal asset unit.
pub const REWARD_UNIT: i128 = 100_000;

/// Reward tokens earned by donating `amount` at `rate`.
pub fn reward_for(amount: i128, rate: u32) -> Result<i128, Error> {
    amount
        .checked_mul(rate as i128)
        .map(|v| v / REWARD_UNIT)
        .ok_or(Error::Overflow)
}

pub fn donate(env: &Env, donor: Address, pool: PoolType, amount: i128) -> Result<(), Error> {
    donor.require_auth();
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let config = admin::load_config(env)?;
    let reward = reward_for(amount, config.token_reward_rate)?;
    let ledger = collaborators::reward_ledger(env, &config)?;

    let pool_balance = storage::get_pool_balance(env, pool)
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    let contribution = storage::get_contribution(env, pool, &donor)
        .checked_add(amount)
        .ok_or(Error::Overflow)?;

    token::Client::new(env, &config.payment_token).transfer(
        &donor,
        &env.current_contract_address(),
        &amount,
    );

    storage::set_pool_balance(env, pool, pool_balance);
    storage::set_contribution(env, pool, &donor, contribution);

    let mut record = storage::get_donor(env, &donor);
    if !record.is_registered {
        record.is_registered = true;
        record.first_donation_block = env.ledger().sequence();
        storage::set_donor(env, &donor, &record);
    }

    // Sub-unit donations still count; they just earn nothing.
    if reward > 0 {
        ledger.mint(&env.current_contract_address(), &donor, &reward);
    }

    events::emit_donation_received(env, donor, pool, amount);
    Ok(())
}
