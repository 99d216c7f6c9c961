use soroban_sdk::{token, Address, Env};

use crate::collaborators;
use crate::events;
use crate::storage;
use crate::types::Config;
use crate::Error;

#[allow(clippy::too_many_arguments)]
pub fn init(
    env: &Env,
    owner: Address,
    payment_token: Address,
    reward_token: Address,
    coupon_registry: Address,
    voting_delay: u32,
    token_reward_rate: u32,
    quorum: u32,
) -> Result<(), Error> {
    if storage::has_config(env) {
        return Err(Error::AlreadyInitialized);
    }
    owner.require_auth();

    if voting_delay == 0 || token_reward_rate == 0 || quorum == 0 {
        return Err(Error::InvalidParameters);
    }
    if payment_token == reward_token
        || payment_token == coupon_registry
        || reward_token == coupon_registry
    {
        return Err(Error::InvalidAddress);
    }

    storage::set_config(
        env,
        &Config {
            owner,
            payment_token,
            reward_token,
            coupon_registry,
            voting_delay,
            token_reward_rate,
            quorum,
        },
    );
    Ok(())
}

pub fn load_config(env: &Env) -> Result<Config, Error> {
    storage::get_config(env).ok_or(Error::NotInitialized)
}

/// `caller` must sign and be the engine owner. Returns the config.
pub fn require_owner(env: &Env, caller: &Address) -> Result<Config, Error> {
    caller.require_auth();
    let config = load_config(env)?;
    if *caller != config.owner {
        return Err(Error::Unauthorized);
    }
    Ok(config)
}

pub fn set_reward_rate(env: &Env, caller: Address, rate: u32) -> Result<(), Error> {
    let mut config = require_owner(env, &caller)?;
    if rate == 0 {
        return Err(Error::InvalidParameters);
    }
    config.token_reward_rate = rate;
    storage::set_config(env, &config);
    events::emit_reward_rate_set(env, rate);
    Ok(())
}

pub fn transfer_ownership(env: &Env, caller: Address, new_owner: Address) -> Result<(), Error> {
    let mut config = require_owner(env, &caller)?;
    config.owner = new_owner;
    storage::set_config(env, &config);
    Ok(())
}

/// Pull the registry's unreserved balance back and forward it to the owner.
pub fn sweep_coupon_residual(env: &Env, caller: Address) -> Result<i128, Error> {
    let config = require_owner(env, &caller)?;
    let registry = collaborators::coupon_registry(env, &config)?;
    let payment = token::Client::new(env, &config.payment_token);

    let residual = payment.balance(&config.coupon_registry) - registry.reserved();
    if residual <= 0 {
        return Err(Error::InsufficientBalance);
    }

    let engine = env.current_contract_address();
    let swept = registry.withdraw_ether(&engine, &engine);
    payment.transfer(&engine, &config.owner, &swept);
    Ok(swept)
}
