//! # VERA Reward Token
//!
//! Fungible reward credited to donors of the Chain4Good pools. The token
//! carries no decimals: one unit is one vote of weight in project
//! governance.
//!
//! The deployer initialises the ledger with itself as owner and then hands
//! ownership to the donation engine with [`RewardToken::transfer_ownership`].
//! From then on only the engine can mint.
//!
//! | Phase      | Entry Point(s)                                  |
//! |------------|-------------------------------------------------|
//! | Bootstrap  | `init`, `transfer_ownership`                    |
//! | Issuance   | `mint`, `send_tokens`                           |
//! | Holders    | `transfer`                                      |
//! | Queries    | `balance`, `total_supply`, `owner`, metadata    |

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, symbol_short, Address, Env, String};

mod storage;


use storage::TokenMetadata;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InsufficientBalance = 5,
    Overflow = 6,
}

#[contract]
pub struct RewardToken;

#[contractimpl]
impl RewardToken {
    /// Initialise the ledger. `owner` must sign and becomes the only minter.
    pub fn init(env: Env, owner: Address, name: String, symbol: String) -> Result<(), Error> {
        if storage::has_owner(&env) {
            return Err(Error::AlreadyInitialized);
        }
        owner.require_auth();
        storage::set_owner(&env, &owner);
        storage::set_metadata(&env, &TokenMetadata { name, symbol });
        Ok(())
    }

    /// Hand the minting role to `new_owner`.
    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        storage::set_owner(&env, &new_owner);
        Ok(())
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        storage::get_owner(&env).ok_or(Error::NotInitialized)
    }

    /// Mint `amount` fresh tokens to `to`. Owner only.
    pub fn mint(env: Env, caller: Address, to: Address, amount: i128) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let balance = storage::get_balance(&env, &to)
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        let supply = storage::get_total_supply(&env)
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        storage::set_balance(&env, &to, balance);
        storage::set_total_supply(&env, supply);

        env.events().publish((symbol_short!("mint"), to), amount);
        Ok(())
    }

    /// Pay `amount` out of the tokens held by the contract itself. Owner only.
    pub fn send_tokens(env: Env, caller: Address, to: Address, amount: i128) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        move_balance(&env, &env.current_contract_address(), &to, amount)
    }

    /// Move `amount` from `from` to `to`; `from` must authorize.
    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), Error> {
        from.require_auth();
        move_balance(&env, &from, &to, amount)
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        storage::get_balance(&env, &id)
    }

    pub fn total_supply(env: Env) -> i128 {
        storage::get_total_supply(&env)
    }

    pub fn name(env: Env) -> Result<String, Error> {
        storage::get_metadata(&env)
            .map(|m| m.name)
            .ok_or(Error::NotInitialized)
    }

    pub fn symbol(env: Env) -> Result<String, Error> {
        storage::get_metadata(&env)
            .map(|m| m.symbol)
            .ok_or(Error::NotInitialized)
    }

    pub fn decimals(_env: Env) -> u32 {
        0
    }
}

/// `caller` must sign and be the stored owner.
fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    let owner = storage::get_owner(env).ok_or(Error::NotInitialized)?;
    if *caller != owner {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

fn move_balance(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    let from_balance = storage::get_balance(env, from);
    if from_balance < amount {
        return Err(Error::InsufficientBalance);
    }
    if from == to {
        return Ok(());
    }

    let to_balance = storage::get_balance(env, to)
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    storage::set_balance(env, from, from_balance - amount);
    storage::set_balance(env, to, to_balance);

    env.events()
        .publish((symbol_short!("transfer"), from.clone()), (to.clone(), amount));
    Ok(())
}
