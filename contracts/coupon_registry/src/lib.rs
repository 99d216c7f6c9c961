//! # Coupon Registry
//!
//! Non-fungible, value-bearing coupons issued for approved Chain4Good
//! projects. Each coupon is backed one-for-one by payment-asset held in this
//! contract: the donation engine funds the registry, then asks it to mint
//! `count` coupons of `value` each to the project's partner. Redeeming a
//! coupon burns it and pays its value to the holder.
//!
//! | Phase      | Entry Point(s)                                      |
//! |------------|-----------------------------------------------------|
//! | Bootstrap  | `init`, `transfer_ownership`                        |
//! | Issuance   | `create_coupons`                                    |
//! | Holders    | `transfer`, `redeem_coupon`                         |
//! | Treasury   | `withdraw_ether`                                    |
//! | Queries    | `get_coupon_value`, `get_coupons_by_project`, ...   |
//!
//! ## Backing invariant
//!
//! `reserved` always equals the summed value of live coupons, and the
//! registry's payment-asset balance never drops below it. Issuance only
//! draws on the unreserved part of the balance and `withdraw_ether` only
//! sweeps that part.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, token, Address, Env, Vec,
};

mod storage;
mod types;


pub use types::{Coupon, CouponMinted, CouponRedeemed, CouponTransferred};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    InvalidParameters = 4,
    InsufficientBalance = 5,
    NonexistentCoupon = 6,
    NotCouponOwner = 7,
    Overflow = 8,
}

#[contract]
pub struct CouponRegistry;

#[contractimpl]
impl CouponRegistry {
    // ─────────────────────────────────────────────────────────
    // Bootstrap
    // ─────────────────────────────────────────────────────────

    /// Initialise the registry with its owner and the asset that backs coupons.
    pub fn init(env: Env, owner: Address, payment_token: Address) -> Result<(), Error> {
        if storage::has_owner(&env) {
            return Err(Error::AlreadyInitialized);
        }
        owner.require_auth();
        storage::set_owner(&env, &owner);
        storage::set_payment_token(&env, &payment_token);
        Ok(())
    }

    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        storage::set_owner(&env, &new_owner);
        Ok(())
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        storage::get_owner(&env).ok_or(Error::NotInitialized)
    }

    // ─────────────────────────────────────────────────────────
    // Issuance
    // ─────────────────────────────────────────────────────────

    /// Mint `count` coupons worth `value` each to `owner` for `project_id`.
    ///
    /// The unreserved payment-asset balance must already cover
    /// `count * value`. Returns the new token ids in mint order.
    pub fn create_coupons(
        env: Env,
        caller: Address,
        value: i128,
        project_id: u64,
        owner: Address,
        count: u32,
    ) -> Result<Vec<u64>, Error> {
        require_owner(&env, &caller)?;
        if value <= 0 || count == 0 {
            return Err(Error::InvalidParameters);
        }

        let total = value
            .checked_mul(count as i128)
            .ok_or(Error::Overflow)?;
        let reserved = storage::get_reserved(&env);
        let available = payment_balance(&env)? - reserved;
        if available < total {
            return Err(Error::InsufficientBalance);
        }

        let mut next_id = storage::get_next_token_id(&env);
        let mut project_coupons = storage::get_project_coupons(&env, project_id);
        let mut minted = Vec::new(&env);

        for _ in 0..count {
            let coupon = Coupon {
                token_id: next_id,
                project_id,
                value,
                owner: owner.clone(),
            };
            storage::save_coupon(&env, &coupon);
            project_coupons.push_back(next_id);
            minted.push_back(next_id);

            env.events().publish(
                (symbol_short!("mint"), project_id),
                CouponMinted {
                    token_id: next_id,
                    project_id,
                    owner: owner.clone(),
                    value,
                },
            );
            next_id = next_id.checked_add(1).ok_or(Error::Overflow)?;
        }

        storage::set_project_coupons(&env, project_id, &project_coupons);
        storage::set_next_token_id(&env, next_id);
        storage::set_reserved(&env, reserved + total);

        Ok(minted)
    }

    // ─────────────────────────────────────────────────────────
    // Holders
    // ─────────────────────────────────────────────────────────

    /// Hand coupon `token_id` from `from` to `to`.
    pub fn transfer(env: Env, from: Address, to: Address, token_id: u64) -> Result<(), Error> {
        from.require_auth();
        let mut coupon = storage::load_coupon(&env, token_id).ok_or(Error::NonexistentCoupon)?;
        if coupon.owner != from {
            return Err(Error::NotCouponOwner);
        }

        coupon.owner = to.clone();
        storage::save_coupon(&env, &coupon);

        env.events().publish(
            (symbol_short!("transfer"), token_id),
            CouponTransferred { token_id, from, to },
        );
        Ok(())
    }

    /// Burn coupon `token_id` and pay its value to `caller`, its holder.
    ///
    /// The coupon record and its reservation are removed before the payment
    /// leaves the contract.
    pub fn redeem_coupon(
        env: Env,
        caller: Address,
        token_id: u64,
        project_id: u64,
    ) -> Result<(), Error> {
        caller.require_auth();
        // Holder check comes first, for any live token.
        let coupon = storage::load_coupon(&env, token_id).ok_or(Error::NonexistentCoupon)?;
        if coupon.owner != caller {
            return Err(Error::NotCouponOwner);
        }
        if coupon.project_id != project_id {
            return Err(Error::NonexistentCoupon);
        }
        let token_address = storage::get_payment_token(&env).ok_or(Error::NotInitialized)?;

        storage::remove_coupon(&env, token_id);
        storage::remove_project_coupon(&env, project_id, token_id);
        storage::set_reserved(&env, storage::get_reserved(&env) - coupon.value);

        env.events()
            .publish((symbol_short!("burn"), token_id), caller.clone());

        token::Client::new(&env, &token_address).transfer(
            &env.current_contract_address(),
            &caller,
            &coupon.value,
        );

        env.events().publish(
            (symbol_short!("redeemed"), project_id),
            CouponRedeemed {
                token_id,
                project_id,
                redeemer: caller,
                value: coupon.value,
            },
        );
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Treasury
    // ─────────────────────────────────────────────────────────

    /// Sweep the balance not backing any live coupon to `to`. Owner only.
    ///
    /// Returns the amount swept.
    pub fn withdraw_ether(env: Env, caller: Address, to: Address) -> Result<i128, Error> {
        require_owner(&env, &caller)?;
        let token_address = storage::get_payment_token(&env).ok_or(Error::NotInitialized)?;

        let residual = payment_balance(&env)? - storage::get_reserved(&env);
        if residual <= 0 {
            return Err(Error::InsufficientBalance);
        }

        token::Client::new(&env, &token_address).transfer(
            &env.current_contract_address(),
            &to,
            &residual,
        );

        env.events()
            .publish((symbol_short!("withdrawn"),), residual);
        Ok(residual)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_coupon_value(env: Env, token_id: u64, project_id: u64) -> Result<i128, Error> {
        load_project_coupon(&env, token_id, project_id).map(|c| c.value)
    }

    /// Live coupons of `project_id` as parallel `(token_ids, values)` vectors.
    pub fn get_coupons_by_project(env: Env, project_id: u64) -> (Vec<u64>, Vec<i128>) {
        let ids = storage::get_project_coupons(&env, project_id);
        let mut values = Vec::new(&env);
        for id in ids.iter() {
            if let Some(coupon) = storage::load_coupon(&env, id) {
                values.push_back(coupon.value);
            }
        }
        (ids, values)
    }

    pub fn get_coupon(env: Env, token_id: u64) -> Result<Coupon, Error> {
        storage::load_coupon(&env, token_id).ok_or(Error::NonexistentCoupon)
    }

    pub fn owner_of(env: Env, token_id: u64) -> Result<Address, Error> {
        storage::load_coupon(&env, token_id)
            .map(|c| c.owner)
            .ok_or(Error::NonexistentCoupon)
    }

    pub fn next_token_id(env: Env) -> u64 {
        storage::get_next_token_id(&env)
    }

    /// Summed value of all live coupons.
    pub fn reserved(env: Env) -> i128 {
        storage::get_reserved(&env)
    }
}

fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    let owner = storage::get_owner(env).ok_or(Error::NotInitialized)?;
    if *caller != owner {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

fn payment_balance(env: &Env) -> Result<i128, Error> {
    let token_address = storage::get_payment_token(env).ok_or(Error::NotInitialized)?;
    Ok(token::Client::new(env, &token_address).balance(&env.current_contract_address()))
}

/// The live coupon `token_id`, provided it was minted for `project_id`.
fn load_project_coupon(env: &Env, token_id: u64, project_id: u64) -> Result<Coupon, Error> {
    match storage::load_coupon(env, token_id) {
        Some(coupon) if coupon.project_id == project_id => Ok(coupon),
        _ => Err(Error::NonexistentCoupon),
    }
}
