use soroban_sdk::{Address, Env, String, Vec};

use crate::admin;
use crate::events;
use crate::storage;
use crate::types::Association;
use crate::Error;

pub fn register_association(env: &Env, name: String, wallet: Address) -> Result<(), Error> {
    wallet.require_auth();
    admin::load_config(env)?;

    if name.is_empty() {
        return Err(Error::InvalidParameters);
    }
    if storage::load_association(env, &wallet).is_some() {
        return Err(Error::AlreadyExists);
    }

    storage::save_association(
        env,
        &wallet,
        &Association {
            name: name.clone(),
            is_approved: false,
        },
    );
    storage::push_association_wallet(env, &wallet);

    events::emit_association_registered(env, wallet, name);
    Ok(())
}

pub fn approve_association(env: &Env, caller: Address, wallet: Address) -> Result<(), Error> {
    admin::require_owner(env, &caller)?;

    let mut association = storage::load_association(env, &wallet).ok_or(Error::DoesNotExists)?;
    association.is_approved = true;
    storage::save_association(env, &wallet, &association);

    events::emit_association_approved(env, wallet);
    Ok(())
}

/// Rejection forgets the association entirely; the wallet may register again.
pub fn reject_association(env: &Env, caller: Address, wallet: Address) -> Result<(), Error> {
    admin::require_owner(env, &caller)?;

    if storage::load_association(env, &wallet).is_none() {
        return Err(Error::DoesNotExists);
    }
    storage::remove_association(env, &wallet);

    events::emit_association_rejected(env, wallet);
    Ok(())
}

pub fn get_association(env: &Env, wallet: Address) -> Result<(String, bool), Error> {
    let association = storage::load_association(env, &wallet).ok_or(Error::DoesNotExists)?;
    Ok((association.name, association.is_approved))
}

pub fn get_all_associations(
    env: &Env,
    offset: u32,
    limit: u32,
) -> (Vec<Association>, Vec<Address>) {
    let (start, end) = storage::page_range(storage::association_count(env), offset, limit);

    let mut records = Vec::new(env);
    let mut addresses = Vec::new(env);
    for i in start..end {
        let Some(wallet) = storage::association_at(env, i) else { continue };
        if let Some(association) = storage::load_association(env, &wallet) {
            records.push_back(association);
            addresses.push_back(wallet);
        }
    }
    (records, addresses)
}
