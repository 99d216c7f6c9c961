use soroban_sdk::{contracttype, Address};

/// A minted, unredeemed coupon. Burned (removed) on redemption.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Coupon {
    pub token_id: u64,
    pub project_id: u64,
    /// Payment-asset amount paid out on redemption.
    pub value: i128,
    pub owner: Address,
}

/// Event payload for `mint`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CouponMinted {
    pub token_id: u64,
    pub project_id: u64,
    pub owner: Address,
    pub value: i128,
}

/// Event payload for `transfer`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CouponTransferred {
    pub token_id: u64,
    pub from: Address,
    pub to: Address,
}

/// Event payload for `redeemed`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CouponRedeemed {
    pub token_id: u64,
    pub project_id: u64,
    pub redeemer: Address,
    pub value: i128,
}
