//! Canonical event types published by the Chain4Good contracts.
//!
//! The donation engine, the coupon registry and the reward token each
//! publish `(symbol, subject)` topics. Two symbols are shared: `mint` and
//! `transfer` exist on both the registry and the reward token, and are told
//! apart by their payload (coupon payloads always carry a `token_id`).

use serde::{Deserialize, Serialize};

/// All recognised event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Engine: a donation was credited to a pool (`donated`).
    DonationReceived,
    /// Engine: a project was created (`created`).
    ProjectCreated,
    /// Engine: a donor voted on a project (`voted`).
    ProjectVoted,
    /// Engine: a project changed status (`status`).
    StatusChanged,
    /// Engine: an approved project was split into coupons (`coupons`).
    CouponsCreated,
    /// Engine: an association registered (`assoc_reg`).
    AssociationRegistered,
    /// Engine: an association was approved (`assoc_ok`).
    AssociationApproved,
    /// Engine: an association was rejected and removed (`assoc_rej`).
    AssociationRejected,
    /// Engine: the reward rate changed (`rate_set`).
    RewardRateSet,
    /// Registry: a coupon was minted (`mint` with a coupon payload).
    CouponMinted,
    /// Registry: a coupon changed holder (`transfer` with a coupon payload).
    CouponTransferred,
    /// Registry: a coupon was burned on redemption (`burn`).
    CouponBurned,
    /// Registry: a coupon was paid out (`redeemed`).
    CouponRedeemed,
    /// Registry: the unreserved residual was swept (`withdrawn`).
    ResidualWithdrawn,
    /// Reward token: tokens minted to a donor (`mint`).
    RewardMinted,
    /// Reward token: holder transfer (`transfer`).
    RewardTransferred,
    /// An event from a watched contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Classify an event from its leading topic symbol. `coupon_payload`
    /// resolves the symbols shared between the registry and the reward token.
    pub fn from_topic(topic: &str, coupon_payload: bool) -> Self {
        match topic {
            "donated" => Self::DonationReceived,
            "created" => Self::ProjectCreated,
            "voted" => Self::ProjectVoted,
            "status" => Self::StatusChanged,
            "coupons" => Self::CouponsCreated,
            "assoc_reg" => Self::AssociationRegistered,
            "assoc_ok" => Self::AssociationApproved,
            "assoc_rej" => Self::AssociationRejected,
            "rate_set" => Self::RewardRateSet,
            "mint" if coupon_payload => Self::CouponMinted,
            "mint" => Self::RewardMinted,
            "transfer" if coupon_payload => Self::CouponTransferred,
            "transfer" => Self::RewardTransferred,
            "burn" => Self::CouponBurned,
            "redeemed" => Self::CouponRedeemed,
            "withdrawn" => Self::ResidualWithdrawn,
            _ => Self::Unknown,
        }
    }

    /// Short identifier stored in the `event_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DonationReceived => "donation_received",
            Self::ProjectCreated => "project_created",
            Self::ProjectVoted => "project_voted",
            Self::StatusChanged => "status_changed",
            Self::CouponsCreated => "coupons_created",
            Self::AssociationRegistered => "association_registered",
            Self::AssociationApproved => "association_approved",
            Self::AssociationRejected => "association_rejected",
            Self::RewardRateSet => "reward_rate_set",
            Self::CouponMinted => "coupon_minted",
            Self::CouponTransferred => "coupon_transferred",
            Self::CouponBurned => "coupon_burned",
            Self::CouponRedeemed => "coupon_redeemed",
            Self::ResidualWithdrawn => "residual_withdrawn",
            Self::RewardMinted => "reward_minted",
            Self::RewardTransferred => "reward_transferred",
            Self::Unknown => "unknown",
        }
    }

    /// What the second topic identifies for this kind of event.
    pub fn subject(&self) -> Subject {
        match self {
            Self::DonationReceived => Subject::Pool,
            Self::ProjectCreated
            | Self::ProjectVoted
            | Self::StatusChanged
            | Self::CouponsCreated
            | Self::CouponMinted
            | Self::CouponRedeemed => Subject::Project,
            Self::CouponTransferred | Self::CouponBurned => Subject::Coupon,
            Self::AssociationRegistered
            | Self::AssociationApproved
            | Self::AssociationRejected
            | Self::RewardMinted
            | Self::RewardTransferred => Subject::Account,
            Self::RewardRateSet | Self::ResidualWithdrawn | Self::Unknown => Subject::None,
        }
    }
}

/// Meaning of an event's second topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Pool,
    Project,
    Coupon,
    Account,
    None,
}

/// A fully decoded event, ready to be stored in the database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolEvent {
    /// Stable RPC identifier; the deduplication key.
    pub event_id: String,
    pub event_type: String,
    pub project_id: Option<String>,
    pub pool_id: Option<String>,
    pub token_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    /// Kind-specific extra value: new status, vote direction, coupon count,
    /// association name, reward rate or transfer counterparty.
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// An event record as read back from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub project_id: Option<String>,
    pub pool_id: Option<String>,
    pub token_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

/// Names of the six donation pools, indexed by their on-chain encoding.
pub const POOL_NAMES: [&str; 6] = [
    "newborns",
    "respiratory_infections",
    "diarrheal_diseases",
    "malaria",
    "tuberculosis",
    "hiv",
];

/// Resolve a pool path segment given either as its number or its name.
pub fn parse_pool(raw: &str) -> Option<u32> {
    if let Ok(n) = raw.parse::<u32>() {
        return ((n as usize) < POOL_NAMES.len()).then_some(n);
    }
    let lower = raw.to_ascii_lowercase();
    POOL_NAMES
        .iter()
        .position(|name| *name == lower)
        .map(|i| i as u32)
}

/// Names of the project statuses, indexed by their on-chain encoding.
pub const STATUS_NAMES: [&str; 5] = ["pending", "approved", "rejected", "coupons_created", "closed"];

pub fn status_name(code: u64) -> Option<&'static str> {
    STATUS_NAMES.get(code as usize).copied()
}
