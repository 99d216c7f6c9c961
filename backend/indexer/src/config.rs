//! Application configuration loaded from environment variables.

use crate::errors::{IndexerError, Result};

/// `getEvents` accepts at most this many contract ids per filter.
pub const MAX_CONTRACT_IDS: usize = 5;

#[derive(Debug, Clone)]
pub struct Config {
    /// Soroban RPC endpoint (e.g. https://soroban-testnet.stellar.org)
    pub rpc_url: String,
    /// Watched contracts (Strkey format): engine, coupon registry, reward token.
    pub contract_ids: Vec<String>,
    /// Path to the SQLite database file
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// How often (in seconds) to poll the RPC for new events
    pub poll_interval_secs: u64,
    /// Maximum number of events to fetch per RPC request
    pub events_per_page: u32,
    /// Ledger to start from if no cursor is saved
    pub start_ledger: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let contract_ids = env_var("CONTRACT_IDS").map_err(|_| {
            IndexerError::Config("CONTRACT_IDS environment variable is required".to_string())
        })?;

        Ok(Config {
            rpc_url: env_var("RPC_URL")
                .unwrap_or_else(|_| "https://soroban-testnet.stellar.org".to_string()),
            contract_ids: parse_contract_ids(&contract_ids)?,
            database_url: env_var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./chain4good_events.db".to_string()),
            api_port: parse_or("API_PORT", 3001)?,
            poll_interval_secs: parse_or("POLL_INTERVAL_SECS", 5)?,
            events_per_page: parse_or("EVENTS_PER_PAGE", 100)?,
            start_ledger: parse_or("START_LEDGER", 0)?,
        })
    }
}

/// Split a comma-separated id list, ignoring blanks and duplicates.
pub fn parse_contract_ids(raw: &str) -> Result<Vec<String>> {
    let mut ids: Vec<String> = Vec::new();
    for id in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_string());
        }
    }

    if ids.is_empty() {
        return Err(IndexerError::Config(
            "CONTRACT_IDS must name at least one contract".to_string(),
        ));
    }
    if ids.len() > MAX_CONTRACT_IDS {
        return Err(IndexerError::Config(format!(
            "CONTRACT_IDS accepts at most {MAX_CONTRACT_IDS} contracts, got {}",
            ids.len()
        )));
    }
    Ok(ids)
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env_var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| IndexerError::Config(format!("Invalid {key}"))),
        Err(_) => Ok(default),
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| IndexerError::Config(format!("Missing env var: {key}")))
}
