//! Soroban RPC client: polls `getEvents` for the watched contracts and
//! decodes Chain4Good events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.
//!
//! ## Topic encoding
//!
//! Topics are requested in JSON form (`{"type":"symbol","value":"donated"}`).
//! Nodes that ignore `xdrFormat` answer with base64 XDR `ScVal`s instead;
//! those are parsed with `stellar-xdr` and the scalar shapes used as subjects
//! (`u32`, `u64`, symbols, strings) are read from them.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use stellar_xdr::curr::{Limits, ReadXdr, ScVal};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{status_name, EventKind, PoolEvent, Subject};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// Topic list, JSON-encoded `ScVal`s or base64 XDR.
    pub topic: Vec<String>,
    /// Event data.
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
    #[serde(rename = "pagingToken")]
    pub paging_token: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events emitted by any of `contract_ids`.
///
/// * `start_ledger` - the ledger sequence to scan from (inclusive).
/// * `cursor`       - optional opaque pagination cursor from a previous response.
/// * `limit`        - maximum number of events to return.
///
/// Returns `(events, next_cursor, latest_ledger)`.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_ids: &[String],
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<(Vec<RawEvent>, Option<String>, Option<u64>)> {
    let mut backoff = INITIAL_BACKOFF_SECS;

    loop {
        let params = build_params(contract_ids, start_ledger, cursor, limit);

        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params,
            }))
            .send()
            .await;

        match response {
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                tokio::time::sleep(Duration::from_secs(backoff)).await;
                backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                continue;
            }
            Ok(resp) => {
                if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    warn!("Rate-limited by RPC (will retry in {backoff}s)");
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                let body: RpcResponse = resp.json().await?;

                if let Some(err) = body.error {
                    // Invalid request / unknown method will not fix themselves.
                    if err.code == -32600 || err.code == -32601 {
                        return Err(IndexerError::Rpc {
                            code: err.code,
                            message: err.message,
                        });
                    }
                    warn!(
                        "RPC soft error (will retry in {backoff}s): {} {}",
                        err.code, err.message
                    );
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                let result = body.result.ok_or_else(|| {
                    IndexerError::EventParse("Empty result from getEvents".to_string())
                })?;

                debug!(
                    "Fetched {} events (latest_ledger={:?})",
                    result.events.len(),
                    result.latest_ledger
                );

                return Ok((result.events, result.cursor, result.latest_ledger));
            }
        }
    }
}

fn build_params(
    contract_ids: &[String],
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": contract_ids
            }
        ],
        "pagination": {
            "limit": limit
        },
        "xdrFormat": "json"
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode raw RPC events. Events from reverted calls are dropped.
pub fn decode_events(raw: &[RawEvent]) -> Vec<PoolEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call != Some(false))
        .filter_map(decode_single)
        .collect()
}

fn decode_single(raw: &RawEvent) -> Option<PoolEvent> {
    let first_topic = raw.topic.first()?;
    let coupon_payload = find_nested(&raw.value, "token_id").is_some();
    let kind = EventKind::from_topic(&extract_symbol(first_topic), coupon_payload);

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let mut event = PoolEvent {
        event_id: event_id(raw),
        event_type: kind.as_str().to_string(),
        ledger,
        timestamp,
        contract_id: raw.contract_id.clone().unwrap_or_default(),
        tx_hash: raw.tx_hash.clone(),
        ..PoolEvent::default()
    };

    if let Some(subject) = raw.topic.get(1).map(|t| extract_scalar(t)) {
        match kind.subject() {
            Subject::Pool => event.pool_id = Some(subject),
            Subject::Project => event.project_id = Some(subject),
            Subject::Coupon => event.token_id = Some(subject),
            Subject::Account => event.actor = Some(subject),
            Subject::None => {}
        }
    }

    decode_data(&raw.value, kind, &mut event);
    Some(event)
}

/// Fill the payload-derived columns of `event`.
fn decode_data(value: &Value, kind: EventKind, event: &mut PoolEvent) {
    match kind {
        EventKind::DonationReceived => {
            event.actor = extract_field(value, &["donor"]);
            event.amount = extract_field(value, &["amount"]);
        }
        EventKind::ProjectCreated => {
            event.actor = extract_field(value, &["ong"]);
            event.amount = extract_field(value, &["amount_required"]);
            event.pool_id = extract_field(value, &["pool"]);
            event.detail = extract_field(value, &["partner"]);
        }
        EventKind::ProjectVoted => {
            event.actor = extract_field(value, &["voter"]);
            event.amount = extract_field(value, &["weight"]);
            event.detail = extract_field(value, &["support"]);
        }
        EventKind::StatusChanged => {
            event.detail = extract_field(value, &["status"]).map(|code| {
                code.parse::<u64>()
                    .ok()
                    .and_then(status_name)
                    .map(String::from)
                    .unwrap_or(code)
            });
        }
        EventKind::CouponsCreated => {
            event.amount = extract_field(value, &["coupon_value"]);
            event.detail = extract_field(value, &["count"]);
        }
        EventKind::AssociationRegistered => {
            event.actor = extract_field(value, &["wallet"]).or(event.actor.take());
            event.detail = extract_field(value, &["name"]);
        }
        EventKind::AssociationApproved | EventKind::AssociationRejected => {
            if let Some(wallet) = scalar(value) {
                event.actor = Some(wallet);
            }
        }
        EventKind::RewardRateSet => {
            event.detail = scalar(value);
        }
        EventKind::CouponMinted => {
            event.token_id = extract_field(value, &["token_id"]);
            event.actor = extract_field(value, &["owner"]);
            event.amount = extract_field(value, &["value"]);
        }
        EventKind::CouponTransferred => {
            event.actor = extract_field(value, &["to"]);
            event.detail = extract_field(value, &["from"]);
        }
        EventKind::CouponBurned => {
            event.actor = scalar(value);
        }
        EventKind::CouponRedeemed => {
            event.token_id = extract_field(value, &["token_id"]);
            event.actor = extract_field(value, &["redeemer"]);
            event.amount = extract_field(value, &["value"]);
        }
        EventKind::ResidualWithdrawn | EventKind::RewardMinted => {
            event.amount = scalar(value);
        }
        EventKind::RewardTransferred => {
            // Payload is the `(to, amount)` tuple.
            let items = value
                .as_array()
                .or_else(|| value.get("value").and_then(Value::as_array));
            if let Some(items) = items {
                event.detail = items.first().and_then(scalar);
                event.amount = items.get(1).and_then(scalar);
            }
        }
        EventKind::Unknown => {}
    }
}

/// Stable identifier of an event. Falls back to a digest of its content when
/// the node does not report one.
fn event_id(raw: &RawEvent) -> String {
    raw.id
        .clone()
        .or_else(|| raw.paging_token.clone())
        .unwrap_or_else(|| {
            format!(
                "{}:{}:{}:{}",
                raw.ledger.unwrap_or(0),
                raw.tx_hash.as_deref().unwrap_or(""),
                raw.topic.join(","),
                raw.value
            )
        })
}

/// Render a JSON scalar, unwrapping `{"type":…,"value":…}` envelopes.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => map.get("value").and_then(scalar),
        _ => None,
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(found) = value.get(key).and_then(scalar) {
            return Some(found);
        }
        if let Some(found) = find_nested(value, key) {
            return Some(found);
        }
    }
    None
}

fn find_nested(value: &Value, key: &str) -> Option<String> {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                if k == key {
                    if let Some(found) = scalar(v) {
                        return Some(found);
                    }
                }
                if let Some(found) = find_nested(v, key) {
                    return Some(found);
                }
            }
            None
        }
        Value::Array(items) => items.iter().find_map(|v| find_nested(v, key)),
        _ => None,
    }
}

/// Extract the leading Soroban Symbol of an event.
fn extract_symbol(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = v.get("value").and_then(|x| x.as_str()) {
            return s.to_string();
        }
        if let Some(s) = v.get("symbol").and_then(|x| x.as_str()) {
            return s.to_string();
        }
    }
    if let Some(s) = decode_xdr_scalar(raw) {
        return s;
    }
    raw.to_string()
}

/// Extract a subject topic (pool, project id, token id or address).
fn extract_scalar(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = scalar(&v) {
            return s;
        }
        // Shorthand JSON form: `{"u64":"42"}`, `{"address":"G…"}`.
        if let Some(s) = v.as_object().and_then(|m| m.values().find_map(scalar)) {
            return s;
        }
    }
    if let Some(s) = decode_xdr_scalar(raw) {
        return s;
    }
    raw.to_string()
}

/// Decode a base64 XDR `ScVal` holding a `u32`, `u64`, symbol or string.
fn decode_xdr_scalar(raw: &str) -> Option<String> {
    match ScVal::from_xdr_base64(raw, Limits::none()).ok()? {
        ScVal::U32(n) => Some(n.to_string()),
        ScVal::U64(n) => Some(n.to_string()),
        ScVal::Symbol(sym) => sym.0.to_utf8_string().ok(),
        ScVal::String(s) => s.0.to_utf8_string().ok(),
        _ => None,
    }
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
