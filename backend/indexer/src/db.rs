//! Database layer: migrations, queries and cursor management.

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::info;

use crate::errors::Result;
use crate::events::{EventRecord, PoolEvent};

const SELECT_EVENTS: &str = r#"
    SELECT id, event_id, event_type, project_id, pool_id, token_id, actor, amount,
           detail, ledger, timestamp, contract_id, tx_hash, created_at
    FROM   events
"#;

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    let options = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);
    // Every connection to an in-memory database sees its own empty database.
    let max_connections = if url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Cursor helpers
// ─────────────────────────────────────────────────────────

/// Read the last-seen ledger from the cursor row.
/// Returns `0` when no cursor has been persisted yet.
pub async fn get_last_ledger(pool: &SqlitePool) -> Result<i64> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT last_ledger FROM indexer_cursor WHERE id = 1")
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(v,)| v).unwrap_or(0))
}

/// Persist the last-seen ledger and the pagination cursor, if any.
pub async fn save_cursor(
    pool: &SqlitePool,
    last_ledger: i64,
    last_cursor: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO indexer_cursor (id, last_ledger, last_cursor) VALUES (1, ?1, ?2)
        ON CONFLICT(id) DO UPDATE SET last_ledger = ?1, last_cursor = ?2
        "#,
    )
    .bind(last_ledger)
    .bind(last_cursor)
    .execute(pool)
    .await?;
    Ok(())
}

/// Read back the raw cursor string (used to resume pagination mid-ledger).
pub async fn get_cursor_string(pool: &SqlitePool) -> Result<Option<String>> {
    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT last_cursor FROM indexer_cursor WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    Ok(row.and_then(|(v,)| v))
}

// ─────────────────────────────────────────────────────────
// Event writes
// ─────────────────────────────────────────────────────────

/// Persist a batch of decoded events in one transaction. Events already
/// stored under the same `event_id` are silently ignored, so replays are
/// harmless. Returns the number of new rows.
pub async fn insert_events(pool: &SqlitePool, events: &[PoolEvent]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;
    for ev in events {
        let rows_affected = sqlx::query(
            r#"
            INSERT OR IGNORE INTO events
                (event_id, event_type, project_id, pool_id, token_id, actor, amount,
                 detail, ledger, timestamp, contract_id, tx_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&ev.event_id)
        .bind(&ev.event_type)
        .bind(&ev.project_id)
        .bind(&ev.pool_id)
        .bind(&ev.token_id)
        .bind(&ev.actor)
        .bind(&ev.amount)
        .bind(&ev.detail)
        .bind(ev.ledger)
        .bind(ev.timestamp)
        .bind(&ev.contract_id)
        .bind(&ev.tx_hash)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        count += rows_affected as usize;
    }
    tx.commit().await?;
    Ok(count)
}

// ─────────────────────────────────────────────────────────
// Event reads
// ─────────────────────────────────────────────────────────

/// Fetch all events for a given project, ordered by ledger ascending.
pub async fn get_events_for_project(
    pool: &SqlitePool,
    project_id: &str,
) -> Result<Vec<EventRecord>> {
    let sql = format!("{SELECT_EVENTS} WHERE project_id = ?1 ORDER BY ledger ASC, id ASC");
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .bind(project_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Fetch all events that concern a pool: its donations and the creation of
/// projects drawing on it.
pub async fn get_events_for_pool(pool: &SqlitePool, pool_id: u32) -> Result<Vec<EventRecord>> {
    let sql = format!("{SELECT_EVENTS} WHERE pool_id = ?1 ORDER BY ledger ASC, id ASC");
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .bind(pool_id.to_string())
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Fetch all events, ordered by ledger ascending.
pub async fn get_all_events(pool: &SqlitePool) -> Result<Vec<EventRecord>> {
    let sql = format!("{SELECT_EVENTS} ORDER BY ledger ASC, id ASC");
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(event_id: &str, event_type: &str, ledger: i64) -> PoolEvent {
        PoolEvent {
            event_id: event_id.to_string(),
            event_type: event_type.to_string(),
            ledger,
            contract_id: "CENGINE".to_string(),
            ..PoolEvent::default()
        }
    }

    #[tokio::test]
    async fn cursor_round_trip() {
        let pool = init_pool("sqlite::memory:").await.unwrap();
        assert_eq!(get_last_ledger(&pool).await.unwrap(), 0);
        assert_eq!(get_cursor_string(&pool).await.unwrap(), None);

        save_cursor(&pool, 1234, Some("cur-1")).await.unwrap();
        assert_eq!(get_last_ledger(&pool).await.unwrap(), 1234);
        assert_eq!(
            get_cursor_string(&pool).await.unwrap().as_deref(),
            Some("cur-1")
        );
    }

    #[tokio::test]
    async fn replayed_events_are_ignored() {
        let pool = init_pool("sqlite::memory:").await.unwrap();
        let batch = vec![
            event("a", "donation_received", 1),
            event("b", "coupon_minted", 2),
        ];

        assert_eq!(insert_events(&pool, &batch).await.unwrap(), 2);
        assert_eq!(insert_events(&pool, &batch).await.unwrap(), 0);
        assert_eq!(get_all_events(&pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn filters_by_project_and_pool() {
        let pool = init_pool("sqlite::memory:").await.unwrap();

        let mut donation = event("d", "donation_received", 5);
        donation.pool_id = Some("3".to_string());
        let mut created = event("c", "project_created", 6);
        created.project_id = Some("9".to_string());
        created.pool_id = Some("3".to_string());
        let mut status = event("s", "status_changed", 7);
        status.project_id = Some("9".to_string());
        let mut other = event("o", "donation_received", 4);
        other.pool_id = Some("1".to_string());

        insert_events(&pool, &[donation, created, status, other])
            .await
            .unwrap();

        let project: Vec<_> = get_events_for_project(&pool, "9")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.event_type)
            .collect();
        assert_eq!(project, vec!["project_created", "status_changed"]);

        let pool_events = get_events_for_pool(&pool, 3).await.unwrap();
        assert_eq!(pool_events.len(), 2);
        assert_eq!(pool_events[0].event_id, "d");

        let all = get_all_events(&pool).await.unwrap();
        assert_eq!(all[0].event_id, "o");
    }
}
