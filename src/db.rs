use crate::interest::InterestAction;
use crate::state::WalletState;
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One reduced interest action, as stored in the `events` table.
///
/// `event_type` is the action's wire tag (`FETCH_INTEREST_LIMITS_SUCCESS`),
/// `entity_id` the interest coin selected at the time or `"all"`, and `data`
/// the full serialized action including its payload.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Event {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub data: serde_json::Value,
    pub actor: String,
}

impl Event {
    pub fn new(
        event_type: &str,
        entity_type: &str,
        entity_id: &str,
        data: serde_json::Value,
        actor: &str,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            data,
            actor: actor.to_string(),
        }
    }
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // Snapshots Table (whole wallet state as JSON, append-only)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS snapshots (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            taken_at TEXT NOT NULL,
            payload TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Events Table (action log)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id TEXT UNIQUE NOT NULL,
            timestamp TEXT NOT NULL,
            event_type TEXT NOT NULL,
            entity_type TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            data TEXT NOT NULL,
            actor TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_entity ON events(entity_type, entity_id)",
        [],
    )?;

    Ok(())
}

/// Store a snapshot; returns its row id
pub fn save_snapshot(conn: &Connection, state: &WalletState) -> Result<i64> {
    let payload = state.to_json()?;

    conn.execute(
        "INSERT INTO snapshots (taken_at, payload) VALUES (?1, ?2)",
        params![Utc::now().to_rfc3339(), payload],
    )?;

    let id = conn.last_insert_rowid();
    info!(snapshot_id = id, "saved wallet state snapshot");
    Ok(id)
}

/// Most recent snapshot, if any was ever saved
pub fn load_latest_snapshot(conn: &Connection) -> Result<Option<WalletState>> {
    let payload: Option<String> = conn
        .query_row(
            "SELECT payload FROM snapshots ORDER BY id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    payload
        .map(|json| WalletState::from_json(&json).context("Stored snapshot is corrupt"))
        .transpose()
}

pub fn snapshot_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))?;

    Ok(count)
}

/// Append a reduced action to the log.
///
/// Timestamps are written as fixed-width UTC (`...000000Z`) so the text column
/// sorts chronologically.
pub fn insert_event(conn: &Connection, event: &Event) -> Result<()> {
    let data_json = serde_json::to_string(&event.data)?;

    conn.execute(
        "INSERT INTO events (
            event_id, timestamp, event_type, entity_type, entity_id, data, actor
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            event.event_id,
            event.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            event.event_type,
            event.entity_type,
            event.entity_id,
            data_json,
            event.actor,
        ],
    )?;

    Ok(())
}

/// Action history for one interest coin (or `"all"`), newest first.
/// Actions logged within the same microsecond keep insertion order reversed.
pub fn get_events_for_entity(
    conn: &Connection,
    entity_type: &str,
    entity_id: &str,
) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT event_id, timestamp, event_type, entity_type, entity_id, data, actor
         FROM events
         WHERE entity_type = ?1 AND entity_id = ?2
         ORDER BY timestamp DESC, id DESC",
    )?;

    let events = stmt
        .query_map(params![entity_type, entity_id], |row| {
            let timestamp_str: String = row.get(1)?;
            let data_json: String = row.get(5)?;

            Ok(Event {
                event_id: row.get(0)?,
                timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            1,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?
                    .with_timezone(&Utc),
                event_type: row.get(2)?,
                entity_type: row.get(3)?,
                entity_id: row.get(4)?,
                data: serde_json::from_str(&data_json).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        5,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?,
                actor: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(events)
}

/// Reduce an interest action into `state` and record it in the action log
pub fn apply_interest_action(
    conn: &Connection,
    state: &mut WalletState,
    action: InterestAction,
    actor: &str,
) -> Result<()> {
    let entity_id = state
        .interest
        .coin
        .as_ref()
        .map(|coin| coin.to_string())
        .unwrap_or_else(|| "all".to_string());
    let event = Event::new(
        action.action_type(),
        "interest",
        &entity_id,
        serde_json::to_value(&action)?,
        actor,
    );
    debug!(event_type = %event.event_type, entity_id = %entity_id, "logging interest action");

    state.apply_interest(action);
    insert_event(conn, &event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coins::CoinRegistry;
    use crate::remote::Remote;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    #[test]
    fn test_empty_database_has_no_snapshot() {
        let conn = memory_db();
        assert!(load_latest_snapshot(&conn).unwrap().is_none());
        assert_eq!(snapshot_count(&conn).unwrap(), 0);
    }

    #[test]
    fn test_latest_snapshot_wins() {
        let conn = memory_db();

        let first = WalletState::default();
        let mut second = WalletState::default();
        second.coins = CoinRegistry::new(vec!["USDC".into()], vec!["STX".into()]);
        second.erc20.eth_address = Remote::of("0xfeed".to_string());

        save_snapshot(&conn, &first).unwrap();
        let id = save_snapshot(&conn, &second).unwrap();

        assert_eq!(id, 2);
        assert_eq!(snapshot_count(&conn).unwrap(), 2);
        assert_eq!(load_latest_snapshot(&conn).unwrap(), Some(second));
    }

    #[test]
    fn test_setup_is_idempotent() {
        let conn = memory_db();
        setup_database(&conn).unwrap();
        save_snapshot(&conn, &WalletState::default()).unwrap();
        setup_database(&conn).unwrap();
        assert_eq!(snapshot_count(&conn).unwrap(), 1);
    }

    #[test]
    fn test_event_round_trip() {
        let conn = memory_db();
        let event = Event::new(
            "FETCH_INTEREST_LIMITS_FAILURE",
            "interest",
            "BTC",
            serde_json::json!({"error": "limits unavailable"}),
            "test",
        );
        insert_event(&conn, &event).unwrap();

        let events = get_events_for_entity(&conn, "interest", "BTC").unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_id, event.event_id);
        assert_eq!(events[0].data["error"], "limits unavailable");
        assert!(get_events_for_entity(&conn, "interest", "ETH").unwrap().is_empty());
    }

    #[test]
    fn test_events_newest_first_with_insertion_tiebreak() {
        use chrono::TimeZone;

        let conn = memory_db();
        let at = |minute| Utc.with_ymd_and_hms(2026, 1, 5, 10, minute, 0).unwrap();
        let logged = |event_type: &str, minute| {
            let mut event = Event::new(event_type, "interest", "BTC", serde_json::json!({}), "test");
            event.timestamp = at(minute);
            insert_event(&conn, &event).unwrap();
        };

        logged("FETCH_INTEREST_LIMITS", 5);
        logged("FETCH_INTEREST_LIMITS_LOADING", 10);
        logged("FETCH_INTEREST_LIMITS_SUCCESS", 10);
        // Late write of an older action
        logged("INITIALIZE_INTEREST", 0);

        let types: Vec<_> = get_events_for_entity(&conn, "interest", "BTC")
            .unwrap()
            .into_iter()
            .map(|event| event.event_type)
            .collect();
        assert_eq!(
            types,
            vec![
                "FETCH_INTEREST_LIMITS_SUCCESS",
                "FETCH_INTEREST_LIMITS_LOADING",
                "FETCH_INTEREST_LIMITS",
                "INITIALIZE_INTEREST",
            ]
        );
    }

    #[test]
    fn test_apply_interest_action_logs_and_reduces() {
        let conn = memory_db();
        let mut state = WalletState::default();

        apply_interest_action(
            &conn,
            &mut state,
            InterestAction::InitializeInterest { coin: "BTC".into() },
            "cli",
        )
        .unwrap();
        apply_interest_action(
            &conn,
            &mut state,
            InterestAction::FetchInterestBalanceLoading,
            "cli",
        )
        .unwrap();

        assert!(state.interest.account_balance.is_loading());

        let events = get_events_for_entity(&conn, "interest", "BTC").unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "FETCH_INTEREST_BALANCE_LOADING");
        assert_eq!(events[0].actor, "cli");

        let before_init = get_events_for_entity(&conn, "interest", "all").unwrap();
        assert_eq!(before_init[0].event_type, "INITIALIZE_INTEREST");
    }
}
