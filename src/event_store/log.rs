//! Event Log - append-only switch history
//!
//! An `EventLog` borrows the connection of an open transaction (see
//! `SwitchStore::write`), so a sequence of calls on one log commits or
//! rolls back as a unit.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

use crate::types::{is_wildcard, Mode, SwitchError, SwitchResult, SwitchStateChange};
use crate::utils::{from_micros, to_micros};

const SELECT_EVENTS: &str =
    "SELECT id, c_time, mode, group_name, locale FROM switch_state_change";

/// A row as stored, before decoding into a `SwitchStateChange`
struct EventRow {
    id: String,
    c_time: i64,
    mode: String,
    group: String,
    locale: String,
}

impl EventRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            c_time: row.get(1)?,
            mode: row.get(2)?,
            group: row.get(3)?,
            locale: row.get(4)?,
        })
    }

    fn decode(self) -> SwitchResult<SwitchStateChange> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| SwitchError::Corrupt(format!("event id '{}': {}", self.id, e)))?;
        let mode = self
            .mode
            .parse::<Mode>()
            .map_err(|_| SwitchError::Corrupt(format!("event {} has mode '{}'", id, self.mode)))?;
        Ok(SwitchStateChange {
            id,
            created_at: from_micros(self.c_time)?,
            mode,
            group: self.group,
            locale: self.locale,
        })
    }
}

/// The switch event log inside one transaction
pub struct EventLog<'c> {
    conn: &'c Connection,
}

impl<'c> EventLog<'c> {
    pub(crate) fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Append one event
    ///
    /// Fails with `Duplicate` if an event with the same id exists.
    pub fn append(&self, change: &SwitchStateChange) -> SwitchResult<()> {
        self.conn
            .execute(
                "INSERT INTO switch_state_change (id, c_time, mode, group_name, locale)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    change.id.to_string(),
                    to_micros(&change.created_at),
                    change.mode.as_str(),
                    change.group,
                    change.locale,
                ],
            )
            .map_err(|e| {
                SwitchError::from_insert(e, || {
                    format!("switch state change with id {}", change.id)
                })
            })?;
        Ok(())
    }

    /// Record a switch request
    ///
    /// A wildcard event first erases the whole log, so afterwards it is the
    /// only event. Returns the number of events erased.
    pub fn record_switch(&self, change: &SwitchStateChange) -> SwitchResult<usize> {
        let cleared = if is_wildcard(&change.group) {
            self.clear_all()?
        } else {
            0
        };
        self.append(change)?;
        debug!(id = %change.id, group = %change.group, mode = %change.mode, cleared, "recorded switch");
        Ok(cleared)
    }

    /// Look up one event by id
    pub fn get(&self, id: &Uuid) -> SwitchResult<SwitchStateChange> {
        let row = self
            .conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_EVENTS),
                [id.to_string()],
                EventRow::from_row,
            )
            .optional()?;
        match row {
            Some(row) => row.decode(),
            None => Err(SwitchError::NotFound(format!(
                "switch state change with id {}",
                id
            ))),
        }
    }

    /// Most recent event whose group equals `group` exactly
    ///
    /// No wildcard fallback happens here. Events with the same creation
    /// time are ordered by insertion.
    pub fn latest_for_group(&self, group: &str) -> SwitchResult<SwitchStateChange> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "{} WHERE group_name = ?1 ORDER BY c_time DESC, rowid DESC LIMIT 1",
                    SELECT_EVENTS
                ),
                [group],
                EventRow::from_row,
            )
            .optional()?;
        match row {
            Some(row) => row.decode(),
            None => Err(SwitchError::NotFound(format!(
                "no switch state change for group '{}'",
                group
            ))),
        }
    }

    /// Every group with at least one event, sorted by name
    pub fn distinct_groups(&self) -> SwitchResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT group_name FROM switch_state_change ORDER BY group_name")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut groups = Vec::new();
        for row in rows {
            groups.push(row?);
        }
        Ok(groups)
    }

    /// Remove every event of `group`; absent groups are not an error
    pub fn delete_for_group(&self, group: &str) -> SwitchResult<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM switch_state_change WHERE group_name = ?1", [group])?;
        Ok(deleted)
    }

    /// Remove every event
    pub fn clear_all(&self) -> SwitchResult<usize> {
        let deleted = self.conn.execute("DELETE FROM switch_state_change", [])?;
        Ok(deleted)
    }

    /// Swap the whole log for `events`
    ///
    /// Atomic together with the rest of the enclosing transaction.
    pub fn replace_all(&self, events: &[SwitchStateChange]) -> SwitchResult<()> {
        self.clear_all()?;
        for change in events {
            self.append(change)?;
        }
        Ok(())
    }

    /// All events, oldest first
    pub fn all_events(&self) -> SwitchResult<Vec<SwitchStateChange>> {
        self.query_events(&format!("{} ORDER BY c_time, rowid", SELECT_EVENTS), [])
    }

    /// All events of one group, oldest first
    pub fn events_for_group(&self, group: &str) -> SwitchResult<Vec<SwitchStateChange>> {
        self.query_events(
            &format!("{} WHERE group_name = ?1 ORDER BY c_time, rowid", SELECT_EVENTS),
            [group],
        )
    }

    pub fn count(&self) -> SwitchResult<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM switch_state_change", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn query_events<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> SwitchResult<Vec<SwitchStateChange>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, EventRow::from_row)?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row?.decode()?);
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_store::SwitchStore;
    use chrono::{Duration, Utc};

    fn at(offset_secs: i64) -> chrono::DateTime<Utc> {
        crate::utils::from_micros(1_700_000_000_000_000).unwrap() + Duration::seconds(offset_secs)
    }

    #[test]
    fn test_append_and_get() {
        let store = SwitchStore::open_in_memory().unwrap();
        let change = SwitchStateChange::new(Mode::Network, "lab1", "de-DE");

        store.write(|tx| tx.events().append(&change)).unwrap();

        let loaded = store.read(|tx| tx.events().get(&change.id)).unwrap();
        assert_eq!(loaded, change);
    }

    #[test]
    fn test_append_duplicate_id() {
        let store = SwitchStore::open_in_memory().unwrap();
        let change = SwitchStateChange::new(Mode::Local, "lab1", "");

        store.write(|tx| tx.events().append(&change)).unwrap();
        let result = store.write(|tx| tx.events().append(&change));

        assert!(matches!(result, Err(SwitchError::Duplicate(_))));
        assert_eq!(store.read(|tx| tx.events().count()).unwrap(), 1);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = SwitchStore::open_in_memory().unwrap();
        let result = store.read(|tx| tx.events().get(&Uuid::new_v4()));
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn test_latest_for_group_picks_newest() {
        let store = SwitchStore::open_in_memory().unwrap();
        let newest = SwitchStateChange::with_timestamp(Mode::Network, "lab1", "fr-FR", at(20));

        store
            .write(|tx| {
                let log = tx.events();
                log.append(&newest)?;
                log.append(&SwitchStateChange::with_timestamp(Mode::Local, "lab1", "", at(10)))?;
                log.append(&SwitchStateChange::with_timestamp(Mode::Local, "lab2", "", at(30)))
            })
            .unwrap();

        let latest = store.read(|tx| tx.events().latest_for_group("lab1")).unwrap();
        assert_eq!(latest, newest);
    }

    #[test]
    fn test_latest_for_group_has_no_wildcard_fallback() {
        let store = SwitchStore::open_in_memory().unwrap();
        store
            .write(|tx| tx.events().append(&SwitchStateChange::new(Mode::Network, "*", "")))
            .unwrap();

        let result = store.read(|tx| tx.events().latest_for_group("lab1"));
        assert!(matches!(result, Err(SwitchError::NotFound(_))));
    }

    #[test]
    fn test_latest_for_group_tie_goes_to_later_insert() {
        let store = SwitchStore::open_in_memory().unwrap();
        let second = SwitchStateChange::with_timestamp(Mode::Network, "lab1", "", at(0));

        store
            .write(|tx| {
                let log = tx.events();
                log.append(&SwitchStateChange::with_timestamp(Mode::Local, "lab1", "", at(0)))?;
                log.append(&second)
            })
            .unwrap();

        let latest = store.read(|tx| tx.events().latest_for_group("lab1")).unwrap();
        assert_eq!(latest.id, second.id);
    }

    #[test]
    fn test_distinct_groups_and_delete() {
        let store = SwitchStore::open_in_memory().unwrap();
        store
            .write(|tx| {
                let log = tx.events();
                log.append(&SwitchStateChange::new(Mode::Local, "lab2", ""))?;
                log.append(&SwitchStateChange::new(Mode::Local, "lab1", ""))?;
                log.append(&SwitchStateChange::new(Mode::Network, "lab1", ""))
            })
            .unwrap();

        let groups = store.read(|tx| tx.events().distinct_groups()).unwrap();
        assert_eq!(groups, vec!["lab1".to_string(), "lab2".to_string()]);

        let deleted = store.write(|tx| tx.events().delete_for_group("lab1")).unwrap();
        assert_eq!(deleted, 2);
        let deleted = store.write(|tx| tx.events().delete_for_group("lab1")).unwrap();
        assert_eq!(deleted, 0);

        let groups = store.read(|tx| tx.events().distinct_groups()).unwrap();
        assert_eq!(groups, vec!["lab2".to_string()]);
    }

    #[test]
    fn test_record_wildcard_clears_log() {
        let store = SwitchStore::open_in_memory().unwrap();
        let wildcard = SwitchStateChange::new(Mode::Network, "*", "en-US");

        let cleared = store
            .write(|tx| {
                let log = tx.events();
                log.record_switch(&SwitchStateChange::new(Mode::Local, "lab1", ""))?;
                log.record_switch(&SwitchStateChange::new(Mode::Local, "*", ""))?;
                log.record_switch(&SwitchStateChange::new(Mode::Local, "lab2", ""))?;
                log.record_switch(&wildcard)
            })
            .unwrap();

        assert_eq!(cleared, 2);
        let events = store.read(|tx| tx.events().all_events()).unwrap();
        assert_eq!(events, vec![wildcard]);
    }

    #[test]
    fn test_replace_all() {
        let store = SwitchStore::open_in_memory().unwrap();
        let keep = SwitchStateChange::new(Mode::Network, "lab3", "");

        store
            .write(|tx| {
                let log = tx.events();
                log.append(&SwitchStateChange::new(Mode::Local, "lab1", ""))?;
                log.append(&SwitchStateChange::new(Mode::Local, "lab2", ""))?;
                log.replace_all(std::slice::from_ref(&keep))
            })
            .unwrap();

        assert_eq!(store.read(|tx| tx.events().all_events()).unwrap(), vec![keep]);
    }

    #[test]
    fn test_events_for_group_oldest_first() {
        let store = SwitchStore::open_in_memory().unwrap();
        store
            .write(|tx| {
                let log = tx.events();
                log.append(&SwitchStateChange::with_timestamp(Mode::Network, "lab1", "", at(5)))?;
                log.append(&SwitchStateChange::with_timestamp(Mode::Local, "lab1", "", at(1)))
            })
            .unwrap();

        let history = store.read(|tx| tx.events().events_for_group("lab1")).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].mode, Mode::Local);
        assert_eq!(history[1].mode, Mode::Network);
    }
}
