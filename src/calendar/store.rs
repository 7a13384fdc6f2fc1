use chrono::{NaiveDate, Utc};
use log::{debug, error, info, warn};

use super::error::{StoreError, StoreResult};
use super::event::{Event, EventId};
use super::storage::Storage;

/// Storage slot holding the whole event collection.
pub const EVENTS_KEY: &str = "events";

/// Owns the session's events and mirrors them to a storage slot.
pub struct EventStore {
    events: Vec<Event>,
    storage: Box<dyn Storage>,
    recovered_from_corrupt: bool,
}

impl EventStore {
    /// Read the prior snapshot. A missing slot starts empty; an unreadable one
    /// is set aside and also starts empty.
    pub fn load(storage: Box<dyn Storage>) -> StoreResult<Self> {
        let mut store = Self {
            events: Vec::new(),
            storage,
            recovered_from_corrupt: false,
        };

        let Some(raw) = store.storage.read(EVENTS_KEY)? else {
            info!("No stored events, starting empty");
            return Ok(store);
        };

        match serde_json::from_str::<Vec<Event>>(&raw) {
            Ok(events) => {
                info!("Loaded {} events", events.len());
                store.events = events;
            }
            Err(source) => {
                let err = StoreError::CorruptStorage {
                    key: EVENTS_KEY.to_string(),
                    source,
                };
                warn!("{}; starting with an empty calendar", err);
                if let Err(e) = store.storage.preserve_corrupt(EVENTS_KEY, &raw) {
                    error!("Could not keep a copy of the unreadable events: {}", e);
                }
                store.recovered_from_corrupt = true;
            }
        }

        Ok(store)
    }

    pub fn recovered_from_corrupt(&self) -> bool {
        self.recovered_from_corrupt
    }

    /// Serialize the full collection, replacing the previous snapshot.
    pub fn save(&mut self) -> StoreResult<()> {
        let snapshot = serde_json::to_string(&self.events)?;
        self.storage.write(EVENTS_KEY, &snapshot)?;
        debug!("Saved {} events", self.events.len());
        Ok(())
    }

    /// The caller supplies a fresh id (see [`EventStore::next_id`]).
    pub fn add(&mut self, event: Event) -> StoreResult<()> {
        info!("Adding event {} on {}", event.id, event.date);
        self.events.push(event);
        self.save()
    }

    /// Replace the record with the same id. Returns false, without writing,
    /// when there is none.
    pub fn edit(&mut self, updated: Event) -> StoreResult<bool> {
        let Some(slot) = self.events.iter_mut().find(|e| e.id == updated.id) else {
            debug!("Edit of unknown event {} ignored", updated.id);
            return Ok(false);
        };
        info!("Updating event {}", updated.id);
        *slot = updated;
        self.save()?;
        Ok(true)
    }

    /// Remove every record with `id`. Returns how many were removed.
    pub fn delete(&mut self, id: EventId) -> StoreResult<usize> {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        let removed = before - self.events.len();
        if removed == 0 {
            debug!("Delete of unknown event {} ignored", id);
            return Ok(0);
        }
        info!("Deleted event {}", id);
        self.save()?;
        Ok(removed)
    }

    pub fn find_by_date(&self, date: NaiveDate) -> Vec<&Event> {
        events_on(&self.events, date).collect()
    }

    #[allow(dead_code)]
    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Current time in milliseconds, bumped past any existing id.
    pub fn next_id(&self) -> EventId {
        let now = Utc::now().timestamp_millis();
        let max = self.events.iter().map(|e| e.id.value()).max();
        match max {
            Some(max) if max >= now => EventId::new(max + 1),
            _ => EventId::new(now),
        }
    }
}

/// Events whose date equals `date`, in stored order.
pub fn events_on(events: &[Event], date: NaiveDate) -> impl Iterator<Item = &Event> {
    events.iter().filter(move |e| e.date == date)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;
    use crate::calendar::storage::MemoryStorage;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn make_event(id: i64, date: NaiveDate, name: &str) -> Event {
        Event {
            id: EventId::new(id),
            date,
            start_time: hm(9, 0),
            end_time: hm(10, 0),
            name: name.to_string(),
            description: None,
        }
    }

    fn empty_store() -> (EventStore, MemoryStorage) {
        let storage = MemoryStorage::default();
        let store = EventStore::load(Box::new(storage.clone())).unwrap();
        (store, storage)
    }

    #[test]
    fn test_standup_scenario() {
        let (mut store, _) = empty_store();
        let day = ymd(2024, 6, 10);
        let standup = Event {
            id: store.next_id(),
            date: day,
            start_time: hm(9, 0),
            end_time: hm(9, 15),
            name: "Standup".to_string(),
            description: None,
        };

        store.add(standup.clone()).unwrap();
        assert_eq!(store.find_by_date(day), vec![&standup]);

        let longer = Event {
            end_time: hm(9, 30),
            ..standup.clone()
        };
        assert!(store.edit(longer).unwrap());
        let stored = store.get(standup.id).unwrap();
        assert_eq!(stored.end_time, hm(9, 30));
        assert_eq!(stored.start_time, standup.start_time);
        assert_eq!(stored.name, standup.name);
        assert_eq!(stored.date, standup.date);
        assert_eq!(stored.description, standup.description);

        assert_eq!(store.delete(standup.id).unwrap(), 1);
        assert!(store.find_by_date(day).is_empty());
    }

    #[test]
    fn test_added_event_survives_reload() {
        let (mut store, storage) = empty_store();
        let mut event = make_event(7, ymd(2024, 6, 10), "Dentist");
        event.description = Some("bring card".to_string());
        store.add(event.clone()).unwrap();

        let reloaded = EventStore::load(Box::new(storage)).unwrap();
        assert_eq!(reloaded.events(), &[event]);
        assert!(!reloaded.recovered_from_corrupt());
    }

    #[test]
    fn test_edit_only_touches_matching_record() {
        let (mut store, _) = empty_store();
        let a = make_event(1, ymd(2024, 6, 10), "A");
        let b = make_event(2, ymd(2024, 6, 11), "B");
        let c = make_event(3, ymd(2024, 6, 12), "C");
        for e in [&a, &b, &c] {
            store.add(e.clone()).unwrap();
        }

        let renamed = Event {
            name: "B2".to_string(),
            ..b.clone()
        };
        store.edit(renamed.clone()).unwrap();

        assert_eq!(store.events(), &[a, renamed, c]);
    }

    #[test]
    fn test_edit_unknown_id_is_silent_noop() {
        let (mut store, storage) = empty_store();
        store.add(make_event(1, ymd(2024, 6, 10), "A")).unwrap();
        let before = storage.snapshot(EVENTS_KEY);
        let writes = *storage.writes.borrow();

        let changed = store.edit(make_event(99, ymd(2024, 6, 10), "Ghost")).unwrap();

        assert!(!changed);
        assert_eq!(storage.snapshot(EVENTS_KEY), before);
        assert_eq!(*storage.writes.borrow(), writes);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_removes_all_duplicates_and_nothing_else() {
        let (mut store, _) = empty_store();
        store.add(make_event(1, ymd(2024, 6, 10), "A")).unwrap();
        store.add(make_event(2, ymd(2024, 6, 10), "B")).unwrap();
        store.add(make_event(1, ymd(2024, 6, 11), "A again")).unwrap();

        assert_eq!(store.delete(EventId::new(1)).unwrap(), 2);
        let names: Vec<&str> = store.events().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["B"]);

        assert_eq!(store.delete(EventId::new(1)).unwrap(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_find_by_date_is_exact_day_match() {
        let (mut store, _) = empty_store();
        store.add(make_event(1, ymd(2024, 6, 10), "A")).unwrap();
        store.add(make_event(2, ymd(2024, 6, 11), "B")).unwrap();
        store.add(make_event(3, ymd(2024, 6, 10), "C")).unwrap();

        let names: Vec<&str> = store
            .find_by_date(ymd(2024, 6, 10))
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "C"]);
        assert!(store.find_by_date(ymd(2025, 6, 10)).is_empty());
    }

    #[test]
    fn test_overlapping_and_inverted_times_are_allowed() {
        let (mut store, _) = empty_store();
        let day = ymd(2024, 6, 10);
        let mut inverted = make_event(1, day, "Backwards");
        inverted.start_time = hm(17, 0);
        inverted.end_time = hm(8, 0);
        store.add(inverted).unwrap();
        store.add(make_event(2, day, "Overlap")).unwrap();
        store.add(make_event(3, day, "Overlap")).unwrap();

        assert_eq!(store.find_by_date(day).len(), 3);
    }

    #[test]
    fn test_corrupt_snapshot_starts_empty_and_is_preserved() {
        let storage = MemoryStorage::with_snapshot(EVENTS_KEY, "{not json");
        let store = EventStore::load(Box::new(storage.clone())).unwrap();

        assert!(store.is_empty());
        assert!(store.recovered_from_corrupt());
        assert_eq!(storage.corrupt.borrow().as_slice(), ["{not json".to_string()]);
    }

    /// Serves a corrupt snapshot and refuses to back it up.
    struct UnwritableBackup;

    impl Storage for UnwritableBackup {
        fn read(&self, _key: &str) -> StoreResult<Option<String>> {
            Ok(Some("{not json".to_string()))
        }

        fn write(&mut self, _key: &str, _snapshot: &str) -> StoreResult<()> {
            Ok(())
        }

        fn preserve_corrupt(&mut self, key: &str, _raw: &str) -> StoreResult<()> {
            Err(StoreError::Io {
                path: format!("{}.corrupt.json", key).into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }
    }

    #[test]
    fn test_failed_corrupt_backup_still_starts_empty() {
        let store = EventStore::load(Box::new(UnwritableBackup)).unwrap();

        assert!(store.is_empty());
        assert!(store.recovered_from_corrupt());
    }

    #[test]
    fn test_edit_replaces_only_first_duplicate() {
        let (mut store, storage) = empty_store();
        let first = make_event(1, ymd(2024, 6, 10), "First");
        let second = make_event(1, ymd(2024, 6, 11), "Second");
        store.add(first.clone()).unwrap();
        store.add(second.clone()).unwrap();

        let renamed = Event {
            name: "Renamed".to_string(),
            ..first
        };
        assert!(store.edit(renamed.clone()).unwrap());

        assert_eq!(store.events(), &[renamed, second.clone()]);
        let raw = storage.snapshot(EVENTS_KEY).unwrap();
        let stored: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored[1], serde_json::to_value(&second).unwrap());
    }

    #[test]
    fn test_next_id_is_unique_even_with_future_ids() {
        let (mut store, _) = empty_store();
        let far_future = Utc::now().timestamp_millis() + 1_000_000;
        store.add(make_event(far_future, ymd(2024, 6, 10), "A")).unwrap();

        assert_eq!(store.next_id(), EventId::new(far_future + 1));
    }

    #[test]
    fn test_snapshot_is_a_json_array() {
        let (mut store, storage) = empty_store();
        store.add(make_event(5, ymd(2024, 6, 10), "A")).unwrap();

        let raw = storage.snapshot(EVENTS_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["date"], "2024-06-10");
        assert_eq!(value[0]["startTime"], "09:00");
    }
}
