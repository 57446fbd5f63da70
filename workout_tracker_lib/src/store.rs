use std::collections::HashMap;

use uuid::Uuid;

use crate::workout::Workout;

/// The single entry holding the serialized workout collection.
pub const STORAGE_KEY: &str = "workouts";

/// String-keyed, string-valued persistence, so the session logic can run
/// against browser local storage or a plain in-memory map alike.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Owns the persisted snapshot: a JSON array of workout records under
/// [`STORAGE_KEY`], mirroring the in-memory collection after every mutation.
pub struct WorkoutStore<S> {
    backend: S,
}

impl<S: KeyValueStore> WorkoutStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// A missing or malformed entry reads as no workouts, never as an error.
    pub fn load(&self) -> Vec<Workout> {
        let Some(raw) = self.backend.get(STORAGE_KEY) else {
            return Vec::new();
        };

        serde_json::from_str(&raw).unwrap_or_default()
    }

    pub fn save(&mut self, workouts: &[Workout]) {
        let raw = serde_json::to_string(workouts).unwrap();
        self.backend.set(STORAGE_KEY, &raw);
    }

    /// Drops the matching record from the persisted collection, keeping the
    /// remaining records in their original relative order.
    pub fn delete(&mut self, id: Uuid) {
        let mut workouts = self.load();
        workouts.retain(|workout| workout.id != id);
        self.save(&workouts);
    }

    /// Removes the entry entirely.
    pub fn clear(&mut self) {
        self.backend.remove(STORAGE_KEY);
    }

    /// Hands the backend back, e.g. to rebuild a session on top of it.
    pub fn into_backend(self) -> S {
        self.backend
    }
}

#[cfg(test)]
fn sample_workouts() -> Vec<Workout> {
    use crate::workout::Coords;

    vec![
        Workout::running(Coords::new(39.0, -12.0), 5.2, 24.0, 178),
        Workout::cycling(Coords::new(39.1, -12.1), 27.0, 95.0, 523.0),
        Workout::running(Coords::new(39.2, -12.2), 10.0, 55.0, 164),
    ]
}

#[test]
fn snapshot_round_trips_records_in_order() {
    let workouts = sample_workouts();
    let mut store = WorkoutStore::new(MemoryStore::new());

    store.save(&workouts);
    let loaded = store.load();

    assert_eq!(loaded.len(), 3);
    for (loaded, original) in loaded.iter().zip(&workouts) {
        assert_eq!(loaded.id, original.id);
        assert_eq!(loaded.kind, original.kind);
        assert_eq!(loaded.coords, original.coords);
        assert_eq!(loaded.distance, original.distance);
        assert_eq!(loaded.duration, original.duration);
    }
}

#[test]
fn missing_entry_loads_as_empty() {
    let store = WorkoutStore::new(MemoryStore::new());
    assert!(store.load().is_empty());
}

#[test]
fn malformed_entry_loads_as_empty() {
    let mut backend = MemoryStore::new();
    backend.set(STORAGE_KEY, "definitely not json");
    assert!(WorkoutStore::new(backend).load().is_empty());

    let mut backend = MemoryStore::new();
    backend.set(STORAGE_KEY, r#"{"unexpected": "shape"}"#);
    assert!(WorkoutStore::new(backend).load().is_empty());
}

#[test]
fn deleting_the_middle_record_keeps_the_rest_in_order() {
    let workouts = sample_workouts();
    let mut store = WorkoutStore::new(MemoryStore::new());
    store.save(&workouts);

    store.delete(workouts[1].id);

    let remaining = store.load();
    assert_eq!(remaining.len(), 2);
    assert_eq!(remaining[0].id, workouts[0].id);
    assert_eq!(remaining[1].id, workouts[2].id);
}

#[test]
fn clear_removes_the_entry() {
    let mut store = WorkoutStore::new(MemoryStore::new());
    store.save(&sample_workouts());
    assert!(store.backend.get(STORAGE_KEY).is_some());

    store.clear();
    assert!(store.backend.get(STORAGE_KEY).is_none());
}
