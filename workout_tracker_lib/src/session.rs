use thiserror::Error;
use uuid::Uuid;

use crate::{
    store::{KeyValueStore, WorkoutStore},
    workout::{Coords, Workout},
};

pub const MAP_ZOOM: f64 = 13.0;

/// The map service consumed by the session. The frontend backs this with
/// Leaflet; tests substitute a recording double.
pub trait WorkoutMap {
    fn set_view(&self, center: Coords, zoom: f64);
    /// Animated re-center.
    fn pan_to(&self, center: Coords, zoom: f64);
    fn place_marker(&self, workout: &Workout);
    fn remove_marker(&self, id: Uuid);
    fn clear_markers(&self);
}

/// Before the device position arrives there is no map. Map work is simply
/// skipped then; everything else keeps working.
impl<M: WorkoutMap> WorkoutMap for Option<M> {
    fn set_view(&self, center: Coords, zoom: f64) {
        if let Some(map) = self {
            map.set_view(center, zoom);
        }
    }

    fn pan_to(&self, center: Coords, zoom: f64) {
        if let Some(map) = self {
            map.pan_to(center, zoom);
        }
    }

    fn place_marker(&self, workout: &Workout) {
        if let Some(map) = self {
            map.place_marker(workout);
        }
    }

    fn remove_marker(&self, id: Uuid) {
        if let Some(map) = self {
            map.remove_marker(id);
        }
    }

    fn clear_markers(&self) {
        if let Some(map) = self {
            map.clear_markers();
        }
    }
}

/// Raw field values as read from the form controls.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormFields {
    pub kind: String,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Inputs have to be positive numbers!")]
    NotPositiveNumbers,
    #[error("Unknown workout type")]
    UnknownKind,
    #[error("Pick a spot on the map first")]
    NoPendingLocation,
}

/// All controller state in one place: the store, the ordered in-memory
/// collection (insertion order = display order) and the map click waiting
/// for its form submission.
pub struct Session<S: KeyValueStore> {
    store: WorkoutStore<S>,
    workouts: Vec<Workout>,
    pending_click: Option<Coords>,
}

impl<S: KeyValueStore> Session<S> {
    /// Loads the persisted collection. Markers are not placed for loaded
    /// workouts; only the list shows them until new ones are recorded.
    pub fn new(backend: S) -> Self {
        let store = WorkoutStore::new(backend);
        let workouts = store.load();

        Self {
            store,
            workouts,
            pending_click: None,
        }
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    /// The form is open exactly while a clicked coordinate is pending.
    pub fn pending_click(&self) -> Option<Coords> {
        self.pending_click
    }

    pub fn position_found(&self, coords: Coords, map: &impl WorkoutMap) {
        map.set_view(coords, MAP_ZOOM);
    }

    pub fn map_clicked(&mut self, coords: Coords) {
        self.pending_click = Some(coords);
    }

    pub fn cancel_form(&mut self) {
        self.pending_click = None;
    }

    /// Validates the form and records the workout: append, marker with popup,
    /// persist the whole collection. On error nothing changes and nothing is
    /// written.
    pub fn submit(
        &mut self,
        fields: &FormFields,
        map: &impl WorkoutMap,
    ) -> Result<(), InputError> {
        let coords = self.pending_click.ok_or(InputError::NoPendingLocation)?;

        let distance = coerce(&fields.distance);
        let duration = coerce(&fields.duration);

        let workout = match fields.kind.as_str() {
            "running" => {
                let cadence = coerce(&fields.cadence);
                if !all_finite(&[distance, duration, cadence])
                    || !all_positive(&[distance, duration, cadence])
                {
                    return Err(InputError::NotPositiveNumbers);
                }
                Workout::running(coords, distance, duration, cadence as u32)
            }
            "cycling" => {
                let elevation = coerce(&fields.elevation);
                // Elevation gain only has to be finite; zero and negative
                // values pass.
                if !all_finite(&[distance, duration, elevation])
                    || !all_positive(&[distance, duration])
                {
                    return Err(InputError::NotPositiveNumbers);
                }
                Workout::cycling(coords, distance, duration, elevation)
            }
            _ => return Err(InputError::UnknownKind),
        };

        map.place_marker(&workout);
        self.workouts.push(workout);
        self.store.save(&self.workouts);
        self.pending_click = None;

        Ok(())
    }

    /// Centers the map on the workout and counts the selection. Click counts
    /// stay session-local; the store is not touched here.
    pub fn select(&mut self, id: Uuid, map: &impl WorkoutMap) {
        if let Some(workout) = self.workouts.iter_mut().find(|w| w.id == id) {
            workout.click();
            map.pan_to(workout.coords, MAP_ZOOM);
        }
    }

    /// Removes the record from the persisted collection and reloads the
    /// in-memory collection from it, so both stay in step.
    pub fn delete(&mut self, id: Uuid, map: &impl WorkoutMap) {
        self.store.delete(id);
        self.workouts = self.store.load();
        map.remove_marker(id);
    }

    pub fn reset(&mut self, map: &impl WorkoutMap) {
        self.store.clear();
        self.workouts.clear();
        map.clear_markers();
    }
}

/// Form-style numeric coercion: an empty field reads as zero, anything
/// non-numeric as NaN (and NaN fails the finite check).
fn coerce(field: &str) -> f64 {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        0.0
    } else {
        trimmed.parse().unwrap_or(f64::NAN)
    }
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|value| value.is_finite())
}

fn all_positive(values: &[f64]) -> bool {
    values.iter().all(|value| *value > 0.0)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::store::{MemoryStore, STORAGE_KEY};
    use crate::workout::WorkoutKind;

    #[derive(Default)]
    struct RecordingMap {
        events: RefCell<Vec<String>>,
    }

    impl RecordingMap {
        fn events(&self) -> Vec<String> {
            self.events.borrow().clone()
        }
    }

    impl WorkoutMap for RecordingMap {
        fn set_view(&self, center: Coords, zoom: f64) {
            self.events
                .borrow_mut()
                .push(format!("set_view {} {} {zoom}", center.lat, center.lng));
        }

        fn pan_to(&self, center: Coords, zoom: f64) {
            self.events
                .borrow_mut()
                .push(format!("pan_to {} {} {zoom}", center.lat, center.lng));
        }

        fn place_marker(&self, workout: &Workout) {
            self.events
                .borrow_mut()
                .push(format!("marker {}", workout.id));
        }

        fn remove_marker(&self, id: Uuid) {
            self.events.borrow_mut().push(format!("remove {id}"));
        }

        fn clear_markers(&self) {
            self.events.borrow_mut().push("clear".to_string());
        }
    }

    fn running_fields(distance: &str) -> FormFields {
        FormFields {
            kind: "running".into(),
            distance: distance.into(),
            duration: "24".into(),
            cadence: "178".into(),
            elevation: String::new(),
        }
    }

    fn cycling_fields(distance: &str, elevation: &str) -> FormFields {
        FormFields {
            kind: "cycling".into(),
            distance: distance.into(),
            duration: "95".into(),
            cadence: String::new(),
            elevation: elevation.into(),
        }
    }

    fn session_with_pending() -> Session<MemoryStore> {
        let mut session = Session::new(MemoryStore::new());
        session.map_clicked(Coords::new(39.0, -12.0));
        session
    }

    #[test]
    fn submit_records_running_workout() {
        let mut session = session_with_pending();
        let map = RecordingMap::default();

        session.submit(&running_fields("5.2"), &map).unwrap();

        assert_eq!(session.workouts().len(), 1);
        let workout = &session.workouts()[0];
        assert_eq!(workout.distance, 5.2);
        let WorkoutKind::Running { cadence, pace } = workout.kind else {
            panic!("expected a running workout");
        };
        assert_eq!(cadence, 178);
        assert_eq!(pace, 24.0 / 5.2);

        // Marker placed, form closed, collection persisted.
        assert_eq!(map.events(), vec![format!("marker {}", workout.id)]);
        assert!(session.pending_click().is_none());
        assert_eq!(session.store.load().len(), 1);
    }

    #[test]
    fn submit_rejects_negative_distance_without_state_change() {
        for fields in [running_fields("-1"), cycling_fields("-1", "523")] {
            let mut session = session_with_pending();
            let map = RecordingMap::default();

            let result = session.submit(&fields, &map);

            assert_eq!(result, Err(InputError::NotPositiveNumbers));
            assert!(session.workouts().is_empty());
            assert!(session.store.load().is_empty());
            assert!(map.events().is_empty());
            // The click stays pending, so the form stays open.
            assert!(session.pending_click().is_some());
        }
    }

    #[test]
    fn submit_rejects_garbage_and_missing_required_fields() {
        let mut session = session_with_pending();
        let map = RecordingMap::default();

        assert!(session.submit(&running_fields("abc"), &map).is_err());

        // An empty cadence coerces to zero, which is not positive.
        let mut fields = running_fields("5.2");
        fields.cadence = String::new();
        assert!(session.submit(&fields, &map).is_err());

        assert!(session.workouts().is_empty());
    }

    #[test]
    fn cycling_accepts_zero_and_negative_elevation() {
        let mut session = session_with_pending();
        let map = RecordingMap::default();

        session.submit(&cycling_fields("27", ""), &map).unwrap();
        session.map_clicked(Coords::new(39.0, -12.0));
        session.submit(&cycling_fields("27", "-40"), &map).unwrap();

        let gains: Vec<f64> = session
            .workouts()
            .iter()
            .map(|workout| match workout.kind {
                WorkoutKind::Cycling { elevation_gain, .. } => elevation_gain,
                WorkoutKind::Running { .. } => panic!("expected cycling"),
            })
            .collect();
        assert_eq!(gains, vec![0.0, -40.0]);
    }

    #[test]
    fn submit_without_map_click_is_rejected() {
        let mut session = Session::new(MemoryStore::new());
        let map = RecordingMap::default();

        let result = session.submit(&running_fields("5.2"), &map);

        assert_eq!(result, Err(InputError::NoPendingLocation));
    }

    #[test]
    fn select_counts_clicks_and_pans() {
        let mut session = session_with_pending();
        let map = RecordingMap::default();
        session.submit(&running_fields("5.2"), &map).unwrap();
        let id = session.workouts()[0].id;

        session.select(id, &map);
        session.select(id, &map);

        assert_eq!(session.workouts()[0].clicks, 2);
        assert_eq!(
            map.events().last().unwrap(),
            &format!("pan_to 39 -12 {MAP_ZOOM}")
        );
    }

    #[test]
    fn delete_drops_record_marker_and_persisted_entry() {
        let mut session = session_with_pending();
        let map = RecordingMap::default();
        session.submit(&running_fields("5.2"), &map).unwrap();
        session.map_clicked(Coords::new(40.0, -11.0));
        session.submit(&cycling_fields("27", "523"), &map).unwrap();
        let deleted = session.workouts()[0].id;
        let kept = session.workouts()[1].id;

        session.delete(deleted, &map);

        assert_eq!(session.workouts().len(), 1);
        assert_eq!(session.workouts()[0].id, kept);
        assert_eq!(session.store.load().len(), 1);
        assert!(map.events().contains(&format!("remove {deleted}")));
    }

    #[test]
    fn reset_clears_collection_and_store_entry() {
        let mut session = session_with_pending();
        let map = RecordingMap::default();
        session.submit(&running_fields("5.2"), &map).unwrap();

        session.reset(&map);

        assert!(session.workouts().is_empty());
        // The entry itself is gone, not just emptied.
        assert!(session.store.into_backend().get(STORAGE_KEY).is_none());
        assert!(map.events().contains(&"clear".to_string()));
    }

    #[test]
    fn new_session_reloads_persisted_workouts() {
        let mut first = session_with_pending();
        let map = RecordingMap::default();
        first.submit(&running_fields("5.2"), &map).unwrap();
        let backend = first.store.into_backend();

        let reloaded = Session::new(backend);

        assert_eq!(reloaded.workouts().len(), 1);
        assert_eq!(reloaded.workouts()[0].distance, 5.2);
    }

    #[test]
    fn malformed_persisted_entry_reads_as_no_workouts() {
        let mut backend = MemoryStore::new();
        backend.set(STORAGE_KEY, "{{{");

        let session = Session::new(backend);

        assert!(session.workouts().is_empty());
    }
}
