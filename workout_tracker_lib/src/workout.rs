use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// The two workout variants with their derived metric. The metric is computed
/// once at construction and stored, never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutKind {
    Running { cadence: u32, pace: f64 },
    Cycling { elevation_gain: f64, speed: f64 },
}

impl WorkoutKind {
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutKind::Running { .. } => "running",
            WorkoutKind::Cycling { .. } => "cycling",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    pub timestamp: DateTime<Local>,
    pub coords: Coords,
    pub distance: f64,
    pub duration: f64,
    pub description: String,
    pub clicks: u32,
    #[serde(flatten)]
    pub kind: WorkoutKind,
}

impl Workout {
    /// Distance in km, duration in minutes, cadence in steps per minute.
    /// Pace is minutes per km.
    pub fn running(coords: Coords, distance: f64, duration: f64, cadence: u32) -> Self {
        let kind = WorkoutKind::Running {
            cadence,
            pace: duration / distance,
        };
        Self::new(coords, distance, duration, kind)
    }

    /// Elevation gain in meters. Speed is km/h.
    pub fn cycling(coords: Coords, distance: f64, duration: f64, elevation_gain: f64) -> Self {
        let kind = WorkoutKind::Cycling {
            elevation_gain,
            speed: distance / (duration / 60.0),
        };
        Self::new(coords, distance, duration, kind)
    }

    fn new(coords: Coords, distance: f64, duration: f64, kind: WorkoutKind) -> Self {
        let timestamp = Local::now();

        Self {
            id: Uuid::new_v4(),
            timestamp,
            coords,
            distance,
            duration,
            description: describe(&kind, timestamp),
            clicks: 0,
            kind,
        }
    }

    /// Records one selection of this workout in the list.
    pub fn click(&mut self) {
        self.clicks += 1;
    }
}

fn describe(kind: &WorkoutKind, timestamp: DateTime<Local>) -> String {
    let label = kind.label();
    let mut chars = label.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    };

    // Full month name, day of month without a leading zero.
    format!("{} on {}", capitalized, timestamp.format("%B %-d"))
}

#[test]
fn running_pace_is_duration_over_distance() {
    let workout = Workout::running(Coords::new(39.0, -12.0), 5.2, 24.0, 178);

    let WorkoutKind::Running { cadence, pace } = workout.kind else {
        panic!("expected a running workout");
    };
    assert_eq!(cadence, 178);
    assert_eq!(pace, 24.0 / 5.2);
}

#[test]
fn cycling_speed_is_distance_over_hours() {
    let workout = Workout::cycling(Coords::new(39.0, -12.0), 27.0, 95.0, 523.0);

    let WorkoutKind::Cycling { elevation_gain, speed } = workout.kind else {
        panic!("expected a cycling workout");
    };
    assert_eq!(elevation_gain, 523.0);
    assert_eq!(speed, 27.0 / (95.0 / 60.0));
}

#[test]
fn description_uses_month_name_and_unpadded_day() {
    use chrono::TimeZone;

    let kind = WorkoutKind::Running { cadence: 170, pace: 5.0 };
    let june = Local.with_ymd_and_hms(2024, 6, 5, 10, 30, 0).unwrap();
    assert_eq!(describe(&kind, june), "Running on June 5");

    let kind = WorkoutKind::Cycling { elevation_gain: 12.0, speed: 20.0 };
    let january = Local.with_ymd_and_hms(2025, 1, 9, 22, 0, 0).unwrap();
    assert_eq!(describe(&kind, january), "Cycling on January 9");
}

#[test]
fn description_matches_creation_timestamp() {
    let workout = Workout::running(Coords::new(39.0, -12.0), 5.0, 30.0, 160);

    assert_eq!(
        workout.description,
        format!("Running on {}", workout.timestamp.format("%B %-d"))
    );
}

#[test]
fn description_survives_clicks_unchanged() {
    let mut workout = Workout::cycling(Coords::new(39.0, -12.0), 10.0, 40.0, 80.0);
    let description = workout.description.clone();

    workout.click();
    workout.click();

    assert_eq!(workout.clicks, 2);
    assert_eq!(workout.description, description);
}

#[test]
fn workouts_created_back_to_back_get_distinct_ids_and_equal_descriptions() {
    let first = Workout::running(Coords::new(39.0, -12.0), 5.0, 25.0, 170);
    let second = Workout::running(Coords::new(39.0, -12.0), 5.0, 25.0, 170);

    assert_ne!(first.id, second.id);
    assert_eq!(first.description, second.description);
}

#[test]
fn serialized_records_are_flat_and_tagged() {
    let workout = Workout::running(Coords::new(39.0, -12.0), 5.2, 24.0, 178);
    let json = serde_json::to_value(&workout).unwrap();

    assert_eq!(json["type"], "running");
    assert_eq!(json["cadence"], 178);
    assert_eq!(json["distance"], 5.2);
    assert_eq!(json["coords"]["lat"], 39.0);
}
