use std::{cell::RefCell, collections::HashMap};

use gloo_console::info;
use leaflet::{
    LatLng, Map, MapOptions, Marker, MouseEvent, Popup, PopupOptions, TileLayer, TileLayerOptions,
};
use uuid::Uuid;
use wasm_bindgen::prelude::Closure;
use web_sys::HtmlElement;
use workout_tracker_lib::{
    session::WorkoutMap,
    workout::{Coords, Workout, WorkoutKind},
};
use yew::Callback;

const TILE_URL: &str = "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Leaflet behind the session's map interface. Markers are kept per workout
/// id so delete and reset can take them down again.
pub struct LeafletMap {
    map: Map,
    markers: RefCell<HashMap<Uuid, Marker>>,
    _click_handler: Closure<dyn FnMut(MouseEvent)>,
}

impl LeafletMap {
    pub fn new(container: &HtmlElement, on_click: Callback<Coords>) -> Self {
        let map = Map::new_with_element(container, &MapOptions::default());
        add_tile_layer(&map);

        let click_handler = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let lat_lng = event.lat_lng();
            on_click.emit(Coords::new(lat_lng.lat(), lat_lng.lng()));
        });
        map.on("click", click_handler.as_ref());

        Self {
            map,
            markers: RefCell::new(HashMap::new()),
            _click_handler: click_handler,
        }
    }
}

impl WorkoutMap for LeafletMap {
    fn set_view(&self, center: Coords, zoom: f64) {
        self.map.set_view(&LatLng::new(center.lat, center.lng), zoom);
    }

    fn pan_to(&self, center: Coords, zoom: f64) {
        self.map.fly_to(&LatLng::new(center.lat, center.lng), zoom);
    }

    fn place_marker(&self, workout: &Workout) {
        let marker = Marker::new(&LatLng::new(workout.coords.lat, workout.coords.lng));
        marker.add_to(&self.map);

        let options = PopupOptions::default();
        options.set_max_width(250.0);
        options.set_min_width(100.0);
        options.set_auto_close(false);
        options.set_close_on_click(false);
        options.set_class_name(format!("{}-popup", workout.kind.label()));

        let popup = Popup::new(&options, None);
        popup.set_content(&format!("{} {}", kind_icon(&workout.kind), workout.description).into());
        marker.bind_popup(&popup);
        marker.open_popup();

        info!(format!("Placed marker for {}", workout.description));
        self.markers.borrow_mut().insert(workout.id, marker);
    }

    fn remove_marker(&self, id: Uuid) {
        if let Some(marker) = self.markers.borrow_mut().remove(&id) {
            marker.remove();
        }
    }

    fn clear_markers(&self) {
        for (_, marker) in self.markers.borrow_mut().drain() {
            marker.remove();
        }
    }
}

pub fn kind_icon(kind: &WorkoutKind) -> &'static str {
    match kind {
        WorkoutKind::Running { .. } => "🏃‍♂️",
        WorkoutKind::Cycling { .. } => "🚴‍♀️",
    }
}

fn add_tile_layer(map: &Map) {
    let options = TileLayerOptions::new();
    options.set_attribution(TILE_ATTRIBUTION.into());
    options.set_update_when_idle(true);
    TileLayer::new_options(TILE_URL, &options).add_to(map);
}
