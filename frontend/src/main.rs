use gloo_console::{error, info};
use gloo_utils::{document, window};
use uuid::Uuid;
use wasm_bindgen::{JsCast, prelude::Closure};
use web_sys::{Element, HtmlElement, Node};
use workout_tracker_lib::{
    session::{FormFields, Session},
    workout::Coords,
};
use yew::prelude::*;

use crate::{
    components::{map_component::LeafletMap, workout_form::WorkoutForm, workout_list::WorkoutList},
    storage::LocalStore,
};

mod components;
mod storage;

enum Msg {
    Position(Result<Coords, String>),
    MapClicked(Coords),
    Submit(FormFields),
    CancelForm,
    Select(Uuid),
    Delete(Uuid),
    ResetAll,
}

struct App {
    session: Session<LocalStore>,
    map: Option<LeafletMap>,
    container: HtmlElement,
}

impl App {
    fn render_map(&self) -> Html {
        let node: &Node = &self.container.clone().into();
        Html::VRef(node.clone())
    }
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let container: Element = document().create_element("div").unwrap();
        let container: HtmlElement = container.dyn_into().unwrap();
        container.set_class_name("map");

        let session = Session::new(LocalStore::new());
        info!(format!("Loaded {} stored workouts", session.workouts().len()));

        Self {
            session,
            map: None,
            container,
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            request_position(ctx.link().callback(Msg::Position));
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Position(Ok(coords)) => {
                let map = LeafletMap::new(&self.container, ctx.link().callback(Msg::MapClicked));
                self.session.position_found(coords, &map);
                self.map = Some(map);
                true
            }
            Msg::Position(Err(message)) => {
                error!(format!("Geolocation failed: {message}"));
                alert("Could not get your position");
                false
            }
            Msg::MapClicked(coords) => {
                self.session.map_clicked(coords);
                true
            }
            Msg::Submit(fields) => match self.session.submit(&fields, &self.map) {
                Ok(()) => true,
                Err(err) => {
                    alert(&err.to_string());
                    false
                }
            },
            Msg::CancelForm => {
                self.session.cancel_form();
                true
            }
            Msg::Select(id) => {
                self.session.select(id, &self.map);
                false
            }
            Msg::Delete(id) => {
                self.session.delete(id, &self.map);
                true
            }
            Msg::ResetAll => {
                self.session.reset(&self.map);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();

        html! {
            <>
                <div class="sidebar">
                    <h1 class="logo">{ "workout tracker" }</h1>
                    if self.session.pending_click().is_some() {
                        <WorkoutForm
                            on_submit={link.callback(Msg::Submit)}
                            on_cancel={link.callback(|()| Msg::CancelForm)}
                        />
                    }
                    <WorkoutList
                        workouts={self.session.workouts().to_vec()}
                        on_select={link.callback(Msg::Select)}
                        on_delete={link.callback(Msg::Delete)}
                    />
                    <button class="reset-all" onclick={link.callback(|_| Msg::ResetAll)}>
                        { "Reset all" }
                    </button>
                </div>
                { self.render_map() }
            </>
        }
    }
}

fn alert(message: &str) {
    let _ = window().alert_with_message(message);
}

fn request_position(on_result: Callback<Result<Coords, String>>) {
    let geolocation = match window().navigator().geolocation() {
        Ok(geolocation) => geolocation,
        Err(_) => {
            on_result.emit(Err("geolocation is not available".into()));
            return;
        }
    };

    let found = on_result.clone();
    let success = Closure::<dyn FnMut(web_sys::Position)>::new(move |position: web_sys::Position| {
        let coords = position.coords();
        found.emit(Ok(Coords::new(coords.latitude(), coords.longitude())));
    });

    let failure = Closure::<dyn FnMut(web_sys::PositionError)>::new(
        move |error: web_sys::PositionError| {
            on_result.emit(Err(error.message()));
        },
    );

    if geolocation
        .get_current_position_with_error_callback(
            success.as_ref().unchecked_ref(),
            Some(failure.as_ref().unchecked_ref()),
        )
        .is_err()
    {
        error!("Failed to request the device position");
    }

    // The callbacks outlive this function; the environment calls them once.
    success.forget();
    failure.forget();
}

fn main() {
    yew::Renderer::<App>::new().render();
}
