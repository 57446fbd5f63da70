use uuid::Uuid;
use web_sys::{HtmlInputElement, KeyboardEvent, MouseEvent};
use workout_tracker_lib::workout::{Workout, WorkoutKind};
use yew::prelude::*;

use super::map_component::kind_icon;

#[derive(PartialEq, Properties, Clone)]
pub struct ListProps {
    pub workouts: Vec<Workout>,
    pub on_select: Callback<Uuid>,
    pub on_delete: Callback<Uuid>,
}

#[function_component]
pub fn WorkoutList(props: &ListProps) -> Html {
    html! {
        <ul class="workouts">
            { for props.workouts.iter().map(|workout| html! {
                <WorkoutEntry
                    key={workout.id.to_string()}
                    workout={workout.clone()}
                    on_select={props.on_select.clone()}
                    on_delete={props.on_delete.clone()}
                />
            }) }
        </ul>
    }
}

#[derive(PartialEq, Properties, Clone)]
struct EntryProps {
    workout: Workout,
    on_select: Callback<Uuid>,
    on_delete: Callback<Uuid>,
}

/// One list entry. The edit control reveals inline inputs whose confirmed
/// values replace the displayed numbers only; the backing record and the
/// persisted collection stay as they are, so a reload shows the originals
/// again.
#[function_component]
fn WorkoutEntry(props: &EntryProps) -> Html {
    let editing = use_state(|| false);
    let shown = use_state(|| Option::<[String; 4]>::None);

    let distance_ref = use_node_ref();
    let duration_ref = use_node_ref();
    let metric_ref = use_node_ref();
    let extra_ref = use_node_ref();

    let workout = &props.workout;
    let (metric_value, metric_unit, metric_icon, extra_value, extra_unit, extra_icon) =
        match workout.kind {
            WorkoutKind::Running { cadence, pace } => (
                format!("{pace:.1}"),
                "min/km",
                "⚡️",
                cadence.to_string(),
                "spm",
                "🦶🏼",
            ),
            WorkoutKind::Cycling {
                elevation_gain,
                speed,
            } => (
                format!("{speed:.1}"),
                "km/h",
                "⚡️",
                elevation_gain.to_string(),
                "m",
                "⛰",
            ),
        };

    let displayed: [String; 4] = match &*shown {
        Some(values) => values.clone(),
        None => [
            workout.distance.to_string(),
            workout.duration.to_string(),
            metric_value,
            extra_value,
        ],
    };

    let id = workout.id;
    let on_click = props.on_select.reform(move |_: MouseEvent| id);

    let on_delete = {
        let on_delete = props.on_delete.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            on_delete.emit(id);
        })
    };

    let toggle_edit = {
        let editing = editing.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            editing.set(!*editing);
        })
    };

    let swallow_click = Callback::from(|event: MouseEvent| event.stop_propagation());

    let confirm_edit = {
        let shown = shown.clone();
        let editing = editing.clone();
        let refs = [
            distance_ref.clone(),
            duration_ref.clone(),
            metric_ref.clone(),
            extra_ref.clone(),
        ];
        Callback::from(move |event: KeyboardEvent| {
            if event.key() != "Enter" {
                return;
            }
            event.prevent_default();

            let read = |node_ref: &NodeRef| {
                node_ref
                    .cast::<HtmlInputElement>()
                    .map(|input| input.value())
                    .unwrap_or_default()
            };
            shown.set(Some([
                read(&refs[0]),
                read(&refs[1]),
                read(&refs[2]),
                read(&refs[3]),
            ]));
            editing.set(false);
        })
    };

    html! {
        <li
            class={classes!("workout", format!("workout--{}", workout.kind.label()))}
            onclick={on_click}
        >
            <div class="workout__controls">
                <button class="workout__control workout__control--delete" onclick={on_delete}>
                    { "✕" }
                </button>
                <button class="workout__control workout__control--edit" onclick={toggle_edit}>
                    { "✎" }
                </button>
            </div>
            <h2 class="workout__title">{ &workout.description }</h2>
            <div class="workout__details">
                <span class="workout__icon">{ kind_icon(&workout.kind) }</span>
                <span class="workout__value">{ &displayed[0] }</span>
                <span class="workout__unit">{ "km" }</span>
            </div>
            <div class="workout__details">
                <span class="workout__icon">{ "⏱" }</span>
                <span class="workout__value">{ &displayed[1] }</span>
                <span class="workout__unit">{ "min" }</span>
            </div>
            <div class="workout__details">
                <span class="workout__icon">{ metric_icon }</span>
                <span class="workout__value">{ &displayed[2] }</span>
                <span class="workout__unit">{ metric_unit }</span>
            </div>
            <div class="workout__details">
                <span class="workout__icon">{ extra_icon }</span>
                <span class="workout__value">{ &displayed[3] }</span>
                <span class="workout__unit">{ extra_unit }</span>
            </div>
            if *editing {
                <div class="workout__edit" onclick={swallow_click} onkeydown={confirm_edit}>
                    <input class="workout__edit-input" placeholder="km" ref={distance_ref} />
                    <input class="workout__edit-input" placeholder="min" ref={duration_ref} />
                    <input class="workout__edit-input" placeholder={metric_unit} ref={metric_ref} />
                    <input class="workout__edit-input" placeholder={extra_unit} ref={extra_ref} />
                </div>
            }
        </li>
    }
}
