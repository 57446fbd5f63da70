use web_sys::{HtmlInputElement, HtmlSelectElement, KeyboardEvent};
use workout_tracker_lib::session::FormFields;
use yew::prelude::*;

#[derive(PartialEq, Properties, Clone)]
pub struct FormProps {
    pub on_submit: Callback<FormFields>,
    pub on_cancel: Callback<()>,
}

/// The workout entry form. Mounted only while a map click is pending, so its
/// field state starts out blank for every new workout.
#[function_component]
pub fn WorkoutForm(props: &FormProps) -> Html {
    let kind = use_state(|| "running".to_string());
    let distance = use_state(String::new);
    let duration = use_state(String::new);
    let cadence = use_state(String::new);
    let elevation = use_state(String::new);

    let distance_ref = use_node_ref();
    {
        let distance_ref = distance_ref.clone();
        use_effect_with((), move |_| {
            if let Some(input) = distance_ref.cast::<HtmlInputElement>() {
                let _ = input.focus();
            }
        });
    }

    let on_kind_change = {
        let kind = kind.clone();
        Callback::from(move |event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            kind.set(select.value());
        })
    };

    let on_submit = {
        let on_submit = props.on_submit.clone();
        let kind = kind.clone();
        let distance = distance.clone();
        let duration = duration.clone();
        let cadence = cadence.clone();
        let elevation = elevation.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            on_submit.emit(FormFields {
                kind: (*kind).clone(),
                distance: (*distance).clone(),
                duration: (*duration).clone(),
                cadence: (*cadence).clone(),
                elevation: (*elevation).clone(),
            });
        })
    };

    let on_keydown = {
        let on_cancel = props.on_cancel.clone();
        Callback::from(move |event: KeyboardEvent| {
            if event.key() == "Escape" {
                on_cancel.emit(());
            }
        })
    };

    let is_running = *kind == "running";

    html! {
        <form class="form" onsubmit={on_submit} onkeydown={on_keydown}>
            <div class="form__row">
                <label class="form__label">{ "Type" }</label>
                <select
                    class="form__input form__input--type"
                    onchange={on_kind_change}
                    value={(*kind).clone()}
                >
                    <option value="running" selected={is_running}>{ "Running" }</option>
                    <option value="cycling" selected={!is_running}>{ "Cycling" }</option>
                </select>
            </div>
            <div class="form__row">
                <label class="form__label">{ "Distance" }</label>
                <input
                    class="form__input form__input--distance"
                    placeholder="km"
                    ref={distance_ref}
                    value={(*distance).clone()}
                    oninput={text_input(&distance)}
                />
            </div>
            <div class="form__row">
                <label class="form__label">{ "Duration" }</label>
                <input
                    class="form__input form__input--duration"
                    placeholder="min"
                    value={(*duration).clone()}
                    oninput={text_input(&duration)}
                />
            </div>
            if is_running {
                <div class="form__row">
                    <label class="form__label">{ "Cadence" }</label>
                    <input
                        class="form__input form__input--cadence"
                        placeholder="step/min"
                        value={(*cadence).clone()}
                        oninput={text_input(&cadence)}
                    />
                </div>
            } else {
                <div class="form__row">
                    <label class="form__label">{ "Elev Gain" }</label>
                    <input
                        class="form__input form__input--elevation"
                        placeholder="meters"
                        value={(*elevation).clone()}
                        oninput={text_input(&elevation)}
                    />
                </div>
            }
            <button class="form__btn">{ "OK" }</button>
        </form>
    }
}

fn text_input(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |event: InputEvent| {
        let input: HtmlInputElement = event.target_unchecked_into();
        state.set(input.value());
    })
}
