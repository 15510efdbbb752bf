//! Letter carousel application: wires Yew state, the round scheduler, and
//! the persisted letter settings.

use letter_carousel::storage::{self, BrowserStore, LetterSet};
use letter_carousel::{schedule, ScheduleHandle, ScheduleParams};
use yew::prelude::*;

mod components;
mod config;
mod confetti;

use components::{render_letter_slide, slide_class, Layout, SettingsForm};
use config::{DEFAULT_LETTERS, LETTERS, LETTER_START_SLOT, SETTINGS_SLOT, START_SLOT};

/// Primary application component.
#[function_component(Main)]
fn main_component() -> Html {
    let selected_index = use_state(|| START_SLOT);
    let is_last = use_state(|| false);
    let letters = use_state(LetterSet::new);
    let storage_error = use_state(|| None::<String>);
    // Sole owner of the in-flight run; replacing or dropping it cancels the
    // underlying timers.
    let run_handle = use_mut_ref(|| None::<ScheduleHandle>);

    // Load persisted settings on mount. A corrupt blob is surfaced, not
    // silently replaced with defaults.
    {
        let letters = letters.clone();
        let storage_error = storage_error.clone();
        use_effect_with((), move |_| {
            match storage::load(&BrowserStore, &DEFAULT_LETTERS) {
                Ok(loaded) => letters.set(loaded),
                Err(err) => storage_error.set(Some(err.to_string())),
            }
        });
    }

    // Cancel any in-flight run when the component unmounts.
    {
        let run_handle = run_handle.clone();
        use_effect_with((), move |_| {
            move || {
                run_handle.borrow_mut().take();
            }
        });
    }

    // Celebrate once per completion; tearing down (restart, navigation away)
    // cancels the in-flight animation frame.
    use_effect_with(*is_last, |&completed| {
        if completed {
            confetti::celebrate();
        }
        move || {
            if completed {
                confetti::stop();
            }
        }
    });

    let enabled: Vec<String> = LETTERS
        .iter()
        .filter(|letter| letters.get(**letter).copied().unwrap_or(false))
        .map(|letter| letter.to_string())
        .collect();

    let start = {
        let selected_index = selected_index.clone();
        let is_last = is_last.clone();
        let run_handle = run_handle.clone();
        let enabled_count = enabled.len();
        Callback::from(move |_: MouseEvent| {
            if enabled_count == 0 {
                return;
            }
            is_last.set(false);
            let params = ScheduleParams::new(
                LETTER_START_SLOT,
                LETTER_START_SLOT + enabled_count - 1,
            );
            let on_index = {
                let selected_index = selected_index.clone();
                move |index| selected_index.set(index)
            };
            let on_last = {
                let is_last = is_last.clone();
                move |last| is_last.set(last)
            };
            // Replacing the handle drops (and thereby cancels) the previous run.
            *run_handle.borrow_mut() = schedule(params, on_index, on_last);
        })
    };

    let open_settings = {
        let selected_index = selected_index.clone();
        Callback::from(move |_: MouseEvent| selected_index.set(SETTINGS_SLOT))
    };

    let back_to_start = {
        let selected_index = selected_index.clone();
        let is_last = is_last.clone();
        Callback::from(move |_: MouseEvent| {
            is_last.set(false);
            selected_index.set(START_SLOT);
        })
    };

    let on_save = {
        let letters = letters.clone();
        let selected_index = selected_index.clone();
        let storage_error = storage_error.clone();
        Callback::from(move |next: LetterSet| match storage::save(&BrowserStore, &next) {
            Ok(()) => {
                letters.set(next);
                selected_index.set(START_SLOT);
            }
            Err(err) => storage_error.set(Some(err.to_string())),
        })
    };

    let on_abort = {
        let selected_index = selected_index.clone();
        Callback::from(move |_: ()| selected_index.set(START_SLOT))
    };

    html! {
        <Layout>
            if let Some(err) = &*storage_error {
                <div class="storage-error">
                    { format!("Kunne ikke lese lagrede innstillinger: {}", err) }
                </div>
            }
            <div class="carousel">
                <div class={slide_class(*selected_index == SETTINGS_SLOT)}>
                    <div class="letter-item letter-item-settings">
                        <SettingsForm
                            letters={(*letters).clone()}
                            on_save={on_save}
                            on_abort={on_abort}
                        />
                    </div>
                </div>
                <div class={slide_class(*selected_index == START_SLOT)}>
                    <div class="letter-item letter-item-start">
                        <button class="btn-start" onclick={start} disabled={enabled.is_empty()}>
                            { "Start" }
                        </button>
                        <button class="btn-settings" onclick={open_settings}>
                            { "Innstillinger" }
                        </button>
                    </div>
                </div>
                { for enabled.iter().enumerate().map(|(offset, letter)| {
                    let active = *selected_index == LETTER_START_SLOT + offset;
                    render_letter_slide(letter, active, *is_last, back_to_start.clone())
                }) }
            </div>
        </Layout>
    }
}

#[function_component]
pub fn App() -> Html {
    html! { <Main /> }
}

/// Entry point: installs the panic hook and mounts the Yew renderer.
fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
