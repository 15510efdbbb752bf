//! Yew view components for the letter carousel UI.
//!
//! The carousel slides are plain stateless render functions; the settings
//! form keeps a local draft of the letter map and only hands it back on save.

use letter_carousel::storage::LetterSet;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::config::{LETTERS, LETTERS_PER_COLUMN};

/// Class list for a carousel slide, marking the active one.
pub fn slide_class(active: bool) -> Classes {
    classes!("carousel-item", active.then_some("active"))
}

/// Renders one letter slide. The back button only appears once the run has
/// completed on this letter.
pub fn render_letter_slide(
    letter: &str,
    active: bool,
    is_last: bool,
    on_back: Callback<MouseEvent>,
) -> Html {
    let wrapper = classes!(
        "letter-item",
        if is_last {
            "letter-item-selected"
        } else {
            "letter-item-option"
        }
    );
    html! {
        <div class={slide_class(active)} key={letter.to_string()}>
            <div class={wrapper}>
                <h1 class="letter">{ letter }</h1>
                if is_last && active {
                    <button class="btn-back" onclick={on_back}>{ "\u{2190}" }</button>
                }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Html,
}

/// Full-viewport wrapper around the app content.
#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    html! { <div class="layout">{ props.children.clone() }</div> }
}

#[derive(Properties, PartialEq)]
pub struct SettingsFormProps {
    /// Currently persisted letter map.
    pub letters: LetterSet,
    /// Invoked with the edited map when the user saves.
    pub on_save: Callback<LetterSet>,
    /// Invoked when the user leaves without saving.
    pub on_abort: Callback<()>,
}

/// Letter enable/disable form. At least one letter must stay enabled for the
/// draft to be saveable.
#[function_component(SettingsForm)]
pub fn settings_form(props: &SettingsFormProps) -> Html {
    let draft = use_state(|| props.letters.clone());

    // Re-seed the draft whenever the persisted map changes underneath us.
    {
        let draft = draft.clone();
        use_effect_with(props.letters.clone(), move |letters| {
            draft.set(letters.clone());
            || ()
        });
    }

    let valid = draft.is_empty() || draft.values().any(|&enabled| enabled);

    let on_toggle = {
        let draft = draft.clone();
        Callback::from(move |(letter, checked): (String, bool)| {
            let mut next = (*draft).clone();
            next.insert(letter, checked);
            draft.set(next);
        })
    };

    let on_abort = {
        let draft = draft.clone();
        let letters = props.letters.clone();
        let on_abort = props.on_abort.clone();
        Callback::from(move |_: MouseEvent| {
            draft.set(letters.clone());
            on_abort.emit(());
        })
    };

    let on_save = {
        let draft = draft.clone();
        let on_save = props.on_save.clone();
        Callback::from(move |_: MouseEvent| {
            on_save.emit((*draft).clone());
        })
    };

    // Entries in display order, restricted to letters present in the draft.
    let entries: Vec<(String, bool)> = LETTERS
        .iter()
        .filter_map(|letter| {
            draft
                .get(*letter)
                .map(|&enabled| (letter.to_string(), enabled))
        })
        .collect();

    html! {
        <form class="settings-form">
            <h2>{ "Velg bokstaver" }</h2>
            if !valid {
                <div class="alert">
                    <h4>{ "Ugyldig" }</h4>
                    { "Ingen bokstaver er valgt. Velg minst 1 bokstav." }
                </div>
            }
            <div class="letter-columns">
                { for entries.chunks(LETTERS_PER_COLUMN).map(|column| html! {
                    <div class="letter-column">
                        { for column.iter().map(|(letter, enabled)| {
                            render_letter_switch(letter, *enabled, on_toggle.clone())
                        }) }
                    </div>
                }) }
            </div>
            <div class="settings-actions">
                <button type="button" class="btn-secondary" onclick={on_abort}>
                    { "Avbryt" }
                </button>
                <button type="button" class="btn-primary" disabled={!valid} onclick={on_save}>
                    { "Lagre" }
                </button>
            </div>
        </form>
    }
}

fn render_letter_switch(letter: &str, enabled: bool, on_toggle: Callback<(String, bool)>) -> Html {
    let letter_owned = letter.to_string();
    let onchange = Callback::from(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        on_toggle.emit((letter_owned.clone(), input.checked()));
    });
    html! {
        <label class="letter-switch" key={letter.to_string()}>
            <input type="checkbox" checked={enabled} {onchange} />
            <span>{ letter }</span>
        </label>
    }
}
