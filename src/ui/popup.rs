/// Popup UI: add/remove/bump the current tab, open batches, edit notes

use crate::browser::{ChromeTabs, active_tab_url, notify_outcome, open_options_page, stash_service};
use crate::error::Result;
use crate::settings::parse_bump_amount;
use crate::ui::components::{NumberInput, parse_number};
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    let bump_amount = use_state(String::new);
    let batch_number = use_state(String::new);
    let note = use_state(String::new);
    let busy = use_state(|| false);

    // Prefill default bump and the note for the current tab
    {
        let bump_amount = bump_amount.clone();
        let note = note.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let service = stash_service();
                match service.get_settings().await {
                    Ok(settings) => bump_amount.set(settings.default_bump.to_string()),
                    Err(e) => log::warn!("Failed to load settings: {}", e),
                }

                let existing: Result<Option<String>> = async {
                    let url = active_tab_url().await?;
                    service.note_for(&url).await
                }
                .await;
                match existing {
                    Ok(text) => note.set(text.unwrap_or_default()),
                    Err(e) => log::warn!("Failed to load note: {}", e),
                }
            });
            || ()
        });
    }

    let on_add = {
        let busy = busy.clone();
        Callback::from(move |_| {
            let busy = busy.clone();
            busy.set(true);
            spawn_local(async move {
                let result = async {
                    let url = active_tab_url().await?;
                    stash_service().add(&url).await
                }
                .await;
                notify_outcome("Add", "Add successful!", &result);
                busy.set(false);
            });
        })
    };

    let on_remove = {
        let busy = busy.clone();
        Callback::from(move |_| {
            let busy = busy.clone();
            busy.set(true);
            spawn_local(async move {
                let result = async {
                    let url = active_tab_url().await?;
                    stash_service().remove(&url).await
                }
                .await;
                notify_outcome("Remove", "Remove successful!", &result);
                busy.set(false);
            });
        })
    };

    let on_bump = {
        let busy = busy.clone();
        let bump_amount = bump_amount.clone();
        Callback::from(move |_| {
            let amount = parse_bump_amount(&bump_amount);
            let busy = busy.clone();
            busy.set(true);
            spawn_local(async move {
                let result: Result<i64> = async {
                    let amount = amount?;
                    let url = active_tab_url().await?;
                    stash_service().bump(&url, amount).await?;
                    Ok(amount)
                }
                .await;
                let success = match &result {
                    Ok(amount) => format!("Successfully bumped item by {}", amount),
                    Err(_) => String::new(),
                };
                notify_outcome("Bump", &success, &result);
                busy.set(false);
            });
        })
    };

    let on_open = {
        let busy = busy.clone();
        let batch_number = batch_number.clone();
        Callback::from(move |_| {
            let batch = parse_number(&batch_number)
                .filter(|b| *b > 0)
                .and_then(|b| u32::try_from(b).ok());
            let busy = busy.clone();
            busy.set(true);
            spawn_local(async move {
                let result = stash_service().open(batch, &ChromeTabs).await;
                let success = match batch {
                    Some(b) => format!("Successfully opened batch #{}", b),
                    None => "Open successful!".to_string(),
                };
                notify_outcome("Open", &success, &result);
                busy.set(false);
            });
        })
    };

    let on_note_input = {
        let note = note.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(textarea) = e.target_dyn_into::<HtmlTextAreaElement>() {
                note.set(textarea.value());
            }
        })
    };

    let on_save_note = {
        let note = note.clone();
        Callback::from(move |_| {
            let text = (*note).clone();
            spawn_local(async move {
                let result = async {
                    let url = active_tab_url().await?;
                    stash_service().save_note(&url, &text).await
                }
                .await;
                notify_outcome("Save note", "Successfully saved note", &result);
            });
        })
    };

    let on_bump_input = {
        let bump_amount = bump_amount.clone();
        Callback::from(move |value: String| bump_amount.set(value))
    };

    let on_batch_input = {
        let batch_number = batch_number.clone();
        Callback::from(move |value: String| batch_number.set(value))
    };

    let on_options = Callback::from(|_| open_options_page());

    let is_busy = *busy;

    html! {
        <div class="padding-20" id="popup-page">
            <div class="flex-column-gap">
                <Button onclick={on_add} disabled={is_busy} variant={ButtonVariant::Primary} block={true}>
                    {"Stash Add"}
                </Button>
                <Button onclick={on_remove} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                    {"Stash Remove"}
                </Button>
            </div>

            <div class="hr"></div>

            <div class="flex-row-gap">
                <NumberInput
                    value={(*bump_amount).clone()}
                    placeholder="Amount to bump"
                    oninput={on_bump_input}
                />
                <Button onclick={on_bump} disabled={is_busy} variant={ButtonVariant::Secondary}>
                    {"Stash Bump"}
                </Button>
            </div>

            <div class="hr"></div>

            <div class="flex-row-gap">
                <NumberInput
                    value={(*batch_number).clone()}
                    placeholder="Batch to open"
                    min="1"
                    oninput={on_batch_input}
                />
                <Button onclick={on_open} disabled={is_busy} variant={ButtonVariant::Secondary}>
                    {"Stash Open"}
                </Button>
            </div>

            <div class="hr"></div>

            <div class="flex-column-gap">
                <textarea
                    rows="3"
                    placeholder="Notes"
                    value={(*note).clone()}
                    oninput={on_note_input}
                />
                <Button onclick={on_save_note} variant={ButtonVariant::Secondary}>
                    {"Stash Note"}
                </Button>
            </div>

            <div class="hr"></div>

            <Button onclick={on_options} variant={ButtonVariant::Link}>
                {"Stash Options"}
            </Button>
        </div>
    }
}
