/// Options page: import, export, clear and settings

use crate::browser::{BlobDownloader, notify_outcome, read_file_text, stash_service};
use crate::error::{Result, StashError};
use crate::service::Downloader;
use crate::ui::components::{NumberInput, OptionCard, parse_number};
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Clone, Copy, PartialEq)]
enum ExportKind {
    Text,
    Json,
}

#[function_component(OptionsPage)]
pub fn options_page() -> Html {
    let batch_size = use_state(String::new);
    let default_bump = use_state(String::new);

    // Load settings on mount
    {
        let batch_size = batch_size.clone();
        let default_bump = default_bump.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let service = stash_service();
                match service.get_settings().await {
                    Ok(settings) => {
                        batch_size.set(settings.batch_size.to_string());
                        default_bump.set(settings.default_bump.to_string());
                    }
                    Err(e) => log::warn!("Failed to load settings: {}", e),
                }
                if let Ok(data) = service.get_data().await {
                    log::info!("Current StashData: {:?}", data);
                }
            });
            || ()
        });
    }

    let on_import = Callback::from(|e: Event| {
        let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };

        spawn_local(async move {
            let result = async {
                let content = read_file_text(&file).await?;
                stash_service().import(&content).await
            }
            .await;
            notify_outcome("Import", "Import successful!", &result);
        });
    });

    let on_export = |kind: ExportKind| {
        Callback::from(move |_: MouseEvent| {
            spawn_local(async move {
                let result = async {
                    let service = stash_service();
                    let file = match kind {
                        ExportKind::Text => service.export_text().await?,
                        ExportKind::Json => service.export_json().await?,
                    };
                    BlobDownloader.download(file).await
                }
                .await;
                notify_outcome("Export", "Export successful!", &result);
            });
        })
    };

    let on_clear = Callback::from(|_| {
        spawn_local(async move {
            let result = stash_service().export_then_clear(&BlobDownloader).await;
            notify_outcome("Clear", "Clear successful!", &result);
        });
    });

    let on_batch_size_input = {
        let batch_size = batch_size.clone();
        Callback::from(move |value: String| batch_size.set(value))
    };

    let on_save_batch_size = {
        let batch_size = batch_size.clone();
        Callback::from(move |_| {
            let value = parse_number(&batch_size);
            spawn_local(async move {
                let result: Result<_> = match value {
                    Some(n) => stash_service().set_batch_size(n).await,
                    None => Err(StashError::InvalidInput("invalid batch size provided".to_string())),
                };
                notify_outcome("Batch size update", "Batch size updated!", &result);
            });
        })
    };

    let on_default_bump_input = {
        let default_bump = default_bump.clone();
        Callback::from(move |value: String| default_bump.set(value))
    };

    let on_save_default_bump = {
        let default_bump = default_bump.clone();
        Callback::from(move |_| {
            let value = parse_number(&default_bump);
            spawn_local(async move {
                let result: Result<_> = match value {
                    Some(n) => stash_service().set_default_bump(n).await,
                    None => Err(StashError::InvalidInput("invalid bump amount provided".to_string())),
                };
                notify_outcome("Bump amount update", "Default bump amount updated!", &result);
            });
        })
    };

    html! {
        <div class="container" id="options-page">
            <h1 class="main-title">{"Stash Extension Options"}</h1>
            <div class="option-cards-wrapper">
                <OptionCard title="Import Stash">
                    <input type="file" accept=".txt,.json,text/plain,application/json" onchange={on_import} />
                </OptionCard>

                <OptionCard title="Export Stash">
                    <div class="flex-row-gap">
                        <Button onclick={on_export(ExportKind::Json)} variant={ButtonVariant::Secondary}>
                            {"Stash Export"}
                        </Button>
                        <Button onclick={on_export(ExportKind::Text)} variant={ButtonVariant::Secondary}>
                            {"Export as Text"}
                        </Button>
                    </div>
                </OptionCard>

                <OptionCard title="Clear Stash">
                    <Button onclick={on_clear} variant={ButtonVariant::Danger}>
                        {"Stash Clear"}
                    </Button>
                </OptionCard>

                <OptionCard title="Set Stash Batch Size">
                    <NumberInput
                        value={(*batch_size).clone()}
                        placeholder="Batch size"
                        min="1"
                        oninput={on_batch_size_input}
                    />
                    <Button onclick={on_save_batch_size} variant={ButtonVariant::Secondary}>
                        {"Set Stash Batch Size"}
                    </Button>
                </OptionCard>

                <OptionCard title="Set Default Bump Amount">
                    <NumberInput
                        value={(*default_bump).clone()}
                        placeholder="Default bump amount"
                        oninput={on_default_bump_input}
                    />
                    <Button onclick={on_save_default_bump} variant={ButtonVariant::Secondary}>
                        {"Set Default Stash Bump Amount"}
                    </Button>
                </OptionCard>
            </div>

            <p class="footer">
                {"Stash v0.1.0"}
            </p>
        </div>
    }
}
