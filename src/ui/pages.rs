/// Marker pages opened at the end of a batch or of the Stash

use crate::browser::{location_search, set_document_title};
use crate::urls::query_param;
use yew::prelude::*;

/// Title for the batch-end page, "???" when the parameter is missing
pub fn batch_end_title(search: &str) -> String {
    let batch = query_param(search, "batch").unwrap_or_else(|| "???".to_string());
    format!("End of Batch {}", batch)
}

pub fn message_title(search: &str) -> String {
    query_param(search, "message").unwrap_or_else(|| "???".to_string())
}

#[derive(Properties, PartialEq)]
struct MarkerProps {
    title: String,
}

#[function_component(Marker)]
fn marker(props: &MarkerProps) -> Html {
    {
        let title = props.title.clone();
        use_effect_with(title, |title| {
            set_document_title(title);
            || ()
        });
    }

    html! {
        <div class="marker-page">
            <h1 class="main-title">{&props.title}</h1>
        </div>
    }
}

#[function_component(BatchEndPage)]
pub fn batch_end_page() -> Html {
    html! { <Marker title={batch_end_title(&location_search())} /> }
}

#[function_component(MessagePage)]
pub fn message_page() -> Html {
    html! { <Marker title={message_title(&location_search())} /> }
}
