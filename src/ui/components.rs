/// Reusable UI components

use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct NumberInputProps {
    pub value: String,
    pub placeholder: AttrValue,
    pub oninput: Callback<String>,
    #[prop_or_default]
    pub min: Option<AttrValue>,
}

/// Numeric text field that reports its raw text; callers parse it
#[function_component(NumberInput)]
pub fn number_input(props: &NumberInputProps) -> Html {
    let oninput = {
        let callback = props.oninput.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                callback.emit(input.value());
            }
        })
    };

    html! {
        <input
            type="number"
            step="1"
            class="number-input"
            min={props.min.clone()}
            placeholder={props.placeholder.clone()}
            value={props.value.clone()}
            {oninput}
        />
    }
}

/// Parse the contents of a `NumberInput`; blank or garbage gives None
pub fn parse_number(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

#[derive(Properties, PartialEq)]
pub struct OptionCardProps {
    pub title: AttrValue,
    pub children: Children,
}

#[function_component(OptionCard)]
pub fn option_card(props: &OptionCardProps) -> Html {
    html! {
        <div class="option-card">
            <h2>{props.title.clone()}</h2>
            {props.children.clone()}
        </div>
    }
}
