use once_cell::sync::Lazy;
use regex::Regex;
use web_sys::HtmlInputElement;
use yew::prelude::*;

static PHONE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s\-().]+$").expect("static phone pattern"));

/// Loose E.164 check: optional leading plus, common separators, 7 to 15 digits.
pub fn is_plausible_phone(value: &str) -> bool {
    let value = value.trim();
    if !PHONE_CHARS.is_match(value) {
        return false;
    }
    let digits = value.chars().filter(char::is_ascii_digit).count();
    (7..=15).contains(&digits)
}

#[derive(Properties, PartialEq)]
pub struct PhoneInputProps {
    pub value: String,
    #[prop_or_default]
    pub has_error: bool,
    pub on_input: Callback<String>,
    /// Fired whenever the validity of the typed number flips.
    pub on_validity: Callback<bool>,
    #[prop_or_default]
    pub on_enter: Callback<()>,
}

#[function_component(PhoneInput)]
pub fn phone_input(props: &PhoneInputProps) -> Html {
    let last_validity = use_mut_ref(|| None::<bool>);

    {
        let last_validity = last_validity.clone();
        let on_validity = props.on_validity.clone();
        use_effect_with_deps(
            move |value: &String| {
                let valid = is_plausible_phone(value);
                if last_validity.borrow_mut().replace(valid) != Some(valid) {
                    on_validity.emit(valid);
                }
                || ()
            },
            props.value.clone(),
        );
    }

    let oninput = {
        let on_input = props.on_input.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_input.emit(input.value());
        })
    };

    let onkeydown = {
        let on_enter = props.on_enter.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                e.prevent_default();
                on_enter.emit(());
            }
        })
    };

    html! {
        <input
            type="tel"
            class={classes!("lead-input", props.has_error.then(|| "lead-input--error"))}
            placeholder="+1 555 123 4567"
            autocomplete="tel"
            value={props.value.clone()}
            {oninput}
            {onkeydown}
        />
    }
}
