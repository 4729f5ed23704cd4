use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::phone_input::PhoneInput;
use crate::composables::animation::{create_transform, use_animation, Transform};
use crate::composables::multi_step_form::use_multi_step_form;

const SHAKE_KEYFRAMES: &[(&str, &str)] = &[
    ("0%, 100%", "transform: translateX(0)"),
    ("20%, 60%", "transform: translateX(-6px)"),
    ("40%, 80%", "transform: translateX(6px)"),
];

#[function_component(LeadForm)]
pub fn lead_form() -> Html {
    let flow = use_multi_step_form();
    let animation = use_animation();

    {
        let animation = animation.clone();
        use_effect_with_deps(
            move |_| {
                let shake = animation.create_keyframes("lead-shake", SHAKE_KEYFRAMES);
                move || {
                    animation.remove_keyframes(shake);
                }
            },
            (),
        );
    }

    let on_phone_input = {
        let flow = flow.clone();
        Callback::from(move |value: String| flow.set_phone_value(value))
    };
    let on_validity = {
        let flow = flow.clone();
        Callback::from(move |valid: bool| flow.set_phone_valid(valid))
    };
    let on_phone_submit = {
        let flow = flow.clone();
        let animation = animation.clone();
        Callback::from(move |_: ()| {
            flow.handle_phone_submit();
            if flow.should_show_error() {
                animation.start_animation();
                let settle = animation.clone();
                animation.animate_with_delay(move || settle.stop_animation(), 400);
            }
        })
    };
    let on_name_input = {
        let flow = flow.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            flow.set_name_value(input.value());
        })
    };
    let on_name_submit = {
        let flow = flow.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            flow.handle_name_submit();
        })
    };

    let success = flow.success_flags();
    let banner_style = format!(
        "transition: {}, {};",
        animation.create_transition("opacity", None, None),
        animation.create_transition("transform", Some(400), Some("cubic-bezier(0.4, 0, 0.2, 1)")),
    );
    let banner_transform = if success.show_phone_success {
        create_transform(&[Transform::TranslateY("0".to_string()), Transform::Scale(1.0)])
    } else {
        create_transform(&[Transform::TranslateY("-12px".to_string()), Transform::Scale(0.96)])
    };

    html! {
        <section id="signup" class="lead-form">
            <h2>{"Get a call back"}</h2>
            <div class="lead-steps">
                <span class={classes!("lead-step", flow.is_first_step().then(|| "lead-step--active"))}>{"1"}</span>
                <span class={classes!("lead-step", flow.is_second_step().then(|| "lead-step--active"))}>{"2"}</span>
            </div>
            {
                if flow.is_first_step() {
                    html! {
                        <div class={classes!("lead-row", animation.animation_classes())}>
                            <PhoneInput
                                value={flow.phone_value()}
                                has_error={flow.should_show_error()}
                                on_input={on_phone_input}
                                on_validity={on_validity}
                                on_enter={on_phone_submit.clone()}
                            />
                            <button class="lead-button" onclick={on_phone_submit.reform(|_: MouseEvent| ())}>
                                {"Next"}
                            </button>
                            if flow.should_show_error() {
                                <p class="lead-error">{"Please enter a valid phone number"}</p>
                            }
                        </div>
                    }
                } else {
                    html! {
                        <form class="lead-row" onsubmit={on_name_submit}>
                            <input
                                type="text"
                                class="lead-input"
                                placeholder="Your name (optional)"
                                autocomplete="name"
                                value={flow.name_value()}
                                oninput={on_name_input}
                            />
                            <button class="lead-button" type="submit" disabled={flow.is_submitting()}>
                                { if flow.is_submitting() { "Sending..." } else { "Send" } }
                            </button>
                        </form>
                    }
                }
            }
            <div
                class={classes!("lead-success", success.show_phone_success.then(|| "lead-success--visible"))}
                style={format!("{} transform: {};", banner_style, banner_transform)}
            >
                if success.show_phone_success {
                    <span class="lead-success__icon">{"✓"}</span>
                }
                if success.show_name_success && success.show_success_text {
                    <span class="lead-success__text">{"Thanks! We'll call you shortly."}</span>
                }
            </div>
            <style>
                {r#"
                .lead-form {
                    max-width: 480px;
                    margin: 4rem auto;
                    padding: 2rem;
                    background: rgba(30, 30, 30, 0.7);
                    border: 1px solid rgba(30, 144, 255, 0.1);
                    border-radius: 16px;
                    color: #fff;
                }
                .lead-steps {
                    display: flex;
                    gap: 0.5rem;
                    margin-bottom: 1rem;
                }
                .lead-step {
                    width: 2rem;
                    height: 2rem;
                    border-radius: 50%;
                    display: inline-flex;
                    align-items: center;
                    justify-content: center;
                    background: rgba(255, 255, 255, 0.1);
                }
                .lead-step--active {
                    background: linear-gradient(45deg, #7EB2FF, #4169E1);
                }
                .lead-row {
                    display: flex;
                    flex-wrap: wrap;
                    gap: 0.75rem;
                }
                .lead-row.animating {
                    animation: lead-shake 0.4s ease;
                }
                .lead-input {
                    flex: 1;
                    padding: 0.8rem 1rem;
                    border-radius: 8px;
                    border: 1px solid rgba(255, 255, 255, 0.2);
                    background: rgba(0, 0, 0, 0.3);
                    color: #fff;
                }
                .lead-input--error {
                    border-color: #ff6b6b;
                }
                .lead-button {
                    padding: 0.8rem 1.6rem;
                    border: none;
                    border-radius: 8px;
                    background: linear-gradient(45deg, #7EB2FF, #4169E1);
                    color: #fff;
                    cursor: pointer;
                }
                .lead-button:disabled {
                    opacity: 0.6;
                    cursor: default;
                }
                .lead-error {
                    width: 100%;
                    color: #ff6b6b;
                    margin: 0;
                }
                .lead-success {
                    opacity: 0;
                    margin-top: 1rem;
                    display: flex;
                    gap: 0.5rem;
                    align-items: center;
                }
                .lead-success--visible {
                    opacity: 1;
                }
                .lead-success__icon {
                    color: #4caf50;
                    font-size: 1.4rem;
                }
                "#}
            </style>
        </section>
    }
}
