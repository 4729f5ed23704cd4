use futures_signals::map_ref;
use futures_signals::signal::{Mutable, Signal};
use yew::prelude::*;
use yew_hooks::prelude::*;

use super::form::{Form, FormData, ValidationRule};
use super::phone_validation::PhoneValidation;
use super::signals::use_rerender_on;
use super::timers::Timers;
use super::ui_state::{SuccessFlags, UiState};
use crate::config::FlowTimings;

pub const PHONE_FIELD: &str = "phone";
pub const NAME_FIELD: &str = "name";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Step {
    #[default]
    Phone,
    Name,
}

impl Step {
    pub fn number(self) -> u8 {
        match self {
            Step::Phone => 1,
            Step::Name => 2,
        }
    }
}

/// Clears the submitting flag however the submission ends, including when its
/// pending completion is cancelled.
struct SubmittingGuard {
    flag: Mutable<bool>,
}

impl Drop for SubmittingGuard {
    fn drop(&mut self) {
        self.flag.set_neq(false);
    }
}

/// Two-step lead capture: phone first, then an optional name, then a simulated
/// submission that resets the flow and shows the success banner.
#[derive(Clone)]
pub struct MultiStepForm {
    step: Mutable<Step>,
    is_submitting: Mutable<bool>,
    form: Form,
    phone: PhoneValidation,
    ui: UiState,
    timers: Timers,
    timings: FlowTimings,
}

impl MultiStepForm {
    pub fn new(timers: Timers, timings: FlowTimings) -> Self {
        let form = Form::new(
            [(PHONE_FIELD, ""), (NAME_FIELD, "")],
            Vec::<(String, ValidationRule)>::new(),
        );
        Self {
            step: Mutable::default(),
            is_submitting: Mutable::new(false),
            form,
            phone: PhoneValidation::new(),
            ui: UiState::new(timers.clone()),
            timers,
            timings,
        }
    }

    /// Fires whenever anything the view reads from the flow changes.
    pub fn changed(&self) -> impl Signal<Item = ()> {
        map_ref! {
            let _step = self.step.signal(),
            let _submitting = self.is_submitting.signal(),
            let _form = self.form.changed(),
            let _phone = self.phone.signal(),
            let _success = self.ui.signal() =>
            ()
        }
    }

    /// Cancels everything still scheduled; called when the owning view unmounts.
    pub fn teardown(&self) {
        self.timers.clear_all_timers();
    }

    pub fn current_step(&self) -> Step {
        self.step.get()
    }

    pub fn is_first_step(&self) -> bool {
        self.step.get() == Step::Phone
    }

    pub fn is_second_step(&self) -> bool {
        self.step.get() == Step::Name
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting.get()
    }

    pub fn form_data(&self) -> FormData {
        self.form.data()
    }

    pub fn phone_value(&self) -> String {
        self.form.value(PHONE_FIELD).unwrap_or_default()
    }

    pub fn name_value(&self) -> String {
        self.form.value(NAME_FIELD).unwrap_or_default()
    }

    pub fn phone_valid(&self) -> bool {
        self.phone.phone_valid()
    }

    pub fn has_attempted_submit(&self) -> bool {
        self.phone.has_attempted_submit()
    }

    pub fn should_show_error(&self) -> bool {
        self.phone.should_show_error()
    }

    pub fn success_flags(&self) -> SuccessFlags {
        self.ui.flags()
    }

    pub fn next_step(&self) {
        if self.step.get() == Step::Phone {
            self.set_step(Step::Name);
        }
    }

    pub fn reset_to_first_step(&self) {
        self.set_step(Step::Phone);
        self.form.reset_form();
        self.phone.reset_validation();
    }

    pub fn handle_phone_submit(&self) {
        if !self.is_first_step() {
            log::debug!("Phone submit ignored outside the phone step");
            return;
        }

        self.timers.clear_all_timers();
        self.phone.set_attempted_submit(true);

        if !self.phone.phone_valid() {
            // Keep the error up for the shake and fade, then let it go.
            let phone = self.phone.clone();
            self.timers.set_timer(
                move || phone.set_attempted_submit(false),
                self.timings.error_window_ms,
            );
            return;
        }

        self.next_step();
    }

    pub fn handle_name_submit(&self) {
        if !self.is_second_step() || self.is_submitting.get() {
            log::debug!("Name submit ignored");
            return;
        }

        // The name is optional, nothing to validate.
        self.is_submitting.set(true);
        let submitting = SubmittingGuard {
            flag: self.is_submitting.clone(),
        };

        let flow = self.clone();
        self.timers.set_timer(
            move || {
                let _submitting = submitting;
                log::info!("Lead submitted");
                flow.reset_to_first_step();
                flow.ui.show_success_with_timer(
                    flow.timings.success_duration_ms,
                    flow.timings.success_fade_ms,
                );
            },
            self.timings.submit_delay_ms,
        );
    }

    pub fn handle_started_typing(&self) {
        if self.phone.has_attempted_submit() {
            self.phone.set_attempted_submit(false);
        }
    }

    pub fn set_phone_valid(&self, valid: bool) {
        self.phone.set_phone_valid(valid);
    }

    pub fn set_phone_value(&self, value: impl Into<String>) {
        self.form.set_field_value(PHONE_FIELD, value);
        self.handle_started_typing();
    }

    pub fn set_name_value(&self, value: impl Into<String>) {
        self.form.set_field_value(NAME_FIELD, value);
    }

    fn set_step(&self, step: Step) {
        if self.step.replace(step) != step {
            log::debug!("Lead form moved to step {}", step.number());
        }
    }
}

/// The lead form flow for one component, re-rendering it on every change and
/// cancelling its timers on unmount.
#[hook]
pub fn use_multi_step_form() -> MultiStepForm {
    let flow = use_memo(
        |_| MultiStepForm::new(Timers::browser(), FlowTimings::default()),
        (),
    );

    {
        let flow = flow.clone();
        use_rerender_on(move || flow.changed());
    }
    {
        let flow = flow.clone();
        use_unmount(move || flow.teardown());
    }

    (*flow).clone()
}
