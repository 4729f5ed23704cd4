use futures_signals::signal::{Mutable, Signal};

use super::timers::Timers;

/// Visibility of the success banner (phone and name parts) and its text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuccessFlags {
    pub show_phone_success: bool,
    pub show_name_success: bool,
    pub show_success_text: bool,
}

impl SuccessFlags {
    pub fn all(show: bool) -> Self {
        Self {
            show_phone_success: show,
            show_name_success: show,
            show_success_text: show,
        }
    }
}

#[derive(Clone)]
pub struct UiState {
    flags: Mutable<SuccessFlags>,
    timers: Timers,
}

impl UiState {
    pub fn new(timers: Timers) -> Self {
        Self {
            flags: Mutable::default(),
            timers,
        }
    }

    pub fn flags(&self) -> SuccessFlags {
        self.flags.get()
    }

    pub fn signal(&self) -> impl Signal<Item = SuccessFlags> {
        self.flags.signal()
    }

    pub fn set_success_states(&self, show: bool) {
        self.flags.set_neq(SuccessFlags::all(show));
    }

    pub fn hide_success_states(&self) {
        self.set_success_states(false);
    }

    /// Banner and text, then banner only after `duration_ms`, then nothing
    /// after another `fade_delay_ms`.
    pub fn show_success_with_timer(&self, duration_ms: u32, fade_delay_ms: u32) {
        self.set_success_states(true);

        let flags = self.flags.clone();
        let timers = self.timers.downgrade();
        self.timers.set_timer(
            move || {
                let mut current = flags.get();
                current.show_success_text = false;
                flags.set_neq(current);

                let Some(timers) = timers.upgrade() else {
                    return;
                };
                timers.set_timer(
                    move || {
                        let mut current = flags.get();
                        current.show_phone_success = false;
                        current.show_name_success = false;
                        flags.set_neq(current);
                    },
                    fade_delay_ms,
                );
            },
            duration_ms,
        );
    }

    pub fn reset_success_states(&self) {
        self.flags.set_neq(SuccessFlags::default());
    }
}
