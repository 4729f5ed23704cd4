use futures_signals::signal::{Mutable, Signal};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhoneValidationState {
    /// Reported by the phone input component, never computed here.
    pub phone_valid: bool,
    pub has_attempted_submit: bool,
}

/// Clones share the same state.
#[derive(Clone, Default)]
pub struct PhoneValidation {
    state: Mutable<PhoneValidationState>,
}

impl PhoneValidation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PhoneValidationState {
        self.state.get()
    }

    pub fn signal(&self) -> impl Signal<Item = PhoneValidationState> {
        self.state.signal()
    }

    pub fn phone_valid(&self) -> bool {
        self.state.get().phone_valid
    }

    pub fn has_attempted_submit(&self) -> bool {
        self.state.get().has_attempted_submit
    }

    pub fn set_phone_valid(&self, valid: bool) {
        self.update(|state| state.phone_valid = valid);
    }

    pub fn set_attempted_submit(&self, attempted: bool) {
        self.update(|state| state.has_attempted_submit = attempted);
    }

    pub fn reset_validation(&self) {
        self.update(|state| *state = PhoneValidationState::default());
    }

    pub fn should_show_error(&self) -> bool {
        let state = self.state.get();
        state.has_attempted_submit && !state.phone_valid
    }

    fn update(&self, change: impl FnOnce(&mut PhoneValidationState)) {
        let mut state = self.state.get();
        change(&mut state);
        self.state.set_neq(state);
    }
}
