use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use futures_signals::signal::{Mutable, Signal};
use regex::Regex;

pub type FormData = BTreeMap<String, String>;
pub type FormErrors = BTreeMap<String, String>;

type CustomCheck = Rc<dyn Fn(&str, &FormData) -> Result<(), String>>;

/// Checks applied to one field, in the order required, pattern, custom.
#[derive(Clone, Default)]
pub struct ValidationRule {
    required: Option<String>,
    pattern: Option<(Regex, String)>,
    custom: Option<CustomCheck>,
}

impl ValidationRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = Some(message.into());
        self
    }

    pub fn pattern(mut self, pattern: Regex, message: impl Into<String>) -> Self {
        self.pattern = Some((pattern, message.into()));
        self
    }

    /// `check` sees the candidate value and the whole form; an `Err` message
    /// becomes the field error.
    pub fn custom(
        mut self,
        check: impl Fn(&str, &FormData) -> Result<(), String> + 'static,
    ) -> Self {
        self.custom = Some(Rc::new(check));
        self
    }

    fn check(&self, value: &str, data: &FormData) -> Result<(), String> {
        if let Some(message) = &self.required {
            if value.is_empty() {
                return Err(message.clone());
            }
        }
        if let Some((pattern, message)) = &self.pattern {
            if !pattern.is_match(value) {
                return Err(message.clone());
            }
        }
        if let Some(custom) = &self.custom {
            custom(value, data)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("required", &self.required)
            .field("pattern", &self.pattern.as_ref().map(|(re, _)| re.as_str()))
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub data: FormData,
    pub errors: FormErrors,
    pub is_submitting: bool,
    pub submit_success: bool,
    pub has_attempted_submit: bool,
}

/// Field values, per-field errors and submission flags. Clones share state.
///
/// A field has an entry in the error map exactly when its last validation
/// failed, even if the rule's message is empty.
#[derive(Clone)]
pub struct Form {
    state: Mutable<FormState>,
    initial: Rc<FormData>,
    rules: Rc<BTreeMap<String, ValidationRule>>,
}

impl Form {
    pub fn new<K, V, R>(
        initial: impl IntoIterator<Item = (K, V)>,
        rules: impl IntoIterator<Item = (R, ValidationRule)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        let initial: FormData = initial
            .into_iter()
            .map(|(field, value)| (field.into(), value.into()))
            .collect();
        let rules = rules
            .into_iter()
            .map(|(field, rule)| (field.into(), rule))
            .collect();
        Self {
            state: Mutable::new(FormState {
                data: initial.clone(),
                ..FormState::default()
            }),
            initial: Rc::new(initial),
            rules: Rc::new(rules),
        }
    }

    pub fn snapshot(&self) -> FormState {
        self.state.get_cloned()
    }

    /// Fires whenever any part of the form state changes.
    pub fn changed(&self) -> impl Signal<Item = ()> {
        self.state.signal_ref(|_| ())
    }

    pub fn data(&self) -> FormData {
        self.state.lock_ref().data.clone()
    }

    pub fn value(&self, field: &str) -> Option<String> {
        self.state.lock_ref().data.get(field).cloned()
    }

    pub fn errors(&self) -> FormErrors {
        self.state.lock_ref().errors.clone()
    }

    pub fn error(&self, field: &str) -> Option<String> {
        self.state.lock_ref().errors.get(field).cloned()
    }

    /// No field currently carries an error. Fields never validated count as valid.
    pub fn is_valid(&self) -> bool {
        self.state.lock_ref().errors.is_empty()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.lock_ref().is_submitting
    }

    pub fn submit_success(&self) -> bool {
        self.state.lock_ref().submit_success
    }

    pub fn has_attempted_submit(&self) -> bool {
        self.state.lock_ref().has_attempted_submit
    }

    /// Stores `value` and drops any error on `field` without re-validating.
    pub fn set_field_value(&self, field: &str, value: impl Into<String>) {
        self.mutate(|state| {
            state.data.insert(field.to_string(), value.into());
            state.errors.remove(field);
        });
    }

    /// `Some` marks the field invalid, whatever the message; `None` clears it.
    pub fn set_field_error(&self, field: &str, error: Option<String>) {
        self.mutate(|state| match error {
            Some(message) => {
                state.errors.insert(field.to_string(), message);
            }
            None => {
                state.errors.remove(field);
            }
        });
    }

    pub fn validate_field(&self, field: &str, value: &str) -> bool {
        let Some(rule) = self.rules.get(field) else {
            return true;
        };
        let outcome = rule.check(value, &self.state.lock_ref().data);
        match outcome {
            Ok(()) => {
                self.set_field_error(field, None);
                true
            }
            Err(message) => {
                log::debug!("Field '{}' failed validation: {}", field, message);
                self.set_field_error(field, Some(message));
                false
            }
        }
    }

    /// Validates every field that has a rule and replaces the error map with
    /// the failures found.
    pub fn validate_form(&self) -> bool {
        let mut errors = FormErrors::new();
        for field in self.rules.keys() {
            let value = self.value(field).unwrap_or_default();
            if !self.validate_field(field, &value) {
                errors.insert(field.clone(), self.error(field).unwrap_or_default());
            }
        }
        let valid = errors.is_empty();
        self.mutate(|state| state.errors = errors);
        valid
    }

    pub fn reset_form(&self) {
        let initial = (*self.initial).clone();
        self.mutate(|state| {
            state.data = initial;
            state.errors.clear();
            state.has_attempted_submit = false;
            state.submit_success = false;
        });
    }

    pub fn set_submitting(&self, value: bool) {
        self.mutate(|state| state.is_submitting = value);
    }

    pub fn set_submit_success(&self, value: bool) {
        self.mutate(|state| state.submit_success = value);
    }

    pub fn set_attempted_submit(&self, value: bool) {
        self.mutate(|state| state.has_attempted_submit = value);
    }

    fn mutate(&self, change: impl FnOnce(&mut FormState)) {
        let mut next = self.state.get_cloned();
        change(&mut next);
        self.state.set_neq(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composables::signals::testing::Changes;

    fn signup_form() -> Form {
        let digits = Regex::new(r"^\+?[0-9]{7,15}$").unwrap();
        Form::new(
            [("phone", ""), ("name", ""), ("confirm", "")],
            [
                (
                    "phone",
                    ValidationRule::new()
                        .required("Phone is required")
                        .pattern(digits, "Digits only")
                        .custom(|value, _| {
                            if value.starts_with("+0") {
                                Err("No such country".to_string())
                            } else {
                                Ok(())
                            }
                        }),
                ),
                (
                    "confirm",
                    ValidationRule::new().custom(|value, data| {
                        if data.get("phone").map(String::as_str) == Some(value) {
                            Ok(())
                        } else {
                            Err("Numbers differ".to_string())
                        }
                    }),
                ),
            ],
        )
    }

    #[test]
    fn rules_apply_in_order_and_first_failure_wins() {
        let form = signup_form();

        assert!(!form.validate_field("phone", ""));
        assert_eq!(form.error("phone").as_deref(), Some("Phone is required"));

        assert!(!form.validate_field("phone", "12ab"));
        assert_eq!(form.error("phone").as_deref(), Some("Digits only"));

        assert!(!form.validate_field("phone", "+0123456789"));
        assert_eq!(form.error("phone").as_deref(), Some("No such country"));

        assert!(form.validate_field("phone", "+358401234567"));
        assert_eq!(form.error("phone"), None);
        assert!(form.is_valid());
    }

    #[test]
    fn failure_with_empty_message_still_marks_field_invalid() {
        let form = Form::new(
            [("code", ""), ("nick", "")],
            [
                ("code", ValidationRule::new().required("")),
                ("nick", ValidationRule::new().custom(|_, _| Err(String::new()))),
            ],
        );

        assert!(!form.validate_field("code", ""));
        assert_eq!(form.error("code").as_deref(), Some(""));
        assert!(!form.is_valid());

        assert!(!form.validate_form());
        let errors = form.errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["code"], "");
        assert_eq!(errors["nick"], "");

        assert!(form.validate_field("code", "1234"));
        assert_eq!(form.error("code"), None);
        assert!(!form.is_valid());
    }

    #[test]
    fn error_entry_exists_exactly_when_last_validation_failed() {
        let form = signup_form();
        for (value, should_pass) in [
            ("", false),
            ("12ab", false),
            ("+0123456789", false),
            ("+358401234567", true),
            ("", false),
        ] {
            let passed = form.validate_field("phone", value);
            assert_eq!(passed, should_pass, "{:?}", value);
            assert_eq!(form.error("phone").is_some(), !passed, "{:?}", value);
        }
    }

    #[test]
    fn changes_are_signalled_only_when_state_moves() {
        let form = signup_form();
        let mut changes = Changes::new(form.changed());

        form.set_field_value("name", "Ada");
        assert_eq!(changes.drain(), 1);
        form.set_field_value("name", "Ada");
        assert_eq!(changes.drain(), 0);

        form.set_field_error("name", None);
        assert_eq!(changes.drain(), 0);
        form.set_field_error("name", Some(String::new()));
        assert_eq!(changes.drain(), 1);
    }

    #[test]
    fn fields_without_rules_are_always_valid() {
        let form = signup_form();
        assert!(form.validate_field("name", ""));
        assert!(form.validate_field("unknown", "anything"));
    }

    #[test]
    fn custom_rule_sees_whole_form() {
        let form = signup_form();
        form.set_field_value("phone", "0401234567");

        assert!(!form.validate_field("confirm", "0400000000"));
        assert_eq!(form.error("confirm").as_deref(), Some("Numbers differ"));
        assert!(form.validate_field("confirm", "0401234567"));
    }

    #[test]
    fn setting_a_value_clears_error_without_revalidating() {
        let form = signup_form();
        form.validate_field("phone", "");
        assert!(!form.is_valid());

        form.set_field_value("phone", "not a number");
        assert_eq!(form.error("phone"), None);
        assert!(form.is_valid());
        assert_eq!(form.value("phone").as_deref(), Some("not a number"));
    }

    #[test]
    fn validate_form_rebuilds_errors_from_ruled_fields() {
        let form = signup_form();
        form.set_field_error("name", Some("stale manual error".to_string()));
        form.set_field_value("confirm", "x");

        assert!(!form.validate_form());
        let errors = form.errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["phone"], "Phone is required");
        assert_eq!(errors["confirm"], "Numbers differ");
        assert!(!errors.contains_key("name"));

        form.set_field_value("phone", "0401234567");
        form.set_field_value("confirm", "0401234567");
        assert!(form.validate_form());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn set_field_error_sets_and_clears() {
        let form = signup_form();
        form.set_field_error("name", Some("Too long".to_string()));
        assert_eq!(form.error("name").as_deref(), Some("Too long"));
        form.set_field_error("name", None);
        assert!(form.is_valid());
    }

    #[test]
    fn reset_restores_defaults_and_clears_flags() {
        let form = signup_form();
        form.set_field_value("phone", "0401234567");
        form.set_field_value("name", "Ada");
        form.set_field_value("extra", "added later");
        form.set_field_error("name", Some("bad".to_string()));
        form.set_attempted_submit(true);
        form.set_submit_success(true);

        form.reset_form();

        let state = form.snapshot();
        let expected: FormData = [("phone", ""), ("name", ""), ("confirm", "")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(state.data, expected);
        assert!(state.errors.is_empty());
        assert!(!state.has_attempted_submit);
        assert!(!state.submit_success);
    }
}
