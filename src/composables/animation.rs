use std::rc::Rc;

use futures_signals::signal::{Mutable, Signal};
use yew::prelude::*;

use super::dom::{BrowserDom, DomEnv, StyleId};
use super::signals::use_rerender_on;
use super::timers::{use_timers, Timers};
use crate::config;

#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    TranslateX(String),
    TranslateY(String),
    Scale(f64),
    /// Degrees.
    Rotate(f64),
    SkewX(f64),
    SkewY(f64),
}

impl Transform {
    fn css(&self) -> String {
        match self {
            Transform::TranslateX(value) => format!("translateX({})", value),
            Transform::TranslateY(value) => format!("translateY({})", value),
            Transform::Scale(value) => format!("scale({})", value),
            Transform::Rotate(value) => format!("rotate({}deg)", value),
            Transform::SkewX(value) => format!("skewX({}deg)", value),
            Transform::SkewY(value) => format!("skewY({}deg)", value),
        }
    }
}

#[derive(Clone)]
pub struct Animation {
    is_animating: Mutable<bool>,
    duration_ms: Mutable<u32>,
    easing: Mutable<String>,
    env: Rc<dyn DomEnv>,
    timers: Timers,
}

impl Animation {
    pub fn new(env: Rc<dyn DomEnv>, timers: Timers) -> Self {
        Self {
            is_animating: Mutable::new(false),
            duration_ms: Mutable::new(config::DEFAULT_ANIMATION_DURATION_MS),
            easing: Mutable::new(config::DEFAULT_ANIMATION_EASING.to_string()),
            env,
            timers,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating.get()
    }

    pub fn is_animating_signal(&self) -> impl Signal<Item = bool> {
        self.is_animating.signal()
    }

    pub fn animation_duration(&self) -> u32 {
        self.duration_ms.get()
    }

    pub fn set_animation_duration(&self, duration_ms: u32) {
        self.duration_ms.set(duration_ms);
    }

    pub fn animation_easing(&self) -> String {
        self.easing.get_cloned()
    }

    pub fn set_animation_easing(&self, easing: impl Into<String>) {
        self.easing.set(easing.into());
    }

    pub fn start_animation(&self) {
        self.set_animating(true);
    }

    pub fn stop_animation(&self) {
        self.set_animating(false);
    }

    /// Runs `callback` now when `delay_ms` is zero, otherwise through the timers.
    pub fn animate_with_delay(&self, callback: impl FnOnce() + 'static, delay_ms: u32) {
        if delay_ms > 0 {
            self.timers.set_timer(callback, delay_ms);
        } else {
            callback();
        }
    }

    /// `"{property} {duration}ms {easing}"`, falling back to the current
    /// defaults for a missing or zero duration and a missing or empty easing.
    pub fn create_transition(
        &self,
        property: &str,
        duration_ms: Option<u32>,
        easing: Option<&str>,
    ) -> String {
        let duration = duration_ms
            .filter(|duration| *duration > 0)
            .unwrap_or_else(|| self.duration_ms.get());
        let easing = easing
            .filter(|easing| !easing.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.animation_easing());
        format!("{} {}ms {}", property, duration, easing)
    }

    pub fn create_keyframes(&self, name: &str, frames: &[(&str, &str)]) -> Option<StyleId> {
        let id = self.env.inject_style(&keyframes_css(name, frames));
        if id.is_none() {
            log::warn!("Could not inject keyframes '{}'", name);
        }
        id
    }

    pub fn remove_keyframes(&self, id: Option<StyleId>) -> bool {
        id.map_or(false, |id| self.env.remove_style(id))
    }

    pub fn animation_classes(&self) -> Classes {
        if self.is_animating.get() {
            classes!("animating")
        } else {
            classes!("animation-ready")
        }
    }

    fn set_animating(&self, animating: bool) {
        self.is_animating.set_neq(animating);
    }
}

pub fn create_transform(transforms: &[Transform]) -> String {
    transforms
        .iter()
        .map(Transform::css)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn keyframes_css(name: &str, frames: &[(&str, &str)]) -> String {
    let body = frames
        .iter()
        .map(|(key, value)| format!("  {} {{ {} }}", key, value))
        .collect::<Vec<_>>()
        .join("\n");
    format!("@keyframes {} {{\n{}\n}}\n", name, body)
}

#[hook]
pub fn use_animation() -> Animation {
    let timers = use_timers();
    let animation = use_memo(
        move |_| Animation::new(Rc::new(BrowserDom::new()), timers),
        (),
    );
    {
        let animation = animation.clone();
        use_rerender_on(move || animation.is_animating_signal());
    }
    (*animation).clone()
}
