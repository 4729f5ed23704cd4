use log::Level;

#[cfg(debug_assertions)]
pub fn get_log_level() -> Level {
    Level::Debug // Verbose state transitions while developing
}

#[cfg(not(debug_assertions))]
pub fn get_log_level() -> Level {
    Level::Info
}

/// Directory, relative to the page origin, that images are served from.
pub const IMAGE_ASSET_DIR: &str = "/assets/images/";

/// Distance kept between the viewport top and an anchor target after navigation.
pub const ANCHOR_SCROLL_OFFSET: f64 = 80.0;

pub const FLOATING_VIDEO_SELECTOR: &str = ".video";
/// Extra room the floating video player needs before its section counts as visible.
pub const FLOATING_VIDEO_OFFSET: f64 = 60.0;

pub const DEFAULT_ANIMATION_DURATION_MS: u32 = 300;
pub const DEFAULT_ANIMATION_EASING: &str = "ease";

/// Delays used by the lead form flow, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowTimings {
    /// How long the phone error (shake and fade) stays up after a failed submit.
    pub error_window_ms: u32,
    /// Simulated round trip of the final submission.
    pub submit_delay_ms: u32,
    /// How long the success banner shows its text.
    pub success_duration_ms: u32,
    /// Gap between hiding the text and hiding the banner itself.
    pub success_fade_ms: u32,
}

impl Default for FlowTimings {
    fn default() -> Self {
        Self {
            error_window_ms: 3000,
            submit_delay_ms: 1000,
            success_duration_ms: 3000,
            success_fade_ms: 300,
        }
    }
}
