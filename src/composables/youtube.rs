use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use url::form_urlencoded;

const EMBED_BASE: &str = "https://www.youtube.com/embed";
const THUMBNAIL_BASE: &str = "https://img.youtube.com/vi";

static VIDEO_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)",
        r"youtube\.com/v/([^&\n?#]+)",
        r"youtube\.com/watch\?.*v=([^&\n?#]+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("static video id pattern"))
    .collect()
});

static VALID_VIDEO_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("static video id format"));

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum YouTubeError {
    #[error("Invalid YouTube video ID: {0:?}")]
    InvalidVideoId(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoState {
    #[default]
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThumbnailQuality {
    #[default]
    Default,
    Medium,
    High,
    Standard,
    MaxRes,
}

impl ThumbnailQuality {
    /// Unknown names fall back to the default thumbnail.
    pub fn from_name(name: &str) -> Self {
        match name {
            "mqdefault" => Self::Medium,
            "hqdefault" => Self::High,
            "sddefault" => Self::Standard,
            "maxresdefault" => Self::MaxRes,
            _ => Self::Default,
        }
    }

    fn file_name(self) -> &'static str {
        match self {
            Self::Default => "default.jpg",
            Self::Medium => "mqdefault.jpg",
            Self::High => "hqdefault.jpg",
            Self::Standard => "sddefault.jpg",
            Self::MaxRes => "maxresdefault.jpg",
        }
    }
}

/// Player parameter overrides applied on top of the muted, looping,
/// chrome-less defaults. `None` drops a parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedOptions {
    overrides: Vec<(String, Option<String>)>,
}

impl EmbedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.overrides.push((key.into(), Some(value.to_string())));
        self
    }

    pub fn unset(mut self, key: impl Into<String>) -> Self {
        self.overrides.push((key.into(), None));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoInfo {
    pub id: String,
    pub thumbnail: String,
    pub embed_url: String,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn extract_video_id(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .map(|captures| captures[1].to_string())
}

pub fn validate_video_id(video_id: &str) -> bool {
    VALID_VIDEO_ID.is_match(video_id)
}

pub fn create_embed_url(video_id: &str, options: &EmbedOptions) -> String {
    let mut params: Vec<(String, Option<String>)> = [
        ("rel", "0"),
        ("modestbranding", "1"),
        ("showinfo", "0"),
        ("controls", "0"),
        ("autoplay", "0"),
        ("mute", "1"),
        ("loop", "1"),
        ("playlist", video_id),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), Some(value.to_string())))
    .collect();

    for (key, value) in &options.overrides {
        match params.iter_mut().find(|(existing, _)| existing == key) {
            Some(slot) => slot.1 = value.clone(),
            None => params.push((key.clone(), value.clone())),
        }
    }

    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &params {
        if let Some(value) = value {
            query.append_pair(key, value);
        }
    }
    format!("{}/{}?{}", EMBED_BASE, video_id, query.finish())
}

pub fn create_thumbnail_url(video_id: &str, quality: ThumbnailQuality) -> String {
    format!("{}/{}/{}", THUMBNAIL_BASE, video_id, quality.file_name())
}

pub fn try_video_info(video_id: &str) -> Result<VideoInfo, YouTubeError> {
    if !validate_video_id(video_id) {
        return Err(YouTubeError::InvalidVideoId(video_id.to_string()));
    }
    Ok(describe(video_id, None))
}

/// Like [`try_video_info`] but never fails: an invalid ID comes back flagged.
pub fn get_video_info(video_id: &str) -> VideoInfo {
    try_video_info(video_id).unwrap_or_else(|err| {
        log::error!("Failed to get video info: {}", err);
        describe(video_id, Some(err.to_string()))
    })
}

fn describe(video_id: &str, error: Option<String>) -> VideoInfo {
    VideoInfo {
        id: video_id.to_string(),
        thumbnail: create_thumbnail_url(video_id, ThumbnailQuality::Default),
        embed_url: create_embed_url(video_id, &EmbedOptions::default()),
        is_valid: error.is_none(),
        error,
    }
}

/// The page's embedded player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YouTubePlayer {
    pub is_api_ready: bool,
    pub video_state: VideoState,
    current_video_id: Option<String>,
}

impl YouTubePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_video_id(&self) -> Option<&str> {
        self.current_video_id.as_deref()
    }

    /// Invalid IDs are ignored. Returns whether the ID was taken.
    pub fn set_video_id(&mut self, video_id: &str) -> bool {
        if !validate_video_id(video_id) {
            log::warn!("Ignoring invalid video id {:?}", video_id);
            return false;
        }
        self.current_video_id = Some(video_id.to_string());
        true
    }

    pub fn video_url(&self) -> String {
        self.current_video_id
            .as_deref()
            .map(|id| create_embed_url(id, &EmbedOptions::default()))
            .unwrap_or_default()
    }

    pub fn thumbnail_url(&self) -> String {
        self.current_video_id
            .as_deref()
            .map(|id| create_thumbnail_url(id, ThumbnailQuality::Default))
            .unwrap_or_default()
    }

    pub fn is_video_ready(&self) -> bool {
        self.current_video_id
            .as_deref()
            .map_or(false, validate_video_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn extracts_ids_from_known_url_shapes() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?t=42",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ#frag",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=1",
        ] {
            assert_eq!(extract_video_id(url).as_deref(), Some(ID), "{}", url);
        }
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("https://vimeo.com/12345"), None);
    }

    #[test]
    fn embed_url_has_player_defaults() {
        assert_eq!(
            create_embed_url(ID, &EmbedOptions::default()),
            "https://www.youtube.com/embed/dQw4w9WgXcQ?rel=0&modestbranding=1&showinfo=0&controls=0&autoplay=0&mute=1&loop=1&playlist=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn embed_overrides_replace_append_and_drop() {
        let options = EmbedOptions::new()
            .set("autoplay", 1)
            .set("start", 30)
            .unset("playlist")
            .set("title", "a b&c");
        assert_eq!(
            create_embed_url(ID, &options),
            "https://www.youtube.com/embed/dQw4w9WgXcQ?rel=0&modestbranding=1&showinfo=0&controls=0&autoplay=1&mute=1&loop=1&start=30&title=a+b%26c"
        );
    }

    #[test]
    fn thumbnails_by_quality() {
        assert_eq!(
            create_thumbnail_url(ID, ThumbnailQuality::High),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
        );
        assert_eq!(
            create_thumbnail_url(ID, ThumbnailQuality::from_name("ultra")),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/default.jpg"
        );
        assert_eq!(ThumbnailQuality::from_name("maxresdefault"), ThumbnailQuality::MaxRes);
    }

    #[test]
    fn id_format() {
        assert!(validate_video_id(ID));
        assert!(validate_video_id("a-b_c-d_e-f"));
        assert!(!validate_video_id("short"));
        assert!(!validate_video_id("dQw4w9WgXcQx"));
        assert!(!validate_video_id("dQw4w9WgX?Q"));
    }

    #[test]
    fn video_info_flags_invalid_ids() {
        let info = get_video_info(ID);
        assert!(info.is_valid);
        assert_eq!(info.error, None);
        assert_eq!(info.thumbnail, create_thumbnail_url(ID, ThumbnailQuality::Default));

        assert_eq!(
            try_video_info("nope"),
            Err(YouTubeError::InvalidVideoId("nope".to_string()))
        );
        let info = get_video_info("nope");
        assert!(!info.is_valid);
        assert!(info.error.unwrap().contains("Invalid YouTube video ID"));
    }

    #[test]
    fn player_only_accepts_valid_ids() {
        let mut player = YouTubePlayer::new();
        assert_eq!(player.video_url(), "");
        assert_eq!(player.thumbnail_url(), "");
        assert!(!player.is_video_ready());

        assert!(!player.set_video_id("bad id"));
        assert_eq!(player.current_video_id(), None);

        assert!(player.set_video_id(ID));
        assert!(player.is_video_ready());
        assert!(player.video_url().starts_with("https://www.youtube.com/embed/dQw4w9WgXcQ?"));
        assert!(player.thumbnail_url().ends_with("/default.jpg"));
        assert_eq!(player.video_state, VideoState::Unstarted);
    }
}
