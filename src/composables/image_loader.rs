use thiserror::Error;
use url::Url;

use crate::config;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("no page origin to resolve images against")]
    NoOrigin,
    #[error("invalid asset base: {0}")]
    InvalidBase(#[source] url::ParseError),
    #[error("cannot resolve image '{path}': {source}")]
    Resolve {
        path: String,
        #[source]
        source: url::ParseError,
    },
}

/// Resolves image file names to absolute URLs under the asset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLoader {
    base: Url,
    image_src: String,
}

impl ImageLoader {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            image_src: String::new(),
        }
    }

    /// Images directory on the origin the page was served from.
    pub fn for_origin(origin: &str) -> Result<Self, ImageError> {
        let base = Url::parse(origin)
            .and_then(|origin| origin.join(config::IMAGE_ASSET_DIR))
            .map_err(ImageError::InvalidBase)?;
        Ok(Self::new(base))
    }

    pub fn for_document() -> Result<Self, ImageError> {
        let origin = web_sys::window()
            .and_then(|window| window.location().origin().ok())
            .ok_or(ImageError::NoOrigin)?;
        Self::for_origin(&origin)
    }

    pub fn image_src(&self) -> &str {
        &self.image_src
    }

    pub fn resolve(&self, image_path: &str) -> Result<String, ImageError> {
        self.base
            .join(image_path)
            .map(String::from)
            .map_err(|source| ImageError::Resolve {
                path: image_path.to_string(),
                source,
            })
    }

    /// Points `image_src` at `image_path`. On failure the error is logged and
    /// the previous source is kept.
    pub fn load_image(&mut self, image_path: &str) {
        match self.resolve(image_path) {
            Ok(src) => self.image_src = src,
            Err(err) => log::error!("Failed to load image: {}", err),
        }
    }
}
