//! The crate's typed error surface. `DomainSkip` and out-of-bounds texture
//! fetches are deliberately *not* represented here — they are absent
//! scatter results and `log::warn!` calls respectively, never an `Err`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("scene configuration error: {0}")]
    Configuration(String),

    #[error("i/o error")]
    Io(#[from] std::io::Error),

    #[error("image decode error")]
    ImageDecode(#[from] image::ImageError),

    #[error("scene file parse error")]
    SceneParse(#[from] serde_yaml::Error),
}
