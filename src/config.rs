use std::path::Path;

use serde::Deserialize;
use tile_mosaic::{DitherMode, ProcessingParameters};

use crate::error::AppError;

/// Dithering algorithm choice as it appears in config files and on the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DitherChoice {
    /// Reduced error diffusion (organic grain).
    ErrorDiffusion,
    /// Ordered 8x8 Bayer threshold (regular crosshatch).
    Ordered,
}

impl DitherChoice {
    pub fn to_mode(self) -> DitherMode {
        match self {
            DitherChoice::ErrorDiffusion => DitherMode::ErrorDiffusion,
            DitherChoice::Ordered => DitherMode::OrderedThreshold,
        }
    }
}

/// Editor defaults loaded from an optional YAML file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EditorConfig {
    /// Contrast adjustment in [-255, 255].
    #[serde(default)]
    pub contrast: i32,

    /// Block size for the pixelation pass (1 disables it).
    #[serde(default = "default_block_size")]
    pub block_size: u32,

    /// Which dithering algorithm to run.
    #[serde(default = "default_dither")]
    pub dither: DitherChoice,

    /// Tile-count parameter (columns = tile_count * 4).
    #[serde(default = "default_tile_count")]
    pub tile_count: u32,

    /// Scale factor for high-resolution export.
    #[serde(default = "default_export_scale")]
    pub export_scale: u32,

    /// Process only every Nth live frame.
    #[serde(default = "default_frame_skip")]
    pub frame_skip: u32,
}

fn default_block_size() -> u32 {
    1
}

fn default_dither() -> DitherChoice {
    DitherChoice::ErrorDiffusion
}

fn default_tile_count() -> u32 {
    2
}

fn default_export_scale() -> u32 {
    tile_mosaic::DEFAULT_EXPORT_SCALE
}

fn default_frame_skip() -> u32 {
    tile_mosaic::DEFAULT_FRAME_SKIP
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            contrast: 0,
            block_size: default_block_size(),
            dither: default_dither(),
            tile_count: default_tile_count(),
            export_scale: default_export_scale(),
            frame_skip: default_frame_skip(),
        }
    }
}

impl EditorConfig {
    /// Load configuration from a YAML file, falling back to defaults when
    /// the file is absent or unparsable.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Convert to validated pipeline parameters.
    pub fn processing_parameters(&self) -> Result<ProcessingParameters, AppError> {
        ProcessingParameters::new(self.contrast, self.block_size, self.dither.to_mode())
            .map_err(AppError::from)
    }
}
