//! Shared setting enums used by the config file, the CLI, and the converter.
//!
//! All three are closed sets: serde and clap reject unknown strings at the
//! boundary, so nothing downstream needs an "unsupported" branch.

use serde::{Deserialize, Serialize};

/// Output container/codec for a converted image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpg,
    Png,
    Webp,
    /// Single-page PDF wrapping a JPEG.
    Pdf,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Pdf => "pdf",
        }
    }

    /// Whether the quality setting affects the output. PDF embeds a JPEG.
    pub fn uses_quality(self) -> bool {
        self != Self::Png
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// How a batch run scales images against its max width/height bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    /// Keep current dimensions.
    #[default]
    None,
    /// Shrink to fit inside the bounds, never upscale.
    Fit,
    /// Cover the bounds (aspect locked) or stretch to them exactly (unlocked).
    Fill,
}

/// Coarse compression preset for batch runs. "Low" compression means high quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    Low,
    #[default]
    Medium,
    High,
}
