//! Parameter types for image operations.
//!
//! These describe *what* to produce, not *how*. They sit between the
//! [`operations`](super::operations) module, which decides target size and
//! format, and the [`backend`](super::backend), which does the pixel work.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (10–100, default 90). Clamped on construction.
//! - [`RasterFormat`]: The three encodings a backend must provide.
//! - [`map_quality`]: Compression level → effective quality.

use crate::types::CompressionLevel;

/// Lowest quality the settings surface accepts.
pub const MIN_QUALITY: u32 = 10;

/// Quality setting for lossy image encoding (10-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(MIN_QUALITY, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Encodings the backend itself must implement. PDF is layered on top of JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Jpeg,
    Png,
    WebP,
}

/// Derive the effective quality for a batch run.
///
/// - `Low` compression floors quality at 85.
/// - `Medium` clamps it into 70..=85.
/// - `High` caps it at 70.
///
/// The mapping is idempotent: applying it twice gives the same result.
///
/// ```
/// # use imgshift::imaging::{Quality, map_quality};
/// # use imgshift::types::CompressionLevel;
/// assert_eq!(map_quality(CompressionLevel::Low, Quality::new(50)).value(), 85);
/// assert_eq!(map_quality(CompressionLevel::High, Quality::new(90)).value(), 70);
/// ```
pub fn map_quality(level: CompressionLevel, base: Quality) -> Quality {
    let q = base.value();
    let mapped = match level {
        CompressionLevel::Low => q.max(85),
        CompressionLevel::Medium => q.clamp(70, 85),
        CompressionLevel::High => q.min(70),
    };
    Quality::new(mapped)
}
