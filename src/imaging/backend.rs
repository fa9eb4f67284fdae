//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the narrow capability surface every pixel
//! operation goes through: identify, decode, draw, and encode. Everything
//! above it (dimension math, quality mapping, format dispatch, batch
//! sequencing) is backend-agnostic and tested against a mock.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! and `webp` crates.

use super::params::{Quality, RasterFormat};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode {format:?}: {reason}")]
    Encode {
        format: RasterFormat,
        reason: String,
    },
}

/// Natural dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image backends.
///
/// `Raster` is whatever the backend holds a decoded image as. The orchestrator
/// only ever keeps one raster per worker alive at a time.
pub trait ImageBackend: Sync {
    type Raster: Send;

    /// Read natural dimensions, decoding as little as possible.
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError>;

    /// Fully decode an image.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Raster, BackendError>;

    /// Draw `raster` scaled to exactly `width` x `height` onto a fresh surface.
    fn draw(&self, raster: &Self::Raster, width: u32, height: u32)
    -> Result<Self::Raster, BackendError>;

    /// Encode a raster. `quality` is ignored by lossless formats.
    fn encode(
        &self,
        raster: &Self::Raster,
        format: RasterFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock backend that records operations without touching pixels.
    ///
    /// "Image" bytes are ASCII `WxH` (see [`MockBackend::image_bytes`]).
    /// Anything that does not parse fails to identify and decode.
    /// [`MockBackend::undecodable_bytes`] identifies fine but fails to decode.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon.
    const CORRUPT_MARKER: &str = "!corrupt";

    #[derive(Default)]
    pub struct MockBackend {
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    /// Stand-in for a decoded image.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MockRaster {
        pub width: u32,
        pub height: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Decode(String),
        Draw {
            width: u32,
            height: u32,
        },
        Encode {
            format: RasterFormat,
            width: u32,
            height: u32,
            quality: u32,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Bytes the mock decodes as a `width` x `height` image.
        pub fn image_bytes(width: u32, height: u32) -> Vec<u8> {
            format!("{width}x{height}").into_bytes()
        }

        /// Bytes whose header reads as `width` x `height` but whose body is corrupt.
        pub fn undecodable_bytes(width: u32, height: u32) -> Vec<u8> {
            format!("{width}x{height}{CORRUPT_MARKER}").into_bytes()
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        fn record(&self, op: RecordedOp) {
            self.operations.lock().unwrap().push(op);
        }

        fn parse(bytes: &[u8]) -> Result<Dimensions, BackendError> {
            let text = String::from_utf8_lossy(bytes);
            let header = text.trim_end_matches(CORRUPT_MARKER);
            let (w, h) = header
                .split_once('x')
                .ok_or_else(|| BackendError::Decode(format!("not an image: {text}")))?;
            match (w.parse(), h.parse()) {
                (Ok(width), Ok(height)) => Ok(Dimensions { width, height }),
                _ => Err(BackendError::Decode(format!("not an image: {text}"))),
            }
        }
    }

    impl ImageBackend for MockBackend {
        type Raster = MockRaster;

        fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
            self.record(RecordedOp::Identify(
                String::from_utf8_lossy(bytes).into_owned(),
            ));
            Self::parse(bytes)
        }

        fn decode(&self, bytes: &[u8]) -> Result<MockRaster, BackendError> {
            let text = String::from_utf8_lossy(bytes).into_owned();
            self.record(RecordedOp::Decode(text.clone()));
            if text.ends_with(CORRUPT_MARKER) {
                return Err(BackendError::Decode(format!("truncated image data: {text}")));
            }
            let dims = Self::parse(bytes)?;
            Ok(MockRaster {
                width: dims.width,
                height: dims.height,
            })
        }

        fn draw(
            &self,
            _raster: &MockRaster,
            width: u32,
            height: u32,
        ) -> Result<MockRaster, BackendError> {
            self.record(RecordedOp::Draw { width, height });
            Ok(MockRaster { width, height })
        }

        fn encode(
            &self,
            raster: &MockRaster,
            format: RasterFormat,
            quality: Quality,
        ) -> Result<Vec<u8>, BackendError> {
            self.record(RecordedOp::Encode {
                format,
                width: raster.width,
                height: raster.height,
                quality: quality.value(),
            });
            Ok(format!("{format:?}:{}x{}", raster.width, raster.height).into_bytes())
        }
    }

    #[test]
    fn mock_identifies_ascii_dimensions() {
        let backend = MockBackend::new();
        let dims = backend.identify(&MockBackend::image_bytes(800, 600)).unwrap();
        assert_eq!(dims, Dimensions { width: 800, height: 600 });

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(s) if s == "800x600"));
    }

    #[test]
    fn mock_rejects_garbage() {
        let backend = MockBackend::new();
        assert!(matches!(
            backend.decode(b"corrupt"),
            Err(BackendError::Decode(_))
        ));
    }

    #[test]
    fn mock_undecodable_identifies_but_fails_decode() {
        let backend = MockBackend::new();
        let bytes = MockBackend::undecodable_bytes(4, 3);
        assert_eq!(
            backend.identify(&bytes).unwrap(),
            Dimensions { width: 4, height: 3 }
        );
        assert!(matches!(backend.decode(&bytes), Err(BackendError::Decode(_))));
    }

    #[test]
    fn mock_records_draw_and_encode() {
        let backend = MockBackend::new();
        let raster = backend.decode(&MockBackend::image_bytes(10, 10)).unwrap();
        let drawn = backend.draw(&raster, 5, 4).unwrap();
        let bytes = backend
            .encode(&drawn, RasterFormat::Jpeg, Quality::new(80))
            .unwrap();
        assert_eq!(bytes, b"Jpeg:5x4");

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 3);
        assert!(matches!(
            &ops[2],
            RecordedOp::Encode {
                format: RasterFormat::Jpeg,
                width: 5,
                height: 4,
                quality: 80,
            }
        ));
    }
}
