//! High-level image operations.
//!
//! These functions combine calculations with backend execution: they take a
//! decoded raster and a target, and call the backend in the right order for
//! the requested output format.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{Quality, RasterFormat};
use super::pdf;
use crate::types::OutputFormat;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get natural image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, bytes: &[u8]) -> Result<(u32, u32)> {
    let Dimensions { width, height } = backend.identify(bytes)?;
    Ok((width, height))
}

/// Draw `raster` at exactly `target` and encode it as `format`.
///
/// No letterboxing or cropping: if the target ratio differs from the source,
/// the image is stretched. PDF output is a JPEG encode at `quality` wrapped by
/// [`pdf::wrap_jpeg`].
pub fn render_and_encode<B: ImageBackend>(
    backend: &B,
    raster: &B::Raster,
    target: (u32, u32),
    format: OutputFormat,
    quality: Quality,
) -> Result<Vec<u8>> {
    let (width, height) = target;
    let surface = backend.draw(raster, width, height)?;

    match format {
        OutputFormat::Jpg => backend.encode(&surface, RasterFormat::Jpeg, quality),
        OutputFormat::Png => backend.encode(&surface, RasterFormat::Png, quality),
        OutputFormat::Webp => backend.encode(&surface, RasterFormat::WebP, quality),
        OutputFormat::Pdf => {
            let jpeg = backend.encode(&surface, RasterFormat::Jpeg, quality)?;
            Ok(pdf::wrap_jpeg(&jpeg, width, height))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};

    fn decoded(backend: &MockBackend, w: u32, h: u32) -> <MockBackend as ImageBackend>::Raster {
        backend.decode(&MockBackend::image_bytes(w, h)).unwrap()
    }

    #[test]
    fn get_dimensions_calls_backend() {
        let backend = MockBackend::new();
        let dims = get_dimensions(&backend, &MockBackend::image_bytes(1920, 1080)).unwrap();
        assert_eq!(dims, (1920, 1080));
    }

    #[test]
    fn draws_at_exact_target_before_encoding() {
        let backend = MockBackend::new();
        let raster = decoded(&backend, 800, 600);

        render_and_encode(&backend, &raster, (100, 300), OutputFormat::Jpg, Quality::new(75))
            .unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[1], RecordedOp::Draw { width: 100, height: 300 });
        assert_eq!(
            ops[2],
            RecordedOp::Encode {
                format: RasterFormat::Jpeg,
                width: 100,
                height: 300,
                quality: 75,
            }
        );
    }

    #[test]
    fn dispatches_each_format() {
        let cases = [
            (OutputFormat::Jpg, RasterFormat::Jpeg),
            (OutputFormat::Png, RasterFormat::Png),
            (OutputFormat::Webp, RasterFormat::WebP),
            (OutputFormat::Pdf, RasterFormat::Jpeg),
        ];
        for (output, expected) in cases {
            let backend = MockBackend::new();
            let raster = decoded(&backend, 10, 10);
            render_and_encode(&backend, &raster, (10, 10), output, Quality::default()).unwrap();
            let ops = backend.get_operations();
            assert!(
                matches!(ops.last(), Some(RecordedOp::Encode { format, .. }) if *format == expected),
                "{output:?} should encode as {expected:?}"
            );
        }
    }

    #[test]
    fn pdf_wraps_jpeg_bytes() {
        let backend = MockBackend::new();
        let raster = decoded(&backend, 40, 20);
        let bytes =
            render_and_encode(&backend, &raster, (40, 20), OutputFormat::Pdf, Quality::new(60))
                .unwrap();

        assert!(bytes.starts_with(b"%PDF-1.4"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/MediaBox [0 0 40 20]"));
        // Mock JPEG payload is "Jpeg:40x20" (10 bytes)
        assert!(text.contains("/Length 10 >>\nstream\nJpeg:40x20\nendstream"));
    }
}
