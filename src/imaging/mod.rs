//! Image processing: everything that touches pixels or decides pixel sizes.
//!
//! | Operation | Where |
//! |---|---|
//! | **Target size** | [`calculate_batch_dimensions`], [`calculate_explicit_dimensions`] |
//! | **Quality** | [`map_quality`] |
//! | **Draw + encode** | [`render_and_encode`] via an [`ImageBackend`] |
//! | **PDF wrapper** | [`pdf::wrap_jpeg`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Quality and compression mapping
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Format dispatch combining the backend with the PDF wrapper

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod pdf;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{calculate_batch_dimensions, calculate_explicit_dimensions};
pub use operations::{get_dimensions, render_and_encode};
pub use params::{MIN_QUALITY, Quality, RasterFormat, map_quality};
pub use rust_backend::{RustBackend, is_supported_image, supported_input_extensions};
