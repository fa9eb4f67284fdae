//! # imgshift
//!
//! Convert images to JPEG, PNG, WebP, or a single-page PDF, one at a time or
//! as a batch with shared settings. Images are loaded into an in-memory
//! registry; conversions read from it, write one artifact per image, and
//! record each image's new size back into it.
//!
//! # Architecture: Parameters, Then Pixels
//!
//! Every conversion splits into a pure decision step and a backend step:
//!
//! ```text
//! 1. Decide   current size + settings  →  target size, quality   (pure)
//! 2. Render   decoded raster           →  encoded bytes          (backend)
//! 3. Deliver  bytes                    →  <output>/<name>        (sink)
//! ```
//!
//! The decision step is plain functions over integers, so the resize and
//! quality rules are unit tested exhaustively without decoding anything. The
//! render step goes through the [`imaging::ImageBackend`] trait, and the
//! orchestration in [`convert`] is tested against a mock backend that records
//! every call.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`registry`] | Ordered list of loaded images with their original and current sizes |
//! | [`convert`] | Single-image and batch conversion, busy flags, progress events |
//! | [`imaging`] | Dimension math, quality mapping, encoding, the PDF wrapper |
//! | [`download`] | Where finished artifacts go (`Downloads` sink, output directory) |
//! | [`input`] | Command-line paths to image files (directories walked and filtered) |
//! | [`naming`] | Artifact file names derived from source names |
//! | [`config`] | `imgshift.toml` loading, merging, and validation |
//! | [`preferences`] | The persisted light/dark preference |
//! | [`types`] | Output format, resize mode, and compression level enums |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Sequential By Default
//!
//! Batch conversion decodes one image at a time, in registry order, with a
//! short pause between items. Peak memory is one decoded raster regardless of
//! batch size. Parallel conversion is opt-in (`workers > 1`) and gives up
//! ordered delivery.
//!
//! ## All-Or-Nothing Batches
//!
//! A batch stops at its first failure and leaves every registry size
//! untouched, even for images it already wrote. Registry sizes therefore
//! always describe one consistent run.
//!
//! ## Stretch, Don't Crop
//!
//! Images are drawn at exactly the target size. When the target ratio differs
//! from the source (fill without aspect lock, or explicit width and height)
//! the image is stretched; nothing is letterboxed or cropped.
//!
//! ## Minimal PDF
//!
//! PDF output is a fixed five-object template around a JPEG encode: one page
//! sized to the image, one image XObject. It is not a PDF authoring library.

pub mod config;
pub mod convert;
pub mod download;
pub mod imaging;
pub mod input;
pub mod naming;
pub mod output;
pub mod preferences;
pub mod registry;
pub mod types;
