//! Single-image and batch conversion.
//!
//! Both paths run the same per-image steps against the registry:
//!
//! ```text
//! decode → target size → quality → draw + encode → deliver
//! ```
//!
//! and differ only in where the target size and quality come from:
//!
//! | Path | Target size | Quality | Artifact name |
//! |---|---|---|---|
//! | [`convert_image`] | explicit width/height | as given | `<base>.<ext>` |
//! | [`batch_convert`] | resize mode + bounds | compression level mapped | `<base>_converted.<ext>` |
//!
//! Repeated batch names get a ` (n)` suffix. [`export_original`] skips the
//! pipeline and delivers the source bytes under the source name.
//!
//! ## Batch sequencing
//!
//! With the default single worker, images are converted strictly one at a
//! time in registry order, with a fixed pause between items. Only one decoded
//! raster is alive at once. With `workers > 1` a dedicated rayon pool of that
//! size is used instead; delivery order is then unspecified.
//!
//! The first failure (decode, encode, or delivery) aborts the whole batch.
//! Registry dimensions are updated only after a fully successful pass.
//!
//! ## Progress
//!
//! An optional `mpsc` sender receives [`ConvertEvent`]s as work completes, so
//! a caller can print progress from another thread while the batch runs.

use crate::download::Downloads;
use crate::imaging::{
    BackendError, ImageBackend, Quality, calculate_batch_dimensions,
    calculate_explicit_dimensions, map_quality, render_and_encode,
};
use crate::naming::{batch_output_name, single_output_name, unique_names};
use crate::registry::{ImageId, LoadedImage, Registry, RegistryError};
use crate::types::{CompressionLevel, OutputFormat, ResizeMode};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Pause between batch items unless configured otherwise.
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(100);

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("A conversion is already running")]
    Busy,
    #[error("No image with id {0}")]
    UnknownImage(ImageId),
    #[error("Explicit width and height must be non-zero")]
    InvalidDimensions,
    #[error("Failed to convert {name}: {source}")]
    Imaging {
        name: String,
        #[source]
        source: BackendError,
    },
    #[error("Failed to write {name}: {source}")]
    Delivery {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Settings for converting one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSettings {
    pub format: OutputFormat,
    pub quality: Quality,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub maintain_aspect_ratio: bool,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpg,
            quality: Quality::new(90),
            width: None,
            height: None,
            maintain_aspect_ratio: true,
        }
    }
}

/// Settings shared by every image of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConversionSettings {
    pub format: OutputFormat,
    /// Baseline quality, adjusted by `compression`.
    pub quality: Quality,
    pub resize_mode: ResizeMode,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub compression: CompressionLevel,
    pub maintain_aspect_ratio: bool,
    /// Pause between items (per worker when `workers > 1`).
    pub pause: Duration,
    /// Number of images converted concurrently. 1 = strictly sequential.
    pub workers: usize,
}

impl Default for BatchConversionSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpg,
            quality: Quality::new(85),
            resize_mode: ResizeMode::None,
            max_width: None,
            max_height: None,
            compression: CompressionLevel::Medium,
            maintain_aspect_ratio: true,
            pause: DEFAULT_PAUSE,
            workers: 1,
        }
    }
}

impl BatchConversionSettings {
    /// Target dimensions for an image currently sized `current`.
    pub fn target_for(&self, current: (u32, u32)) -> (u32, u32) {
        calculate_batch_dimensions(
            self.resize_mode,
            current,
            self.max_width,
            self.max_height,
            self.maintain_aspect_ratio,
        )
    }

    /// Quality after applying the compression level.
    pub fn effective_quality(&self) -> Quality {
        map_quality(self.compression, self.quality)
    }
}

/// Progress notifications.
#[derive(Debug, Clone)]
pub enum ConvertEvent {
    /// A batch run is starting.
    BatchStarted {
        total: usize,
        format: OutputFormat,
        quality: Quality,
    },
    /// One artifact was delivered.
    Converted {
        /// 0-based position in the registry.
        index: usize,
        total: usize,
        source: String,
        output: PathBuf,
        from: (u32, u32),
        to: (u32, u32),
        size_bytes: usize,
    },
    /// A batch run completed successfully.
    BatchFinished { converted: usize, elapsed: Duration },
    /// A run aborted.
    Failed { source: String, error: String },
}

/// One delivered artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedItem {
    pub id: ImageId,
    pub source: String,
    pub output: PathBuf,
    pub dimensions: (u32, u32),
    pub size_bytes: usize,
}

/// Outcome of a successful batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Delivered artifacts in registry order.
    pub items: Vec<ConvertedItem>,
    pub elapsed: Duration,
}

/// Everything needed to convert one registry entry.
struct Job<'a> {
    image: &'a LoadedImage,
    index: usize,
    total: usize,
    target: (u32, u32),
    format: OutputFormat,
    quality: Quality,
    output_name: String,
}

fn emit(events: Option<&Sender<ConvertEvent>>, event: ConvertEvent) {
    if let Some(tx) = events {
        // Receiver gone means nobody is listening; not an error
        let _ = tx.send(event);
    }
}

/// Decode, render, encode, and deliver one image.
fn run_job<B: ImageBackend>(
    backend: &B,
    job: Job<'_>,
    downloads: &impl Downloads,
    events: Option<&Sender<ConvertEvent>>,
) -> Result<ConvertedItem, ConvertError> {
    let name = job.image.name();
    let imaging_error = |source| ConvertError::Imaging {
        name: name.to_string(),
        source,
    };

    tracing::debug!(
        source = name,
        index = job.index,
        width = job.target.0,
        height = job.target.1,
        quality = job.quality.value(),
        "converting"
    );

    let raster = backend.decode(job.image.source()).map_err(imaging_error)?;
    let bytes = render_and_encode(backend, &raster, job.target, job.format, job.quality)
        .map_err(imaging_error)?;
    drop(raster);

    let output = downloads
        .deliver(&job.output_name, &bytes)
        .map_err(|source| ConvertError::Delivery {
            name: job.output_name.clone(),
            source,
        })?;

    emit(
        events,
        ConvertEvent::Converted {
            index: job.index,
            total: job.total,
            source: name.to_string(),
            output: output.clone(),
            from: job.image.current_dimensions(),
            to: job.target,
            size_bytes: bytes.len(),
        },
    );

    Ok(ConvertedItem {
        id: job.image.id(),
        source: name.to_string(),
        output,
        dimensions: job.target,
        size_bytes: bytes.len(),
    })
}

/// Convert one image with explicit settings, then record its new size.
pub fn convert_image<B: ImageBackend>(
    backend: &B,
    registry: &mut Registry,
    id: ImageId,
    settings: &ConversionSettings,
    downloads: &impl Downloads,
    events: Option<Sender<ConvertEvent>>,
) -> Result<ConvertedItem, ConvertError> {
    if settings.width == Some(0) || settings.height == Some(0) {
        return Err(ConvertError::InvalidDimensions);
    }
    let name = match registry.get(id) {
        Some(image) => image.name().to_string(),
        None => return Err(ConvertError::UnknownImage(id)),
    };
    if !registry.begin_converting() {
        return Err(ConvertError::Busy);
    }

    let result = registry
        .get(id)
        .ok_or(ConvertError::UnknownImage(id))
        .and_then(|image| {
            let target = calculate_explicit_dimensions(
                image.current_dimensions(),
                image.aspect_ratio(),
                settings.width,
                settings.height,
                settings.maintain_aspect_ratio,
            );
            let job = Job {
                image,
                index: 0,
                total: 1,
                target,
                format: settings.format,
                quality: settings.quality,
                output_name: single_output_name(image.name(), settings.format),
            };
            run_job(backend, job, downloads, events.as_ref())
        })
        .and_then(|item| {
            let (width, height) = item.dimensions;
            registry.update_dimensions(id, width, height)?;
            Ok(item)
        });

    registry.finish_converting();

    if let Err(e) = &result {
        tracing::error!(error = %e, "conversion failed");
        emit(
            events.as_ref(),
            ConvertEvent::Failed {
                source: name,
                error: e.to_string(),
            },
        );
    }
    result
}

/// Deliver an image's untouched source bytes under its own file name.
pub fn export_original(
    registry: &Registry,
    id: ImageId,
    downloads: &impl Downloads,
) -> Result<PathBuf, ConvertError> {
    let image = registry.get(id).ok_or(ConvertError::UnknownImage(id))?;
    deliver_original(image, image.name(), downloads)
}

/// [`export_original`] for every entry, in registry order, with repeated
/// names made unique.
pub fn export_originals(
    registry: &Registry,
    downloads: &impl Downloads,
) -> Result<Vec<PathBuf>, ConvertError> {
    let names = unique_names(
        registry
            .images()
            .iter()
            .map(|image| image.name().to_string())
            .collect(),
    );
    registry
        .images()
        .iter()
        .zip(&names)
        .map(|(image, name)| deliver_original(image, name, downloads))
        .collect()
}

fn deliver_original(
    image: &LoadedImage,
    name: &str,
    downloads: &impl Downloads,
) -> Result<PathBuf, ConvertError> {
    let path = downloads
        .deliver(name, image.source())
        .map_err(|source| ConvertError::Delivery {
            name: name.to_string(),
            source,
        })?;
    tracing::info!(source = image.name(), path = %path.display(), "original exported");
    Ok(path)
}

/// Convert every registry entry with shared settings.
///
/// Returns [`ConvertError::Busy`] if a conversion is already in flight. An
/// empty registry is a no-op.
pub fn batch_convert<B: ImageBackend>(
    backend: &B,
    registry: &mut Registry,
    settings: &BatchConversionSettings,
    downloads: &impl Downloads,
    events: Option<Sender<ConvertEvent>>,
) -> Result<BatchReport, ConvertError> {
    if registry.is_busy() {
        return Err(ConvertError::Busy);
    }
    if registry.is_empty() {
        return Ok(BatchReport::default());
    }
    if !registry.begin_converting() {
        return Err(ConvertError::Busy);
    }

    let start = Instant::now();
    let quality = settings.effective_quality();
    tracing::info!(
        images = registry.len(),
        format = %settings.format,
        quality = quality.value(),
        mode = ?settings.resize_mode,
        workers = settings.workers,
        "batch started"
    );
    emit(
        events.as_ref(),
        ConvertEvent::BatchStarted {
            total: registry.len(),
            format: settings.format,
            quality,
        },
    );

    let result = run_batch(backend, registry.images(), settings, downloads, events.as_ref())
        .and_then(|items| {
            if settings.resize_mode != ResizeMode::None {
                apply_batch_dimensions(registry, settings)?;
            }
            Ok(BatchReport {
                items,
                elapsed: start.elapsed(),
            })
        });

    registry.finish_converting();

    match &result {
        Ok(report) => {
            tracing::info!(
                converted = report.items.len(),
                elapsed_ms = report.elapsed.as_millis() as u64,
                "batch finished"
            );
            emit(
                events.as_ref(),
                ConvertEvent::BatchFinished {
                    converted: report.items.len(),
                    elapsed: report.elapsed,
                },
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "batch aborted");
            let source = match e {
                ConvertError::Imaging { name, .. } | ConvertError::Delivery { name, .. } => {
                    name.clone()
                }
                _ => "batch".to_string(),
            };
            emit(
                events.as_ref(),
                ConvertEvent::Failed {
                    source,
                    error: e.to_string(),
                },
            );
        }
    }
    result
}

fn batch_job<'a>(
    image: &'a LoadedImage,
    index: usize,
    total: usize,
    settings: &BatchConversionSettings,
    output_name: &str,
) -> Job<'a> {
    Job {
        image,
        index,
        total,
        target: settings.target_for(image.current_dimensions()),
        format: settings.format,
        quality: settings.effective_quality(),
        output_name: output_name.to_string(),
    }
}

fn run_batch<B: ImageBackend>(
    backend: &B,
    images: &[LoadedImage],
    settings: &BatchConversionSettings,
    downloads: &impl Downloads,
    events: Option<&Sender<ConvertEvent>>,
) -> Result<Vec<ConvertedItem>, ConvertError> {
    let total = images.len();
    let workers = settings.workers.max(1);
    // Same-base sources would otherwise overwrite each other's artifact
    let names = unique_names(
        images
            .iter()
            .map(|image| batch_output_name(image.name(), settings.format))
            .collect(),
    );

    if workers == 1 {
        let mut items = Vec::with_capacity(total);
        for (index, image) in images.iter().enumerate() {
            if index > 0 && !settings.pause.is_zero() {
                std::thread::sleep(settings.pause);
            }
            let job = batch_job(image, index, total, settings, &names[index]);
            items.push(run_job(backend, job, downloads, events)?);
        }
        return Ok(items);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| ConvertError::WorkerPool(e.to_string()))?;

    pool.install(|| {
        images
            .par_iter()
            .enumerate()
            .map(|(index, image)| {
                // Each worker's first item starts immediately
                if index >= workers && !settings.pause.is_zero() {
                    std::thread::sleep(settings.pause);
                }
                let job = batch_job(image, index, total, settings, &names[index]);
                run_job(backend, job, downloads, events)
            })
            .collect()
    })
}

/// Record each entry's batch target, recomputed from its own current size.
fn apply_batch_dimensions(
    registry: &mut Registry,
    settings: &BatchConversionSettings,
) -> Result<(), RegistryError> {
    let targets: Vec<(ImageId, (u32, u32))> = registry
        .images()
        .iter()
        .map(|img| (img.id(), settings.target_for(img.current_dimensions())))
        .collect();
    for (id, (width, height)) in targets {
        registry.update_dimensions(id, width, height)?;
    }
    Ok(())
}
