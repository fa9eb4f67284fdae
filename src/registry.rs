//! In-memory registry of loaded images.
//!
//! The registry is an explicit state container: the converter borrows it
//! mutably for the length of a run, and every mutation goes through one of
//! the transitions below. Two flags gate mutation while work is in flight:
//!
//! ```text
//! is_processing   set while `add` identifies new files
//! is_converting   set by the converter for a single or batch run
//! ```
//!
//! `add` and `remove` are refused while either flag is set.

use crate::imaging::{ImageBackend, get_dimensions};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Registry is busy with another operation")]
    Busy,
    #[error("No image with id {0}")]
    UnknownImage(ImageId),
    #[error("Invalid dimensions {width}x{height} for {name}")]
    InvalidDimensions {
        name: String,
        width: u32,
        height: u32,
    },
    #[error("Failed to load {name}: {source}")]
    Load {
        name: String,
        #[source]
        source: crate::imaging::BackendError,
    },
}

/// Opaque identifier, unique within one registry and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(u64);

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A file handed to [`Registry::add`].
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// One loaded image and its size history.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    id: ImageId,
    name: String,
    source: Arc<[u8]>,
    original: (u32, u32),
    current: (u32, u32),
    aspect_ratio: f64,
}

impl LoadedImage {
    pub fn id(&self) -> ImageId {
        self.id
    }

    /// Original file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Original file bytes; also what the backend decodes for a preview.
    pub fn source(&self) -> &Arc<[u8]> {
        &self.source
    }

    /// Natural dimensions at load time.
    pub fn original_dimensions(&self) -> (u32, u32) {
        self.original
    }

    /// Dimensions after the most recent conversion.
    pub fn current_dimensions(&self) -> (u32, u32) {
        self.current
    }

    /// `original width / original height`, fixed at load time.
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }
}

/// Ordered list of loaded images plus the in-flight flags.
#[derive(Debug, Default)]
pub struct Registry {
    images: Vec<LoadedImage>,
    next_id: u64,
    is_processing: bool,
    is_converting: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &[LoadedImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, id: ImageId) -> Option<&LoadedImage> {
        self.images.iter().find(|img| img.id == id)
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn is_converting(&self) -> bool {
        self.is_converting
    }

    pub fn is_busy(&self) -> bool {
        self.is_processing || self.is_converting
    }

    /// Identify and append `files`, in order. All-or-nothing: if any file
    /// fails to identify or has a zero dimension, nothing is added.
    pub fn add(
        &mut self,
        backend: &impl ImageBackend,
        files: Vec<SourceFile>,
    ) -> Result<Vec<ImageId>, RegistryError> {
        if self.is_busy() {
            return Err(RegistryError::Busy);
        }
        self.is_processing = true;
        let loaded = self.load_all(backend, files);
        self.is_processing = false;

        let loaded = loaded?;
        let ids = loaded.iter().map(|img| img.id).collect();
        self.images.extend(loaded);
        Ok(ids)
    }

    fn load_all(
        &mut self,
        backend: &impl ImageBackend,
        files: Vec<SourceFile>,
    ) -> Result<Vec<LoadedImage>, RegistryError> {
        let mut loaded = Vec::with_capacity(files.len());
        // Ids are only committed once the whole set loads
        let mut next_id = self.next_id;

        for SourceFile { name, bytes } in files {
            let (width, height) =
                get_dimensions(backend, &bytes).map_err(|source| RegistryError::Load {
                    name: name.clone(),
                    source,
                })?;
            if width == 0 || height == 0 {
                return Err(RegistryError::InvalidDimensions {
                    name,
                    width,
                    height,
                });
            }
            tracing::debug!(%name, width, height, "image loaded");

            loaded.push(LoadedImage {
                id: ImageId(next_id),
                name,
                source: Arc::from(bytes),
                original: (width, height),
                current: (width, height),
                aspect_ratio: width as f64 / height as f64,
            });
            next_id += 1;
        }

        self.next_id = next_id;
        Ok(loaded)
    }

    /// Drop one entry, preserving the order of the rest.
    pub fn remove(&mut self, id: ImageId) -> Result<LoadedImage, RegistryError> {
        if self.is_busy() {
            return Err(RegistryError::Busy);
        }
        let pos = self
            .images
            .iter()
            .position(|img| img.id == id)
            .ok_or(RegistryError::UnknownImage(id))?;
        Ok(self.images.remove(pos))
    }

    /// Record new current dimensions after a conversion.
    pub fn update_dimensions(
        &mut self,
        id: ImageId,
        width: u32,
        height: u32,
    ) -> Result<(), RegistryError> {
        let image = self
            .images
            .iter_mut()
            .find(|img| img.id == id)
            .ok_or(RegistryError::UnknownImage(id))?;
        if width == 0 || height == 0 {
            return Err(RegistryError::InvalidDimensions {
                name: image.name.clone(),
                width,
                height,
            });
        }
        image.current = (width, height);
        Ok(())
    }

    /// Enter the converting state. Returns false if already busy.
    pub(crate) fn begin_converting(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.is_converting = true;
        true
    }

    pub(crate) fn finish_converting(&mut self) {
        self.is_converting = false;
    }
}
