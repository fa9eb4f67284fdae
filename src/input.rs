//! Input file selection.
//!
//! Command-line paths are resolved into an ordered list of image files:
//! - a file path is taken as-is, whatever its extension, and fails later in
//!   [`Registry::add`](crate::registry::Registry::add) if it cannot be decoded;
//! - a directory is walked recursively and only files with a supported image
//!   extension are kept, sorted by path, hidden entries skipped.

use crate::imaging::is_supported_image;
use crate::registry::SourceFile;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("No such file or directory: {0}")]
    Missing(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.') && name != "." && name != ".."
}

/// Expand `paths` into image files, preserving argument order.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>, InputError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            files.extend(walk_images(path)?);
        } else {
            return Err(InputError::Missing(path.clone()));
        }
    }
    Ok(files)
}

fn walk_images(dir: &Path) -> Result<Vec<PathBuf>, InputError> {
    let mut found = Vec::new();
    let walker = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(&e.file_name().to_string_lossy()));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_supported_image(entry.path()) {
            found.push(entry.into_path());
        }
    }
    tracing::debug!(dir = %dir.display(), images = found.len(), "directory scanned");
    Ok(found)
}

/// Read each file into a [`SourceFile`] named after its final path component.
pub fn read_sources(files: &[PathBuf]) -> Result<Vec<SourceFile>, InputError> {
    files
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path).map_err(|source| InputError::Read {
                path: path.clone(),
                source,
            })?;
            let name = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok(SourceFile::new(name, bytes))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn explicit_files_pass_regardless_of_extension() {
        let tmp = TempDir::new().unwrap();
        let notes = tmp.path().join("notes.txt");
        touch(&notes);

        let files = collect_inputs(&[notes.clone()]).unwrap();
        assert_eq!(files, vec![notes]);
    }

    #[test]
    fn directories_keep_only_images_sorted() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("b.PNG"));
        touch(&tmp.path().join("a.jpg"));
        touch(&tmp.path().join("readme.md"));
        touch(&tmp.path().join("sub/c.webp"));

        let files = collect_inputs(&[tmp.path().to_path_buf()]).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(tmp.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(names, ["a.jpg", "b.PNG", "sub/c.webp"]);
    }

    #[test]
    fn hidden_entries_skipped() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join(".cache/a.jpg"));
        touch(&tmp.path().join(".b.jpg"));
        touch(&tmp.path().join("c.jpg"));

        let files = collect_inputs(&[tmp.path().to_path_buf()]).unwrap();
        assert_eq!(files, vec![tmp.path().join("c.jpg")]);
    }

    #[test]
    fn missing_path_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = collect_inputs(&[tmp.path().join("nope.jpg")]);
        assert!(matches!(result, Err(InputError::Missing(_))));
    }

    #[test]
    fn argument_order_preserved() {
        let tmp = TempDir::new().unwrap();
        let z = tmp.path().join("z.jpg");
        let a = tmp.path().join("a.jpg");
        touch(&z);
        touch(&a);

        assert_eq!(collect_inputs(&[z.clone(), a.clone()]).unwrap(), vec![z, a]);
    }

    #[test]
    fn read_sources_names_by_file_name() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dir/photo.final.jpg");
        touch(&path);

        let sources = read_sources(&[path]).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].name, "photo.final.jpg");
        assert_eq!(sources[0].bytes, b"x");
    }
}
