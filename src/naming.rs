//! Output file naming.
//!
//! Every artifact is named after the source file's *base name*: everything
//! before the first dot. This applies to both conversion paths:
//! - single image: `holiday.final.jpg` → `holiday.png`
//! - batch: `holiday.final.jpg` → `holiday_converted.png`
//!
//! A name with no dot is used whole. A dotfile (`.hidden.png`) has an empty
//! base and falls back to [`FALLBACK_BASE`].
//!
//! Sources from different directories (or with different extensions) can
//! share a base name. [`unique_names`] renames repeats the way a browser
//! renames repeated downloads: `photo_converted (1).jpg`.

use crate::types::OutputFormat;
use std::collections::HashSet;
use std::path::Path;

/// Base used when the source name yields nothing usable.
pub const FALLBACK_BASE: &str = "image";

/// Suffix appended to the base name of batch artifacts.
pub const BATCH_SUFFIX: &str = "_converted";

/// Extract the base name: the final path component up to its first dot.
///
/// - `"photo.jpg"` → `"photo"`
/// - `"holiday.final.jpg"` → `"holiday"`
/// - `"dir/scan"` → `"scan"`
/// - `".hidden.png"` → `"image"`
pub fn base_name(name: &str) -> &str {
    let file = Path::new(name)
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or(name);
    match file.split('.').next() {
        Some(base) if !base.is_empty() => base,
        _ => FALLBACK_BASE,
    }
}

/// Artifact name for a single-image conversion: `<base>.<ext>`.
pub fn single_output_name(source_name: &str, format: OutputFormat) -> String {
    format!("{}.{}", base_name(source_name), format.extension())
}

/// Artifact name for a batch conversion: `<base>_converted.<ext>`.
pub fn batch_output_name(source_name: &str, format: OutputFormat) -> String {
    format!(
        "{}{}.{}",
        base_name(source_name),
        BATCH_SUFFIX,
        format.extension()
    )
}

/// `photo.jpg` + 2 → `photo (2).jpg`; the suffix goes before the last dot.
fn numbered(name: &str, n: usize) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({n}).{ext}"),
        _ => format!("{name} ({n})"),
    }
}

/// Make every name in the list distinct, keeping order.
///
/// The first occurrence keeps its name. Later repeats get the lowest ` (n)`
/// suffix that collides with neither an earlier result nor any input name.
///
/// ```
/// # use imgshift::naming::unique_names;
/// let names = ["a.jpg", "b.jpg", "a.jpg"].map(String::from).to_vec();
/// assert_eq!(unique_names(names), ["a.jpg", "b.jpg", "a (1).jpg"]);
/// ```
pub fn unique_names(names: Vec<String>) -> Vec<String> {
    let inputs: HashSet<String> = names.iter().cloned().collect();
    let mut used = HashSet::with_capacity(names.len());
    names
        .into_iter()
        .map(|name| {
            if used.insert(name.clone()) {
                return name;
            }
            let mut n = 1;
            loop {
                let candidate = numbered(&name, n);
                if !inputs.contains(&candidate) && used.insert(candidate.clone()) {
                    return candidate;
                }
                n += 1;
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_name() {
        assert_eq!(base_name("photo.jpg"), "photo");
    }

    #[test]
    fn multiple_dots_keep_first_segment() {
        assert_eq!(base_name("holiday.final.v2.jpg"), "holiday");
    }

    #[test]
    fn no_extension() {
        assert_eq!(base_name("scan"), "scan");
    }

    #[test]
    fn path_components_are_ignored() {
        assert_eq!(base_name("albums/2024/beach.png"), "beach");
    }

    #[test]
    fn dotfile_falls_back() {
        assert_eq!(base_name(".hidden.png"), FALLBACK_BASE);
        assert_eq!(base_name(""), FALLBACK_BASE);
    }

    #[test]
    fn spaces_and_dashes_preserved() {
        assert_eq!(base_name("My Best-Shot.jpeg"), "My Best-Shot");
    }

    #[test]
    fn single_output_uses_format_extension() {
        assert_eq!(single_output_name("a.b.png", OutputFormat::Jpg), "a.jpg");
        assert_eq!(single_output_name("cat.jpg", OutputFormat::Pdf), "cat.pdf");
    }

    #[test]
    fn batch_output_adds_suffix() {
        assert_eq!(
            batch_output_name("cat.jpg", OutputFormat::Webp),
            "cat_converted.webp"
        );
    }

    fn owned(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn unique_names_leaves_distinct_names_alone() {
        let names = owned(&["a_converted.jpg", "b_converted.jpg"]);
        assert_eq!(unique_names(names.clone()), names);
    }

    #[test]
    fn unique_names_numbers_repeats_in_order() {
        let names = owned(&["photo_converted.jpg", "photo_converted.jpg", "photo_converted.jpg"]);
        assert_eq!(
            unique_names(names),
            [
                "photo_converted.jpg",
                "photo_converted (1).jpg",
                "photo_converted (2).jpg"
            ]
        );
    }

    #[test]
    fn unique_names_skips_numbers_taken_by_inputs() {
        let names = owned(&["a.jpg", "a.jpg", "a (1).jpg"]);
        assert_eq!(unique_names(names), ["a.jpg", "a (2).jpg", "a (1).jpg"]);
    }

    #[test]
    fn numbered_without_extension() {
        assert_eq!(numbered("scan", 1), "scan (1)");
        assert_eq!(numbered("x.tar.gz", 3), "x.tar (3).gz");
    }
}
