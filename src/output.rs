//! CLI output formatting.
//!
//! Each entity leads with its 1-based positional index and name; sizes and
//! paths follow as indented context lines.
//!
//! # Output Format
//!
//! ## Batch
//!
//! ```text
//! Converting 2 images to webp (quality 70)
//! 001 beach.png → converted/beach_converted.webp
//!     1920x1080 → 400x225, 18.4 KB
//! 002 dog.jpg → converted/dog_converted.webp
//!     300x300 → 300x300, 9.1 KB
//! Converted 2 images in 0.4s
//! ```
//!
//! ## Info
//!
//! ```text
//! 001 beach.png
//!     1920x1080, 2.31 MB
//! ```
//!
//! # Architecture
//!
//! Every `format_*` function returns lines and is pure, so it is tested
//! directly. `print_*` wrappers write to stdout.

use crate::convert::ConvertEvent;
use crate::preferences::Preferences;
use crate::registry::LoadedImage;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn format_dims((w, h): (u32, u32)) -> String {
    format!("{w}x{h}")
}

/// Human-readable byte count with binary units and at most two decimals.
///
/// ```
/// # use imgshift::output::format_file_size;
/// assert_eq!(format_file_size(0), "0 Bytes");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// Format a single conversion progress event as display lines.
pub fn format_convert_event(event: &ConvertEvent) -> Vec<String> {
    match event {
        ConvertEvent::BatchStarted {
            total,
            format,
            quality,
        } => {
            let noun = if *total == 1 { "image" } else { "images" };
            let header = if format.uses_quality() {
                format!(
                    "Converting {total} {noun} to {format} (quality {})",
                    quality.value()
                )
            } else {
                format!("Converting {total} {noun} to {format}")
            };
            vec![header]
        }
        ConvertEvent::Converted {
            index,
            source,
            output,
            from,
            to,
            size_bytes,
            ..
        } => vec![
            format!(
                "{} {} \u{2192} {}",
                format_index(index + 1),
                source,
                output.display()
            ),
            format!(
                "    {} \u{2192} {}, {}",
                format_dims(*from),
                format_dims(*to),
                format_file_size(*size_bytes as u64)
            ),
        ],
        ConvertEvent::BatchFinished { converted, elapsed } => {
            let noun = if *converted == 1 { "image" } else { "images" };
            vec![format!(
                "Converted {converted} {noun} in {:.1}s",
                elapsed.as_secs_f64()
            )]
        }
        ConvertEvent::Failed { source, error } => {
            vec![format!("Failed: {source}"), format!("    {error}")]
        }
    }
}

/// Format the registry listing shown by `imgshift info`.
pub fn format_info(images: &[LoadedImage]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, image) in images.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), image.name()));
        lines.push(format!(
            "    {}, {}",
            format_dims(image.original_dimensions()),
            format_file_size(image.source().len() as u64)
        ));
    }
    let noun = if images.len() == 1 { "image" } else { "images" };
    lines.push(format!("{} {noun}", images.len()));
    lines
}

pub fn format_theme(prefs: &Preferences) -> String {
    let mode = if prefs.effective_dark_mode() {
        "dark"
    } else {
        "light"
    };
    match prefs.dark_mode {
        Some(_) => format!("Theme: {mode}"),
        None => format!("Theme: {mode} (default)"),
    }
}

/// Print info output to stdout.
pub fn print_info(images: &[LoadedImage]) {
    for line in format_info(images) {
        println!("{}", line);
    }
}
