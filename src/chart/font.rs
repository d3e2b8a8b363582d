//! Font discovery and registration for chart text
//!
//! The text renderer only draws with fonts registered at runtime, so a
//! TrueType file is located on the host and registered once per process
//! under the family every chart style refers to.

use crate::{IolatError, Result};
use plotters::style::{register_font, FontStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

/// Family name used by every text style in the chart
pub const FONT_FAMILY: &str = "sans-serif";

const FONT_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
    "C:\\Windows\\Fonts",
];

// Checked in order before falling back to any other TrueType file
const PREFERRED_FONTS: &[&str] = &[
    "DejaVuSans.ttf",
    "LiberationSans-Regular.ttf",
    "Arial.ttf",
    "arial.ttf",
    "FreeSans.ttf",
    "NotoSans-Regular.ttf",
    "Roboto-Regular.ttf",
];

static REGISTERED: OnceLock<PathBuf> = OnceLock::new();

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
        .unwrap_or(false)
}

/// Pick a font from the given directories, preferring common sans-serif faces
pub fn find_font_in(dirs: &[PathBuf]) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = dirs
        .iter()
        .filter(|d| d.is_dir())
        .flat_map(|d| {
            WalkDir::new(d)
                .follow_links(true)
                .max_depth(6)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && is_font_file(e.path()))
                .map(|e| e.into_path())
        })
        .collect();
    candidates.sort();

    PREFERRED_FONTS
        .iter()
        .find_map(|name| {
            candidates
                .iter()
                .find(|p| p.file_name().and_then(|f| f.to_str()) == Some(*name))
                .cloned()
        })
        .or_else(|| candidates.into_iter().next())
}

/// Search the usual system and user font directories
pub fn discover_font() -> Option<PathBuf> {
    let mut dirs: Vec<PathBuf> = FONT_DIRS.iter().map(PathBuf::from).collect();
    if let Some(user) = dirs::font_dir() {
        dirs.push(user);
    }
    if let Some(home) = dirs::home_dir() {
        dirs.push(home.join(".fonts"));
    }
    find_font_in(&dirs)
}

/// Register the font at `path` under FONT_FAMILY
pub fn register_font_file(path: &Path) -> Result<()> {
    let bytes = fs::read(path).map_err(|e| {
        IolatError::FontUnavailable(format!("cannot read {}: {}", path.display(), e))
    })?;
    // Registered fonts must outlive every drawing call
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font(FONT_FAMILY, FontStyle::Normal, bytes).map_err(|_| {
        IolatError::FontUnavailable(format!("{} is not a usable font", path.display()))
    })
}

/// Make sure chart text has a font, registering one on first use.
///
/// The first successful registration wins for the life of the process.
pub fn ensure_registered(preferred: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = REGISTERED.get() {
        return Ok(path.clone());
    }

    let path = match preferred {
        Some(p) => p.to_path_buf(),
        None => discover_font().ok_or_else(|| {
            IolatError::FontUnavailable("no TrueType font found in system font directories".to_string())
        })?,
    };

    register_font_file(&path)?;
    log::debug!("registered chart font {}", path.display());

    Ok(REGISTERED.get_or_init(|| path).clone())
}
