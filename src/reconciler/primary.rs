//! # Primary File Selection
//!
//! Picks the one file of a stack whose bytes name the whole stack.
//!
//! RAW, HEIF, other images and videos are authoritative over JPEG
//! derivatives. Rules are evaluated per file, in stack order:
//!
//! | Category   | Rule                                                    |
//! |------------|---------------------------------------------------------|
//! | Jpeg       | only if nothing is chosen yet, or the current choice is |
//! |            | also a JPEG with a longer file name                     |
//! | Raw        | always replaces the current choice                      |
//! | Heif       | always replaces the current choice                      |
//! | ImageOther | always replaces the current choice                      |
//! | Video      | always replaces the current choice                      |
//! | Other      | ignored                                                 |

use std::path::Path;

/// Media category derived from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    Jpeg,
    Raw,
    Heif,
    ImageOther,
    Video,
    Other,
}

const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];
const RAW_EXTENSIONS: &[&str] = &["raw", "dng", "cr2", "cr3", "nef", "arw", "orf", "rw2", "raf", "srw", "pef"];
const HEIF_EXTENSIONS: &[&str] = &["heif", "heic"];
const IMAGE_OTHER_EXTENSIONS: &[&str] = &["png", "gif", "webp", "tif", "tiff", "bmp", "avif", "jxl"];
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "webm", "mkv", "mov", "avi", "m4v", "3gp", "3g2", "mts", "m2ts", "mpg", "mpeg", "wmv", "flv", "ogv",
];

impl MediaCategory {
    pub fn of(path: &Path) -> Self {
        let Some(ext) = path.extension() else {
            return Self::Other;
        };
        let ext = ext.to_string_lossy().to_lowercase();
        let ext = ext.as_str();

        if JPEG_EXTENSIONS.contains(&ext) {
            Self::Jpeg
        } else if RAW_EXTENSIONS.contains(&ext) {
            Self::Raw
        } else if HEIF_EXTENSIONS.contains(&ext) {
            Self::Heif
        } else if IMAGE_OTHER_EXTENSIONS.contains(&ext) {
            Self::ImageOther
        } else if VIDEO_EXTENSIONS.contains(&ext) {
            Self::Video
        } else {
            Self::Other
        }
    }
}

/// What a file of a category does to the current choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    /// Replace the current choice unconditionally
    Override,
    /// Take the slot if empty, or replace a longer-named JPEG
    ShortestJpeg,
    Ignore,
}

const PRIMARY_RULES: &[(MediaCategory, Rule)] = &[
    (MediaCategory::Jpeg, Rule::ShortestJpeg),
    (MediaCategory::Raw, Rule::Override),
    (MediaCategory::Heif, Rule::Override),
    (MediaCategory::ImageOther, Rule::Override),
    (MediaCategory::Video, Rule::Override),
    (MediaCategory::Other, Rule::Ignore),
];

fn rule_for(category: MediaCategory) -> Rule {
    PRIMARY_RULES
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, rule)| *rule)
        .unwrap_or(Rule::Ignore)
}

fn name_len(path: &Path) -> usize {
    path.file_name().map(|name| name.to_string_lossy().chars().count()).unwrap_or(0)
}

/// Primary file of `stack`, or `None` for an empty stack
pub fn select_primary<P: AsRef<Path>>(stack: &[P]) -> Option<&Path> {
    let mut primary: Option<&Path> = None;

    for candidate in stack {
        let candidate: &Path = candidate.as_ref();
        match rule_for(MediaCategory::of(candidate)) {
            Rule::Override => primary = Some(candidate),
            Rule::ShortestJpeg => match primary {
                None => primary = Some(candidate),
                Some(current) => {
                    if MediaCategory::of(current) == MediaCategory::Jpeg && name_len(current) > name_len(candidate) {
                        primary = Some(candidate);
                    }
                }
            },
            Rule::Ignore => {}
        }
    }

    primary
}
