//! # Sidecar Record Module
//!
//! Decoding of the YAML sidecar files PhotoPrism writes next to its index.
//!
//! ## Responsibilities:
//! - Maps the PascalCase YAML document onto `RawRecord` with `serde_yaml`
//! - Normalises it into an immutable `SidecarRecord`
//! - Models the capture time as an explicit `CaptureTime` variant
//! - Turns the `-1` "unknown" sentinel of `Year`/`Month`/`Day` into `None`
//!
//! A record is decoded fresh on every read and dropped after use.
//!
//! ## Example sidecar:
//! ```yaml
//! TakenAt: 2003-07-11T14:08:33Z
//! TakenSrc: meta
//! UID: pra8dk339xe61swy
//! Type: video
//! Title: Seashore / 2003
//! Year: 2003
//! Month: 7
//! Day: 11
//! Private: true
//! Details:
//!   Keywords: bike, brown, seashore
//! CreatedAt: 2022-04-12T14:28:51Z
//! DeletedAt: 2022-08-05T18:06:59.585384018Z
//! ```

use crate::error::{ReconcileError, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;

/// Capture time of a media item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureTime {
    Known(DateTime<Utc>),
    Unknown,
}

impl CaptureTime {
    pub fn known(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Known(at) => Some(*at),
            Self::Unknown => None,
        }
    }
}

/// Sidecar document exactly as serialized
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRecord {
    pub taken_at: Option<DateTime<Utc>>,
    pub taken_src: Option<String>,
    #[serde(rename = "UID")]
    pub uid: Option<String>,
    #[serde(rename = "Type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub original_name: Option<String>,
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub day: Option<i32>,
    pub quality: Option<i32>,
    pub favourite: Option<bool>,
    pub private: Option<bool>,
    pub details: Option<RawDetails>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawDetails {
    pub keywords: Option<String>,
}

/// Decoded metadata for one media item
#[derive(Debug, Clone, PartialEq)]
pub struct SidecarRecord {
    pub uid: Option<String>,
    pub kind: Option<String>,
    pub title: Option<String>,
    pub original_name: Option<String>,
    pub taken_at: CaptureTime,
    pub taken_src: Option<String>,
    pub year: Option<u32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub quality: Option<i32>,
    pub favourite: bool,
    pub private: bool,
    pub keywords: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl SidecarRecord {
    /// A deletion timestamp marks the record archived, whatever the other flags say
    pub fn is_archived(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_private(&self) -> bool {
        self.private
    }
}

impl From<RawRecord> for SidecarRecord {
    fn from(raw: RawRecord) -> Self {
        let keywords = raw
            .details
            .and_then(|details| details.keywords)
            .map(|keywords| {
                keywords
                    .split(',')
                    .map(str::trim)
                    .filter(|keyword| !keyword.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            uid: raw.uid,
            kind: raw.kind,
            title: raw.title,
            original_name: raw.original_name,
            taken_at: raw.taken_at.map_or(CaptureTime::Unknown, CaptureTime::Known),
            taken_src: raw.taken_src,
            year: date_part(raw.year),
            month: date_part(raw.month),
            day: date_part(raw.day),
            quality: raw.quality,
            favourite: raw.favourite.unwrap_or(false),
            private: raw.private.unwrap_or(false),
            keywords,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            deleted_at: raw.deleted_at,
        }
    }
}

// Negative values are the "unknown" sentinel
fn date_part(value: Option<i32>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

/// Decode a sidecar document. `path` is only used for error context.
pub fn decode(text: &str, path: &Path) -> Result<SidecarRecord> {
    let raw: RawRecord = serde_yaml::from_str(text).map_err(|source| ReconcileError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(raw.into())
}

/// Read and decode the sidecar at `path`
pub async fn read_record(path: &Path) -> Result<SidecarRecord> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ReconcileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    decode(&text, path)
}
