//! Temporary media uploads and the checks that run before them.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::errors::ValidationError;

const MIB: u64 = 1024 * 1024;

/// Smallest upload the platform accepts, in bytes.
pub const MIN_MEDIA_SIZE: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Voice,
    Video,
    File,
}

impl MediaKind {
    /// Value of the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Voice => "voice",
            MediaKind::Video => "video",
            MediaKind::File => "file",
        }
    }

    /// Largest accepted upload in bytes (inclusive).
    pub fn max_size(&self) -> u64 {
        match self {
            MediaKind::Image | MediaKind::Video => 10 * MIB,
            MediaKind::Voice => 2 * MIB,
            MediaKind::File => 20 * MIB,
        }
    }

    /// Lower-case extensions (with dot) accepted for this kind; empty means any.
    ///
    /// `File` is unrestricted, so a `.gif` refused as `Image` still uploads as `File`.
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => &[".jpg", ".png"],
            MediaKind::Voice => &[".amr"],
            MediaKind::Video => &[".mp4"],
            MediaKind::File => &[],
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaKind::Image),
            "voice" => Ok(MediaKind::Voice),
            "video" => Ok(MediaKind::Video),
            "file" => Ok(MediaKind::File),
            other => Err(ValidationError::UnknownMediaType(other.to_string())),
        }
    }
}

/// Checks size bounds and extension for an upload of `kind`.
pub fn validate_media(kind: MediaKind, size: u64, file_name: &str) -> Result<(), ValidationError> {
    if size < MIN_MEDIA_SIZE {
        return Err(ValidationError::TooSmall {
            size,
            min: MIN_MEDIA_SIZE,
        });
    }
    let max = kind.max_size();
    if size > max {
        return Err(ValidationError::TooLarge { kind, size, max });
    }

    let allowed = kind.allowed_extensions();
    if allowed.is_empty() {
        return Ok(());
    }
    let ext = extension_of(file_name);
    if allowed.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(ValidationError::WrongExtension {
            kind,
            found: ext,
            allowed,
        })
    }
}

fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}
