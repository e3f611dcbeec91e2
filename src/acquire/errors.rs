//! Error types for image acquisition.

use std::path::PathBuf;

/// Errors that can occur while picking or capturing a photo.
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error("FFmpeg not found. Please install it with:\n\n    brew install ffmpeg\n")]
    FfmpegNotFound,

    #[error("No camera found.\n\nMake sure a camera is connected and camera permission is granted:\n  System Settings > Privacy & Security > Camera")]
    NoCameraDevices,

    #[error("Camera '{requested}' not found.{}", format_available(.available))]
    CameraNotFound {
        requested: String,
        available: Vec<String>,
    },

    #[error("Camera access denied: {details}\n\nGrant camera permission in:\n  System Settings > Privacy & Security > Camera")]
    PermissionDenied { details: String },

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("File '{}' not found", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("'{}' is not a supported image file", .path.display())]
    NotAnImage { path: PathBuf },

    #[error("Failed to process image: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        return String::new();
    }
    let mut out = String::from("\n\nAvailable cameras:\n");
    for (i, name) in available.iter().enumerate() {
        out.push_str(&format!("  [{}] {}\n", i, name));
    }
    out.push_str("\nUse `snapsight list-cameras` to see all cameras.");
    out
}
