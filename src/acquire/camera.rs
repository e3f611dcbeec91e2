//! Camera picker - grabs a single still from an AVFoundation camera via FFmpeg.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use super::devices::{list_cameras, resolve_camera};
use super::errors::AcquireError;
use super::types::{AspectRatio, PickOutcome, PickedAsset, PickerOptions};
use super::{reserve_output_path, ImagePicker};

/// Framerate requested from the camera while grabbing the still.
const CAPTURE_FRAMERATE: u32 = 30;

/// Substrings in FFmpeg's stderr that mean the OS refused camera access.
const PERMISSION_KEYWORDS: &[&str] = &["not authorized", "permission", "denied"];

/// Takes a new picture with the camera.
#[derive(Debug, Clone)]
pub struct CameraPicker {
    /// Camera index or name substring (None = first camera)
    device: Option<String>,
    output_dir: PathBuf,
}

impl Default for CameraPicker {
    fn default() -> Self {
        Self {
            device: None,
            output_dir: std::env::temp_dir().join("snapsight"),
        }
    }
}

impl CameraPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the device by index or name
    pub fn with_device(mut self, device: Option<String>) -> Self {
        self.device = device;
        self
    }

    /// Directory the captured photo is written to
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Build the FFmpeg arguments for grabbing one frame into `output`.
    pub fn to_ffmpeg_args(
        &self,
        device_name: &str,
        options: &PickerOptions,
        output: &Path,
    ) -> Vec<String> {
        let mut args: Vec<String> = [
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "avfoundation",
            "-framerate",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        args.push(CAPTURE_FRAMERATE.to_string());
        args.push("-i".to_string());
        args.push(device_name.to_string());
        args.push("-frames:v".to_string());
        args.push("1".to_string());

        if options.allows_editing {
            args.push("-vf".to_string());
            args.push(crop_filter(options.aspect));
        }

        args.push("-q:v".to_string());
        args.push(jpeg_qscale(options.quality).to_string());
        args.push("-y".to_string());
        args.push(output.to_string_lossy().into_owned());
        args
    }
}

/// FFmpeg filter for a centred crop to `aspect`.
pub fn crop_filter(aspect: AspectRatio) -> String {
    format!(
        "crop='min(iw,ih*{w}/{h})':'min(ih,iw*{h}/{w})'",
        w = aspect.width,
        h = aspect.height
    )
}

/// Map 0.0-1.0 quality onto FFmpeg's MJPEG qscale (2 best, 31 worst).
pub fn jpeg_qscale(quality: f32) -> u32 {
    let quality = quality.clamp(0.0, 1.0);
    2 + ((1.0 - quality) * 29.0).round() as u32
}

fn is_permission_error(stderr: &str) -> bool {
    let lower = stderr.to_lowercase();
    PERMISSION_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

impl ImagePicker for CameraPicker {
    async fn launch(&self, options: &PickerOptions) -> Result<PickOutcome, AcquireError> {
        let cameras = tokio::task::spawn_blocking(list_cameras)
            .await
            .map_err(|e| AcquireError::Io(std::io::Error::other(e)))??;
        let camera = resolve_camera(&cameras, self.device.as_deref())?;

        let output = reserve_output_path(&self.output_dir, "capture", "jpg")?;
        let args = self.to_ffmpeg_args(&camera.index.to_string(), options, &output);

        log::debug!("Capturing from camera [{}] {}", camera.index, camera.name);
        log::debug!("ffmpeg {}", args.join(" "));

        let result = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AcquireError::FfmpegNotFound
                } else {
                    AcquireError::Io(e)
                }
            })?;

        let stderr = String::from_utf8_lossy(&result.stderr);

        // Killed by a signal (e.g. Ctrl+C): the user backed out.
        if result.status.code().is_none() {
            log::info!("Camera capture interrupted");
            return Ok(PickOutcome::cancelled());
        }

        if !result.status.success() {
            if is_permission_error(&stderr) {
                return Err(AcquireError::PermissionDenied {
                    details: stderr.trim().to_string(),
                });
            }
            return Err(AcquireError::CaptureFailed(stderr.trim().to_string()));
        }

        let written = tokio::fs::metadata(&output)
            .await
            .map(|m| m.len() > 0)
            .unwrap_or(false);
        if !written {
            return Err(AcquireError::CaptureFailed(
                "FFmpeg exited without writing a frame".to_string(),
            ));
        }

        let (width, height) = image::image_dimensions(&output)?;
        Ok(PickOutcome::picked(PickedAsset {
            path: output,
            width,
            height,
        }))
    }
}
