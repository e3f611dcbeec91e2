//! Camera discovery through FFmpeg's AVFoundation input.

use std::process::{Command, Stdio};

use super::errors::AcquireError;

/// A camera FFmpeg can capture from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub index: usize,
    pub name: String,
}

/// List cameras, skipping the "Capture screen N" pseudo-devices.
pub fn list_cameras() -> Result<Vec<CameraDevice>, AcquireError> {
    let output = Command::new("ffmpeg")
        .args(["-hide_banner", "-f", "avfoundation", "-list_devices", "true", "-i", ""])
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AcquireError::FfmpegNotFound
            } else {
                AcquireError::Io(e)
            }
        })?;

    // The listing goes to stderr and ffmpeg exits non-zero because of the empty input.
    let stderr = String::from_utf8_lossy(&output.stderr);
    Ok(parse_cameras(&stderr))
}

/// Parse the video section of `ffmpeg -list_devices` output.
pub fn parse_cameras(stderr: &str) -> Vec<CameraDevice> {
    let mut cameras = Vec::new();
    let mut in_video = false;

    for line in stderr.lines() {
        if line.contains("AVFoundation video devices:") {
            in_video = true;
            continue;
        }
        if line.contains("AVFoundation audio devices:") {
            in_video = false;
            continue;
        }
        if !in_video {
            continue;
        }
        if let Some(device) = parse_device_entry(line) {
            if !device.name.starts_with("Capture screen") {
                cameras.push(device);
            }
        }
    }

    cameras
}

/// Parse `[AVFoundation indev @ 0x...] [0] FaceTime HD Camera`.
fn parse_device_entry(line: &str) -> Option<CameraDevice> {
    let (_, rest) = line.split_once("] [")?;
    let (index, name) = rest.split_once(']')?;
    let index = index.parse().ok()?;
    let name = name.trim();

    if name.is_empty() {
        return None;
    }

    Some(CameraDevice {
        index,
        name: name.to_string(),
    })
}

/// Resolve a user device selector (index among cameras, or name substring).
///
/// `None` picks the first camera.
pub fn resolve_camera(
    cameras: &[CameraDevice],
    selector: Option<&str>,
) -> Result<CameraDevice, AcquireError> {
    let first = cameras.first().ok_or(AcquireError::NoCameraDevices)?;

    let Some(selector) = selector else {
        return Ok(first.clone());
    };

    let not_found = || AcquireError::CameraNotFound {
        requested: selector.to_string(),
        available: cameras.iter().map(|c| c.name.clone()).collect(),
    };

    if let Ok(position) = selector.parse::<usize>() {
        return cameras.get(position).cloned().ok_or_else(not_found);
    }

    let needle = selector.to_lowercase();
    cameras
        .iter()
        .find(|c| c.name.to_lowercase().contains(&needle))
        .cloned()
        .ok_or_else(not_found)
}
