//! Library picker - chooses an existing photo from disk.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};

use super::errors::AcquireError;
use super::types::{PickOutcome, PickedAsset, PickerOptions};
use super::{reserve_output_path, ImagePicker};

/// Chooses an existing photo.
///
/// The path is whatever the user typed; an empty path counts as backing out
/// of the chooser.
#[derive(Debug, Clone)]
pub struct LibraryPicker {
    path: PathBuf,
    output_dir: PathBuf,
}

impl LibraryPicker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            output_dir: std::env::temp_dir().join("snapsight"),
        }
    }

    /// Directory cropped copies are written to
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Crop `source` to the picker's aspect ratio and save it in its own format.
///
/// Returns the source unchanged when it already has the right shape.
fn crop_to_aspect(
    source: &Path,
    format: ImageFormat,
    options: &PickerOptions,
    output_dir: &Path,
) -> Result<PickedAsset, AcquireError> {
    let img = image::open(source)?;
    let (x, y, width, height) = options.aspect.centered_crop(img.width(), img.height());

    if (width, height) == (img.width(), img.height()) {
        return Ok(PickedAsset {
            path: source.to_path_buf(),
            width,
            height,
        });
    }

    let extension = format.extensions_str().first().copied().unwrap_or("img");
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    let output = reserve_output_path(output_dir, &stem, extension)?;

    let cropped = img.crop_imm(x, y, width, height);
    save_with_quality(&cropped, &output, format, options.quality)?;

    log::debug!(
        "Cropped {} to {}x{} -> {}",
        source.display(),
        width,
        height,
        output.display()
    );

    Ok(PickedAsset {
        path: output,
        width,
        height,
    })
}

fn save_with_quality(
    img: &DynamicImage,
    output: &Path,
    format: ImageFormat,
    quality: f32,
) -> Result<(), AcquireError> {
    if format == ImageFormat::Jpeg {
        let file = std::fs::File::create(output)?;
        let mut writer = std::io::BufWriter::new(file);
        let quality = (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, quality);
        // JPEG has no alpha channel.
        DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)?;
        return Ok(());
    }

    img.save_with_format(output, format)?;
    Ok(())
}

impl ImagePicker for LibraryPicker {
    async fn launch(&self, options: &PickerOptions) -> Result<PickOutcome, AcquireError> {
        if self.path.as_os_str().is_empty() {
            return Ok(PickOutcome::cancelled());
        }

        if !self.path.is_file() {
            return Err(AcquireError::FileNotFound {
                path: self.path.clone(),
            });
        }

        let format = ImageFormat::from_path(&self.path).map_err(|_| AcquireError::NotAnImage {
            path: self.path.clone(),
        })?;

        let asset = if options.allows_editing {
            let source = self.path.clone();
            let output_dir = self.output_dir.clone();
            let options = *options;
            tokio::task::spawn_blocking(move || {
                crop_to_aspect(&source, format, &options, &output_dir)
            })
            .await
            .map_err(|e| AcquireError::Io(std::io::Error::other(e)))??
        } else {
            let (width, height) = image::image_dimensions(&self.path)?;
            PickedAsset {
                path: self.path.clone(),
                width,
                height,
            }
        };

        Ok(PickOutcome::picked(asset))
    }
}
