//! Image acquisition: take a new photo or choose an existing one.
//!
//! Both sources go through an [`ImagePicker`] configured with the same
//! [`PickerOptions`], and their raw [`PickOutcome`] is normalized into at most
//! one [`ImageReference`].

mod camera;
mod devices;
mod errors;
mod library;
mod types;

use std::path::{Path, PathBuf};

pub use camera::{crop_filter, jpeg_qscale, CameraPicker};
pub use devices::{list_cameras, parse_cameras, resolve_camera, CameraDevice};
pub use errors::AcquireError;
pub use library::LibraryPicker;
pub use types::{
    AspectRatio, ImageReference, ImageSource, MediaType, PickOutcome, PickedAsset, PickerOptions,
};

/// Create a new, uniquely named file in `dir` for a picked photo.
///
/// The file is kept on disk; the caller overwrites it with the image.
pub(crate) fn reserve_output_path(
    dir: &Path,
    prefix: &str,
    extension: &str,
) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = tempfile::Builder::new()
        .prefix(&format!("{}-", prefix))
        .suffix(&format!(".{}", extension))
        .tempfile_in(dir)?
        .into_temp_path()
        .keep()?;
    Ok(path)
}

/// A platform capability that yields photos.
#[allow(async_fn_in_trait)]
pub trait ImagePicker {
    async fn launch(&self, options: &PickerOptions) -> Result<PickOutcome, AcquireError>;
}

/// Run `picker` and normalize its result.
///
/// Returns `Ok(None)` when the user cancelled or the picker returned no asset;
/// the caller keeps whatever image it had before.
pub async fn select_image<P: ImagePicker>(
    picker: &P,
    options: &PickerOptions,
) -> Result<Option<ImageReference>, AcquireError> {
    let outcome = picker.launch(options).await?;
    let selected = outcome.into_reference();

    match &selected {
        Some(image) => log::info!("Selected image {}", image),
        None => log::debug!("Image selection cancelled"),
    }

    Ok(selected)
}
