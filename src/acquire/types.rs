//! Acquisition types and data structures.

use std::fmt;
use std::path::{Path, PathBuf};

/// Handle to the bytes of a user-selected photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference(PathBuf);

impl ImageReference {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Where the user wants the photo to come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Take a new picture with the camera
    Camera,
    /// Choose an existing photo
    Library,
}

impl ImageSource {
    /// Label shown in the source chooser.
    pub fn label(&self) -> &'static str {
        match self {
            ImageSource::Camera => "Take Picture",
            ImageSource::Library => "Choose from Camera Roll",
        }
    }
}

/// Kind of media a picker may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Images,
}

/// Crop aspect ratio (width:height).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub const FOUR_BY_THREE: AspectRatio = AspectRatio {
        width: 4,
        height: 3,
    };

    /// Largest centred `(x, y, w, h)` region of `width`x`height` with this ratio.
    pub fn centered_crop(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let (w, h) = (u64::from(width), u64::from(height));
        let (rw, rh) = (u64::from(self.width), u64::from(self.height));

        // Too wide: keep full height. Otherwise keep full width.
        let (crop_w, crop_h) = if w * rh > h * rw {
            (h * rw / rh, h)
        } else {
            (w, w * rh / rw)
        };
        // Never collapse a non-empty side to zero.
        let crop_w = crop_w.max(1).min(w);
        let crop_h = crop_h.max(1).min(h);

        let x = (w - crop_w) / 2;
        let y = (h - crop_h) / 2;
        (x as u32, y as u32, crop_w as u32, crop_h as u32)
    }
}

/// Options handed to every picker. Both sources use the same settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerOptions {
    pub media_types: MediaType,
    /// Crop the picked photo to `aspect`
    pub allows_editing: bool,
    pub aspect: AspectRatio,
    /// 0.0-1.0, 1.0 is maximum quality
    pub quality: f32,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            media_types: MediaType::Images,
            allows_editing: true,
            aspect: AspectRatio::FOUR_BY_THREE,
            quality: 1.0,
        }
    }
}

/// A single asset returned by a picker.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedAsset {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Raw picker result, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickOutcome {
    pub canceled: bool,
    pub assets: Vec<PickedAsset>,
}

impl PickOutcome {
    pub fn cancelled() -> Self {
        Self {
            canceled: true,
            assets: Vec::new(),
        }
    }

    pub fn picked(asset: PickedAsset) -> Self {
        Self {
            canceled: false,
            assets: vec![asset],
        }
    }

    /// The first asset's location, unless the pick was cancelled or empty.
    pub fn into_reference(self) -> Option<ImageReference> {
        if self.canceled {
            return None;
        }
        self.assets
            .into_iter()
            .next()
            .map(|asset| ImageReference::new(asset.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(path: &str) -> PickedAsset {
        PickedAsset {
            path: PathBuf::from(path),
            width: 400,
            height: 300,
        }
    }

    #[test]
    fn test_default_picker_options() {
        let options = PickerOptions::default();
        assert_eq!(options.media_types, MediaType::Images);
        assert!(options.allows_editing);
        assert_eq!(options.aspect, AspectRatio::FOUR_BY_THREE);
        assert_eq!(options.quality, 1.0);
    }

    #[test]
    fn test_cancelled_outcome_has_no_reference() {
        assert_eq!(PickOutcome::cancelled().into_reference(), None);
    }

    #[test]
    fn test_cancelled_outcome_with_assets_has_no_reference() {
        let outcome = PickOutcome {
            canceled: true,
            assets: vec![asset("/tmp/a.jpg")],
        };
        assert_eq!(outcome.into_reference(), None);
    }

    #[test]
    fn test_empty_outcome_has_no_reference() {
        assert_eq!(PickOutcome::default().into_reference(), None);
    }

    #[test]
    fn test_first_asset_wins() {
        let outcome = PickOutcome {
            canceled: false,
            assets: vec![asset("/tmp/first.jpg"), asset("/tmp/second.jpg")],
        };
        assert_eq!(
            outcome.into_reference(),
            Some(ImageReference::new("/tmp/first.jpg"))
        );
    }

    #[test]
    fn test_centered_crop_wide_image() {
        // 16:9 -> keep height, trim sides
        assert_eq!(
            AspectRatio::FOUR_BY_THREE.centered_crop(1920, 1080),
            (240, 0, 1440, 1080)
        );
    }

    #[test]
    fn test_centered_crop_tall_image() {
        assert_eq!(
            AspectRatio::FOUR_BY_THREE.centered_crop(400, 600),
            (0, 150, 400, 300)
        );
    }

    #[test]
    fn test_centered_crop_exact_ratio_is_identity() {
        assert_eq!(
            AspectRatio::FOUR_BY_THREE.centered_crop(640, 480),
            (0, 0, 640, 480)
        );
    }

    #[test]
    fn test_centered_crop_keeps_one_pixel_sides() {
        assert_eq!(
            AspectRatio::FOUR_BY_THREE.centered_crop(1, 50),
            (0, 24, 1, 1)
        );
        assert_eq!(
            AspectRatio::FOUR_BY_THREE.centered_crop(50, 1),
            (24, 0, 1, 1)
        );
    }

    #[test]
    fn test_source_labels() {
        assert_eq!(ImageSource::Camera.label(), "Take Picture");
        assert_eq!(ImageSource::Library.label(), "Choose from Camera Roll");
    }
}
