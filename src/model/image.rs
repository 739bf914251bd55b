//! Image records parsed from the image-listing tool.

use serde::{Deserialize, Serialize};

/// One embedded image as reported by the listing tool.
///
/// Field order matches the 16 columns of `pdfimages -list`:
///
/// ```text
/// page   num  type   width height color comp bpc  enc interp  object ID x-ppi y-ppi size ratio
/// --------------------------------------------------------------------------------------------
///    1     0 image     420   520  rgb     3   8  image  no         7  0   432   432  100K  16%
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Page the image appears on (one-based).
    pub page: u32,
    /// Index of the image within the document listing.
    pub index: u32,
    /// Object kind ("image", "mask", "smask", "stencil").
    pub kind: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Color space ("rgb", "gray", "cmyk", ...).
    pub color_space: String,
    /// Number of color components.
    pub components: u32,
    /// Bits per component.
    pub bits_per_component: u32,
    /// Stream encoding ("image", "jpeg", "jpx", "ccitt", ...).
    pub encoding: String,
    /// Whether the image requests interpolation.
    pub interpolated: bool,
    /// PDF object number.
    pub object: u32,
    /// PDF object generation.
    pub object_id: u32,
    /// Horizontal print resolution in pixels per inch.
    pub x_ppi: u32,
    /// Vertical print resolution in pixels per inch.
    pub y_ppi: u32,
    /// Human-readable stream size (e.g. "100K").
    pub size: String,
    /// Compression ratio (e.g. "16%").
    pub ratio: String,
}

impl ImageRecord {
    /// Whether both axes meet the print-resolution threshold.
    ///
    /// The threshold is inclusive: exactly `min_ppi` on both axes is good.
    /// A violation on either axis fails the image.
    pub fn meets_resolution(&self, min_ppi: u32) -> bool {
        self.x_ppi >= min_ppi && self.y_ppi >= min_ppi
    }
}

impl std::fmt::Display for ImageRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}x{} ({}x{} ppi) at pg. {}",
            self.color_space, self.kind, self.width, self.height, self.x_ppi, self.y_ppi, self.page
        )
    }
}

/// An image record paired with its audit outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAudit {
    /// The parsed image record.
    pub image: ImageRecord,
    /// Whether the image meets the configured resolution threshold.
    pub good: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(x_ppi: u32, y_ppi: u32) -> ImageRecord {
        ImageRecord {
            page: 1,
            index: 0,
            kind: "image".into(),
            width: 420,
            height: 520,
            color_space: "rgb".into(),
            components: 3,
            bits_per_component: 8,
            encoding: "image".into(),
            interpolated: false,
            object: 7,
            object_id: 0,
            x_ppi,
            y_ppi,
            size: "100K".into(),
            ratio: "16%".into(),
        }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(record(301, 301).meets_resolution(300));
        assert!(record(300, 300).meets_resolution(300));
        assert!(!record(299, 300).meets_resolution(300));
    }

    #[test]
    fn test_either_axis_fails() {
        assert!(!record(300, 299).meets_resolution(300));
        assert!(!record(299, 600).meets_resolution(300));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            record(432, 432).to_string(),
            "rgb image 420x520 (432x432 ppi) at pg. 1"
        );
    }
}
