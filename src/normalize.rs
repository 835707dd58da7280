//! Geometric normalization of a selected face region.
//!
//! The selected bounding box is expanded by a fixed margin, clipped to the
//! source image, cropped, padded to a centered square with a fixed fill
//! color, and resized in a single pass to the canonical resolution the
//! downstream classifier expects.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use crate::config::PipelineConfig;
use crate::detector::FaceBounds;
use crate::error::{Result, ShapeError};

/// Crop region within the source image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Square face image of side [`PipelineConfig::canonical_resolution`].
///
/// Only the normalizer constructs this type, so holding one is proof the
/// squaring and resizing invariants hold.
#[derive(Debug, Clone)]
pub struct NormalizedFace {
    image: RgbImage,
}

impl NormalizedFace {
    /// The normalized pixels.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Side length in pixels; width and height are always equal.
    pub fn side(&self) -> u32 {
        self.image.width()
    }
}

/// Expand `bounds` by `margin` pixels on all four sides and clip the result
/// to the `img_w` × `img_h` source image.
///
/// Fractional detector coordinates are resolved outward (floor on the near
/// edge, ceil on the far edge) after clipping, so the region is exact for
/// integer-valued boxes and never loses face pixels for fractional ones.
pub fn expand_region(bounds: &FaceBounds, margin: u32, img_w: u32, img_h: u32) -> CropRegion {
    let margin = margin as f64;
    let x1 = (bounds.x - margin).max(0.0);
    let y1 = (bounds.y - margin).max(0.0);
    let x2 = (bounds.x + bounds.width + margin).min(img_w as f64);
    let y2 = (bounds.y + bounds.height + margin).min(img_h as f64);

    let x = x1.floor() as u32;
    let y = y1.floor() as u32;
    let width = (x2.ceil() as u32)
        .saturating_sub(x)
        .min(img_w.saturating_sub(x));
    let height = (y2.ceil() as u32)
        .saturating_sub(y)
        .min(img_h.saturating_sub(y));

    CropRegion {
        x,
        y,
        width,
        height,
    }
}

/// Offsets that center a `crop_w` × `crop_h` rectangle on its bounding
/// square, returned as `(pad_left, pad_top)`.
///
/// Integer division floors, so an odd pad biases toward the top/left edge.
pub fn square_padding(crop_w: u32, crop_h: u32) -> (u32, u32) {
    let max_side = crop_w.max(crop_h);
    ((max_side - crop_w) / 2, (max_side - crop_h) / 2)
}

/// Crop `source` to `region`, pad to a centered square filled with the
/// configured padding color, and resize to the canonical resolution.
///
/// A zero-area region cannot occur for boxes that passed the selector's
/// minimum-dimension filter, but a degenerate box from a misbehaving
/// detector is rejected with [`ShapeError::DegenerateCropRegion`] rather
/// than fed to the resampler.
pub fn normalize_face(
    source: &RgbImage,
    region: CropRegion,
    config: &PipelineConfig,
) -> Result<NormalizedFace> {
    if region.width == 0 || region.height == 0 {
        return Err(ShapeError::DegenerateCropRegion {
            width: region.width,
            height: region.height,
        });
    }

    let crop =
        imageops::crop_imm(source, region.x, region.y, region.width, region.height).to_image();

    let max_side = region.width.max(region.height);
    let (pad_left, pad_top) = square_padding(region.width, region.height);

    let mut canvas = RgbImage::from_pixel(max_side, max_side, Rgb(config.padding_color));
    imageops::replace(&mut canvas, &crop, pad_left as i64, pad_top as i64);

    let side = config.canonical_resolution;
    let image = imageops::resize(&canvas, side, side, FilterType::Lanczos3);

    Ok(NormalizedFace { image })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(x: f64, y: f64, width: f64, height: f64) -> FaceBounds {
        FaceBounds {
            x,
            y,
            width,
            height,
            confidence: 1.0,
        }
    }

    fn white_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
    }

    #[test]
    fn expansion_adds_margin_on_all_sides() {
        let region = expand_region(&bounds(100.0, 100.0, 100.0, 150.0), 10, 500, 400);
        assert_eq!(
            region,
            CropRegion {
                x: 90,
                y: 90,
                width: 120,
                height: 170,
            }
        );
    }

    #[test]
    fn expansion_clips_to_image_origin() {
        let region = expand_region(&bounds(5.0, 3.0, 50.0, 50.0), 10, 500, 400);
        assert_eq!(region.x, 0);
        assert_eq!(region.y, 0);
        assert_eq!(region.width, 65); // 5 + 50 + 10
        assert_eq!(region.height, 63);
    }

    #[test]
    fn expansion_clips_to_far_edges() {
        let region = expand_region(&bounds(460.0, 360.0, 50.0, 50.0), 10, 500, 400);
        assert_eq!(region.x, 450);
        assert_eq!(region.y, 350);
        assert_eq!(region.x + region.width, 500);
        assert_eq!(region.y + region.height, 400);
    }

    #[test]
    fn expansion_never_exceeds_bounds_for_fractional_boxes() {
        let region = expand_region(&bounds(0.4, 0.6, 499.2, 399.1), 10, 500, 400);
        assert!(region.x + region.width <= 500);
        assert!(region.y + region.height <= 400);
    }

    #[test]
    fn box_outside_image_degenerates_to_zero_area() {
        let region = expand_region(&bounds(900.0, 900.0, 50.0, 50.0), 10, 500, 400);
        assert!(region.width == 0 || region.height == 0);
    }

    #[test]
    fn square_crop_needs_no_padding() {
        assert_eq!(square_padding(170, 170), (0, 0));
    }

    #[test]
    fn padding_centers_the_shorter_dimension() {
        // 120 wide on a 170 square: (170 - 120) / 2 = 25 left
        assert_eq!(square_padding(120, 170), (25, 0));
        assert_eq!(square_padding(170, 120), (0, 25));
    }

    #[test]
    fn odd_padding_biases_top_left() {
        // 170 - 119 = 51, floor(51 / 2) = 25
        let (pad_left, _) = square_padding(119, 170);
        assert_eq!(pad_left, 25);
        assert!(pad_left + 119 <= 170);
    }

    #[test]
    fn padding_never_overflows_the_square() {
        for (w, h) in [(1, 300), (299, 300), (300, 1), (123, 457)] {
            let max_side = w.max(h);
            let (pad_left, pad_top) = square_padding(w, h);
            assert!(pad_left + w <= max_side);
            assert!(pad_top + h <= max_side);
        }
    }

    #[test]
    fn output_is_always_canonical_square() {
        let config = PipelineConfig::default();
        let source = white_image(500, 400);
        for region in [
            CropRegion {
                x: 90,
                y: 90,
                width: 120,
                height: 170,
            },
            CropRegion {
                x: 0,
                y: 0,
                width: 500,
                height: 400,
            },
            CropRegion {
                x: 10,
                y: 10,
                width: 60,
                height: 60,
            },
        ] {
            let face = normalize_face(&source, region, &config).unwrap();
            assert_eq!(face.side(), 224);
            assert_eq!(face.image().width(), face.image().height());
        }
    }

    #[test]
    fn padded_bands_carry_the_fill_color() {
        // 120x170 crop of a white image on a black 170 square: the scaled
        // left band (25/170 of the width) stays black, the center is white.
        let config = PipelineConfig::default();
        let source = white_image(500, 400);
        let region = CropRegion {
            x: 90,
            y: 90,
            width: 120,
            height: 170,
        };
        let face = normalize_face(&source, region, &config).unwrap();
        let img = face.image();

        let edge = img.get_pixel(2, 112);
        assert_eq!(edge, &Rgb([0, 0, 0]));
        let center = img.get_pixel(112, 112);
        assert_eq!(center, &Rgb([255, 255, 255]));
    }

    #[test]
    fn custom_padding_color_is_used() {
        let config = PipelineConfig {
            padding_color: [0, 128, 255],
            ..Default::default()
        };
        let source = white_image(300, 100);
        let region = CropRegion {
            x: 0,
            y: 0,
            width: 300,
            height: 100,
        };
        let face = normalize_face(&source, region, &config).unwrap();
        // Top band is padding
        assert_eq!(face.image().get_pixel(112, 2), &Rgb([0, 128, 255]));
    }

    #[test]
    fn degenerate_region_is_rejected() {
        let config = PipelineConfig::default();
        let source = white_image(100, 100);
        let region = CropRegion {
            x: 10,
            y: 10,
            width: 0,
            height: 25,
        };
        let result = normalize_face(&source, region, &config);
        assert!(matches!(
            result,
            Err(ShapeError::DegenerateCropRegion { .. })
        ));
    }

    #[test]
    fn custom_canonical_resolution_is_honored() {
        let config = PipelineConfig {
            canonical_resolution: 128,
            ..Default::default()
        };
        let source = white_image(200, 300);
        let region = CropRegion {
            x: 20,
            y: 20,
            width: 100,
            height: 150,
        };
        let face = normalize_face(&source, region, &config).unwrap();
        assert_eq!(face.side(), 128);
    }
}
