//! Pixel work: the crop of the source image, plus the static capture and
//! merge utilities that share it.

use egui::{ColorImage, Pos2, Rect};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::export::ImageBlob;
use crate::geometry::CropRect;
use crate::image::SourceImage;

/// CSS reference resolution.
pub const REFERENCE_DPI: f32 = 96.0;

/// Renders `rect` (display pixels) of `source` into a new image of the same display size.
///
/// Pixels are sampled from the natural-resolution image, so when natural and
/// displayed sizes differ this is a resampling crop.
pub fn render_crop(source: &SourceImage, rect: &CropRect) -> RgbaImage {
    let [natural_w, natural_h] = source.natural_size();
    let scale = source.scale();

    let out_w = (rect.width.round() as u32).max(1);
    let out_h = (rect.height.round() as u32).max(1);
    if natural_w == 0 || natural_h == 0 {
        return RgbaImage::new(out_w, out_h);
    }

    let x = ((rect.left * scale.x).round() as u32).min(natural_w.saturating_sub(1));
    let y = ((rect.top * scale.y).round() as u32).min(natural_h.saturating_sub(1));
    let w = ((rect.width * scale.x).round() as u32).clamp(1, natural_w - x);
    let h = ((rect.height * scale.y).round() as u32).clamp(1, natural_h - y);

    let region = imageops::crop_imm(source.pixels(), x, y, w, h).to_image();
    if (w, h) == (out_w, out_h) {
        region
    } else {
        imageops::resize(&region, out_w, out_h, FilterType::Triangle)
    }
}

/// Output sizing for [`capture_element`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub dpi: Option<f32>,
}

impl CaptureOptions {
    /// Final pixel size for a region of `points` size captured at `physical` pixels.
    pub fn target_size(&self, points: egui::Vec2, physical: [u32; 2]) -> [u32; 2] {
        let aspect = if physical[1] == 0 {
            1.0
        } else {
            physical[0] as f32 / physical[1] as f32
        };
        let size = match (self.width, self.height) {
            (Some(w), Some(h)) => [w, h],
            (Some(w), None) => [w, (w as f32 / aspect).round() as u32],
            (None, Some(h)) => [(h as f32 * aspect).round() as u32, h],
            (None, None) => match self.dpi {
                Some(dpi) if dpi > 0.0 => {
                    let factor = dpi / REFERENCE_DPI;
                    [
                        (points.x * factor).round() as u32,
                        (points.y * factor).round() as u32,
                    ]
                }
                _ => physical,
            },
        };
        [size[0].max(1), size[1].max(1)]
    }
}

/// Rasterizes a region of the UI, taken from a frame screenshot, to a PNG.
///
/// `region` is in points; `pixels_per_point` maps it onto the screenshot.
pub fn capture_element(
    screenshot: &ColorImage,
    region: Rect,
    pixels_per_point: f32,
    options: &CaptureOptions,
) -> Result<ImageBlob, image::ImageError> {
    let frame = color_image_to_rgba(screenshot);
    let physical = crop_physical(&frame, region, pixels_per_point);
    let [w, h] = options.target_size(region.size(), [physical.width(), physical.height()]);
    let output = if [w, h] == [physical.width(), physical.height()] {
        physical
    } else {
        imageops::resize(&physical, w, h, FilterType::Triangle)
    };
    log::debug!("captured {:?} as {}x{}", region, w, h);
    ImageBlob::encode(&output)
}

/// Cuts `region` (points) out of a physical-pixel frame, clipped to the frame.
pub fn crop_physical(frame: &RgbaImage, region: Rect, pixels_per_point: f32) -> RgbaImage {
    let (frame_w, frame_h) = (frame.width(), frame.height());
    let x0 = ((region.min.x * pixels_per_point).round().max(0.0) as u32).min(frame_w.saturating_sub(1));
    let y0 = ((region.min.y * pixels_per_point).round().max(0.0) as u32).min(frame_h.saturating_sub(1));
    let x1 = ((region.max.x * pixels_per_point).round().max(0.0) as u32).clamp(x0 + 1, frame_w.max(x0 + 1));
    let y1 = ((region.max.y * pixels_per_point).round().max(0.0) as u32).clamp(y0 + 1, frame_h.max(y0 + 1));
    imageops::crop_imm(frame, x0, y0, x1 - x0, y1 - y0).to_image()
}

pub fn color_image_to_rgba(image: &ColorImage) -> RgbaImage {
    let [w, h] = image.size;
    let mut raw = Vec::with_capacity(w * h * 4);
    for color in &image.pixels {
        raw.extend_from_slice(&color.to_srgba_unmultiplied());
    }
    RgbaImage::from_raw(w as u32, h as u32, raw).unwrap_or_else(|| RgbaImage::new(w as u32, h as u32))
}

/// An image placed at a position on the merge canvas.
#[derive(Debug, Clone)]
pub struct PositionedImage {
    pub image: RgbaImage,
    pub position: Pos2,
}

impl PositionedImage {
    pub fn new(image: RgbaImage, position: Pos2) -> Self {
        Self { image, position }
    }
}

/// Composites `images` in order onto a transparent `width × height` canvas.
pub fn merge_images_blob(
    images: &[PositionedImage],
    width: u32,
    height: u32,
) -> Result<ImageBlob, image::ImageError> {
    let mut canvas = RgbaImage::new(width.max(1), height.max(1));
    for item in images {
        imageops::overlay(
            &mut canvas,
            &item.image,
            item.position.x.round() as i64,
            item.position.y.round() as i64,
        );
    }
    ImageBlob::encode(&canvas)
}

/// Like [`merge_images_blob`], returned as a PNG data URL.
pub fn merge_images(
    images: &[PositionedImage],
    width: u32,
    height: u32,
) -> Result<String, image::ImageError> {
    Ok(merge_images_blob(images, width, height)?.to_data_url())
}
