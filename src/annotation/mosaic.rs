use egui::{Color32, ColorImage, Pos2, Rect, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Grey levels of the mosaic tile lie in `[MOSAIC_GREY_MIN, MOSAIC_GREY_MIN + MOSAIC_GREY_RANGE)`.
pub const MOSAIC_GREY_MIN: u8 = 100;
pub const MOSAIC_GREY_RANGE: u8 = 120;

/// A `tile × tile` image of random opaque greys; the same seed gives the same tile.
pub fn mosaic_tile(tile: u32, seed: u64) -> ColorImage {
    let side = tile.max(1) as usize;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut image = ColorImage::new([side, side], Color32::BLACK);
    for pixel in &mut image.pixels {
        let grey = rng.gen_range(MOSAIC_GREY_MIN..MOSAIC_GREY_MIN + MOSAIC_GREY_RANGE);
        *pixel = Color32::from_gray(grey);
    }
    image
}

/// A fresh random seed for a canvas' mosaic tile.
pub fn random_seed() -> u64 {
    rand::random()
}

/// Square stamps covering a mosaic stroke of `width` along `points`.
pub fn stamps(points: &[Pos2], width: f32) -> Vec<Rect> {
    let spacing = (width / 4.0).max(1.0);
    let size = Vec2::splat(width);
    let mut rects = Vec::new();
    match points {
        [] => {}
        [only] => rects.push(Rect::from_center_size(*only, size)),
        _ => {
            rects.push(Rect::from_center_size(points[0], size));
            for pair in points.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                let steps = (a.distance(b) / spacing).ceil().max(1.0) as usize;
                for step in 1..=steps {
                    let t = step as f32 / steps as f32;
                    rects.push(Rect::from_center_size(a.lerp(b, t), size));
                }
            }
        }
    }
    rects
}

/// Texture coordinates that keep the repeating tile anchored to the canvas origin.
pub fn tile_uv(stamp: Rect, tile: u32) -> Rect {
    let tile = tile.max(1) as f32;
    Rect::from_min_max(
        Pos2::new(stamp.min.x / tile, stamp.min.y / tile),
        Pos2::new(stamp.max.x / tile, stamp.max.y / tile),
    )
}
