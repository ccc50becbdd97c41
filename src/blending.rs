//! Sizing, positioning and alpha blending of the watermark.
//!
//! The mark is applied with straight (non-premultiplied) alpha:
//! `out = alpha * mark + (1 - alpha) * base`
//!
//! where `alpha` is the mark's own alpha channel.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage, Rgba, Rgba32FImage, RgbaImage};

/// Mark width as a fraction of the larger image dimension.
const WIDTH_RATIO: f64 = 0.1;

/// Fixed width:height ratio of the resized mark.
const ASPECT_RATIO: f64 = 1.5;

/// Opaque background used when flattening leftover transparency.
pub const FLATTEN_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Target `(width, height)` of the mark for an image of the given size.
///
/// Width is 10% of the larger dimension (each side floored first), height
/// keeps a 3:2 ratio. Either value may be 0 for very small images.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn watermark_size(img_w: u32, img_h: u32) -> (u32, u32) {
    let from_w = (f64::from(img_w) * WIDTH_RATIO).floor() as u32;
    let from_h = (f64::from(img_h) * WIDTH_RATIO).floor() as u32;
    let width = from_w.max(from_h);
    let height = (f64::from(width) / ASPECT_RATIO).floor() as u32;
    (width, height)
}

/// Top-left corner of a `wm_w x wm_h` mark centered at the normalized `center`.
///
/// The corner is clamped to `[0, img_w - wm_w] x [0, img_h - wm_h]`. When the
/// mark is larger than the image along an axis the lower bound wins and the
/// mark is clipped when pasted. On small or very elongated images this moves
/// the mark well away from its nominal center.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn paste_origin(img_w: u32, img_h: u32, wm_w: u32, wm_h: u32, center: (f64, f64)) -> (u32, u32) {
    let axis = |extent: u32, size: u32, ratio: f64| -> u32 {
        let nominal = (f64::from(extent) * ratio).floor() as i64 - i64::from(size / 2);
        let max = i64::from(extent) - i64::from(size);
        nominal.min(max).max(0) as u32
    };
    (axis(img_w, wm_w, center.0), axis(img_h, wm_h, center.1))
}

/// Resize a copy of the mark with a Lanczos filter, keeping its alpha channel.
///
/// Filtering runs on premultiplied alpha so fully transparent pixels do not
/// bleed their color into the mark's edges.
#[must_use]
pub fn resize_mark(mark: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let premultiplied = Rgba32FImage::from_fn(mark.width(), mark.height(), |x, y| {
        let px = mark.get_pixel(x, y);
        let alpha = f32::from(px[3]) / 255.0;
        let c = |ch: usize| f32::from(px[ch]) / 255.0 * alpha;
        Rgba([c(0), c(1), c(2), alpha])
    });

    let resized = imageops::resize(&premultiplied, width, height, FilterType::Lanczos3);

    let mut out = RgbaImage::new(width, height);
    for (src, dst) in resized.pixels().zip(out.pixels_mut()) {
        let alpha = src[3].clamp(0.0, 1.0);
        for ch in 0..3 {
            let straight = if alpha > 0.0 {
                (src[ch] / alpha).clamp(0.0, 1.0)
            } else {
                0.0
            };
            dst[ch] = to_u8(straight);
        }
        dst[3] = to_u8(alpha);
    }
    out
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(unit: f32) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Blend `mark` onto `base` with its top-left corner at `(pos_x, pos_y)`.
///
/// Color channels use the straight alpha blend; the result alpha is the
/// "over" combination, so an opaque base stays opaque. Portions of the mark
/// outside the base are clipped.
pub fn overlay_straight_alpha(base: &mut RgbaImage, mark: &RgbaImage, pos_x: u32, pos_y: u32) {
    let img_w = base.width();
    let img_h = base.height();

    // Clip to image bounds
    let x2 = pos_x.saturating_add(mark.width()).min(img_w);
    let y2 = pos_y.saturating_add(mark.height()).min(img_h);

    if pos_x >= x2 || pos_y >= y2 {
        return;
    }

    for dy in 0..(y2 - pos_y) {
        for dx in 0..(x2 - pos_x) {
            let src = mark.get_pixel(dx, dy);
            let alpha = u32::from(src[3]);
            if alpha == 0 {
                continue;
            }
            let inv_alpha = 255 - alpha;

            let px = base.get_pixel_mut(pos_x + dx, pos_y + dy);
            for ch in 0..3 {
                let blended = u32::from(src[ch]) * alpha + u32::from(px[ch]) * inv_alpha;
                #[allow(clippy::cast_possible_truncation)]
                {
                    px[ch] = ((blended + 127) / 255) as u8;
                }
            }
            let out_alpha = alpha * 255 + u32::from(px[3]) * inv_alpha;
            #[allow(clippy::cast_possible_truncation)]
            {
                px[3] = ((out_alpha + 127) / 255) as u8;
            }
        }
    }
}

/// Drop the alpha channel, blending partial transparency onto
/// [`FLATTEN_BACKGROUND`].
#[must_use]
pub fn flatten(image: &RgbaImage) -> RgbImage {
    let mut out = RgbImage::new(image.width(), image.height());
    for (src, dst) in image.pixels().zip(out.pixels_mut()) {
        let alpha = u32::from(src[3]);
        let inv_alpha = 255 - alpha;
        for ch in 0..3 {
            let blended = u32::from(src[ch]) * alpha + u32::from(FLATTEN_BACKGROUND[ch]) * inv_alpha;
            #[allow(clippy::cast_possible_truncation)]
            {
                dst[ch] = ((blended + 127) / 255) as u8;
            }
        }
    }
    out
}
