//! Pixel-level combination of a main image with its mask.
//!
//! Both operations normalize their inputs before touching pixels: the mask
//! is stretched to the main image's dimensions and both are brought to a
//! common channel layout. The results are always 8-bit RGBA.

use std::borrow::Cow;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, RgbaImage};

/// Resampling filter used whenever a mask must be conformed to the main
/// image's dimensions. Bilinear, stretch-to-fit: the aspect ratio is not
/// preserved when it differs between the two images.
pub const RESAMPLE_FILTER: FilterType = FilterType::Triangle;

/// Resize `mask` to exactly `width`x`height` with [`RESAMPLE_FILTER`].
///
/// Returns the input untouched when the dimensions already match.
#[must_use]
pub fn conform(mask: &DynamicImage, width: u32, height: u32) -> Cow<'_, DynamicImage> {
    if mask.width() == width && mask.height() == height {
        Cow::Borrowed(mask)
    } else {
        Cow::Owned(mask.resize_exact(width, height, RESAMPLE_FILTER))
    }
}

/// Cut `main` out along `mask`: mask luminance becomes output transparency.
///
/// The mask is reduced to 8-bit grayscale and written into the alpha
/// channel pixel for pixel (0 = fully transparent, 255 = fully opaque).
/// Color channels are copied from `main` unchanged. The result is RGBA
/// regardless of the input channel counts.
#[must_use]
pub fn cutout(main: &DynamicImage, mask: &DynamicImage) -> RgbaImage {
    let mut out = main.to_rgba8();
    let alpha = conform(mask, out.width(), out.height()).to_luma8();
    apply_alpha(&mut out, &alpha);
    out
}

/// Darken-blend `main` with `mask`: per-channel, per-pixel minimum.
///
/// Both images are brought to RGBA first, with any missing alpha treated
/// as fully opaque, so blending two opaque images yields an opaque result.
/// This is a value-wise minimum used to simulate a shadow/dim overlay,
/// not a transparency operation.
#[must_use]
pub fn darken_blend(main: &DynamicImage, mask: &DynamicImage) -> RgbaImage {
    let mut out = main.to_rgba8();
    let other = conform(mask, out.width(), out.height()).to_rgba8();
    for (px, mx) in out.pixels_mut().zip(other.pixels()) {
        for ch in 0..4 {
            px[ch] = px[ch].min(mx[ch]);
        }
    }
    out
}

/// Overwrite `image`'s alpha channel with the mask's grayscale values.
///
/// Both buffers must have identical dimensions.
pub(crate) fn apply_alpha(image: &mut RgbaImage, mask: &GrayImage) {
    debug_assert_eq!(image.dimensions(), mask.dimensions());
    for (px, m) in image.pixels_mut().zip(mask.pixels()) {
        px[3] = m[0];
    }
}
