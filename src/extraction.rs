//! Splitting a masked image into one cutout per connected mask region.
//!
//! The mask is treated as binary (nonzero = foreground). Maximal
//! 8-connected foreground components are located by external contour
//! tracing; holes inside a component never produce a region of their own.

use image::{imageops, DynamicImage, GrayImage, RgbaImage};
use imageproc::contours::{find_contours, BorderType, Contour};

use crate::compositing;

/// Axis-aligned bounding box of one connected foreground component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobRegion {
    /// Left edge of the box, in pixels.
    pub x: u32,
    /// Top edge of the box, in pixels.
    pub y: u32,
    /// Box width, in pixels.
    pub width: u32,
    /// Box height, in pixels.
    pub height: u32,
}

/// Find the bounding boxes of all connected foreground components.
///
/// Ordering follows the contour tracing scan and is deterministic for a
/// fixed mask, but carries no semantic ranking. An all-zero mask yields
/// an empty list.
#[must_use]
pub fn blob_regions(mask: &GrayImage) -> Vec<BlobRegion> {
    find_contours::<u32>(mask)
        .iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .filter_map(bounding_box)
        .collect()
}

/// Crop one alpha-matted sub-image out of `main` for every mask component.
///
/// `mask` must already have `main`'s dimensions (the batch runner conforms
/// it with [`compositing::conform`] first). Each component is cropped to
/// its bounding box from both images and combined in cutout form: the
/// cropped mask values become the crop's alpha channel.
#[must_use]
pub fn extract_blobs(main: &DynamicImage, mask: &GrayImage) -> Vec<RgbaImage> {
    let main = main.to_rgba8();
    blob_regions(mask)
        .into_iter()
        .map(|r| {
            let mut crop = imageops::crop_imm(&main, r.x, r.y, r.width, r.height).to_image();
            let mask_crop = imageops::crop_imm(mask, r.x, r.y, r.width, r.height).to_image();
            compositing::apply_alpha(&mut crop, &mask_crop);
            crop
        })
        .collect()
}

fn bounding_box(contour: &Contour<u32>) -> Option<BlobRegion> {
    let first = contour.points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &contour.points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(BlobRegion {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}
