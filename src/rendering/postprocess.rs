//! Cropping and re-encoding of rendered cards

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};

use super::{OutputFormat, RenderedImage};
use crate::{Error, Result};

/// Bounding box `(x, y, width, height)` of pixels with non-zero alpha.
pub fn content_bounds(img: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in img.enumerate_pixels() {
        if px[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds.map(|(x0, y0, x1, y1)| (x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}

/// Crop to the visible content. Fully transparent images are returned whole.
pub fn crop_to_content(img: &RgbaImage) -> RgbaImage {
    match content_bounds(img) {
        Some((x, y, w, h)) => image::imageops::crop_imm(img, x, y, w, h).to_image(),
        None => img.clone(),
    }
}

/// Encode `img` in `format`. `quality` only affects JPEG.
pub fn encode(img: &RgbaImage, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();
    let mut out = Vec::new();
    match format {
        OutputFormat::WebP => {
            WebPEncoder::new_lossless(&mut out).write_image(
                img.as_raw(),
                width,
                height,
                ExtendedColorType::Rgba8,
            )?;
        }
        OutputFormat::Png => {
            PngEncoder::new(&mut out).write_image(
                img.as_raw(),
                width,
                height,
                ExtendedColorType::Rgba8,
            )?;
        }
        OutputFormat::Jpeg => {
            let quality = quality.clamp(1, 100);
            let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut out, quality).write_image(
                rgb.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
    }
    Ok(out)
}

/// Decode the renderer's PNG, crop it and encode the final image.
pub fn finish(png: &[u8], format: OutputFormat, quality: u8) -> Result<RenderedImage> {
    let decoded = image::load_from_memory_with_format(png, ImageFormat::Png)?.to_rgba8();
    let cropped = crop_to_content(&decoded);
    if cropped.width() == 0 || cropped.height() == 0 {
        return Err(Error::ImageError("rendered image is empty".to_string()));
    }
    let data = encode(&cropped, format, quality)?;
    Ok(RenderedImage {
        width: cropped.width(),
        height: cropped.height(),
        format,
        data,
    })
}
