//! Image preprocessing: uploaded bytes → bounded JPEG data-URL.
//!
//! Uploads arrive as whatever the client had — a 12-megapixel phone photo,
//! a PNG screenshot, a WebP export. Before the vision call we downscale so
//! neither dimension exceeds the configured bound, force RGB (JPEG has no
//! alpha channel), and re-encode at quality 85. This bounds the request body
//! to a few hundred kilobytes regardless of input and keeps the base64
//! payload inside typical API limits.
//!
//! ## Why JPEG here and not PNG?
//! ID-document photos are continuous-tone camera images, where JPEG at
//! quality 85 is visually lossless to a vision model at a fraction of PNG's
//! size. (For rendered text the trade-off points the other way, but that is
//! not what people upload to this endpoint.)

use crate::error::ExtractError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Decode, downscale, and re-encode an uploaded image as a JPEG data-URL
/// ready to embed in a vision request.
///
/// * Neither output dimension exceeds `max_dim`; aspect ratio is preserved.
/// * Lanczos3 resampling keeps small document text legible after downscale.
/// * Output is always `data:image/jpeg;base64,…` in RGB, regardless of the
///   input format or colour mode.
///
/// CPU-bound; callers on the async runtime should wrap this in
/// `spawn_blocking` (the [`crate::extract::Extractor`] does).
pub fn encode_id_image(bytes: &[u8], max_dim: u32, quality: u8) -> Result<String, ExtractError> {
    let img = image::load_from_memory(bytes).map_err(|e| ExtractError::ImageDecode {
        detail: e.to_string(),
    })?;

    let (w, h) = (img.width(), img.height());
    let img = if w > max_dim || h > max_dim {
        let resized = img.resize(max_dim, max_dim, FilterType::Lanczos3);
        debug!(
            "downscaled image {}x{} -> {}x{}",
            w,
            h,
            resized.width(),
            resized.height()
        );
        resized
    } else {
        img
    };

    // JPEG carries no alpha; force RGB before encoding.
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| ExtractError::ImageEncode {
            detail: e.to_string(),
        })?;

    let b64 = STANDARD.encode(&buf);
    debug!("encoded image -> {} bytes base64", b64.len());

    Ok(format!("data:image/jpeg;base64,{b64}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([200, 30, 30, 255]),
        ));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .expect("png encode");
        buf
    }

    fn decode_data_url(data_url: &str) -> DynamicImage {
        let b64 = data_url
            .strip_prefix("data:image/jpeg;base64,")
            .expect("data-url prefix");
        let jpeg = STANDARD.decode(b64).expect("valid base64");
        image::load_from_memory(&jpeg).expect("valid jpeg")
    }

    #[test]
    fn small_image_keeps_dimensions() {
        let data_url = encode_id_image(&png_bytes(320, 200), 1024, 85).expect("encode");
        let out = decode_data_url(&data_url);
        assert_eq!((out.width(), out.height()), (320, 200));
    }

    #[test]
    fn oversized_image_is_bounded_preserving_aspect() {
        let data_url = encode_id_image(&png_bytes(2048, 1024), 1024, 85).expect("encode");
        let out = decode_data_url(&data_url);
        assert_eq!(out.width(), 1024);
        assert_eq!(out.height(), 512);
    }

    #[test]
    fn portrait_image_is_bounded_on_height() {
        let data_url = encode_id_image(&png_bytes(500, 4000), 1024, 85).expect("encode");
        let out = decode_data_url(&data_url);
        assert!(out.height() <= 1024);
        assert!(out.width() <= 1024);
    }

    #[test]
    fn alpha_input_becomes_rgb_jpeg() {
        let data_url = encode_id_image(&png_bytes(10, 10), 1024, 85).expect("encode");
        let out = decode_data_url(&data_url);
        assert_eq!(out.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn garbage_bytes_fail_with_decode_error() {
        let err = encode_id_image(b"definitely not an image", 1024, 85).unwrap_err();
        assert!(matches!(err, ExtractError::ImageDecode { .. }));
    }
}
