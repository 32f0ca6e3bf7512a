//! Image encoding: RGBA pixels → PDF image XObject streams.
//!
//! PDF has no RGBA image type. Colour goes into a `/DeviceRGB` image and
//! transparency into a separate `/DeviceGray` soft mask referenced through
//! `/SMask`. Fully opaque images skip the mask entirely so the output stays
//! small and renders identically in viewers without transparency support.
//!
//! Both streams are zlib-compressed (`/FlateDecode`), which is lossless; the
//! banner is already resampled to its final pixel size, so re-encoding as
//! JPEG would only add artefacts.

use crate::error::{BannerError, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbaImage;
use lopdf::{dictionary, Stream};
use std::io::Write;
use tracing::debug;

/// Colour and optional alpha streams for one image.
#[derive(Debug, Clone)]
pub struct ImageStreams {
    pub width: u32,
    pub height: u32,
    /// `/DeviceRGB` image; its `/SMask` entry is added by the caller once the
    /// mask has an object id.
    pub color: Stream,
    /// `/DeviceGray` soft mask, present only when some pixel is not opaque.
    pub alpha: Option<Stream>,
}

/// Split an RGBA buffer into compressed XObject streams.
pub fn encode_rgba(img: &RgbaImage) -> Result<ImageStreams> {
    let (width, height) = img.dimensions();
    let pixels = width as usize * height as usize;
    let mut rgb = Vec::with_capacity(pixels * 3);
    let mut alpha = Vec::with_capacity(pixels);
    for p in img.pixels() {
        rgb.extend_from_slice(&p.0[..3]);
        alpha.push(p.0[3]);
    }
    let opaque = alpha.iter().all(|&a| a == u8::MAX);

    let color = image_stream(width, height, "DeviceRGB", &rgb)?;
    let alpha = if opaque {
        None
    } else {
        Some(image_stream(width, height, "DeviceGray", &alpha)?)
    };

    debug!(
        "Encoded {}x{} image → {} colour bytes, mask: {}",
        width,
        height,
        color.content.len(),
        alpha
            .as_ref()
            .map(|s| s.content.len().to_string())
            .unwrap_or_else(|| "none".into())
    );

    Ok(ImageStreams {
        width,
        height,
        color,
        alpha,
    })
}

fn image_stream(width: u32, height: u32, color_space: &str, raw: &[u8]) -> Result<Stream> {
    let data = deflate(raw)?;
    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => color_space,
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };
    // Content is already compressed; keep lopdf from compressing it again.
    Ok(Stream::new(dict, data).with_compression(false))
}

fn deflate(raw: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(raw)
        .and_then(|_| encoder.finish())
        .map_err(|e| BannerError::Internal(format!("deflate failed: {e}")))
}
