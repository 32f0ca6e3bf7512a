//! Banner page rendering: fit, resample and place an image on a fresh page.
//!
//! The result is a standalone one-page [`Document`] whose page box is exactly
//! `[0 0 width height]` and whose only content is the fitted image. Nothing
//! is painted behind the image, so letterbox margins show the viewer's blank
//! (white) page.
//!
//! ## Why premultiply before resizing?
//!
//! Resampling filters blend neighbouring pixels. With straight alpha, a fully
//! transparent pixel still carries a colour (often black), and that colour
//! bleeds into the visible edge as a dark fringe. Premultiplying first makes
//! transparent pixels contribute nothing; dividing back out afterwards
//! restores straight alpha for the PDF soft mask.

use crate::config::SpliceConfig;
use crate::error::{BannerError, Result};
use crate::pipeline::encode::encode_rgba;
use crate::pipeline::fit::{fit, FitResult};
use crate::pipeline::geometry::PageSize;
use image::{imageops, DynamicImage, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, warn};

/// Resource name of the banner image inside the page's `/XObject` dictionary.
pub const IMAGE_NAME: &str = "Im0";

/// A single banner page, held in its own one-page document.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Page size in points.
    pub size: PageSize,
    /// Placement of the image on the page.
    pub fit: FitResult,
    /// Pixel size of the embedded (resampled) image.
    pub pixel_width: u32,
    pub pixel_height: u32,
    document: Document,
    page_id: ObjectId,
}

impl RenderedPage {
    /// The one-page document holding the banner.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Object id of the banner page inside [`Self::document`].
    pub fn page_id(&self) -> ObjectId {
        self.page_id
    }

    /// Serialise the banner page on its own as a PDF.
    pub fn to_pdf_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = self.document.clone();
        let mut buf = Vec::new();
        doc.save_to(&mut buf)
            .map_err(|e| BannerError::Internal(format!("failed to serialise banner page: {e}")))?;
        Ok(buf)
    }
}

/// Render `image` fitted and centered on a page of exactly `target` size.
///
/// # Errors
/// * [`BannerError::UnsupportedImage`] — the image has zero pixels.
/// * [`BannerError::InvalidDimension`] — the target size is not positive.
pub fn render_image_page(
    image: &DynamicImage,
    target: PageSize,
    config: &SpliceConfig,
) -> Result<RenderedPage> {
    let rgba = image.to_rgba8();
    let (src_w, src_h) = rgba.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(BannerError::image(format!(
            "image has no pixels ({src_w}x{src_h})"
        )));
    }

    let placement = fit(src_w as f64, src_h as f64, target.width, target.height)?;
    let (px_w, px_h) = pixel_size(&placement, config.dpi, config.max_raster_edge);
    debug!(
        "Banner {}x{} px → {:.2}x{:.2} pt at ({:.2}, {:.2}), raster {}x{} px",
        src_w,
        src_h,
        placement.draw_width,
        placement.draw_height,
        placement.offset_x,
        placement.offset_y,
        px_w,
        px_h
    );

    let resampled = resample(rgba, px_w, px_h, config);
    let (document, page_id) = build_page_document(&resampled, target, &placement)?;

    Ok(RenderedPage {
        size: target,
        fit: placement,
        pixel_width: px_w,
        pixel_height: px_h,
        document,
        page_id,
    })
}

/// Pixel dimensions of the resampled banner at `dpi`, never below 1×1.
///
/// The longest edge is capped at `max_edge`; above it the raster is scaled
/// down uniformly and the effective density drops below `dpi`.
pub fn pixel_size(placement: &FitResult, dpi: u32, max_edge: u32) -> (u32, u32) {
    let per_point = dpi as f64 / 72.0;
    let mut w = placement.draw_width * per_point;
    let mut h = placement.draw_height * per_point;

    let max_edge = max_edge.max(1) as f64;
    let longest = w.max(h);
    if longest > max_edge {
        let scale = max_edge / longest;
        warn!(
            "Banner raster {:.0}x{:.0} px exceeds {} px edge cap; effective density {:.1} DPI",
            w,
            h,
            max_edge,
            dpi as f64 * scale
        );
        w *= scale;
        h *= scale;
    }

    let px = |v: f64| v.round().clamp(1.0, max_edge) as u32;
    (px(w), px(h))
}

fn resample(rgba: RgbaImage, width: u32, height: u32, config: &SpliceConfig) -> RgbaImage {
    if rgba.dimensions() == (width, height) {
        return rgba;
    }
    let opaque = rgba.pixels().all(|p| p.0[3] == u8::MAX);
    if opaque {
        return imageops::resize(&rgba, width, height, config.filter.into());
    }

    let mut premultiplied = rgba;
    premultiply(&mut premultiplied);
    let mut out = imageops::resize(&premultiplied, width, height, config.filter.into());
    unpremultiply(&mut out);
    out
}

fn premultiply(img: &mut RgbaImage) {
    for p in img.pixels_mut() {
        let a = p.0[3] as u32;
        for c in &mut p.0[..3] {
            *c = ((*c as u32 * a + 127) / 255) as u8;
        }
    }
}

fn unpremultiply(img: &mut RgbaImage) {
    for p in img.pixels_mut() {
        let a = p.0[3] as u32;
        if a == 0 {
            p.0[..3].fill(0);
            continue;
        }
        for c in &mut p.0[..3] {
            *c = ((*c as u32 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn build_page_document(
    img: &RgbaImage,
    size: PageSize,
    placement: &FitResult,
) -> Result<(Document, ObjectId)> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut streams = encode_rgba(img)?;
    if let Some(mask) = streams.alpha.take() {
        let mask_id = doc.add_object(mask);
        streams.color.dict.set("SMask", mask_id);
    }
    let image_id = doc.add_object(streams.color);

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(placement.draw_width),
                    0.into(),
                    0.into(),
                    real(placement.draw_height),
                    real(placement.offset_x),
                    real(placement.offset_y),
                ],
            ),
            Operation::new("Do", vec![IMAGE_NAME.into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = content
        .encode()
        .map_err(|e| BannerError::Internal(format!("failed to encode page content: {e}")))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), real(size.width), real(size.height)],
        "Resources" => dictionary! {
            "XObject" => dictionary! { IMAGE_NAME => image_id },
        },
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok((doc, page_id))
}

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}
