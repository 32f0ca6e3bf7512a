//! Shared fixtures for integration tests: PDFs and banners built in memory.

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const LETTER: (f64, f64) = (612.0, 792.0);
pub const A4: (f64, f64) = (595.0, 842.0);

/// Build a document with one page per size. Every page has its own text
/// content; page 2 (if any) also draws a small shared image XObject and
/// carries a link annotation pointing back at page 1.
pub fn build_pdf(sizes: &[(f64, f64)]) -> Document {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let logo_id = doc.add_object(
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 2,
                "Height" => 1,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            vec![0, 255],
        )
        .with_compression(false),
    );

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(sizes.len());
    for (i, &(w, h)) in sizes.iter().enumerate() {
        let mut ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 18.into()]),
            Operation::new("Td", vec![50.into(), 50.into()]),
            Operation::new(
                "Tj",
                vec![Object::string_literal(format!("original page {}", i + 1))],
            ),
            Operation::new("ET", vec![]),
        ];
        if i == 1 {
            ops.extend([
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Integer(20),
                        0.into(),
                        0.into(),
                        10.into(),
                        100.into(),
                        100.into(),
                    ],
                ),
                Operation::new("Do", vec!["Logo".into()]),
                Operation::new("Q", vec![]),
            ]);
        }
        let content = Content { operations: ops }
            .encode()
            .expect("encode content");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![Object::Integer(0), 0.into(), Object::Real(w as f32), Object::Real(h as f32)],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
                "XObject" => dictionary! { "Logo" => logo_id },
            },
        });
        page_ids.push(page_id);
    }

    if page_ids.len() > 1 {
        let link = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => vec![Object::Integer(0), 0.into(), 50.into(), 20.into()],
            "Dest" => vec![Object::Reference(page_ids[0]), "Fit".into()],
        });
        doc.get_dictionary_mut(page_ids[1])
            .expect("page 2")
            .set("Annots", vec![Object::Reference(link)]);
    }

    let kids: Vec<Object> = page_ids.iter().copied().map(Object::Reference).collect();
    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

pub fn pdf_bytes(doc: &Document) -> Vec<u8> {
    let mut doc = doc.clone();
    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("save pdf");
    buf
}

pub fn write_pdf(dir: &Path, name: &str, doc: &Document) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, pdf_bytes(doc)).expect("write pdf");
    path
}

/// An opaque `width`x`height` banner, orange on the left, teal on the right.
pub fn banner_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([255, 140, 0, 255])
        } else {
            Rgba([0, 128, 128, 255])
        }
    }))
}

/// A banner whose right half is fully transparent.
pub fn translucent_banner(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([200, 0, 0, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    }))
}

pub fn png_bytes(img: &DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("encode png");
    buf
}

pub fn write_png(dir: &Path, name: &str, img: &DynamicImage) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, png_bytes(img)).expect("write png");
    path
}

pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Resolve `obj` to a dictionary, following one level of indirection.
pub fn as_dict<'a>(doc: &'a Document, obj: &'a Object) -> &'a lopdf::Dictionary {
    match obj {
        Object::Reference(id) => doc.get_dictionary(*id).expect("referenced dictionary"),
        Object::Dictionary(d) => d,
        other => panic!("expected a dictionary, got {other:?}"),
    }
}

/// Numeric operands of the first `cm` operator on a page.
pub fn first_cm(doc: &Document, page: ObjectId) -> Vec<f64> {
    let content = Content::decode(&doc.get_page_content(page).expect("page content"))
        .expect("decode content");
    let op = content
        .operations
        .iter()
        .find(|op| op.operator == "cm")
        .expect("cm operator");
    op.operands
        .iter()
        .map(|o| match o {
            Object::Integer(i) => *i as f64,
            Object::Real(r) => f64::from(*r),
            other => panic!("non-numeric cm operand {other:?}"),
        })
        .collect()
}
