//! In-memory PDF and image fixtures for unit tests.

use image::{DynamicImage, Rgba, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

/// Build a document with one page per entry of `boxes`, each page using the
/// given array as its own `/MediaBox`. Fonts are declared on the page tree
/// root so pages inherit their `/Resources`.
pub fn document_with_boxes(boxes: &[Vec<Object>]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::with_capacity(boxes.len());
    for (i, media_box) in boxes.iter().enumerate() {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("Page {}", i + 1))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box.clone(),
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// A document with `pages` A4 pages.
pub fn sample_document(pages: usize) -> Document {
    let a4 = vec![0.into(), 0.into(), 595.into(), 842.into()];
    document_with_boxes(&vec![a4; pages])
}

/// Apply `f` to the first page's dictionary.
pub fn mutate_first_page(doc: &mut Document, f: impl FnOnce(&mut Dictionary)) {
    let page_id = *doc.get_pages().values().next().expect("document has pages");
    let page = doc.get_dictionary_mut(page_id).expect("page dictionary");
    f(page);
}

/// An opaque image split into a red left half and a blue right half.
pub fn two_tone_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    });
    DynamicImage::ImageRgba8(img)
}

/// A solid image with the given pixel.
pub fn solid_image(width: u32, height: u32, pixel: [u8; 4]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(pixel)))
}
