//! First-page geometry: read a page box and report its size in points.
//!
//! Page boxes are inheritable in PDF, so a page without its own `/MediaBox`
//! takes it from the nearest ancestor in the page tree. The walk is bounded
//! so a cyclic `/Parent` chain in a damaged file cannot hang the pipeline.

use crate::config::PageBox;
use crate::error::{BannerError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Maximum page-tree depth followed when resolving inherited attributes.
const MAX_TREE_DEPTH: usize = 64;

/// Maximum chain of indirect references followed by [`resolve`].
const MAX_REFERENCE_HOPS: usize = 16;

/// Width and height of a page in points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// Size of a box given as two opposite corners, in any order.
    pub fn from_corners(llx: f64, lly: f64, urx: f64, ury: f64) -> Self {
        Self {
            width: (urx - llx).abs(),
            height: (ury - lly).abs(),
        }
    }
}

/// Number of pages in the document.
pub fn page_count(doc: &Document) -> usize {
    doc.get_pages().len()
}

/// Object id of the first page in document order.
pub fn first_page_id(doc: &Document) -> Result<ObjectId> {
    doc.get_pages()
        .into_values()
        .next()
        .ok_or(BannerError::EmptyDocument)
}

/// Size of the first page's selected box.
///
/// # Errors
/// * [`BannerError::EmptyDocument`] — the document has zero pages.
/// * [`BannerError::MalformedGeometry`] — the box is missing, not four finite
///   numbers, or encloses zero area.
pub fn first_page_size(doc: &Document, page_box: PageBox) -> Result<PageSize> {
    let page_id = first_page_id(doc)?;
    let size = page_size(doc, page_id, page_box)?;
    debug!(
        "First page {:?} {:?}: {:.2} x {:.2} pt",
        page_id, page_box, size.width, size.height
    );
    Ok(size)
}

/// Size of an arbitrary page's selected box.
pub fn page_size(doc: &Document, page_id: ObjectId, page_box: PageBox) -> Result<PageSize> {
    let key: &[u8] = match page_box {
        PageBox::MediaBox => b"MediaBox",
        PageBox::CropBox => {
            if inherited_attribute(doc, page_id, b"CropBox").is_some() {
                b"CropBox"
            } else {
                b"MediaBox"
            }
        }
    };
    let name = String::from_utf8_lossy(key);

    let raw = inherited_attribute(doc, page_id, key)
        .ok_or_else(|| BannerError::geometry(format!("page has no /{name}")))?;
    let [llx, lly, urx, ury] = parse_rect(doc, raw)
        .map_err(|detail| BannerError::geometry(format!("/{name}: {detail}")))?;

    let size = PageSize::from_corners(llx, lly, urx, ury);
    if size.width == 0.0 || size.height == 0.0 {
        return Err(BannerError::geometry(format!(
            "/{name} [{llx} {lly} {urx} {ury}] encloses zero area"
        )));
    }
    Ok(size)
}

/// Effective `/Rotate` of a page, normalised to 0, 90, 180 or 270.
pub fn page_rotation(doc: &Document, page_id: ObjectId) -> i64 {
    inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|o| resolve(doc, o).ok())
        .and_then(|o| o.as_i64().ok())
        .map(|r| r.rem_euclid(360))
        .unwrap_or(0)
}

/// Look up `key` on the page, then on each ancestor `/Pages` node.
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut current = Some(page_id);
    for _ in 0..MAX_TREE_DEPTH {
        let id = current?;
        let dict = doc.get_dictionary(id).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        current = parent_of(dict);
    }
    None
}

pub(crate) fn parent_of(dict: &Dictionary) -> Option<ObjectId> {
    dict.get(b"Parent").and_then(Object::as_reference).ok()
}

/// Follow indirect references until a direct object is reached.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object> {
    let mut current = obj;
    for _ in 0..MAX_REFERENCE_HOPS {
        match current {
            Object::Reference(id) => {
                current = doc.get_object(*id).map_err(|e| {
                    BannerError::geometry(format!("dangling reference {id:?}: {e}"))
                })?;
            }
            other => return Ok(other),
        }
    }
    Err(BannerError::geometry("reference chain too long"))
}

fn parse_rect(doc: &Document, raw: &Object) -> std::result::Result<[f64; 4], String> {
    let resolved = resolve(doc, raw).map_err(|e| e.to_string())?;
    let arr = resolved
        .as_array()
        .map_err(|_| format!("expected an array, got {resolved:?}"))?;
    if arr.len() != 4 {
        return Err(format!("expected 4 entries, got {}", arr.len()));
    }

    let mut out = [0.0; 4];
    for (slot, item) in out.iter_mut().zip(arr) {
        let item = resolve(doc, item).map_err(|e| e.to_string())?;
        let value = number(item).ok_or_else(|| format!("non-numeric entry {item:?}"))?;
        if !value.is_finite() {
            return Err(format!("non-finite entry {value}"));
        }
        *slot = value;
    }
    Ok(out)
}

pub(crate) fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}
