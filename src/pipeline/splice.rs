//! Document splicing: banner page + source pages 2..N → new document.
//!
//! Pages are moved between documents by deep copy. Every indirect object a
//! retained page reaches (content streams, fonts, images, annotations) is
//! duplicated into the output under a fresh object id, so the output owns
//! all of its data and the source can be dropped or reused independently.
//! Stream bytes and filters are copied verbatim; nothing is re-encoded.
//!
//! ## Reference remapping
//!
//! Before copying, ids that must not be duplicated are reserved:
//!
//! | Source object            | Maps to                  |
//! |--------------------------|--------------------------|
//! | retained page *k*        | its copy                 |
//! | replaced first page      | the banner page          |
//! | any `/Pages` tree node   | the new page tree root   |
//! | the source catalog       | the new catalog          |
//!
//! A link annotation on page 3 that targets page 2 therefore lands on the
//! copy of page 2 instead of dragging the whole source page tree along.
//!
//! Page attributes inherited from ancestors (`/Resources`, `/MediaBox`,
//! `/CropBox`, `/Rotate`) are written onto each copied page because the
//! ancestors are not copied.

use crate::error::{BannerError, Result};
use crate::pipeline::geometry::{inherited_attribute, parent_of};
use crate::pipeline::render::RenderedPage;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, info, warn};

/// Attributes a page may inherit from its `/Pages` ancestors.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Lowest PDF version that supports image soft masks.
const MIN_VERSION: (u32, u32) = (1, 4);

/// Build a new document whose first page is `replacement` and whose
/// remaining pages are copies of `source` pages 2..N, in order.
///
/// `source` is not modified.
///
/// # Errors
/// [`BannerError::EmptyDocument`] if `source` has zero pages.
pub fn splice(source: &Document, replacement: &RenderedPage) -> Result<Document> {
    let source_pages: Vec<ObjectId> = source.get_pages().into_values().collect();
    let Some((&replaced, retained)) = source_pages.split_first() else {
        return Err(BannerError::EmptyDocument);
    };

    let mut out = Document::with_version(output_version(&source.version));
    let pages_id = out.new_object_id();
    let catalog_id = out.new_object_id();
    let banner_id = out.new_object_id();

    // ── Banner page ──────────────────────────────────────────────────────
    let banner_doc = replacement.document();
    let mut banner_copier = ObjectCopier::new(banner_doc);
    banner_copier.reserve_page_tree(banner_doc, pages_id);
    banner_copier.reserve_catalog(banner_doc, catalog_id);
    banner_copier.reserve(replacement.page_id(), banner_id);
    banner_copier.copy_page(&mut out, replacement.page_id(), banner_id, pages_id)?;
    banner_copier.drain(&mut out);

    // ── Retained source pages ────────────────────────────────────────────
    let mut copier = ObjectCopier::new(source);
    copier.reserve_page_tree(source, pages_id);
    copier.reserve_catalog(source, catalog_id);
    copier.reserve(replaced, banner_id);
    let retained_ids: Vec<(ObjectId, ObjectId)> = retained
        .iter()
        .map(|&src| {
            let dst = out.new_object_id();
            copier.reserve(src, dst);
            (src, dst)
        })
        .collect();
    for &(src, dst) in &retained_ids {
        copier.copy_page(&mut out, src, dst, pages_id)?;
    }
    copier.drain(&mut out);

    if let Ok(info_ref) = source.trailer.get(b"Info") {
        let info = copier.translate(&mut out, info_ref);
        copier.drain(&mut out);
        out.trailer.set("Info", info);
    }

    // ── Page tree and catalog ────────────────────────────────────────────
    let kids: Vec<Object> = std::iter::once(banner_id)
        .chain(retained_ids.iter().map(|&(_, dst)| dst))
        .map(Object::Reference)
        .collect();
    let count = kids.len() as i64;
    out.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    out.objects.insert(
        catalog_id,
        Object::Dictionary(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        }),
    );
    out.trailer.set("Root", catalog_id);

    let dangling = banner_copier.dangling + copier.dangling;
    if dangling > 0 {
        warn!("{} dangling references in source replaced with null", dangling);
    }
    info!(
        "Spliced banner + {} retained pages ({} objects copied)",
        retained_ids.len(),
        banner_copier.copied + copier.copied
    );

    Ok(out)
}

/// Raw (still encoded) bytes of each content stream of a page, in order.
///
/// Used to verify that retained pages were transplanted without re-encoding.
pub fn raw_page_contents(doc: &Document, page_id: ObjectId) -> Result<Vec<Vec<u8>>> {
    let page = doc
        .get_dictionary(page_id)
        .map_err(|e| BannerError::Internal(format!("page {page_id:?}: {e}")))?;
    let refs: Vec<&Object> = match page.get(b"Contents") {
        Ok(Object::Array(items)) => items.iter().collect(),
        Ok(other) => vec![other],
        Err(_) => Vec::new(),
    };
    refs.into_iter()
        .map(|obj| {
            let id = obj
                .as_reference()
                .map_err(|_| BannerError::Internal("content is not a reference".into()))?;
            doc.get_object(id)
                .and_then(Object::as_stream)
                .map(|s| s.content.clone())
                .map_err(|e| BannerError::Internal(format!("content stream {id:?}: {e}")))
        })
        .collect()
}

fn output_version(source: &str) -> String {
    let parsed = source.split_once('.').and_then(|(major, minor)| {
        Some((major.trim().parse::<u32>().ok()?, minor.trim().parse::<u32>().ok()?))
    });
    match parsed {
        Some(v) if v >= MIN_VERSION => source.trim().to_string(),
        _ => format!("{}.{}", MIN_VERSION.0, MIN_VERSION.1),
    }
}

/// Copies objects from one document into another, remapping references.
///
/// Objects are copied breadth-first through a work queue, so long reference
/// chains (annotation `/Next` lists, outline siblings) never deepen the call
/// stack.
struct ObjectCopier<'a> {
    source: &'a Document,
    remap: HashMap<ObjectId, ObjectId>,
    pending: VecDeque<(ObjectId, ObjectId)>,
    copied: usize,
    dangling: usize,
}

impl<'a> ObjectCopier<'a> {
    fn new(source: &'a Document) -> Self {
        Self {
            source,
            remap: HashMap::new(),
            pending: VecDeque::new(),
            copied: 0,
            dangling: 0,
        }
    }

    /// Map `src` to `dst` without copying it; the caller writes `dst` itself.
    fn reserve(&mut self, src: ObjectId, dst: ObjectId) {
        self.remap.insert(src, dst);
    }

    /// Map every `/Pages` node that is an ancestor of some page to `root`.
    fn reserve_page_tree(&mut self, doc: &Document, root: ObjectId) {
        for page_id in doc.get_pages().into_values() {
            let mut current = doc.get_dictionary(page_id).ok().and_then(parent_of);
            while let Some(node) = current {
                if self.remap.insert(node, root).is_some() {
                    break;
                }
                current = doc.get_dictionary(node).ok().and_then(parent_of);
            }
        }
    }

    fn reserve_catalog(&mut self, doc: &Document, catalog: ObjectId) {
        if let Ok(root) = doc.trailer.get(b"Root").and_then(Object::as_reference) {
            self.remap.insert(root, catalog);
        }
    }

    /// Copy page `src` to the reserved id `dst`, re-parented under `parent`.
    fn copy_page(
        &mut self,
        target: &mut Document,
        src: ObjectId,
        dst: ObjectId,
        parent: ObjectId,
    ) -> Result<()> {
        let source = self.source;
        let mut page = source
            .get_dictionary(src)
            .map_err(|e| BannerError::Internal(format!("page {src:?} is not a dictionary: {e}")))?
            .clone();
        page.remove(b"Parent");
        for key in INHERITABLE {
            if page.has(key) {
                continue;
            }
            if let Some(value) = inherited_attribute(source, src, key) {
                debug!(
                    "Page {:?}: materialising inherited /{}",
                    src,
                    String::from_utf8_lossy(key)
                );
                page.set(key.to_vec(), value.clone());
            }
        }

        let mut copied = self.translate_dict(target, &page);
        copied.set("Parent", parent);
        target.objects.insert(dst, Object::Dictionary(copied));
        self.copied += 1;
        Ok(())
    }

    /// Copy all objects discovered so far (and everything they reach).
    fn drain(&mut self, target: &mut Document) {
        let source = self.source;
        while let Some((src, dst)) = self.pending.pop_front() {
            let copied = match source.get_object(src) {
                Ok(obj) => self.translate(target, obj),
                Err(_) => {
                    debug!("Dangling reference {:?} → null", src);
                    self.dangling += 1;
                    Object::Null
                }
            };
            target.objects.insert(dst, copied);
            self.copied += 1;
        }
    }

    fn translate(&mut self, target: &mut Document, obj: &Object) -> Object {
        match obj {
            Object::Reference(id) => Object::Reference(self.map_reference(target, *id)),
            Object::Array(items) => {
                Object::Array(items.iter().map(|o| self.translate(target, o)).collect())
            }
            Object::Dictionary(dict) => Object::Dictionary(self.translate_dict(target, dict)),
            Object::Stream(stream) => {
                let mut copy = stream.clone();
                copy.dict = self.translate_dict(target, &stream.dict);
                Object::Stream(copy)
            }
            other => other.clone(),
        }
    }

    fn translate_dict(&mut self, target: &mut Document, dict: &Dictionary) -> Dictionary {
        let mut out = Dictionary::new();
        for (key, value) in dict.iter() {
            out.set(key.clone(), self.translate(target, value));
        }
        out
    }

    fn map_reference(&mut self, target: &mut Document, id: ObjectId) -> ObjectId {
        if let Some(&mapped) = self.remap.get(&id) {
            return mapped;
        }
        let fresh = target.new_object_id();
        self.remap.insert(id, fresh);
        self.pending.push_back((id, fresh));
        fresh
    }
}
