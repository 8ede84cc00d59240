//! Form XObjects built from source pages
//!
//! A source page is copied into the output document as a Form XObject so
//! it can be drawn under an arbitrary transformation matrix.

use crate::types::{PairError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Intrinsic geometry of a page, read from its MediaBox
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMetrics {
    /// Lower-left corner of the MediaBox
    pub origin: (f32, f32),
    pub width: f32,
    pub height: f32,
}

impl PageMetrics {
    fn bbox(&self) -> Vec<Object> {
        let (llx, lly) = self.origin;
        vec![
            Object::Real(llx),
            Object::Real(lly),
            Object::Real(llx + self.width),
            Object::Real(lly + self.height),
        ]
    }
}

/// Object ID of the first page of `doc`
pub fn first_page_id(doc: &Document) -> Option<ObjectId> {
    doc.get_pages().values().next().copied()
}

/// Read a page's size from its (possibly inherited) MediaBox.
pub fn page_metrics(doc: &Document, page_id: ObjectId) -> Result<PageMetrics> {
    let media_box = inherited_attribute(doc, page_id, b"MediaBox")?
        .and_then(|obj| resolve(doc, obj).as_array().ok())
        .ok_or_else(|| PairError::PageGeometry("page has no MediaBox".to_string()))?;

    let coords: Vec<f32> = media_box
        .iter()
        .filter_map(|obj| extract_number(resolve(doc, obj)))
        .collect();
    let &[x0, y0, x1, y1] = coords.as_slice() else {
        return Err(PairError::PageGeometry(format!(
            "malformed MediaBox with {} numeric entries",
            coords.len()
        )));
    };

    let metrics = PageMetrics {
        origin: (x0.min(x1), y0.min(y1)),
        width: (x1 - x0).abs(),
        height: (y1 - y0).abs(),
    };
    if metrics.width <= 0.0 || metrics.height <= 0.0 {
        return Err(PairError::PageGeometry("MediaBox has zero area".to_string()));
    }
    Ok(metrics)
}

/// Copy `page_id` from `source` into `output` as a Form XObject.
///
/// `cache` maps source object IDs to their copies so shared resources
/// (fonts, images) are copied once per output document.
pub fn create_page_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    let metrics = page_metrics(source, page_id)?;
    let page_dict = source.get_dictionary(page_id)?;
    let content = page_content(source, page_dict)?;

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set("FormType", Object::Integer(1));
    xobject_dict.set("BBox", Object::Array(metrics.bbox()));

    if let Some(resources) = inherited_attribute(source, page_id, b"Resources")? {
        let mut copier = ObjectCopier {
            output,
            source,
            cache,
        };
        let copied = copier.copy(resources)?;
        xobject_dict.set("Resources", copied);
    }

    Ok(output.add_object(Stream::new(xobject_dict, content)))
}

/// Look up a page attribute, walking up the page tree for inheritable keys.
fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>> {
    let mut node = doc.get_dictionary(page_id)?;
    // Guard against cyclic Parent links in damaged files
    for _ in 0..64 {
        if let Ok(value) = node.get(key) {
            return Ok(Some(value));
        }
        match node.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent_id) => node = doc.get_dictionary(parent_id)?,
            Err(_) => return Ok(None),
        }
    }
    Ok(None)
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

// =============================================================================
// Page Content
// =============================================================================

/// Decoded content stream(s) of a page, concatenated.
fn page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let Ok(contents) = page_dict.get(b"Contents") else {
        return Ok(Vec::new());
    };

    let refs: Vec<ObjectId> = match resolve(doc, contents) {
        Object::Array(items) => items
            .iter()
            .filter_map(|item| item.as_reference().ok())
            .collect(),
        Object::Stream(_) => match contents {
            Object::Reference(id) => vec![*id],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    let mut result = Vec::new();
    for id in refs {
        if let Ok(stream) = doc.get_object(id)?.as_stream() {
            result.extend_from_slice(&decoded_stream(stream)?);
            result.push(b'\n');
        }
    }
    Ok(result)
}

fn decoded_stream(stream: &Stream) -> Result<Vec<u8>> {
    if !stream.dict.has(b"Filter") {
        return Ok(stream.content.clone());
    }
    stream
        .decompressed_content()
        .map_err(|e| PairError::Composition(format!("cannot decode content stream: {}", e)))
}

// =============================================================================
// Deep Copy
// =============================================================================

/// Copies an object graph from one document into another.
struct ObjectCopier<'a> {
    output: &'a mut Document,
    source: &'a Document,
    cache: &'a mut HashMap<ObjectId, ObjectId>,
}

impl ObjectCopier<'_> {
    fn copy(&mut self, obj: &Object) -> Result<Object> {
        Ok(match obj {
            Object::Reference(id) => Object::Reference(self.copy_reference(*id)?),
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(dict)?),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.copy(item))
                    .collect::<Result<Vec<_>>>()?,
            ),
            Object::Stream(stream) => {
                let dict = self.copy_dictionary(&stream.dict)?;
                Object::Stream(
                    Stream::new(dict, stream.content.clone())
                        .with_compression(stream.allows_compression),
                )
            }
            _ => obj.clone(),
        })
    }

    fn copy_reference(&mut self, id: ObjectId) -> Result<ObjectId> {
        if let Some(&copied) = self.cache.get(&id) {
            return Ok(copied);
        }

        // Reserve the target ID first so self-references terminate
        let new_id = self.output.new_object_id();
        self.cache.insert(id, new_id);

        let source = self.source;
        let copied = self.copy(source.get_object(id)?)?;
        self.output.objects.insert(new_id, copied);
        Ok(new_id)
    }

    fn copy_dictionary(&mut self, dict: &Dictionary) -> Result<Dictionary> {
        let mut copied = Dictionary::new();
        for (key, value) in dict.iter() {
            // Back-links into the source page tree are not needed by a form
            if key.as_slice() == b"Parent" {
                continue;
            }
            copied.set(key.clone(), self.copy(value)?);
        }
        Ok(copied)
    }
}
