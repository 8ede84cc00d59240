//! Output page rendering
//!
//! Builds a one-page document of canvas size and draws each placed source
//! page onto it with a uniform scale and a translation.

use super::xobject::{create_page_xobject, first_page_id, page_metrics};
use crate::types::{Canvas, PairError, PlacementTransform, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// A source document and where its first page goes on the canvas
pub struct PagePlacement<'a> {
    pub source: &'a Document,
    pub transform: PlacementTransform,
}

/// Create a blank one-page document of canvas size, returning the page ID.
pub fn new_blank_canvas(canvas: &Canvas) -> (Document, ObjectId) {
    let mut output = Document::with_version("1.7");
    let pages_tree_id = output.new_object_id();

    let page_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_tree_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(canvas.width),
                Object::Real(canvas.height),
            ]),
        ),
    ]));

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ("Count", Object::Integer(1)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));
    output.trailer.set("Root", catalog_id);

    (output, page_id)
}

/// Compose the first page of every placement onto one canvas.
pub fn compose_page(placements: &[PagePlacement<'_>], canvas: &Canvas) -> Result<Document> {
    let (mut output, page_id) = new_blank_canvas(canvas);

    let mut content_ops = String::new();
    let mut xobjects = Dictionary::new();

    for (idx, placement) in placements.iter().enumerate() {
        let source_page_id = first_page_id(placement.source)
            .ok_or_else(|| PairError::Composition("source document has no pages".to_string()))?;

        // Copies are tracked per source so IDs from different files never mix
        let mut xobject_cache: HashMap<ObjectId, ObjectId> = HashMap::new();
        let xobject_id = create_page_xobject(
            &mut output,
            placement.source,
            source_page_id,
            &mut xobject_cache,
        )?;

        let xobject_name = format!("P{}", idx);
        xobjects.set(xobject_name.as_bytes(), Object::Reference(xobject_id));

        let origin = page_metrics(placement.source, source_page_id)?.origin;
        content_ops.push_str(&placement_command(
            &xobject_name,
            &placement.transform,
            origin,
        ));
    }

    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let content_id =
        output.add_object(Stream::new(Dictionary::new(), content_ops.into_bytes()));

    let page = output.get_dictionary_mut(page_id)?;
    page.set("Contents", Object::Reference(content_id));
    page.set("Resources", Object::Dictionary(resources));

    Ok(output)
}

/// Content stream command drawing an XObject under `transform`.
///
/// The form's BBox starts at the source MediaBox origin, so the translation
/// is shifted by the scaled origin to land the box itself at `(x, y)`.
pub(crate) fn placement_command(
    xobject_name: &str,
    transform: &PlacementTransform,
    origin: (f32, f32),
) -> String {
    let s = transform.scale;
    let tx = transform.x - origin.0 * s;
    let ty = transform.y - origin.1 * s;
    format!("q {} 0 0 {} {} {} cm /{} Do Q\n", s, s, tx, ty, xobject_name)
}
