//! An ordered, growing sequence of pages backed by one lopdf document.
//!
//! Pages are moved in (imported documents are consumed, layers are consumed
//! by compositing) and never shared between accumulators. The page tree and
//! catalog are only built when the accumulator is turned into a document.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::collections::BTreeMap;

use super::normalize::{inherit_attributes, media_box};
use crate::config::PageSize;
use crate::error::{CollateError, Result};
use crate::render::{FONT_RESOURCE, Font, GlyphUsage, Layer, alpha_resource};

/// Object types dropped when a document's pages are imported.
const STRUCTURAL_TYPES: [&[u8]; 4] = [b"Catalog", b"Pages", b"Outlines", b"Outline"];

fn type_of(object: &Object) -> Option<&[u8]> {
    let dict = match object {
        Object::Dictionary(dict) => dict,
        Object::Stream(stream) => &stream.dict,
        _ => return None,
    };
    dict.get(b"Type").and_then(Object::as_name).ok()
}

/// Ordered pages plus the shared resources generated content refers to.
#[derive(Debug)]
pub struct PageAccumulator {
    doc: Document,
    pages_id: ObjectId,
    pages: Vec<ObjectId>,
    page_size: PageSize,
    font_id: Option<ObjectId>,
    glyphs: GlyphUsage,
    alpha_ids: BTreeMap<u16, ObjectId>,
}

impl PageAccumulator {
    /// Empty accumulator whose generated pages have `page_size`.
    pub fn new(page_size: PageSize) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            pages: Vec::new(),
            page_size,
            font_id: None,
            glyphs: GlyphUsage::new(),
            alpha_ids: BTreeMap::new(),
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page object ids in order.
    pub fn page_ids(&self) -> &[ObjectId] {
        &self.pages
    }

    /// Geometry of generated pages.
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Backing document, for inspection.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable access to the backing document.
    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Append one untouched blank page.
    pub fn add_blank_page(&mut self) -> ObjectId {
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => media_box(self.page_size),
            "Resources" => Dictionary::new(),
        });
        self.pages.push(page_id);
        page_id
    }

    /// Append a generated page showing `layer`.
    pub fn add_layer_page(&mut self, layer: Layer) -> Result<ObjectId> {
        let page_id = self.add_blank_page();
        self.composite(page_id, layer)?;
        Ok(page_id)
    }

    /// Move every page of `source` to the end, in order.
    ///
    /// Objects are renumbered past this accumulator's ids; inherited page
    /// attributes are flattened onto each page before the source's page tree,
    /// catalog and outlines are dropped.
    pub fn import_document(&mut self, mut source: Document) -> Result<Vec<ObjectId>> {
        source.renumber_objects_with(self.doc.max_id + 1);
        let source_max = source.objects.keys().map(|(id, _)| *id).max().unwrap_or(0);
        self.doc.max_id = self.doc.max_id.max(source_max);

        let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
        for page_id in &page_ids {
            inherit_attributes(&mut source, *page_id)?;
        }

        for (id, object) in source.objects {
            let structural =
                type_of(&object).is_some_and(|t| STRUCTURAL_TYPES.iter().any(|s| *s == t));
            if !structural {
                self.doc.objects.insert(id, object);
            }
        }

        for page_id in &page_ids {
            self.doc
                .get_dictionary_mut(*page_id)?
                .set("Parent", self.pages_id);
            self.pages.push(*page_id);
        }

        Ok(page_ids)
    }

    fn font_id(&mut self) -> ObjectId {
        match self.font_id {
            Some(id) => id,
            None => {
                let id = self.doc.new_object_id();
                self.font_id = Some(id);
                id
            }
        }
    }

    fn alpha_id(&mut self, milli: u16) -> ObjectId {
        if let Some(id) = self.alpha_ids.get(&milli) {
            return *id;
        }
        let id = self.doc.add_object(dictionary! {
            "Type" => "ExtGState",
            "ca" => f32::from(milli) / 1000.0,
        });
        self.alpha_ids.insert(milli, id);
        id
    }

    /// Resolve `object` to a dictionary owned by the caller.
    fn owned_dictionary(&self, object: Option<&Object>) -> Dictionary {
        match object {
            Some(Object::Dictionary(dict)) => dict.clone(),
            Some(Object::Reference(id)) => self.doc.get_dictionary(*id).cloned().unwrap_or_default(),
            _ => Dictionary::new(),
        }
    }

    /// Draw `layer` over the page's existing content.
    ///
    /// The existing content is wrapped in `q`/`Q` so its graphics state
    /// cannot leak into the layer. The page's resources are copied into a
    /// direct dictionary before the layer's font and opacity states are
    /// added, so pages that shared a resource dictionary stay independent.
    pub fn composite(&mut self, page_id: ObjectId, layer: Layer) -> Result<()> {
        let Layer {
            content,
            glyphs,
            uses_font,
            alphas,
        } = layer;

        if !self.pages.contains(&page_id) {
            return Err(CollateError::pdf(format!(
                "Page {page_id:?} does not belong to this document"
            )));
        }

        let font_id = uses_font.then(|| self.font_id());
        self.glyphs.extend(glyphs);
        let states: Vec<(String, ObjectId)> = alphas
            .into_iter()
            .map(|milli| (alpha_resource(milli), self.alpha_id(milli)))
            .collect();

        let page = self.doc.get_dictionary(page_id)?;
        let mut resources = self.owned_dictionary(page.get(b"Resources").ok());
        if let Some(font_id) = font_id {
            let mut fonts = self.owned_dictionary(resources.get(b"Font").ok());
            fonts.set(FONT_RESOURCE, font_id);
            resources.set("Font", fonts);
        }
        if !states.is_empty() {
            let mut ext_states = self.owned_dictionary(resources.get(b"ExtGState").ok());
            for (name, id) in states {
                ext_states.set(name, id);
            }
            resources.set("ExtGState", ext_states);
        }

        let existing: Vec<Object> = match page.get(b"Contents") {
            Ok(Object::Reference(id)) => vec![Object::Reference(*id)],
            Ok(Object::Array(items)) => items.clone(),
            _ => Vec::new(),
        };

        let save_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let mut layer_bytes = b"\nQ\n".to_vec();
        layer_bytes.extend(content);
        let layer_id = self.doc.add_object(Stream::new(Dictionary::new(), layer_bytes));

        let mut contents = Vec::with_capacity(existing.len() + 2);
        contents.push(Object::Reference(save_id));
        contents.extend(existing);
        contents.push(Object::Reference(layer_id));

        let page = self.doc.get_dictionary_mut(page_id)?;
        page.set("Contents", contents);
        page.set("Resources", resources);

        Ok(())
    }

    /// Append a blank page if `duplex` is set and the page count is odd.
    ///
    /// Returns the number of pages added (0 or 1).
    pub fn ensure_even(&mut self, duplex: bool) -> usize {
        if duplex && self.pages.len() % 2 == 1 {
            self.add_blank_page();
            log::debug!("Added duplex padding page ({} pages)", self.pages.len());
            1
        } else {
            0
        }
    }

    /// Move every page of `other` to the end.
    pub fn append(&mut self, other: PageAccumulator, font: &Font) -> Result<Vec<ObjectId>> {
        let doc = other.into_document(font)?;
        self.import_document(doc)
    }

    /// Build the page tree and catalog, write the font, and drop unreachable
    /// objects.
    pub fn into_document(self, font: &Font) -> Result<Document> {
        let Self {
            mut doc,
            pages_id,
            pages,
            font_id,
            glyphs,
            ..
        } = self;

        if let Some(font_id) = font_id {
            font.write_resource(&mut doc, font_id, &glyphs);
        }

        let kids: Vec<Object> = pages.iter().map(|id| Object::Reference(*id)).collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages.len() as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        doc.prune_objects();
        doc.renumber_objects();
        Ok(doc)
    }
}
