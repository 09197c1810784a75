//! Page geometry normalization.

use lopdf::{Document, Object, ObjectId};

use crate::config::PageSize;
use crate::error::Result;

/// Attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Boxes and transforms dropped when a page is given a new geometry.
const RESET_ON_RESIZE: [&[u8]; 5] = [b"CropBox", b"BleedBox", b"TrimBox", b"ArtBox", b"Rotate"];

const MAX_TREE_DEPTH: usize = 32;

/// Media box `[0 0 w h]` for `size`.
pub fn media_box(size: PageSize) -> Vec<Object> {
    vec![0.into(), 0.into(), size.width.into(), size.height.into()]
}

/// Copy inherited attributes from the page's ancestors onto the page itself.
///
/// Needed before the page is detached from its original page tree.
pub fn inherit_attributes(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let mut inherited: Vec<(&[u8], Object)> = Vec::new();

    {
        let page = doc.get_dictionary(page_id)?;
        let mut missing: Vec<&[u8]> = INHERITABLE
            .iter()
            .copied()
            .filter(|key| !page.has(key))
            .collect();
        let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
        let mut depth = 0;

        while let Some(parent_id) = parent {
            if missing.is_empty() || depth >= MAX_TREE_DEPTH {
                break;
            }
            let Ok(node) = doc.get_dictionary(parent_id) else {
                break;
            };
            missing.retain(|key| match node.get(key) {
                Ok(value) => {
                    inherited.push((*key, value.clone()));
                    false
                }
                Err(_) => true,
            });
            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
            depth += 1;
        }
    }

    if !inherited.is_empty() {
        let page = doc.get_dictionary_mut(page_id)?;
        for (key, value) in inherited {
            page.set(key, value);
        }
    }

    Ok(())
}

/// Give a page exactly `size`, content unscaled at the user-space origin.
pub fn resize_page(doc: &mut Document, page_id: ObjectId, size: PageSize) -> Result<()> {
    let page = doc.get_dictionary_mut(page_id)?;
    page.set("MediaBox", media_box(size));
    for key in RESET_ON_RESIZE {
        page.remove(key);
    }
    Ok(())
}
