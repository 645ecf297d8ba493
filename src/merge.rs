//! PDF concatenation for form bundles.
//!
//! The merged document carries every page of every input, inputs in the
//! given order and pages in their original order within each input.

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{FormsError, Result};
use crate::storage::OutputEnvironment;

fn unreadable(path: &Path, error: lopdf::Error) -> FormsError {
    FormsError::InvalidInput(format!("cannot read PDF {}: {error}", path.display()))
}

fn type_is(object: &Object, name: &[u8]) -> bool {
    object
        .as_dict()
        .and_then(|dict| dict.get(b"Type"))
        .and_then(|kind| kind.as_name())
        .is_ok_and(|kind| kind == name)
}

/// Number of pages of a PDF file.
pub fn page_count(path: &Path) -> Result<usize> {
    let document = Document::load(path).map_err(|e| unreadable(path, e))?;
    Ok(document.get_pages().len())
}

/// Concatenates `inputs` into one PDF at `output`.
///
/// Every input is loaded before anything is written, so an unreadable input
/// leaves no partial file behind.
pub fn merge<P: AsRef<Path>>(inputs: &[P], output: &Path) -> Result<()> {
    if inputs.is_empty() {
        return Err(FormsError::InvalidInput(
            "cannot merge an empty list of documents".to_string(),
        ));
    }

    let mut documents = Vec::with_capacity(inputs.len());
    for input in inputs {
        let path = input.as_ref();
        documents.push(Document::load(path).map_err(|e| unreadable(path, e))?);
    }

    let mut merged = concatenate(documents)?;

    let parent = output.parent().unwrap_or_else(|| Path::new("."));
    let partial = tempfile::Builder::new()
        .prefix(".partial-")
        .suffix(".pdf")
        .tempfile_in(parent)
        .map_err(|e| FormsError::output(output, e))?;
    merged
        .save(partial.path())
        .map_err(|e| FormsError::output(output, std::io::Error::other(e.to_string())))?;
    partial
        .persist(output)
        .map_err(|e| FormsError::output(output, e.error))?;

    log::debug!("Merged {} documents into {}", inputs.len(), output.display());
    Ok(())
}

// Page attributes a page may take from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Copy of a page with every inherited attribute set on the page itself.
fn detach_page(document: &Document, id: ObjectId) -> Result<Dictionary> {
    let mut page = document
        .get_dictionary(id)
        .map_err(|e| FormsError::InvalidInput(format!("page {id:?} is unreadable: {e}")))?
        .clone();

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut visited = Vec::new();
    while let Some(node_id) = parent {
        if visited.contains(&node_id) {
            break;
        }
        visited.push(node_id);
        let Ok(node) = document.get_dictionary(node_id) else {
            break;
        };
        for key in INHERITABLE {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    page.remove(b"Parent");
    Ok(page)
}

fn concatenate(documents: Vec<Document>) -> Result<Document> {
    let mut max_id = 1;
    let mut pages: Vec<(ObjectId, Dictionary)> = Vec::new();
    let mut merged = Document::with_version("1.5");

    for mut document in documents {
        document.renumber_objects_with(max_id);
        max_id = document.max_id + 1;

        // get_pages is keyed by page number, so this keeps the page order.
        for (_, id) in document.get_pages() {
            pages.push((id, detach_page(&document, id)?));
        }

        for (id, object) in document.objects {
            let tree_node = ["Catalog", "Pages", "Page", "Outlines", "Outline"]
                .iter()
                .any(|kind| type_is(&object, kind.as_bytes()));
            if !tree_node {
                merged.objects.insert(id, object);
            }
        }
    }

    if pages.is_empty() {
        return Err(FormsError::InvalidInput(
            "input documents carry no pages".to_string(),
        ));
    }

    let pages_id = (max_id, 0);
    let catalog_id = (max_id + 1, 0);
    let kids: Vec<Object> = pages.iter().map(|(id, _)| Object::Reference(*id)).collect();
    let count = kids.len() as u32;

    for (id, mut page) in pages {
        page.set("Parent", pages_id);
        merged.objects.insert(id, Object::Dictionary(page));
    }

    let mut root = Dictionary::new();
    root.set("Type", Object::Name(b"Pages".to_vec()));
    root.set("Kids", kids);
    root.set("Count", count);
    merged.objects.insert(pages_id, Object::Dictionary(root));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", pages_id);
    merged.objects.insert(catalog_id, Object::Dictionary(catalog));

    merged.trailer.set("Root", catalog_id);
    merged.max_id = catalog_id.0;
    merged.renumber_objects();
    merged.compress();
    Ok(merged)
}

/// Merges into `output`, returns its bytes and removes the file.
pub fn take_merged<P: AsRef<Path>>(inputs: &[P], output: &Path) -> Result<Vec<u8>> {
    merge(inputs, output)?;
    let read = fs::read(output);
    let removed = fs::remove_file(output);
    let bytes = read.map_err(|e| FormsError::output(output, e))?;
    removed.map_err(|e| FormsError::output(output, e))?;
    Ok(bytes)
}

/// Form followed by the teacher's receipt scans, written as `file_name`.
///
/// Without receipts the bundle holds the form pages only.
pub fn bundle_with_receipts(
    env: &OutputEnvironment,
    form: &Path,
    short: &str,
    file_name: &str,
) -> Result<PathBuf> {
    let mut inputs = vec![form.to_path_buf()];
    inputs.extend(env.receipts_for(short)?);
    log::info!(
        "Bundling {} with {} receipts for {}",
        form.display(),
        inputs.len() - 1,
        short
    );

    let bytes = take_merged(&inputs, &env.artifact_path(&format!(".bundle-{file_name}")))?;
    env.persist_bytes(file_name, &bytes)
}
