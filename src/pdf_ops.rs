//! Structural PDF operations
//!
//! Discrete page rotation (multiples of 90 degrees) and document merging,
//! performed on the PDF object graph with lopdf. These operations never
//! rasterize anything; they only edit page dictionaries, which keeps them
//! lossless and fast.

use lopdf::{Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Structural PDF operation error types
#[derive(Debug, Error)]
pub enum PdfOpError {
    #[error("PDF file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("rotation must be a multiple of 90 degrees, got {0}")]
    InvalidRotation(i64),

    #[error("no input PDFs to merge")]
    NoInputs,

    #[error("merged document has no pages")]
    NoPages,

    #[error("document has no catalog")]
    NoCatalog,

    #[error("PDF parse error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PdfOpError>;

/// Rotate the even-numbered pages (2, 4, 6, ...) of a PDF by 180 degrees.
///
/// Useful for scans where the feeder flipped every second sheet.
pub fn rotate_even_pages(input: &Path, output: &Path) -> Result<()> {
    rotate_pages(input, output, 180, |page_num| page_num % 2 == 0)
}

/// Rotate every page of a PDF clockwise by `degrees`.
///
/// `degrees` must be a multiple of 90; a PDF viewer cannot display any
/// other page rotation. Use 270 to stand up a document lying on its right
/// side.
pub fn rotate_all_pages(input: &Path, output: &Path, degrees: i64) -> Result<()> {
    rotate_pages(input, output, degrees, |_| true)
}

fn rotate_pages(
    input: &Path,
    output: &Path,
    degrees: i64,
    select: impl Fn(u32) -> bool,
) -> Result<()> {
    if degrees % 90 != 0 {
        return Err(PdfOpError::InvalidRotation(degrees));
    }
    if !input.exists() {
        return Err(PdfOpError::FileNotFound(input.to_path_buf()));
    }

    let mut doc = Document::load(input)?;
    let pages = doc.get_pages();

    for (page_num, object_id) in pages {
        if !select(page_num) {
            continue;
        }
        let dict = doc.get_object_mut(object_id)?.as_dict_mut()?;
        let current = dict
            .get(b"Rotate")
            .and_then(Object::as_i64)
            .unwrap_or(0);
        dict.set("Rotate", (current + degrees).rem_euclid(360));
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    doc.save(output)?;
    Ok(())
}

/// Merge several PDFs into one, preserving input order.
///
/// Inputs that do not exist on disk are skipped; merging fails only when
/// none of them do. Objects from each source document are renumbered into
/// a shared ID space and the page trees are concatenated under a single
/// Pages node.
pub fn merge_pdfs(inputs: &[PathBuf], output: &Path) -> Result<()> {
    let existing: Vec<&PathBuf> = inputs.iter().filter(|p| p.is_file()).collect();
    if existing.is_empty() {
        return Err(PdfOpError::NoInputs);
    }

    let mut max_id = 1;
    // Pages are kept in traversal order, not object-ID order, so the page
    // sequence of each source document survives the merge.
    let mut documents_pages: Vec<(ObjectId, Object)> = Vec::new();
    let mut documents_objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for path in existing {
        let mut doc = Document::load(path)?;
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        for (_, object_id) in doc.get_pages() {
            let page = doc.get_object(object_id)?.to_owned();
            documents_pages.push((object_id, page));
        }
        documents_objects.extend(doc.objects);
    }

    let mut merged = Document::with_version("1.5");
    let mut catalog_object: Option<(ObjectId, Object)> = None;
    let mut pages_object: Option<(ObjectId, Object)> = None;

    for (object_id, object) in documents_objects {
        match object.type_name().unwrap_or("") {
            "Catalog" => {
                // Keep the first catalog's ID; later catalogs are folded in.
                let id = catalog_object
                    .as_ref()
                    .map(|(id, _)| *id)
                    .unwrap_or(object_id);
                catalog_object = Some((id, object));
            }
            "Pages" => {
                if let Ok(dictionary) = object.as_dict() {
                    let mut dictionary = dictionary.clone();
                    if let Some((_, ref existing_pages)) = pages_object {
                        if let Ok(old) = existing_pages.as_dict() {
                            dictionary.extend(old);
                        }
                    }
                    let id = pages_object
                        .as_ref()
                        .map(|(id, _)| *id)
                        .unwrap_or(object_id);
                    pages_object = Some((id, Object::Dictionary(dictionary)));
                }
            }
            // Page objects are re-parented below; outlines are dropped
            // since their destinations do not survive renumbering.
            "Page" | "Outlines" | "Outline" => {}
            _ => {
                merged.objects.insert(object_id, object);
            }
        }
    }

    let (pages_id, pages_dict) = pages_object.ok_or(PdfOpError::NoPages)?;
    let (catalog_id, catalog_dict) = catalog_object.ok_or(PdfOpError::NoCatalog)?;

    for (object_id, object) in &documents_pages {
        if let Ok(dictionary) = object.as_dict() {
            let mut dictionary = dictionary.clone();
            dictionary.set("Parent", pages_id);
            merged
                .objects
                .insert(*object_id, Object::Dictionary(dictionary));
        }
    }

    if let Ok(dictionary) = pages_dict.as_dict() {
        let mut dictionary = dictionary.clone();
        dictionary.set("Count", documents_pages.len() as u32);
        dictionary.set(
            "Kids",
            documents_pages
                .iter()
                .map(|(id, _)| Object::Reference(*id))
                .collect::<Vec<_>>(),
        );
        merged.objects.insert(pages_id, Object::Dictionary(dictionary));
    }

    if let Ok(dictionary) = catalog_dict.as_dict() {
        let mut dictionary = dictionary.clone();
        dictionary.set("Pages", pages_id);
        dictionary.remove(b"Outlines");
        merged
            .objects
            .insert(catalog_id, Object::Dictionary(dictionary));
    }

    merged.trailer.set("Root", catalog_id);
    merged.max_id = merged.objects.len() as u32;
    merged.renumber_objects();
    merged.compress();

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    merged.save(output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;
    use lopdf::content::{Content, Operation};
    use lopdf::Stream;

    /// Build a minimal single-page PDF on disk for structural tests.
    fn write_test_pdf(path: &Path) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content = Content {
            operations: vec![Operation::new("re", vec![10.into(), 10.into(), 100.into(), 50.into()])],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_invalid_rotation_rejected() {
        let result = rotate_all_pages(Path::new("whatever.pdf"), Path::new("/tmp/out.pdf"), 45);
        assert!(matches!(result, Err(PdfOpError::InvalidRotation(45))));
    }

    #[test]
    fn test_rotate_missing_input() {
        let result =
            rotate_all_pages(Path::new("/nonexistent/in.pdf"), Path::new("/tmp/out.pdf"), 90);
        assert!(matches!(result, Err(PdfOpError::FileNotFound(_))));
    }

    #[test]
    fn test_rotate_all_sets_rotate_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("in.pdf");
        let output = tmp.path().join("out.pdf");
        write_test_pdf(&input);

        rotate_all_pages(&input, &output, 270).unwrap();

        let doc = Document::load(&output).unwrap();
        for (_, object_id) in doc.get_pages() {
            let dict = doc.get_object(object_id).unwrap().as_dict().unwrap();
            let rotation = dict.get(b"Rotate").and_then(Object::as_i64).unwrap();
            assert_eq!(rotation, 270);
        }
    }

    #[test]
    fn test_rotate_wraps_past_360() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("in.pdf");
        let mid = tmp.path().join("mid.pdf");
        let output = tmp.path().join("out.pdf");
        write_test_pdf(&input);

        rotate_all_pages(&input, &mid, 270).unwrap();
        rotate_all_pages(&mid, &output, 180).unwrap();

        let doc = Document::load(&output).unwrap();
        for (_, object_id) in doc.get_pages() {
            let dict = doc.get_object(object_id).unwrap().as_dict().unwrap();
            let rotation = dict.get(b"Rotate").and_then(Object::as_i64).unwrap();
            assert_eq!(rotation, 90);
        }
    }

    #[test]
    fn test_rotate_even_skips_odd_pages() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("in.pdf");
        let output = tmp.path().join("out.pdf");
        write_test_pdf(&input);

        // A single-page document has no even pages: nothing changes.
        rotate_even_pages(&input, &output).unwrap();

        let doc = Document::load(&output).unwrap();
        for (_, object_id) in doc.get_pages() {
            let dict = doc.get_object(object_id).unwrap().as_dict().unwrap();
            assert!(dict.get(b"Rotate").is_err());
        }
    }

    #[test]
    fn test_merge_no_inputs() {
        let result = merge_pdfs(
            &[PathBuf::from("/nonexistent/a.pdf")],
            Path::new("/tmp/out.pdf"),
        );
        assert!(matches!(result, Err(PdfOpError::NoInputs)));
    }

    #[test]
    fn test_merge_two_documents() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a.pdf");
        let b = tmp.path().join("b.pdf");
        let out = tmp.path().join("merged.pdf");
        write_test_pdf(&a);
        write_test_pdf(&b);

        merge_pdfs(&[a, b], &out).unwrap();

        let doc = Document::load(&out).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    /// Two-page PDF whose first page has a higher object ID than its
    /// second, so object-ID order and page order disagree.
    fn write_pdf_with_descending_page_ids(path: &Path) {
        let mut doc = Document::with_version("1.5");
        let pages_id: ObjectId = (5, 0);
        let first_page: ObjectId = (10, 0);
        let second_page: ObjectId = (4, 0);
        let catalog_id: ObjectId = (6, 0);

        doc.objects.insert(
            first_page,
            Object::Dictionary(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        doc.objects.insert(
            second_page,
            Object::Dictionary(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 500.into(), 700.into()],
            }),
        );
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![first_page.into(), second_page.into()],
                "Count" => 2,
            }),
        );
        doc.objects.insert(
            catalog_id,
            Object::Dictionary(dictionary! {
                "Type" => "Catalog",
                "Pages" => pages_id,
            }),
        );
        doc.max_id = 10;
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_merge_preserves_page_order() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("in.pdf");
        let out = tmp.path().join("merged.pdf");
        write_pdf_with_descending_page_ids(&input);

        merge_pdfs(&[input], &out).unwrap();

        let doc = Document::load(&out).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 2);

        // Page order must follow the source Kids order, not object-ID order.
        let widths: Vec<i64> = pages
            .values()
            .map(|id| {
                let dict = doc.get_object(*id).unwrap().as_dict().unwrap();
                let media_box = dict.get(b"MediaBox").unwrap().as_array().unwrap();
                media_box[2].as_i64().unwrap()
            })
            .collect();
        assert_eq!(widths, [612, 500]);
    }

    #[test]
    fn test_merge_skips_missing_inputs() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a.pdf");
        let out = tmp.path().join("merged.pdf");
        write_test_pdf(&a);

        merge_pdfs(
            &[PathBuf::from("/nonexistent/x.pdf"), a],
            &out,
        )
        .unwrap();

        let doc = Document::load(&out).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
}
