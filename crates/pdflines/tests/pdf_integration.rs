//! End-to-end tests: PDF bytes → Pdf::open → pages → Document.
//!
//! Test PDFs are created programmatically using lopdf.

use pdflines::{Pdf, PdfError, ReflowOptions};

/// Create a PDF with one page per content stream, sharing a Helvetica /F1.
fn pdf_with_pages(contents: &[&str]) -> Vec<u8> {
    use lopdf::{Object, Stream, dictionary};

    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ];

    let mut page_ids = Vec::new();
    for content in contents {
        let stream = Stream::new(dictionary! {}, content.as_bytes().to_vec());
        let content_id = doc.add_object(stream);
        let resources = dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        };
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.clone(),
            "Contents" => Object::Reference(content_id),
            "Resources" => resources,
        }));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(page_ids.len() as i64),
    });

    for pid in &page_ids {
        if let Ok(page_obj) = doc.get_object_mut(*pid) {
            if let Ok(dict) = page_obj.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

#[test]
fn single_line_from_two_runs() {
    let bytes = pdf_with_pages(&[
        "BT /F1 12 Tf 1 0 0 1 50 100 Tm (1) Tj 1 0 0 1 10 100 Tm (Lot) Tj ET",
    ]);
    let pdf = Pdf::open(&bytes, None).unwrap();
    let page = pdf.page(0).unwrap();
    assert_eq!(page.page_number, 1);
    assert_eq!(page.lines, vec!["Lot 1"]);
}

#[test]
fn table_rows_come_out_top_to_bottom_left_to_right() {
    // Cells drawn column by column, bottom row first.
    let bytes = pdf_with_pages(&[concat!(
        "BT /F1 9 Tf ",
        "1 0 0 1 10 680 Tm (h01) Tj 1 0 0 1 10 700 Tm (h00) Tj ",
        "1 0 0 1 80 680.5 Tm (179.2) Tj 1 0 0 1 80 700 Tm (GHA) Tj ",
        "1 0 0 1 150 679.8 Tm (S23.4) Tj 1 0 0 1 150 700 Tm (Dec) Tj ",
        "ET",
    )]);
    let pdf = Pdf::open(&bytes, None).unwrap();
    let page = pdf.page(0).unwrap();
    assert_eq!(page.lines, vec!["h00 GHA Dec", "h01 179.2 S23.4"]);
}

#[test]
fn blank_runs_are_dropped() {
    let bytes = pdf_with_pages(&[
        "BT /F1 12 Tf 1 0 0 1 10 700 Tm (   ) Tj 1 0 0 1 10 650 Tm (Moon) Tj ET",
    ]);
    let pdf = Pdf::open(&bytes, None).unwrap();
    assert_eq!(pdf.page(0).unwrap().lines, vec!["Moon"]);
}

#[test]
fn document_joins_pages_with_separator() {
    let bytes = pdf_with_pages(&[
        "BT /F1 12 Tf 72 700 Td (Sun) Tj 0 -20 Td (Moon) Tj ET",
        "",
        "BT /F1 12 Tf 72 700 Td (Stars) Tj ET",
    ]);
    let pdf = Pdf::open(&bytes, None).unwrap();
    let doc = pdf.document("almanac.pdf").unwrap();
    assert_eq!(doc.page_count(), 3);
    assert!(doc.pages[1].lines.is_empty());
    assert_eq!(doc.raw_text, "Sun\nMoon\n\n---\n\n---\n\nStars");
    assert!(doc.verify_raw_text());
}

#[test]
fn form_xobject_text_is_included() {
    use lopdf::{Object, Stream, dictionary};

    let mut doc = lopdf::Document::with_version("1.5");
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let form_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(200), Object::Integer(50)],
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => Object::Reference(font_id) },
            },
        },
        b"BT /F1 10 Tf 0 0 Td (Header) Tj ET".to_vec(),
    ));
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        b"q 1 0 0 1 72 750 cm /Hdr Do Q BT /F1 12 Tf 72 700 Td (Body) Tj ET".to_vec(),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Contents" => Object::Reference(content_id),
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
            "XObject" => dictionary! { "Hdr" => Object::Reference(form_id) },
        },
    });
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => Object::Integer(1),
    });
    if let Ok(dict) = doc.get_object_mut(page_id).and_then(|o| o.as_dict_mut()) {
        dict.set("Parent", Object::Reference(pages_id));
    }
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();

    let pdf = Pdf::open(&bytes, None).unwrap();
    assert_eq!(pdf.page(0).unwrap().lines, vec!["Header", "Body"]);
}

#[test]
fn custom_tolerance_merges_close_rows() {
    let bytes = pdf_with_pages(&[
        "BT /F1 12 Tf 1 0 0 1 10 100 Tm (a) Tj 1 0 0 1 40 97 Tm (b) Tj ET",
    ]);
    let strict = Pdf::open(&bytes, None).unwrap();
    assert_eq!(strict.page(0).unwrap().lines, vec!["a", "b"]);
    let loose = Pdf::open(&bytes, Some(ReflowOptions { y_tolerance: 3.0 })).unwrap();
    assert_eq!(loose.page(0).unwrap().lines, vec!["a b"]);
}

#[test]
fn broken_page_aborts_the_document() {
    let bytes = pdf_with_pages(&["BT /F1 12 Tf (ok) Tj ET", "BT (never closed Tj ET"]);
    let pdf = Pdf::open(&bytes, None).unwrap();
    assert!(pdf.page(0).is_ok());
    let err = pdf.document("broken.pdf").unwrap_err();
    assert!(matches!(err, PdfError::InterpreterError(_)));
}

#[test]
fn open_file_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("one.pdf");
    std::fs::write(&path, pdf_with_pages(&["BT /F1 12 Tf 72 700 Td (Disk) Tj ET"])).unwrap();
    let pdf = Pdf::open_file(&path, None).unwrap();
    assert_eq!(pdf.document(path.display().to_string()).unwrap().raw_text, "Disk");
}

#[test]
fn open_file_missing_is_io_error() {
    let err = Pdf::open_file("/definitely/not/here.pdf", None).err().unwrap();
    assert!(matches!(err, PdfError::IoError(_)));
}

#[cfg(feature = "parallel")]
#[test]
fn pages_parallel_preserves_page_order() {
    let contents: Vec<String> = (1..=8)
        .map(|i| format!("BT /F1 12 Tf 72 700 Td (Page{i}) Tj ET"))
        .collect();
    let refs: Vec<&str> = contents.iter().map(String::as_str).collect();
    let pdf = Pdf::open(&pdf_with_pages(&refs), None).unwrap();
    let pages = pdf.pages_parallel();
    assert_eq!(pages.len(), 8);
    for (i, page) in pages.into_iter().enumerate() {
        let page = page.unwrap();
        assert_eq!(page.page_number as usize, i + 1);
        assert_eq!(page.lines, vec![format!("Page{}", i + 1)]);
    }
}
