use std::fmt::Write as _;
use std::path::Path;

use pdflines::Document;

use crate::cli::InputKind;
use crate::shared::{build_document, reflow_options};

pub fn run(
    file: &Path,
    out: &Path,
    input: InputKind,
    source_path: Option<&str>,
    y_tolerance: f64,
    preview_lines: usize,
) -> Result<(), i32> {
    let options = reflow_options(y_tolerance)?;
    let doc = build_document(file, input, source_path, options)?;

    let json = serde_json::to_string_pretty(&doc).map_err(|e| {
        eprintln!("Error: failed to serialize document: {e}");
        1
    })?;
    std::fs::write(out, json).map_err(|e| {
        eprintln!("Error: failed to write {}: {e}", out.display());
        1
    })?;

    tracing::debug!(out = %out.display(), pages = doc.page_count(), "wrote document");
    print!("{}", report(&doc, out, preview_lines));
    Ok(())
}

/// The preview followed by the written path and page count.
fn report(doc: &Document, out: &Path, preview_lines: usize) -> String {
    let mut report = doc.preview(preview_lines);
    report.push('\n');
    let _ = write!(
        report,
        "\n\n[written] {}\n[pages] {}\n",
        out.display(),
        doc.page_count()
    );
    report
}
