use std::path::Path;

use pdflines::{Document, Pdf, ReflowOptions};
use tracing_subscriber::EnvFilter;

use crate::cli::InputKind;

/// Install a stderr subscriber. `RUST_LOG` overrides the default `warn` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be set when running under a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Decide how to read `file`: `.json` files are text-content dumps.
pub fn resolve_input(file: &Path, input: InputKind) -> InputKind {
    match input {
        InputKind::Auto => {
            let is_json = file
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if is_json {
                InputKind::TextContent
            } else {
                InputKind::Pdf
            }
        }
        explicit => explicit,
    }
}

/// Validate the tolerance flag into reconstruction options.
pub fn reflow_options(y_tolerance: f64) -> Result<ReflowOptions, i32> {
    if !y_tolerance.is_finite() || y_tolerance < 0.0 {
        eprintln!("Error: --y-tolerance must be a non-negative number, got {y_tolerance}");
        return Err(1);
    }
    Ok(ReflowOptions { y_tolerance })
}

/// Open `file` and reconstruct the whole document.
///
/// Returns `Err(1)` with a message printed to stderr if the file is missing,
/// cannot be opened, or any page fails.
pub fn build_document(
    file: &Path,
    input: InputKind,
    source_path: Option<&str>,
    options: ReflowOptions,
) -> Result<Document, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    let source_path = source_path
        .map(str::to_string)
        .unwrap_or_else(|| file.display().to_string());

    let result = match resolve_input(file, input) {
        InputKind::TextContent => Pdf::open_text_content_file(file, Some(options))
            .and_then(|pdf| pdf.document(source_path)),
        _ => Pdf::open_file(file, Some(options)).and_then(|pdf| pdf.document(source_path)),
    };

    result.map_err(|e| {
        eprintln!("Error: failed to extract {}: {e}", file.display());
        1
    })
}
