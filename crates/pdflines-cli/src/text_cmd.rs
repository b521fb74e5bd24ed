use std::path::Path;

use crate::cli::{InputKind, TextFormat};
use crate::shared::{build_document, reflow_options};

pub fn run(
    file: &Path,
    input: InputKind,
    y_tolerance: f64,
    format: &TextFormat,
) -> Result<(), i32> {
    let options = reflow_options(y_tolerance)?;
    let doc = build_document(file, input, None, options)?;

    match format {
        TextFormat::Text => println!("{}", doc.raw_text),
        TextFormat::Json => {
            let json = serde_json::to_string_pretty(&doc).map_err(|e| {
                eprintln!("Error: failed to serialize document: {e}");
                1
            })?;
            println!("{json}");
        }
    }
    Ok(())
}
