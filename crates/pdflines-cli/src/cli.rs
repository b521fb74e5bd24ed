use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pdflines::{DEFAULT_PREVIEW_LINES, DEFAULT_Y_TOLERANCE};

/// Rebuild reading-order lines and normalized text from PDF documents.
#[derive(Debug, Parser)]
#[command(name = "pdflines", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reconstruct every page, write the JSON document and print a preview
    Extract {
        /// Path to the PDF file or text-content JSON dump
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Where to write the JSON document
        #[arg(long, value_name = "PATH")]
        out: PathBuf,

        /// How to read FILE
        #[arg(long, value_enum, default_value_t = InputKind::Auto)]
        input: InputKind,

        /// Identifier stored as `sourcePath`. Default: FILE as given
        #[arg(long)]
        source_path: Option<String>,

        /// Maximum vertical distance for a fragment to join a line
        #[arg(long, default_value_t = DEFAULT_Y_TOLERANCE)]
        y_tolerance: f64,

        /// Number of raw-text lines to print after writing
        #[arg(long, default_value_t = DEFAULT_PREVIEW_LINES)]
        preview_lines: usize,
    },

    /// Print the normalized raw text of a document
    Text {
        /// Path to the PDF file or text-content JSON dump
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// How to read FILE
        #[arg(long, value_enum, default_value_t = InputKind::Auto)]
        input: InputKind,

        /// Maximum vertical distance for a fragment to join a line
        #[arg(long, default_value_t = DEFAULT_Y_TOLERANCE)]
        y_tolerance: f64,

        /// Output format
        #[arg(long, value_enum, default_value_t = TextFormat::Text)]
        format: TextFormat,
    },
}

/// Where per-page text items come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputKind {
    /// `text-content` for `.json` files, `pdf` otherwise
    Auto,
    /// PDF content streams
    Pdf,
    /// Text-content JSON dump
    TextContent,
}

/// Output format for the text subcommand.
#[derive(Debug, Clone, ValueEnum)]
pub enum TextFormat {
    /// Raw text only
    Text,
    /// The full document as JSON
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn extract_defaults() {
        let cli = Cli::try_parse_from(["pdflines", "extract", "in.pdf", "--out", "out.json"]).unwrap();
        match cli.command {
            Commands::Extract {
                file,
                out,
                input,
                source_path,
                y_tolerance,
                preview_lines,
            } => {
                assert_eq!(file, PathBuf::from("in.pdf"));
                assert_eq!(out, PathBuf::from("out.json"));
                assert_eq!(input, InputKind::Auto);
                assert_eq!(source_path, None);
                assert_eq!(y_tolerance, 2.0);
                assert_eq!(preview_lines, 160);
            }
            other => panic!("expected Extract, got {other:?}"),
        }
    }

    #[test]
    fn extract_requires_out() {
        assert!(Cli::try_parse_from(["pdflines", "extract", "in.pdf"]).is_err());
    }

    #[test]
    fn text_with_options() {
        let cli = Cli::try_parse_from([
            "pdflines",
            "text",
            "dump.txt",
            "--input",
            "text-content",
            "--y-tolerance",
            "3.5",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Text {
                input,
                y_tolerance,
                format,
                ..
            } => {
                assert_eq!(input, InputKind::TextContent);
                assert_eq!(y_tolerance, 3.5);
                assert!(matches!(format, TextFormat::Json));
            }
            other => panic!("expected Text, got {other:?}"),
        }
    }
}
