mod cli;
mod extract_cmd;
mod shared;
mod text_cmd;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    shared::init_logging();

    let result = match cli.command {
        cli::Commands::Extract {
            ref file,
            ref out,
            input,
            ref source_path,
            y_tolerance,
            preview_lines,
        } => extract_cmd::run(
            file,
            out,
            input,
            source_path.as_deref(),
            y_tolerance,
            preview_lines,
        ),
        cli::Commands::Text {
            ref file,
            input,
            y_tolerance,
            ref format,
        } => text_cmd::run(file, input, y_tolerance, format),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
