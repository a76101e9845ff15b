//! CLI tool for splitting document text into copyable blocks.

use anyhow::{Context, Result};
use blockcopy_core::{
    BlockFormatter, BlockSession, DocumentFormat, ExtractedDocument, ExtractorConfig,
    OutputFormat, PageExtractor,
};
use blockcopy_pdf::PdfExtractor;
use blockcopy_pptx::PptxExtractor;
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Extract document text as blocks separated by blank lines.
#[derive(Parser, Debug)]
#[command(name = "blockcopy")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input document(s) (.pdf or .pptx)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print output to stdout instead of writing to file
    #[arg(short, long)]
    print: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Show every block with its line breaks collapsed to spaces
    #[arg(short, long)]
    collapse: bool,

    /// Emit only the full text with line breaks collapsed
    #[arg(long, conflicts_with = "collapse")]
    collapse_all: bool,

    /// Prefix each block with a "--- block i/n ---" header (text output)
    #[arg(long)]
    headers: bool,

    /// Refuse documents larger than this many megabytes
    #[arg(long, value_name = "MB")]
    max_size: Option<usize>,

    /// Keep going with an empty page when a page cannot be read
    #[arg(long)]
    skip_bad_pages: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Html,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::Html => OutputFormat::Html,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = ExtractorConfig::new()
        .with_max_document_bytes(args.max_size.map(megabytes))
        .with_skip_unreadable_pages(args.skip_bad_pages);
    let formatter = BlockFormatter::new()
        .with_format(args.format.into())
        .with_headers(args.headers);

    let mut failed = false;
    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        match process_file(input_path, &args, &config, &formatter) {
            Ok(output) => {
                if let Err(e) = emit(input_path, &args, &formatter, &output) {
                    eprintln!("Error writing output for {}: {:#}", input_path.display(), e);
                    failed = true;
                }
            }
            Err(e) => {
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Process a single document into formatted output.
fn process_file(
    input_path: &Path,
    args: &Args,
    config: &ExtractorConfig,
    formatter: &BlockFormatter,
) -> Result<String> {
    let data = std::fs::read(input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?;

    let filename = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let doc = extract_document(&data, filename, config)?;

    let session = BlockSession::from_document(&doc);
    if args.verbose {
        eprintln!(
            "  Found {} pages, {} blocks",
            session.page_count(),
            session.len()
        );
    }

    render(session, args, formatter)
}

/// Turn a session into the output text selected by the collapse flags.
fn render(mut session: BlockSession, args: &Args, formatter: &BlockFormatter) -> Result<String> {
    if args.collapse_all {
        let mut text = session.collapsed_all();
        text.push('\n');
        return Ok(text);
    }

    if args.collapse {
        for view in session.views_mut() {
            view.collapse();
        }
    }

    Ok(formatter.format(&session)?)
}

/// Convert a `--max-size` value to bytes, saturating instead of overflowing.
fn megabytes(mb: usize) -> usize {
    mb.saturating_mul(1024 * 1024)
}

/// Detect the format and run the matching extractor.
fn extract_document(data: &[u8], filename: &str, config: &ExtractorConfig) -> Result<ExtractedDocument> {
    let format = DocumentFormat::require(data, filename)?;

    let doc = match format {
        DocumentFormat::Pdf => {
            log::debug!("Parsing as PDF");
            PdfExtractor::with_config(config.clone()).extract_document(data, filename)?
        }
        DocumentFormat::Pptx => {
            log::debug!("Parsing as PPTX");
            PptxExtractor::with_config(config.clone()).extract_document(data, filename)?
        }
    };

    Ok(doc)
}

/// Print or write the output for one input.
fn emit(input_path: &Path, args: &Args, formatter: &BlockFormatter, output: &str) -> Result<()> {
    if args.print {
        print!("{}", output);
        return Ok(());
    }

    let output_path = get_output_path(input_path, args.output.as_deref(), output_extension(args, formatter))?;
    write_output(&output_path, output)?;
    if args.verbose {
        eprintln!("Written to: {}", output_path.display());
    }
    Ok(())
}

/// File extension for the output; `--collapse-all` is always plain text.
fn output_extension(args: &Args, formatter: &BlockFormatter) -> &'static str {
    if args.collapse_all {
        "txt"
    } else {
        formatter.output_format().extension()
    }
}

/// Determine the output path for a processed file.
fn get_output_path(input_path: &Path, output_dir: Option<&Path>, extension: &str) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let output_filename = format!("{}.blocks.{}", stem, extension);

    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => match input_path.parent() {
            Some(parent) => parent.join(output_filename),
            None => PathBuf::from(output_filename),
        },
    };

    Ok(output_path)
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockcopy_core::RawText;

    #[test]
    fn test_output_path_beside_input() {
        let path = get_output_path(Path::new("docs/report.pdf"), None, "txt").unwrap();
        assert_eq!(path, PathBuf::from("docs/report.blocks.txt"));
    }

    #[test]
    fn test_output_path_without_parent_dir() {
        let path = get_output_path(Path::new("report.pdf"), None, "json").unwrap();
        assert_eq!(path, PathBuf::from("report.blocks.json"));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let err = extract_document(b"plain text", "notes.txt", &ExtractorConfig::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported or unrecognized file format: notes.txt"
        );
    }

    fn formatter_for(args: &Args) -> BlockFormatter {
        BlockFormatter::new()
            .with_format(args.format.into())
            .with_headers(args.headers)
    }

    const SAMPLE: &str = "Title\n\nline one\nline two\n\n\nEnd";

    #[test]
    fn test_render_original_blocks() {
        let args = Args::try_parse_from(["blockcopy", "a.pdf"]).unwrap();
        let session = BlockSession::from_raw(RawText::new(SAMPLE));

        let out = render(session, &args, &formatter_for(&args)).unwrap();
        assert_eq!(out, "Title\n\nline one\nline two\n\nEnd\n");
    }

    #[test]
    fn test_render_collapse_flag_collapses_every_block() {
        let args = Args::try_parse_from(["blockcopy", "--collapse", "a.pdf"]).unwrap();
        let session = BlockSession::from_raw(RawText::new(SAMPLE));

        let out = render(session, &args, &formatter_for(&args)).unwrap();
        assert_eq!(out, "Title\n\nline one line two\n\nEnd\n");
    }

    #[test]
    fn test_render_collapse_all_ignores_format() {
        let args =
            Args::try_parse_from(["blockcopy", "--collapse-all", "-f", "json", "a.pdf"]).unwrap();
        let formatter = formatter_for(&args);
        let session = BlockSession::from_raw(RawText::new("a\nb\n\nc"));

        let out = render(session, &args, &formatter).unwrap();
        assert_eq!(out, "a b  c\n");
        assert_eq!(output_extension(&args, &formatter), "txt");
    }

    #[test]
    fn test_output_extension_follows_format() {
        let args = Args::try_parse_from(["blockcopy", "-f", "html", "a.pdf"]).unwrap();
        assert_eq!(output_extension(&args, &formatter_for(&args)), "html");
    }

    #[test]
    fn test_max_size_saturates() {
        assert_eq!(megabytes(2), 2 * 1024 * 1024);
        assert_eq!(megabytes(usize::MAX), usize::MAX);

        let max = usize::MAX.to_string();
        let args =
            Args::try_parse_from(["blockcopy", "--max-size", max.as_str(), "a.pdf"]).unwrap();
        assert_eq!(args.max_size.map(megabytes), Some(usize::MAX));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["blockcopy", "-f", "json", "--collapse", "a.pdf"]).unwrap();
        assert_eq!(args.format, Format::Json);
        assert!(args.collapse);
        assert_eq!(args.input, vec![PathBuf::from("a.pdf")]);

        assert!(Args::try_parse_from(["blockcopy", "--collapse", "--collapse-all", "a.pdf"]).is_err());
    }
}
