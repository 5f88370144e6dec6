//! novelepub - convert a plain-text novel into an EPUB

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use novelepub::prelude::*;

#[derive(Parser)]
#[command(name = "novelepub")]
#[command(version, about = "Convert plain-text novels into EPUB", long_about = None)]
#[command(after_help = "EXAMPLES:
    novelepub 书名.txt                          Write ./书名.epub
    novelepub 书名.txt -a 作者 -c cover.jpg     With author and cover
    novelepub 书名.txt -o out/book.epub --nested-toc")]
struct Cli {
    /// Input text file (UTF-8)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output EPUB file [default: ./<TITLE>.epub]
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Book title [default: input file name]
    #[arg(short, long)]
    title: Option<String>,

    /// Author name
    #[arg(short, long, default_value = "")]
    author: String,

    /// Cover image (a placeholder is generated if absent or unreadable)
    #[arg(short, long, value_name = "IMAGE")]
    cover: Option<PathBuf>,

    /// Language tag
    #[arg(long, default_value = types::DEFAULT_LANGUAGE)]
    lang: String,

    /// Nest chapters under their volume in the table of contents
    #[arg(long)]
    nested_toc: bool,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> novelepub::error::Result<()> {
    let mut builder = NovelConfig::builder();
    builder
        .source_path(cli.input)
        .metadata(
            EbookMetadata::new(cli.title.unwrap_or_default(), cli.author).with_language(cli.lang),
        )
        .toc_style(if cli.nested_toc {
            TocStyle::Nested
        } else {
            TocStyle::Flat
        });
    if let Some(output) = cli.output {
        builder.output_path(output);
    }
    if let Some(cover) = cli.cover {
        builder.cover_path(cover);
    }
    let config = builder.build()?;

    let quiet = cli.quiet;
    let mut show_progress = |percent: u8| {
        if !quiet {
            eprint!("\r{percent:>3}%");
            let _ = std::io::stderr().flush();
        }
    };
    let report = config.convert(Some(&mut show_progress)).await?;
    if !quiet {
        eprintln!();
    }

    println!("Output: {}", report.output_path.display());
    println!("Volumes: {}", report.total_volumes);
    println!("Chapters: {}", report.total_chapters);
    if report.cover_generated {
        println!("Cover: generated placeholder");
    }
    Ok(())
}
