//! lixbook - LIX readability statistics for EPUB books

use std::process::ExitCode;

use clap::Parser;

use lixbook::{Analysis, AnalysisOptions, Container, ContentOrder, analyze};

#[derive(Parser)]
#[command(name = "lixbook")]
#[command(version, about = "LIX readability statistics for EPUB books", long_about = None)]
#[command(after_help = "EXAMPLES:
    lixbook book.epub              Show the book's LIX
    lixbook --items book.epub      Also list every chapter
    lixbook --json book.epub       Print the full report as JSON")]
struct Cli {
    /// Input EPUB file
    #[arg(value_name = "INPUT")]
    input: String,

    /// Print the full analysis as JSON
    #[arg(long)]
    json: bool,

    /// List the score of every content document
    #[arg(short, long)]
    items: bool,

    /// Remove outliers only when the scores' standard deviation exceeds this
    #[arg(long, value_name = "SD", default_value_t = lixbook::lix::DEFAULT_DEVIATION_CAP)]
    deviation_cap: f64,

    /// Read content documents in manifest order instead of spine order
    #[arg(long)]
    manifest_order: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "error" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let order = if cli.manifest_order {
        ContentOrder::Manifest
    } else {
        ContentOrder::Spine
    };
    let options = AnalysisOptions::new()
        .with_deviation_cap(cli.deviation_cap)
        .with_content_order(order);

    let container = Container::open(&cli.input).map_err(|e| e.to_string())?;
    let analysis = analyze(&container, &options).map_err(|e| e.to_string())?;

    if cli.json {
        let json = serde_json::to_string_pretty(&analysis).map_err(|e| e.to_string())?;
        println!("{json}");
    } else {
        print_summary(&cli.input, &analysis, cli.items);
    }
    Ok(())
}

fn print_summary(path: &str, analysis: &Analysis, items: bool) {
    let stats = &analysis.stats;

    println!("File: {path}");
    if let Some(ref title) = analysis.title {
        println!("Title: {title}");
    }
    if let Some(ref language) = analysis.language {
        println!("Language: {language}");
    }
    println!("Size: {} bytes", analysis.file_byte_size);
    println!("LIX: {}", analysis.lix);
    match stats.found_lix {
        Some(found) => println!("  Printed in book: {found}"),
        None => println!("  Printed in book: -"),
    }
    println!("  Whole book: {}", stats.generated_lix);
    if let Some(median) = stats.median_lix {
        println!("  Median of documents: {median:.1}");
    }
    if let Some(mean) = stats.mean_lix {
        println!("  Mean of documents: {mean:.1}");
    }
    println!(
        "Words: {} ({} long), sentences: {}",
        stats.word_count, stats.long_word_count, stats.sentence_count
    );
    println!(
        "Documents: {} scored, {} skipped",
        analysis.items.len(),
        analysis.skipped.len()
    );

    if items {
        println!();
        for item in &analysis.items {
            println!(
                "{:>4}  {:<40} {:>7} words {:>5} sentences",
                item.lix, item.title, item.stats.word_count, item.stats.sentence_count
            );
        }
        for skip in &analysis.skipped {
            println!("   -  {:<40} {}", skip.path, skip.detail);
        }
    }
}
