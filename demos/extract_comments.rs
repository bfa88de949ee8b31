/// Example: extract the comments of one or more .docx files.
///
/// Prints the records of every document as JSON, or a thread outline with
/// `--threads`.
///
/// ```text
/// cargo run --example extract_comments -- review.docx
/// cargo run --example extract_comments -- --threads --unresolved a.docx b.docx
/// RUST_LOG=litchi_comments=debug cargo run --example extract_comments -- review.docx
/// ```
use clap::Parser;
use litchi_comments::{Column, ExtractOptions, ResolvedFilter, extract_many, threads};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Extract reviewer comments from Word documents")]
struct Args {
    /// Documents to read
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Paragraphs per estimated page
    #[arg(long, default_value_t = 25)]
    page_size: usize,

    /// Bound on reply propagation passes
    #[arg(long, default_value_t = 10)]
    max_passes: usize,

    /// Only resolved comments
    #[arg(long, conflicts_with = "unresolved")]
    resolved: bool,

    /// Only unresolved comments
    #[arg(long)]
    unresolved: bool,

    /// Comma-separated columns to print (e.g. "Line,Author,Comment")
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Print a thread outline instead of records
    #[arg(long)]
    threads: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let options = ExtractOptions::new()
        .with_page_size(args.page_size)
        .with_max_propagation_passes(args.max_passes);
    let filter = if args.resolved {
        ResolvedFilter::ResolvedOnly
    } else if args.unresolved {
        ResolvedFilter::UnresolvedOnly
    } else {
        ResolvedFilter::All
    };

    let columns: Vec<Column> = if args.columns.is_empty() {
        Column::ALL.to_vec()
    } else {
        args.columns
            .iter()
            .map(|name| Column::from_header(name).ok_or_else(|| format!("unknown column: {name}")))
            .collect::<Result<_, _>>()?
    };

    for (path, result) in extract_many(&args.files, &options) {
        println!("== {}", path.display());

        let extraction = match result {
            Ok(extraction) => extraction,
            Err(e) => {
                eprintln!("   error: {e}");
                continue;
            },
        };
        if let Some(note) = extraction.note {
            println!("   {note}");
            continue;
        }

        if args.threads {
            for thread in threads(&extraction.records) {
                let status = if thread.is_resolved() { "resolved" } else { "open" };
                println!("   thread {} ({} comments, {status})", thread.thread_id(), thread.len());
                for record in thread.members() {
                    if !filter.accepts(record) {
                        continue;
                    }
                    println!(
                        "   {}- [line {}] {}: {}",
                        "  ".repeat(record.reply_depth),
                        record.line.map_or_else(|| "?".to_string(), |l| l.to_string()),
                        record.author,
                        record.comment
                    );
                }
            }
            continue;
        }

        let rows: Vec<serde_json::Map<String, serde_json::Value>> = filter
            .apply(&extraction.records)
            .into_iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|c| {
                        let value = record
                            .column_value(*c)
                            .map_or(serde_json::Value::Null, serde_json::Value::String);
                        (c.header().to_string(), value)
                    })
                    .collect()
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    }

    Ok(())
}
