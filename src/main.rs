use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use chatcopy::bootstrap::{init_tracing_subscriber, resolve_config};
use chatcopy::{copy_message, scan_fixture, CopyReport};

#[derive(Parser, Debug)]
#[command(name = "chatcopy")]
#[command(about = "Copy chat messages with their text, HTML and images", long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/chatcopy/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Attach copy buttons to a document fixture and count them
    Scan { fixture: PathBuf },
    /// Activate one copy button in a document fixture
    Copy {
        fixture: PathBuf,

        /// Which button, in document order
        #[arg(short, long, default_value_t = 0)]
        index: usize,

        /// Record the clipboard write instead of touching the system clipboard
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing_subscriber(cli.verbose)?;
    let config = resolve_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Scan { fixture } => {
            let attached = scan_fixture(&config, &fixture)?;
            println!("{attached} copy button(s) attached");
        }
        Commands::Copy {
            fixture,
            index,
            dry_run,
        } => {
            let report = copy_message(&config, &fixture, index, dry_run).await?;
            print_report(&report);
        }
    }

    Ok(())
}

fn print_report(report: &CopyReport) {
    println!("{}", report.status);

    if let Some(attempt) = &report.recorded {
        println!("\nRecorded clipboard item:");
        for part in attempt.parts() {
            if part.mime.is_image() {
                println!("  {}: {} bytes", part.mime.as_str(), part.data.len());
            } else {
                println!(
                    "  {}: {}",
                    part.mime.as_str(),
                    String::from_utf8_lossy(&part.data)
                );
            }
        }
    }
    for text in &report.recorded_text {
        println!("\nRecorded plain text:\n  {text}");
    }
}
