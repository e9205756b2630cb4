use card_scan::capture::{CaptureSource, DocumentScan, PhotoCapture, find_card_images};
use card_scan::collection::CollectionStore;
use card_scan::config::{self, ScannerConfig};
use card_scan::output;
use card_scan::recognition::RecognitionClient;
use card_scan::scanner::ScanDriver;
use card_scan::session::ScanState;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

/// How the collection is shown after a scan run.
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum View {
    /// Rows of cards, `collection.grid_columns` per row
    #[default]
    Grid,
    /// One card per page
    Pages,
}

/// Shared flags for commands that scan cards.
#[derive(clap::Args, Clone)]
struct CollectionArgs {
    /// Add every recognized card to the collection
    #[arg(long)]
    add: bool,

    /// Collection view printed after scanning (with --add)
    #[arg(long, value_enum, default_value_t = View::Grid)]
    view: View,
}

#[derive(Parser)]
#[command(name = "card-scan")]
#[command(about = "Scan trading cards into a collection")]
#[command(long_about = "\
Scan trading cards into a collection

Each photo is re-encoded as JPEG and uploaded to a recognition server,
which answers with the player, team, set, and card number. Fields the
server cannot read come back as \"Unknown ...\" placeholders.

  card-scan scan front.jpg                  # one card
  card-scan scan binder/ --add              # every image in a directory
  card-scan scan binder/ --add --view pages # then page through the collection
  card-scan scan-document page1.png page2.png  # first page is the card

Run 'card-scan gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (stock defaults when missing)
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recognize card photos (files, or directories of images)
    Scan {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        collection: CollectionArgs,
    },
    /// Recognize a card from a document scan; only the first page is used
    ScanDocument {
        /// Scanned pages in order (none = cancelled scan)
        pages: Vec<PathBuf>,

        #[command(flatten)]
        collection: CollectionArgs,
    },
    /// Check whether the recognition server answers
    Health,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Scan { paths, collection } => {
            let config = config::load_config(&cli.config)?;
            let sources = find_card_images(&paths)?
                .into_iter()
                .map(|path| {
                    let source: Arc<dyn CaptureSource> = Arc::new(PhotoCapture::new(&path));
                    (path, source)
                })
                .collect();
            run_scans(&config, sources, &collection).await?;
        }
        Command::ScanDocument { pages, collection } => {
            let config = config::load_config(&cli.config)?;
            let label = pages
                .first()
                .cloned()
                .unwrap_or_else(|| PathBuf::from("(no pages)"));
            let source: Arc<dyn CaptureSource> = Arc::new(DocumentScan::new(pages));
            run_scans(&config, vec![(label, source)], &collection).await?;
        }
        Command::Health => {
            let config = config::load_config(&cli.config)?;
            let client = RecognitionClient::from_config(&config)?;
            let reachable = client.health_check().await;
            output::print_health(client.endpoint().as_str(), reachable);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Run one scan attempt per source, then print the summary and, with
/// `--add`, the collection.
async fn run_scans(
    config: &ScannerConfig,
    sources: Vec<(PathBuf, Arc<dyn CaptureSource>)>,
    args: &CollectionArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = RecognitionClient::from_config(config)?;
    tracing::info!(endpoint = %client.endpoint(), "using recognition endpoint");
    let driver = ScanDriver::new(Arc::new(client), CollectionStore::new());

    let mut recognized = 0;
    let mut added = 0;
    for (i, (path, source)) in sources.iter().enumerate() {
        let state = driver.capture_and_submit(source.clone()).await?;
        output::print_scan_attempt(i + 1, path, &driver.view());
        if state == ScanState::Recognized {
            recognized += 1;
            if args.add {
                driver.confirm_add_to_collection()?;
                added += 1;
            }
        }
        driver.reset();
    }

    println!();
    println!(
        "{}",
        output::format_scan_summary(sources.len(), recognized, added)
    );

    if args.add {
        println!();
        let cards = driver.collection().all();
        match args.view {
            View::Grid => output::print_collection_grid(&cards, config.collection.grid_columns),
            View::Pages => output::print_collection_pages(&cards),
        }
    }
    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "card_scan=debug" } else { "card_scan=warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
