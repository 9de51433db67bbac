//! Shelf-Surfer main entry point
//!
//! This is the command-line interface for the Shelf-Surfer best-seller crawler.
//! Accepted products are written to stdout as JSON lines; logs and run
//! statistics go to stderr.

use anyhow::Context;
use clap::Parser;
use shelf_surfer::config::{load_config_with_hash, validate, Config};
use shelf_surfer::filter::fields;
use shelf_surfer::output::{self, JsonLinesSink, MarkdownReport, ProductSink};
use shelf_surfer::{Coordinator, OptionsForm};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shelf-Surfer: A polite best-seller catalog crawler
///
/// Shelf-Surfer walks the best-seller listings of the selected categories,
/// reads every product's detail page and prints the products that match the
/// given price, rank, review and size ranges.
#[derive(Parser, Debug)]
#[command(name = "shelf-surfer")]
#[command(version = "1.0.0")]
#[command(about = "A polite best-seller catalog crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print the category catalog and exit
    #[arg(long, conflicts_with = "dry_run")]
    list_categories: bool,

    /// Validate options and show the listing links that would be walked
    #[arg(long)]
    dry_run: bool,

    /// Category id to crawl; repeat for several
    #[arg(long = "category", value_name = "ID")]
    categories: Vec<String>,

    #[arg(long, value_name = "USD")]
    min_price: Option<String>,

    #[arg(long, value_name = "USD")]
    max_price: Option<String>,

    /// Best rank to accept (lower is better)
    #[arg(long)]
    min_rank: Option<String>,

    #[arg(long)]
    max_rank: Option<String>,

    #[arg(long)]
    min_reviews: Option<String>,

    #[arg(long)]
    max_reviews: Option<String>,

    /// Maximum length in inches
    #[arg(long, value_name = "IN")]
    max_length: Option<String>,

    /// Maximum width in inches
    #[arg(long, value_name = "IN")]
    max_width: Option<String>,

    /// Maximum height in inches
    #[arg(long, value_name = "IN")]
    max_height: Option<String>,

    /// Maximum weight, in the unit the product page uses
    #[arg(long)]
    max_weight: Option<String>,

    /// Fraction by which size and weight maxima may be exceeded
    #[arg(long)]
    tolerance: Option<String>,

    /// How to treat attributes a page did not provide: check or accept
    #[arg(long, value_name = "POLICY")]
    unknown: Option<String>,

    /// Write a markdown report of the run to this path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

impl Cli {
    /// Collects the filter flags into the same form a search page would submit
    fn options_form(&self) -> OptionsForm {
        let mut form = OptionsForm::new();
        for category in &self.categories {
            form.push(fields::CATEGORIES, category.as_str());
        }

        let optional = [
            (fields::MIN_PRICE, &self.min_price),
            (fields::MAX_PRICE, &self.max_price),
            (fields::MIN_RANK, &self.min_rank),
            (fields::MAX_RANK, &self.max_rank),
            (fields::MIN_REVIEWS, &self.min_reviews),
            (fields::MAX_REVIEWS, &self.max_reviews),
            (fields::MAX_LENGTH, &self.max_length),
            (fields::MAX_WIDTH, &self.max_width),
            (fields::MAX_HEIGHT, &self.max_height),
            (fields::MAX_WEIGHT, &self.max_weight),
            (fields::TOLERANCE, &self.tolerance),
            (fields::UNKNOWN, &self.unknown),
        ];
        for (field, value) in optional {
            if let Some(value) = value {
                form.push(field, value.as_str());
            }
        }

        form
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    let (config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => {
            let config = Config::default();
            validate(&config).context("Built-in configuration is invalid")?;
            (config, None)
        }
    };

    let coordinator = Coordinator::new(&config).context("Failed to set up the crawler")?;

    // Handle different modes
    if cli.list_categories {
        handle_list_categories(&coordinator);
        return Ok(());
    }

    let options = cli
        .options_form()
        .into_options(coordinator.catalog())
        .context("Invalid crawl options")?;

    if cli.dry_run {
        return handle_dry_run(&coordinator, &config, &options);
    }

    let report_path = cli
        .report
        .clone()
        .or_else(|| config.output.report_path.as_ref().map(PathBuf::from));

    handle_crawl(&coordinator, options, report_path, config_hash, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelf_surfer=info,warn"),
            1 => EnvFilter::new("shelf_surfer=debug,info"),
            2 => EnvFilter::new("shelf_surfer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --list-categories: prints every category id with its name
fn handle_list_categories(coordinator: &Coordinator) {
    for (id, name) in coordinator.list_categories() {
        println!("{:>3}  {}", id, name);
    }
}

/// Handles the --dry-run mode: validates options and shows what would be crawled
fn handle_dry_run(
    coordinator: &Coordinator,
    config: &Config,
    options: &shelf_surfer::CrawlOptions,
) -> anyhow::Result<()> {
    println!("=== Shelf-Surfer Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Host: {}", config.crawler.host);
    println!(
        "  Pause between pages: {}ms - {}ms",
        config.crawler.min_pause, config.crawler.max_pause
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    match config.crawler.max_pages {
        0 => println!("  Max pages per link: unlimited"),
        n => println!("  Max pages per link: {}", n),
    }

    println!("\nFilter:");
    println!("  Price: {:?} - {:?}", options.price.min, options.price.max);
    println!("  Rank: {:?} - {:?}", options.rank.min, options.rank.max);
    println!(
        "  Reviews: {:?} - {:?}",
        options.reviews.min, options.reviews.max
    );
    println!(
        "  Max size (L x W x H): {:?} x {:?} x {:?}",
        options.max_length, options.max_width, options.max_height
    );
    println!("  Max weight: {:?}", options.max_weight);
    println!("  Tolerance: {}", options.tolerance);
    println!("  Unknown attributes: {}", options.unknown.as_str());

    let links = coordinator.plan(options)?;
    println!("\nListing Links ({}):", links.len());
    for link in &links {
        println!("  - {}", link);
    }

    println!("\n✓ Options are valid");
    println!("✓ Would start {} walkers", links.len());

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    coordinator: &Coordinator,
    options: shelf_surfer::CrawlOptions,
    report_path: Option<PathBuf>,
    config_hash: Option<String>,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut sinks: Vec<Box<dyn ProductSink + Send>> =
        vec![Box::new(JsonLinesSink::new(std::io::stdout()))];
    if let Some(path) = report_path {
        let mut report = MarkdownReport::new(path);
        if let Some(hash) = config_hash {
            report = report.with_config_hash(hash);
        }
        sinks.push(Box::new(report));
    }

    let mut stream = coordinator.start(options)?;

    let drained = tokio::select! {
        result = output::drain(&mut stream, &mut sinks) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, stopping run");
            coordinator.stop();
            output::drain(&mut stream, &mut sinks).await
        }
    };

    if let Err(e) = &drained {
        tracing::error!("Output failed, stopping run: {}", e);
        coordinator.stop();
        // Let the walkers observe the signal and release the stream
        while stream.next().await.is_some() {}
    }

    let Some(mut summary) = coordinator.wait().await else {
        anyhow::bail!("Run ended without a summary");
    };
    summary.sort_reports();

    drained.context("Failed to write products")?;
    output::finish(&mut sinks, &summary).context("Failed to finish output")?;

    if !quiet {
        output::write_summary(&mut std::io::stderr(), &summary)?;
    }

    Ok(())
}
