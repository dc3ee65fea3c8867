//! Datfeed - fixed-width sales file tool

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use datfeed_common::checksum::sha256_hex;
use datfeed_common::logging::{init_logging, LogConfig, LogLevel};
use datfeed_common::{IngestionResult, PagedResult, SaleRecord};
use datfeed_ingest::coordinator;
use datfeed_ingest::upstream::{
    build_sink, query, ForwardStrategy, LedgerClient, LedgerConfig, ListParams, SalesQuery,
    SearchParams, SinkOptions,
};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "datfeed")]
#[command(author, version, about = "Fixed-width sales file ingestion tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a .dat file and print a summary
    Parse {
        file: PathBuf,

        /// Print the full ingestion result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a .dat file and forward its records upstream
    Send {
        file: PathBuf,

        #[command(flatten)]
        upstream: UpstreamArgs,

        #[arg(long, env = "FORWARD_STRATEGY", default_value = "batch")]
        strategy: ForwardStrategy,

        /// In-flight requests for per-record forwarding
        #[arg(long, env = "FORWARD_CONCURRENCY", default_value_t = 5)]
        concurrency: usize,

        /// Register products and clients before the sales (per-record only)
        #[arg(long, env = "FORWARD_REGISTER_CATALOG")]
        register_catalog: bool,
    },

    /// List sales stored upstream
    List {
        #[command(flatten)]
        upstream: UpstreamArgs,

        #[arg(long, default_value_t = 0)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        size: u32,
    },

    /// Search sales stored upstream
    Search {
        term: String,

        #[command(flatten)]
        upstream: UpstreamArgs,

        #[arg(long, default_value_t = 0)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        size: u32,
    },
}

#[derive(clap::Args, Debug)]
struct UpstreamArgs {
    /// Base URL of the upstream sales ledger
    #[arg(long, env = "UPSTREAM_URL")]
    upstream_url: String,
}

impl UpstreamArgs {
    fn client(&self) -> Result<LedgerClient> {
        LedgerClient::new(LedgerConfig::new(self.upstream_url.clone()))
            .context("Invalid upstream configuration")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("datfeed")
        .build()
        .merge_env()?;

    init_logging(&log_config)?;

    match cli.command {
        Command::Parse { file, json } => {
            let result = ingest_file(&file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_summary(&file, &result);
            }
        },
        Command::Send {
            file,
            upstream,
            strategy,
            concurrency,
            register_catalog,
        } => {
            let result = ingest_file(&file)?;
            print_summary(&file, &result);

            let sink = build_sink(
                upstream.client()?,
                SinkOptions {
                    strategy,
                    concurrency,
                    register_catalog,
                },
            );
            let outcome = sink.forward(&result.records).await;

            println!(
                "Forwarded {}/{} records ({})",
                outcome.records_sent, outcome.total_records, outcome.strategy
            );
            for failure in &outcome.failures {
                println!(
                    "  failed {}: {}",
                    failure.record_id.as_deref().unwrap_or("batch"),
                    failure.message
                );
            }

            if outcome.nothing_delivered() {
                anyhow::bail!("No records reached the upstream ledger");
            }
        },
        Command::List {
            upstream,
            page,
            size,
        } => {
            let sales = SalesQuery::new(upstream.client()?);
            let params = ListParams {
                page: Some(page),
                size: Some(size),
                sort: None,
            };
            let envelope = sales.list_sales(&params).await?;
            print_page(&query::into_sale_records(envelope)?);
        },
        Command::Search {
            term,
            upstream,
            page,
            size,
        } => {
            let sales = SalesQuery::new(upstream.client()?);
            let params = SearchParams {
                term: Some(term),
                page: Some(page),
                size: Some(size),
            };
            let envelope = sales.search_sales(&params).await?;
            print_page(&query::into_sale_records(envelope)?);
        },
    }

    Ok(())
}

fn ingest_file(path: &Path) -> Result<IngestionResult> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let result = coordinator::ingest(&bytes)?;
    info!(
        file = %path.display(),
        size = bytes.len(),
        checksum = %sha256_hex(&bytes),
        "Parsed file"
    );
    Ok(result)
}

fn print_summary(path: &Path, result: &IngestionResult) {
    println!(
        "{}: {} records, {} rejected",
        path.display(),
        result.records_processed,
        result.records_rejected
    );
    for rejected in &result.rejected_lines {
        println!("  line {}: {}", rejected.line_number, rejected.reason);
    }
}

fn print_page(page: &PagedResult<SaleRecord>) {
    for sale in &page.content {
        println!(
            "{:>6}  {}  {:<30}  {:<30}  {:>4} x {:>10} = {:>12}",
            sale.id,
            sale.sale_date,
            sale.customer_name,
            sale.product_name,
            sale.quantity,
            sale.unit_value,
            sale.total_value
        );
    }
    println!(
        "page {}/{} ({} sales)",
        page.page_index() + 1,
        page.total_pages.max(1),
        page.total_elements
    );
}
