use std::time::Duration;

use anyhow::{Context, Result};
use clap::command;
use clap::Parser;
use diesel::Connection;
use diesel::PgConnection;
use diesel_migrations::MigrationHarness;
use dotenvy::dotenv;
use ftso_indexer::chain::AlloyProvider;
use ftso_indexer::checkpoint::FileCheckpoint;
use ftso_indexer::scheduler::Scheduler;
use ftso_indexer::sink::DieselSink;
use ftso_indexer::MIGRATIONS;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RPC URL
    #[arg(short, long)]
    rpc: String,

    /// Price submitter (registry) contract address
    #[arg(short = 'c', long)]
    registry: String,

    /// Polling interval between cycles, in milliseconds
    #[arg(long, default_value = "5000")]
    poll_interval_ms: u64,

    /// Delay between per-contract queries, in milliseconds
    #[arg(long, default_value = "2000")]
    rate_limit_delay_ms: u64,

    /// Block to start from when no checkpoint exists
    #[arg(short, long, default_value = "10999000")]
    start_block: u64,

    /// Checkpoint file path
    #[arg(long, default_value = "last_block.txt")]
    checkpoint_file: String,
}

fn run() -> Result<()> {
    let args = Args::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let mut conn = PgConnection::establish(&database_url)
        .with_context(|| format!("error connecting to {}", database_url))?;

    // apply pending migrations
    info!("Applying pending migrations");
    conn.run_pending_migrations(MIGRATIONS)
        // error is not sized, pain to handle the usual way
        .expect("failed to apply migrations");
    info!("Applied pending migrations");

    let provider = AlloyProvider {
        url: args.rpc.parse().context("failed to parse RPC URL")?,
    };
    let checkpoint = FileCheckpoint::new(&args.checkpoint_file, args.start_block);
    let sink = DieselSink { conn };

    let registry = args
        .registry
        .parse()
        .context("failed to parse registry contract address")?;

    info!(
        rpc = %args.rpc,
        %registry,
        start_block = args.start_block,
        poll_interval_ms = args.poll_interval_ms,
        rate_limit_delay_ms = args.rate_limit_delay_ms,
        "starting ingestion"
    );

    let mut scheduler = Scheduler::new(
        provider,
        checkpoint,
        sink,
        registry,
        Duration::from_millis(args.rate_limit_delay_ms),
    );
    scheduler.run(Duration::from_millis(args.poll_interval_ms))
}

fn main() -> Result<()> {
    dotenv().ok();

    // seems messy, see if there is a better way
    let mut filter = EnvFilter::new("info");
    if let Ok(var) = std::env::var("RUST_LOG") {
        filter = filter.add_directive(var.parse()?);
    }
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_env_filter(filter)
        .init();

    let _ = run().inspect_err(|e| error!(?e, "run error"));

    Ok(())
}
