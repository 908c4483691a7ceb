//! Balancer Demo - console driver for the shared load balancer.
//!
//! Confirms that repeated lookups return one shared balancer, then routes a
//! batch of requests through it and prints where each one went.

mod dispatch;

use anyhow::Result;
use balancer_core::{get_load_balancer, DemoConfig};
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use dispatch::DispatchSummary;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const MAX_WORKERS: u64 = DemoConfig::MAX_WORKERS as u64;

#[derive(Parser, Debug)]
#[command(name = "balancer-demo")]
#[command(about = "Route requests through the process-wide random load balancer")]
struct Args {
    /// Number of requests to dispatch
    #[arg(short = 'n', long, default_value_t = DemoConfig::DEFAULT_REQUESTS)]
    requests: usize,

    /// Concurrent tasks sharing the requests
    #[arg(
        short,
        long,
        default_value_t = DemoConfig::DEFAULT_WORKERS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_WORKERS)
    )]
    workers: usize,

    /// Print a JSON summary instead of one line per request
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout carries only dispatch output
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("Starting balancer demo");

    let same_instance = dispatch::check_same_instance(DemoConfig::INSTANCE_LOOKUPS)?;
    let assignments = dispatch::dispatch(args.requests, args.workers).await?;

    if args.json {
        let balancer = get_load_balancer()?;
        let summary = DispatchSummary::new(balancer, same_instance, args.workers, &assignments);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        if same_instance {
            println!("Same instance\n");
        }
        for assignment in &assignments {
            println!("Dispatch Request to: {}", assignment.server);
        }
    }

    info!("Dispatched {} requests", assignments.len());
    Ok(())
}
