//! memoize CLI
//!
//! Runs the profile API and exercises the memoized slot from the command line.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use memoize_api::{ApiConfig, ApiServer};
use memoize_cache::{Memo, SafeMemoize};
use memoize_core::constants::DEFAULT_API_PORT;

/// memoize - stale-while-revalidate memoization
#[derive(Parser)]
#[command(name = "memoize")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_API_PORT, env = "PORT")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Walk through one refresh cycle: cold load, hit, stale hit, refreshed value
    Demo {
        /// Lifetime of each memo in milliseconds
        #[arg(long, default_value = "1000")]
        ttl_ms: u64,
        /// Simulated fetch latency in milliseconds
        #[arg(long, default_value = "200")]
        latency_ms: u64,
    },

    /// Hammer one memoized slot from many threads and count fetches
    Bench {
        /// Concurrent callers per round
        #[arg(short, long, default_value = "32")]
        callers: usize,
        /// Rounds; the memo expires between rounds
        #[arg(short, long, default_value = "20")]
        rounds: usize,
        /// Lifetime of each memo in milliseconds
        #[arg(long, default_value = "50")]
        ttl_ms: u64,
        /// Simulated fetch latency in milliseconds
        #[arg(long, default_value = "20")]
        latency_ms: u64,
        /// Print final statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "memoize=debug,info"
    } else {
        "memoize=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(port, &bind).await,
        Commands::Demo { ttl_ms, latency_ms } => {
            cmd_demo(Duration::from_millis(ttl_ms), Duration::from_millis(latency_ms))
        }
        Commands::Bench {
            callers,
            rounds,
            ttl_ms,
            latency_ms,
            json,
        } => cmd_bench(
            callers,
            rounds,
            Duration::from_millis(ttl_ms),
            Duration::from_millis(latency_ms),
            json,
        ),
    }
}

/// Run API server
async fn cmd_serve(port: u16, bind: &str) -> Result<()> {
    println!("{}", "🚀 Starting memoize API server...".cyan().bold());
    println!("   {} http://{}:{}/profile", "Profile:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    println!("\n   Press Ctrl+C to stop.\n");

    let config = ApiConfig::from_env()?;
    let server = ApiServer::new(config);

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .context("Invalid bind address")?;
    server.run(addr).await?;

    Ok(())
}

/// Fetch function that tags each result with its revision number.
fn revision_fetch(
    revisions: &Arc<AtomicU64>,
    ttl: Duration,
    latency: Duration,
) -> impl FnOnce() -> Memo<u64> + Send + 'static {
    let revisions = Arc::clone(revisions);
    move || {
        let revision = revisions.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(revision, "fetching");
        thread::sleep(latency);
        Memo::new(revision, ttl)
    }
}

/// How long to wait for a background refresh that sleeps `latency`.
fn refresh_timeout(latency: Duration) -> Duration {
    latency.saturating_add(Duration::from_secs(5))
}

fn wait_for_refresh<T>(cache: &SafeMemoize<T>, timeout: Duration) -> Result<()> {
    let start = Instant::now();
    while cache.is_refreshing() {
        if start.elapsed() >= timeout {
            return Err(anyhow!("refresh still running after {:?}", timeout));
        }
        thread::sleep(Duration::from_millis(5));
    }
    Ok(())
}

/// Walk through one refresh cycle
fn cmd_demo(ttl: Duration, latency: Duration) -> Result<()> {
    println!("{}", "🧪 Stale-while-revalidate walkthrough".cyan().bold());

    let cache = SafeMemoize::named("demo");
    let revisions = Arc::new(AtomicU64::new(0));

    let start = Instant::now();
    let value = cache.value(revision_fetch(&revisions, ttl, latency));
    println!(
        "   1. Cold load:   revision {} in {:?} {}",
        value,
        start.elapsed(),
        "(blocked on fetch)".dimmed()
    );

    let start = Instant::now();
    let value = cache.value(revision_fetch(&revisions, ttl, latency));
    println!("   2. Fresh hit:   revision {} in {:?}", value, start.elapsed());

    thread::sleep(ttl.saturating_add(Duration::from_millis(50)));

    let start = Instant::now();
    let value = cache.value(revision_fetch(&revisions, ttl, latency));
    println!(
        "   3. Stale hit:   revision {} in {:?} {}",
        value,
        start.elapsed(),
        "(refresh running in background)".dimmed()
    );

    wait_for_refresh(&cache, refresh_timeout(latency))?;

    let value = cache.value(revision_fetch(&revisions, ttl, latency));
    println!("   4. After refresh: revision {}", value);

    let stats = cache.stats();
    println!("\n{}", "📈 Results:".green().bold());
    println!("   Fetches: {}", stats.fetches);
    println!("   Stale hits: {}", stats.stale_hits);

    Ok(())
}

/// Hammer one slot from many threads
fn cmd_bench(
    callers: usize,
    rounds: usize,
    ttl: Duration,
    latency: Duration,
    json: bool,
) -> Result<()> {
    if callers == 0 {
        return Err(anyhow!("--callers must be at least 1"));
    }

    println!(
        "{} {} callers x {} rounds",
        "📊 Benchmarking with".cyan().bold(),
        callers,
        rounds
    );

    let cache: SafeMemoize<u64> = SafeMemoize::named("bench");
    let revisions = Arc::new(AtomicU64::new(0));

    let pb = ProgressBar::new(rounds as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("   [{bar:40.cyan/blue}] {pos}/{len} rounds")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    for _ in 0..rounds {
        let barrier = Arc::new(Barrier::new(callers));
        let handles: Vec<_> = (0..callers)
            .map(|_| {
                let cache = cache.clone();
                let barrier = Arc::clone(&barrier);
                let fetch = revision_fetch(&revisions, ttl, latency);
                thread::spawn(move || {
                    barrier.wait();
                    cache.value(fetch)
                })
            })
            .collect();

        for handle in handles {
            handle
                .join()
                .map_err(|_| anyhow!("caller thread panicked"))?;
        }

        thread::sleep(ttl);
        pb.inc(1);
    }
    pb.finish();

    wait_for_refresh(&cache, refresh_timeout(latency))?;
    let elapsed = start.elapsed();
    let stats = cache.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let total_calls = callers * rounds;
    println!("\n{}", "📈 Results:".green().bold());
    println!("   Calls: {}", total_calls);
    println!("   Fetch invocations: {}", stats.fetches);
    println!("   Stale hits: {}", stats.stale_hits);
    println!("   Cold loads: {}", stats.cold_loads);
    println!("   Skipped fetches: {}", stats.skipped_fetches);
    println!("   Elapsed: {:?}", elapsed);

    // One cold load plus at most one refresh per expiry.
    if stats.fetches <= rounds as u64 + 1 {
        println!("   {} At most one fetch per expiry", "✅".green());
    } else {
        println!(
            "   {} Expected at most {} fetches, saw {}",
            "❌".red(),
            rounds + 1,
            stats.fetches
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_bench_defaults() {
        let cli = Cli::try_parse_from(["memoize", "bench"]).unwrap();
        match cli.command {
            Commands::Bench { callers, rounds, json, .. } => {
                assert_eq!(callers, 32);
                assert_eq!(rounds, 20);
                assert!(!json);
            }
            _ => panic!("expected bench"),
        }
    }

    #[test]
    fn test_revision_fetch_counts() {
        let revisions = Arc::new(AtomicU64::new(0));
        let memo = revision_fetch(&revisions, Duration::from_secs(1), Duration::ZERO)();
        assert_eq!(*memo.cached_value(), 1);
        assert_eq!(revisions.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_refresh_timeout_saturates() {
        assert_eq!(refresh_timeout(Duration::from_millis(20)), Duration::from_millis(5020));
        assert_eq!(refresh_timeout(Duration::MAX), Duration::MAX);
    }

    #[test]
    fn test_wait_for_refresh_with_unbounded_timeout() {
        let cache: SafeMemoize<u64> = SafeMemoize::named("idle");
        wait_for_refresh(&cache, Duration::MAX).unwrap();
    }

    #[test]
    fn test_revision_fetch_with_unbounded_ttl() {
        let revisions = Arc::new(AtomicU64::new(0));
        let memo = revision_fetch(&revisions, Duration::from_millis(u64::MAX), Duration::ZERO)();
        assert!(memo.is_valid());
    }

    #[test]
    fn test_bench_runs() {
        cmd_bench(4, 2, Duration::from_millis(10), Duration::ZERO, true).unwrap();
    }

    #[test]
    fn test_bench_rejects_zero_callers() {
        assert!(cmd_bench(0, 1, Duration::from_millis(10), Duration::ZERO, true).is_err());
    }
}
