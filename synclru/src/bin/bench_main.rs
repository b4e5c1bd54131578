//! synclru concurrent load driver
//!
//! Usage:
//!   synclru-bench --capacity 20 --writers 1 --readers 1 --ops 30000
//!
//! Writers insert sequential keys, readers look up random keys in the same
//! range. Prints elapsed time and the cache hit/miss counters.

use clap::Parser;
use rand::Rng;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use synclru::{CacheConfig, LruCache, StatsSnapshot};

#[derive(Parser, Debug)]
#[command(name = "synclru-bench")]
#[command(about = "Hammer a shared LRU cache from several threads")]
#[command(version)]
struct Args {
    /// Cache capacity (defaults to SYNCLRU_CAPACITY, then 128)
    #[arg(short, long)]
    capacity: Option<usize>,

    /// Number of writer threads
    #[arg(short, long, default_value_t = 1)]
    writers: usize,

    /// Number of reader threads
    #[arg(short, long, default_value_t = 1)]
    readers: usize,

    /// Operations per thread
    #[arg(short, long, default_value_t = 30_000)]
    ops: u64,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(serde::Serialize)]
struct Report {
    capacity: usize,
    writers: usize,
    readers: usize,
    ops_per_thread: u64,
    elapsed_ms: f64,
    ops_per_sec: f64,
    final_len: usize,
    stats: StatsSnapshot,
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Bench error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match args.capacity {
        Some(capacity) => CacheConfig::new(capacity),
        None => CacheConfig::from_env()?,
    };
    let cache: Arc<LruCache<String, u64>> = Arc::new(LruCache::with_config(config)?);
    let ops = args.ops;

    log::info!(
        "Starting {} writers and {} readers, {} ops each, capacity {}",
        args.writers,
        args.readers,
        ops,
        cache.capacity()
    );

    let start = Instant::now();

    let mut handles = Vec::with_capacity(args.writers + args.readers);
    for _ in 0..args.writers {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..ops {
                cache.set(i.to_string(), i);
            }
        }));
    }
    for _ in 0..args.readers {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            let mut rng = rand::thread_rng();
            for _ in 0..ops {
                let key = rng.gen_range(0..ops.max(1)).to_string();
                std::hint::black_box(cache.get(key.as_str()));
            }
        }));
    }

    for handle in handles {
        handle.join().map_err(|_| "worker thread panicked")?;
    }

    let elapsed = start.elapsed();
    let total_ops = ops * (args.writers + args.readers) as u64;
    let secs = elapsed.as_secs_f64();

    let report = Report {
        capacity: cache.capacity(),
        writers: args.writers,
        readers: args.readers,
        ops_per_thread: ops,
        elapsed_ms: secs * 1000.0,
        ops_per_sec: if secs > 0.0 { total_ops as f64 / secs } else { 0.0 },
        final_len: cache.len(),
        stats: cache.stats().snapshot(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} ops in {:.2} ms ({:.0} ops/s), {} entries cached",
            total_ops, report.elapsed_ms, report.ops_per_sec, report.final_len
        );
        println!("{}", report.stats.format());
    }

    Ok(())
}
