//! Ethereum Vanity Address Search CLI
//!
//! Usage:
//!   eth_vanity pdead        # Find an address starting with 0xdead
//!   eth_vanity beef         # Find an address ending with beef
//!   eth_vanity -w 0 p00     # Use one worker per logical CPU
//!   eth_vanity              # Prompt for the pattern

use std::io::{self, BufRead, Write};
use std::process;
use std::time::Duration;

use clap::Parser;
use log::{error, info, warn};

use eth_vanity::report::{self, format_number};
use eth_vanity::{Config, Error, Pattern, SearchStatus, VanityResult, WorkerPool};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(&config) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(config: &Config) -> eth_vanity::Result<()> {
    let raw = match &config.pattern {
        Some(raw) => raw.clone(),
        None => prompt_pattern()?,
    };
    let pattern = Pattern::parse(&raw);

    if pattern.is_unsatisfiable() {
        warn!(
            "pattern {:?} can never match a lowercase hex address; searching until interrupted",
            pattern.pattern()
        );
    }

    println!("Ethereum Vanity Address Search");
    println!("==============================");
    println!("Pattern:    {}", pattern);
    println!("Difficulty: {}", pattern.difficulty_description());
    println!("Workers:    {}", config.worker_count());
    println!();

    let pool = WorkerPool::spawn(config.worker_count(), pattern)?;

    let stop = pool.stop_handle();
    if let Err(e) = ctrlc::set_handler(move || stop.stop()) {
        warn!("Ctrl-C handler not installed: {}", e);
    }

    println!("Searching... (Press Ctrl+C to stop)\n");

    let report_interval = Duration::from_secs(config.report_interval);
    let outcome = loop {
        match pool.wait_for_result(report_interval) {
            Ok(SearchStatus::Found(result)) => break Ok(Some(result)),
            Ok(SearchStatus::Pending) => print_progress(&pool),
            Ok(SearchStatus::Stopped) => break Ok(None),
            Err(e) => break Err(e),
        }
    };

    pool.join();

    match outcome? {
        Some(result) => publish(config, &result),
        None => println!("\nStopped by user."),
    }

    Ok(())
}

fn prompt_pattern() -> eth_vanity::Result<String> {
    print!("Pattern (prefix: p123, suffix: 123): ");
    io::stdout().flush().map_err(Error::Input)?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(Error::Input)?;
    Ok(line)
}

fn publish(config: &Config, result: &VanityResult) {
    println!("\n=== Match ===");
    if let Err(e) = report::write_summary(&mut io::stdout().lock(), result) {
        warn!("failed to print result: {}", e);
    }

    if let Some(path) = config.log_path() {
        match report::append_record(path, result) {
            Ok(()) => info!("result appended to {}", path.display()),
            Err(e) => warn!("{}", e),
        }
    }
}

fn print_progress(pool: &WorkerPool) {
    info!(
        "[{:>4}s] Generated {} addresses ({}/s)",
        pool.elapsed().as_secs(),
        format_number(pool.total_attempts()),
        format_number(pool.attempts_per_second() as u64)
    );
}
