use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use humansize::{format_size, BINARY};
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing::Level;

use cclean::{find_stale_objects, CleanError, StaleObject};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "List or remove object files that are older than their C/C++ sources or included headers",
    long_about = None
)]
struct Args {
    /// Remove the stale object files instead of listing them
    #[arg(short = 'x')]
    delete: bool,

    /// Log how each object was matched and resolved (to stderr)
    #[arg(long, short)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .init();
}

/// Remove one stale object and confirm it on stdout
fn remove_stale(dir: &Path, object: &StaleObject) -> cclean::Result<()> {
    fs::remove_file(dir.join(&object.name)).map_err(|err| CleanError::io(&object.name, err))?;
    println!("removed {}", object.name);
    Ok(())
}

/// Act on each stale object as soon as it is found; the first failure stops
/// the run and leaves earlier output and removals in place
fn run(args: &Args) -> Result<()> {
    let dir = Path::new(".");
    let mut removed_bytes = 0u64;

    let stale_count = find_stale_objects(dir, |object| {
        if args.delete {
            remove_stale(dir, object)?;
            removed_bytes += object.size;
        } else {
            println!("{}", object.name);
        }
        Ok(())
    })?;

    if stale_count == 0 {
        return Ok(());
    }

    if args.delete {
        println!(
            "{}",
            format!(
                "Removed {} stale object(s), {}",
                stale_count,
                format_size(removed_bytes, BINARY)
            )
            .bold()
        );
    } else {
        println!("{}", "run with -x to remove them".dimmed());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Top-level message only: "<path>: <reason>"
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
