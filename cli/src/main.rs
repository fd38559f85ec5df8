use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use twitterverse_core::{
    evaluate, followers_of, list_literal, parse_profiles, parse_query, EvalOptions, ProfileTable,
};

mod cli;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Command::Query {
            data,
            eval,
            queries,
        } => {
            let table = load_profiles(&data.data)?;
            let options = eval.options();
            for path in &queries {
                let output = run_query(&table, path, &options)?;
                println!("{}", output);
            }
        }
        Command::Interactive { data, eval } => {
            let table = load_profiles(&data.data)?;
            interactive(&table, &eval.options())?;
        }
        Command::Followers { data, username } => {
            let table = load_profiles(&data.data)?;
            table.profile(&username)?;
            println!("{}", list_literal(&followers_of(&table, &username)));
        }
        Command::Status { data } => {
            let table = load_profiles(&data.data)?;
            print_status(&table);
        }
        Command::Dump { data } => {
            let table = load_profiles(&data.data)?;
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
    }

    Ok(())
}

fn load_profiles(path: &Path) -> Result<ProfileTable> {
    let t = Instant::now();
    let file = File::open(path)
        .with_context(|| format!("couldn't open profile file {}", path.display()))?;
    let table = parse_profiles(BufReader::new(file))
        .with_context(|| format!("couldn't parse profile file {}", path.display()))?;
    info!(
        "loaded {} profiles from {} in {:.1}ms",
        table.len(),
        path.display(),
        t.elapsed().as_secs_f64() * 1000.0
    );
    Ok(table)
}

fn run_query(table: &ProfileTable, path: &Path, options: &EvalOptions) -> Result<String> {
    let file = File::open(path)
        .with_context(|| format!("couldn't open query file {}", path.display()))?;
    let spec = parse_query(BufReader::new(file))
        .with_context(|| format!("couldn't parse query file {}", path.display()))?;
    let output = evaluate(table, &spec, options)
        .with_context(|| format!("query {} failed", path.display()))?;
    Ok(output)
}

/// Prompt for query file names until an empty line or end of input. A failed
/// query is reported and the loop continues.
fn interactive(table: &ProfileTable, options: &EvalOptions) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        eprint!("Query file (blank to quit): ");
        io::stderr().flush()?;

        let name = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let name = name.trim();
        if name.is_empty() {
            break;
        }

        match run_query(table, Path::new(name), options) {
            Ok(output) => println!("{}", output),
            Err(e) => error!("{:#}", e),
        }
    }

    Ok(())
}

fn print_status(table: &ProfileTable) {
    let dangling = table.dangling_references();
    println!("{:<20} {:>8}", "users", table.len());
    println!("{:<20} {:>8}", "follow edges", table.follow_edge_count());
    println!("{:<20} {:>8}", "dangling follows", dangling.len());
    for (follower, missing) in dangling {
        println!("  {} -> {}", follower, missing);
    }
}
