//! # F1 Live CLI
//!
//! Command-line utilities for replaying recorded traffic and checking socket
//! endpoints.

use anyhow::{Context, Result};
use f1_live_adapter_phoenix::socket_url;
use f1_live_core::{Page, Updater, UpdaterConfig};
use std::env;
use std::fs::File;
use std::io::BufReader;
use tracing_subscriber::EnvFilter;

mod replay;

fn main() -> Result<()> {
    // Logs go to stderr so replayed HTML on stdout stays clean.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "replay" => {
            if args.len() < 3 {
                eprintln!("Usage: f1-live replay <file>");
                std::process::exit(1);
            }
            let path = &args[2];
            let file = File::open(path).with_context(|| format!("Failed to open {path}"))?;

            let mut updater = Updater::new(Page::standard(), UpdaterConfig::default());
            let stats = replay::replay(BufReader::new(file), &mut updater)?;
            tracing::info!(
                applied = stats.applied,
                ignored = stats.ignored,
                rejected = stats.rejected,
                "Replay finished"
            );

            print!("{}", updater.dom().to_html());
        }
        "url" => {
            if args.len() < 3 {
                eprintln!("Usage: f1-live url <endpoint>");
                std::process::exit(1);
            }
            let url = socket_url(&args[2], &[]).context("Failed to resolve endpoint")?;
            println!("{url}");
        }
        "help" | "--help" | "-h" => {
            print_help();
        }
        cmd => {
            eprintln!("Unknown command: {cmd}");
            print_help();
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_help() {
    println!(
        r#"F1 Live CLI

USAGE:
    f1-live <COMMAND> [OPTIONS]

COMMANDS:
    replay <file>     Apply a recorded channel log and print the resulting page
    url <endpoint>    Print the websocket URL the agent would dial
    help              Show this help message

LOG FORMAT:
    One message per line: a Phoenix frame array, a {{"feed","data"}} envelope
    or a {{"source"}} notice. Blank lines and lines starting with # are skipped.

EXAMPLES:
    f1-live replay session.ndjson > live.html
    f1-live url https://timing.example.com/socket
"#
    );
}
