//! massbind command - bulk IPv6 address provisioning.

use std::net::Ipv6Addr;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use massbind::Session;
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "massbind",
    version,
    about = "Bulk IPv6 address provisioning over rtnetlink"
)]
struct Cli {
    /// Emit one JSON record per address instead of text.
    #[arg(short, long)]
    json: bool,

    /// Apply N addresses drawn uniformly at random instead of sweeping
    /// the whole range.
    #[arg(long, value_name = "N")]
    random: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add every address in the range to the interface.
    Add(RangeArgs),

    /// Delete every address in the range from the interface.
    #[command(visible_alias = "delete")]
    Del(RangeArgs),
}

#[derive(Args)]
struct RangeArgs {
    /// Interface name (e.g. eth0).
    dev: String,

    /// First address of the range.
    start: Ipv6Addr,

    /// Last address of the range (same /64 as START).
    end: Ipv6Addr,

    /// Prefix length applied to every address.
    prefix_len: u8,
}

#[derive(Clone, Copy)]
enum Op {
    Add,
    Del,
}

impl Op {
    fn label(self) -> &'static str {
        match self {
            Op::Add => "add",
            Op::Del => "del",
        }
    }
}

/// One per-address outcome, as printed.
#[derive(Serialize)]
struct Record {
    op: &'static str,
    address: String,
    prefix_len: u8,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run the requested sweep. `Ok(true)` means every mutation succeeded;
/// per-address failures are printed and do not stop the loop.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let (op, args) = match &cli.command {
        Command::Add(a) => (Op::Add, a),
        Command::Del(a) => (Op::Del, a),
    };

    let mut session = Session::open(&args.dev, args.start, args.end, args.prefix_len)
        .await
        .with_context(|| format!("opening session on {}", args.dev))?;

    let mut all_ok = true;

    match cli.random {
        Some(n) => {
            for _ in 0..n {
                let addr = session.next_random().context("reading random source")?;
                all_ok &= apply(&session, op, addr, cli.json).await;
            }
        }
        None => {
            while let Some(addr) = session.next_sequential() {
                all_ok &= apply(&session, op, addr, cli.json).await;
            }
        }
    }

    session.close();
    Ok(all_ok)
}

/// Apply one mutation and print its outcome. Returns whether it succeeded.
async fn apply(session: &Session, op: Op, addr: Ipv6Addr, json: bool) -> bool {
    let result = match op {
        Op::Add => session.add(addr).await,
        Op::Del => session.delete(addr).await,
    };

    let error = result.as_ref().err().map(|e| e.to_string());
    let ok = error.is_none();

    if json {
        let record = Record {
            op: op.label(),
            address: addr.to_string(),
            prefix_len: session.prefix_len(),
            ok,
            error,
        };
        // A flat record with owned strings cannot fail to serialize.
        println!("{}", serde_json::to_string(&record).expect("serialize record"));
    } else {
        match error {
            None => println!("{} {}/{} ok", op.label(), addr, session.prefix_len()),
            Some(e) => println!(
                "{} {}/{} failed: {}",
                op.label(),
                addr,
                session.prefix_len(),
                e
            ),
        }
    }

    ok
}
