use anyhow::Result;
use clap::{Parser, ValueEnum};
use corelat::{OsBinder, PairProbe, Reporter, Schema, cpu, sweep};
use owo_colors::OwoColorize;
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Handshake schema.
    #[arg(long, value_enum, default_value = "classic")]
    schema: SchemaArg,
    /// Handshake transactions per core pair.
    #[arg(long, default_value_t = 10_000_000)]
    transactions: u64,
    /// Reserved for the big-bang schema; currently without effect.
    #[arg(long, default_value_t = 10)]
    ways: usize,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum SchemaArg {
    /// Alternating rendezvous handshake.
    Classic,
    /// Ping-pong handshake (same rendezvous as classic).
    PingPong,
    /// Bulk-transfer discipline (not implemented).
    BigBang,
}

impl From<SchemaArg> for Schema {
    fn from(arg: SchemaArg) -> Schema {
        match arg {
            SchemaArg::Classic => Schema::Classic,
            SchemaArg::PingPong => Schema::PingPong,
            SchemaArg::BigBang => Schema::BigBang,
        }
    }
}

const SPINNER: [char; 4] = ['/', '-', '\\', '|'];

fn main() -> Result<()> {
    let args = Args::parse();
    anyhow::ensure!(args.ways > 0, "ways must be positive");
    let schema = Schema::from(args.schema);
    let cores = cpu::core_count()?;

    println!(
        "corelat: sweeping {cores} logical cores, {} transactions per pair, schema {schema}",
        args.transactions
    );

    let binder = OsBinder;
    let probe = PairProbe::new(&binder, args.transactions, schema);
    let mut matrix = sweep(&probe, cores, |n, total| {
        print!("\rRunning test {}/{} {}", n + 1, total, SPINNER[n & 3]);
        let _ = io::stdout().flush();
    })?;
    println!();

    match matrix.normalize() {
        Some(best) => {
            let (a, b) = best.pair;
            // two one-way messages cross the pair per round trip
            let rate = 2.0 * best.score;
            println!(
                "max speed = {} T/s (core {a} <-> {b})",
                format!("{rate:.3e}").bold()
            );
        }
        None => println!("no core pairs measured"),
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    Reporter::default().render(&matrix, &mut out)?;
    Ok(())
}
