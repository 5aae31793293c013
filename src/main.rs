//! Command-line front end: `enigma CONFIG [INPUT] [OUTPUT]`.
//!
//! Reads a machine description from CONFIG, then settings lines and
//! messages from INPUT (standard input by default), and writes the
//! converted messages to OUTPUT (standard output by default).

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use enigma::config::parse_config;
use enigma::session;

/// Enigma-style rotor machine simulator
#[derive(Parser)]
#[command(name = "enigma")]
#[command(about = "Encrypts and decrypts messages with a configurable rotor machine")]
#[command(version)]
struct Cli {
    /// Machine description: alphabet, slot and pawl counts, rotors
    config: PathBuf,

    /// Settings lines and messages (standard input if omitted)
    input: Option<PathBuf>,

    /// Where to write converted messages (standard output if omitted)
    output: Option<PathBuf>,

    /// Log more detail to stderr (-v for settings, -vv for every line)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "warn,enigma=debug",
        _ => "warn,enigma=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let text = fs::read_to_string(&cli.config)
        .with_context(|| format!("could not open {}", cli.config.display()))?;
    let mut machine = parse_config(&text)
        .and_then(|config| config.build())
        .with_context(|| format!("bad configuration in {}", cli.config.display()))?;
    info!(config = %cli.config.display(), "machine ready");

    let input: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("could not open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("could not open {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    session::process(&mut machine, input, output)?;
    info!("done");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
