// src/main.rs
mod config;
mod files;
mod logger;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use huffpress::{Container, HuffmanTree};
use tracing::info;

use config::Settings;

#[derive(Parser)]
#[command(name = "huffpress", version)]
#[command(about = "Lossless Huffman compression for single files.", long_about = None)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file (default output: <INPUT>.huf)
    Compress {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite an existing output file
        #[arg(short, long)]
        force: bool,
    },
    /// Restore a file from a .huf container
    Decompress {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite an existing output file
        #[arg(short, long)]
        force: bool,
    },
    /// Show the frequency table and codes stored in a container
    Inspect { input: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let force = match &cli.command {
        Commands::Compress { force, .. } | Commands::Decompress { force, .. } => *force,
        Commands::Inspect { .. } => false,
    };
    let settings = Settings::from_flags(cli.verbose, cli.quiet, force);
    logger::init(settings.log_level)?;

    let span = tracing::info_span!("command_execution", command = ?std::env::args().collect::<Vec<_>>());
    let _enter = span.enter();

    match cli.command {
        Commands::Compress { input, output, .. } => {
            let output = output.unwrap_or_else(|| config::compressed_path(&input));
            compress_file(&input, &output, &settings)
        }
        Commands::Decompress { input, output, .. } => {
            let output = output.unwrap_or_else(|| config::restored_path(&input));
            decompress_file(&input, &output, &settings)
        }
        Commands::Inspect { input } => inspect_file(&input),
    }
}

fn compress_file(input: &Path, output: &Path, settings: &Settings) -> anyhow::Result<()> {
    let reader = files::open_input(input)?;
    let stats = files::write_atomically(output, settings.overwrite, |writer| {
        huffpress::compress_stream(reader, writer)
    })
    .with_context(|| format!("compressing {}", input.display()))?;

    info!(
        input = %input.display(),
        output = %output.display(),
        original = stats.original_len,
        compressed = stats.compressed_len,
        "compressed file"
    );
    println!(
        "{} -> {}: {} -> {} bytes ({:.1}%, {:.3} bits/byte)",
        input.display(),
        output.display(),
        stats.original_len,
        stats.compressed_len,
        stats.ratio() * 100.0,
        stats.bits_per_symbol()
    );
    Ok(())
}

fn decompress_file(input: &Path, output: &Path, settings: &Settings) -> anyhow::Result<()> {
    let reader = files::open_input(input)?;
    let restored = files::write_atomically(output, settings.overwrite, |writer| {
        huffpress::decompress_stream(reader, writer)
    })
    .with_context(|| format!("decompressing {}", input.display()))?;

    info!(input = %input.display(), output = %output.display(), restored, "decompressed file");
    println!("{} -> {}: {} bytes", input.display(), output.display(), restored);
    Ok(())
}

fn inspect_file(input: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(input).with_context(|| format!("cannot read {}", input.display()))?;
    let container = Container::from_bytes(&bytes)
        .with_context(|| format!("{} is not a valid container", input.display()))?;

    let frequencies = container.frequencies();
    let tree = HuffmanTree::build(frequencies);
    let codes = huffpress::CodeTable::from_optional(tree.as_ref());

    println!("container version: {}", huffpress::container::VERSION);
    println!("original length:   {}", container.original_len());
    println!("alphabet size:     {}", frequencies.len());
    println!("payload bits:      {}", container.stream().bit_len());
    println!(
        "tree depth:        {}",
        tree.as_ref().map_or(0, HuffmanTree::depth)
    );

    if !frequencies.is_empty() {
        println!();
        println!("{:>6}  {:>12}  code", "symbol", "count");
    }
    for (symbol, count) in frequencies.iter() {
        let code = codes.get(symbol).map(ToString::to_string).unwrap_or_default();
        println!("{:>6}  {:>12}  {}", display_symbol(symbol), count, code);
    }
    Ok(())
}

fn display_symbol(symbol: u8) -> String {
    if symbol.is_ascii_graphic() {
        format!("'{}'", symbol as char)
    } else {
        format!("0x{symbol:02x}")
    }
}
