use anyhow::Result;
use clap::{Parser, Subcommand};

mod sim;
use sim::{attrs as sim_attrs, regs as sim_regs, scan as sim_scan};

/// adcsim command line tools
#[derive(Parser)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan sample instants from a simulated device and print them as a table
    Scan {
        /// Active-channel mask (decimal or 0x-prefixed hex)
        #[arg(long, default_value = "0x1")]
        mask: String,
        /// Number of sample instants to produce
        #[arg(long, default_value_t = 8)]
        samples: u32,
        /// Comma-separated external sample data, channel-major; omit to use
        /// the built-in sine source
        #[arg(long)]
        ext: Option<String>,
        /// Samples per channel row of the external data
        #[arg(long)]
        row_len: Option<usize>,
    },
    /// Show attribute values, optionally storing a value first
    Attrs {
        /// Channel index for the per-channel attribute; omit for the global
        /// attribute
        #[arg(long)]
        channel: Option<usize>,
        /// Value to store through the text path before showing
        #[arg(long)]
        set: Option<String>,
    },
    /// Apply debug register writes, then dump the register bank
    Regs {
        /// Register writes as IDX=VAL (both decimal or 0x-prefixed hex)
        #[arg(long = "write", value_name = "IDX=VAL")]
        writes: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            mask,
            samples,
            ext,
            row_len,
        } => sim_scan(&mask, samples, ext.as_deref(), row_len)?,
        Commands::Attrs { channel, set } => sim_attrs(channel, set.as_deref())?,
        Commands::Regs { writes } => sim_regs(&writes)?,
    }

    Ok(())
}
