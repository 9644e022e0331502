// Desktop/tooling crate: unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod board;
mod check;
mod doc;
mod flash;
mod test;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

/// Firmware target of the HPM6360.
pub const TARGET: &str = "riscv32imac-unknown-none-elf";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "HPM6300EVK board support development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the image runs from.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageKind {
    /// Execute in place from the XPI NOR flash
    FlashXip,
    /// Loaded into RAM by the debugger
    Ram,
}

impl ImageKind {
    /// Cargo features selecting the image layout.
    pub fn features(self) -> &'static str {
        match self {
            Self::FlashXip => "hardware,flash-xip",
            Self::Ram => "hardware",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the demo image and program it through OpenOCD
    Flash {
        /// Build and flash release version
        #[arg(short, long)]
        release: bool,
        /// Image layout
        #[arg(long, value_enum, default_value = "flash-xip")]
        image: ImageKind,
    },
    /// Check the workspace for the host and the RISC-V target
    Check,
    /// Run all tests (unit, integration, and doc)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Build and optionally open documentation
    Doc {
        /// Open documentation in browser
        #[arg(long)]
        open: bool,
    },
    /// Print the board clock plan
    Clocks,
    /// Decode XPI NOR configuration option words (defaults to the board's)
    NorOption {
        /// Up to four words, hex with or without `0x`
        words: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Flash { release, image } => flash::run(release, image),
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::Doc { open } => doc::run(open),
        Commands::Clocks => {
            board::print_clock_plan();
            Ok(())
        }
        Commands::NorOption { words } => board::decode_nor_option(&words),
    }
}
